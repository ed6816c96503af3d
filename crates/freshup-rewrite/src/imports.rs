//! Import declaration rewrite
//!
//! Runs last in a file pass. Legacy specifiers are re-pointed at the new
//! modules, legacy names are moved to the compatibility module, and the
//! names accumulated in [`ImportState`](crate::ImportState) are added to (or
//! synthesized as) one declaration per target module.

use crate::pass::FilePass;
use crate::state::{imported_name, is_type_entry, local_name, ImportTarget};
use crate::symbols::{
    COMPAT_MODULE, COMPAT_SYMBOLS, LEGACY_PRAGMA_SYMBOLS, LEGACY_RUNTIME_MODULE,
    LEGACY_SERVER_MODULE, PRIMARY_MODULE, RUNTIME_MODULE, UI_LIBRARY,
};
use freshup_syntax::node::{has_token, line_end, line_start, named_children};
use freshup_syntax::Node;
use std::ops::Range;

/// What an import declaration means to the rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// UI library import carrying pragma symbols
    UiLibrary,
    /// Import of one of the target modules, possibly through its legacy path
    Target { target: ImportTarget, legacy: bool },
}

fn role(specifier: &str) -> Option<Role> {
    let role = match specifier {
        UI_LIBRARY => Role::UiLibrary,
        LEGACY_SERVER_MODULE => Role::Target {
            target: ImportTarget::Core,
            legacy: true,
        },
        PRIMARY_MODULE => Role::Target {
            target: ImportTarget::Core,
            legacy: false,
        },
        LEGACY_RUNTIME_MODULE => Role::Target {
            target: ImportTarget::Runtime,
            legacy: true,
        },
        RUNTIME_MODULE => Role::Target {
            target: ImportTarget::Runtime,
            legacy: false,
        },
        COMPAT_MODULE => Role::Target {
            target: ImportTarget::Compat,
            legacy: false,
        },
        _ => return None,
    };
    Some(role)
}

/// One `{ ... }` entry
#[derive(Debug, Clone, PartialEq, Eq)]
struct NamedSpecifier {
    name: String,
    local: String,
    text: String,
}

impl NamedSpecifier {
    fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            name: imported_name(&text).to_string(),
            local: local_name(&text).to_string(),
            text,
        }
    }
}

/// Editable view of a top-level import declaration
#[derive(Debug)]
struct ImportDecl<'t> {
    node: Node<'t>,
    specifier: String,
    quote: char,
    type_only: bool,
    default: Option<&'t str>,
    namespace: Option<&'t str>,
    named: Vec<NamedSpecifier>,
    has_clause: bool,
    semicolon: bool,
    changed: bool,
    deleted: bool,
}

impl<'t> ImportDecl<'t> {
    /// Read a declaration; `None` for shapes the rewrite leaves alone
    fn read(pass: &FilePass<'t>, node: Node<'t>) -> Option<Self> {
        let children = named_children(node);
        if children
            .iter()
            .any(|c| matches!(c.kind(), "import_require_clause" | "import_attribute"))
        {
            return None;
        }
        let source = pass.text(node.child_by_field_name("source")?);
        let quote = source.chars().next()?;
        let specifier = source.get(1..source.len().saturating_sub(1))?.to_string();

        let mut decl = Self {
            node,
            specifier,
            quote,
            type_only: has_token(node, "type"),
            default: None,
            namespace: None,
            named: Vec::new(),
            has_clause: false,
            semicolon: has_token(node, ";"),
            changed: false,
            deleted: false,
        };

        if let Some(clause) = children.iter().find(|c| c.kind() == "import_clause") {
            decl.has_clause = true;
            for part in named_children(*clause) {
                match part.kind() {
                    "identifier" => decl.default = Some(pass.text(part)),
                    "namespace_import" => decl.namespace = Some(pass.text(part)),
                    "named_imports" => {
                        decl.named = named_children(part)
                            .into_iter()
                            .filter(|s| s.kind() == "import_specifier")
                            .map(|s| NamedSpecifier::new(pass.text(s)))
                            .collect();
                    }
                    _ => {}
                }
            }
        }
        Some(decl)
    }

    /// Whether additional names can be added to this declaration
    fn accepts_names(&self) -> bool {
        self.has_clause && self.namespace.is_none()
    }

    fn is_named_only(&self) -> bool {
        self.has_clause && self.default.is_none() && self.namespace.is_none()
    }

    fn binds_nothing(&self) -> bool {
        self.has_clause && self.default.is_none() && self.namespace.is_none() && self.named.is_empty()
    }

    fn binds(&self, local: &str) -> bool {
        self.default == Some(local) || self.named.iter().any(|s| s.local == local)
    }

    /// Remove named entries matching `predicate`, returning their texts
    fn take_named(&mut self, predicate: impl Fn(&NamedSpecifier) -> bool) -> Vec<String> {
        let (taken, kept): (Vec<_>, Vec<_>) = self.named.drain(..).partition(|s| predicate(s));
        self.named = kept;
        if !taken.is_empty() {
            self.changed = true;
        }
        taken.into_iter().map(|s| s.text).collect()
    }

    /// Add an entry unless its local binding already exists here
    ///
    /// A value entry widens an existing `type` entry of the same binding.
    fn push_named(&mut self, entry: &str) {
        let entry = if self.type_only {
            entry.strip_prefix("type ").unwrap_or(entry)
        } else {
            entry
        };
        let spec = NamedSpecifier::new(entry);
        if let Some(existing) = self.named.iter_mut().find(|s| s.local == spec.local) {
            if is_type_entry(&existing.text) && !is_type_entry(&spec.text) {
                *existing = spec;
                self.changed = true;
            }
        } else if !self.binds(&spec.local) {
            self.named.push(spec);
            self.changed = true;
        }
    }

    fn render(&self) -> String {
        let q = self.quote;
        let spec = &self.specifier;
        let semi = if self.semicolon { ";" } else { "" };

        let mut clause: Vec<String> = Vec::new();
        clause.extend(self.default.map(str::to_string));
        clause.extend(self.namespace.map(str::to_string));
        if !self.named.is_empty() {
            let names: Vec<&str> = self.named.iter().map(|s| s.text.as_str()).collect();
            clause.push(format!("{{ {} }}", names.join(", ")));
        }

        if clause.is_empty() {
            return format!("import {q}{spec}{q}{semi}");
        }
        let keyword = if self.type_only { "import type" } else { "import" };
        format!("{keyword} {} from {q}{spec}{q}{semi}", clause.join(", "))
    }
}

/// Quote and semicolon style for synthesized declarations
#[derive(Debug, Clone, Copy)]
struct Style {
    quote: char,
    semicolon: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            quote: '"',
            semicolon: true,
        }
    }
}

fn synthesize(module: &str, entries: &[String], style: Style) -> String {
    let all_types = entries.iter().all(|e| e.starts_with("type "));
    let names: Vec<&str> = entries
        .iter()
        .map(|e| {
            if all_types {
                e.trim_start_matches("type ")
            } else {
                e.as_str()
            }
        })
        .collect();
    let keyword = if all_types { "import type" } else { "import" };
    let q = style.quote;
    let semi = if style.semicolon { ";" } else { "" };
    format!("{keyword} {{ {} }} from {q}{module}{q}{semi}\n", names.join(", "))
}

/// Range removing a whole statement line when nothing else shares it
fn statement_range(text: &str, node: Node<'_>) -> Range<usize> {
    let (start, end) = (node.start_byte(), node.end_byte());
    let after = line_end(text, end);
    if !text[end..after].trim().is_empty() {
        return start..end;
    }
    let before = line_start(text, start);
    if text[before..start].trim().is_empty() {
        before..after
    } else {
        start..after
    }
}

/// Drop pragma-only symbols from a UI library import
fn drop_pragma_symbols(pass: &mut FilePass<'_>, decl: &mut ImportDecl<'_>) {
    let removed = decl.take_named(|s| LEGACY_PRAGMA_SYMBOLS.contains(&s.name.as_str()));
    for text in removed {
        let name = imported_name(&text).to_string();
        tracing::debug!(path = %pass.path().display(), symbol = %name, "removed pragma import");
        pass.removed_symbols.push(name);
    }
}

/// Move legacy names off a legacy server import into the compat set
fn move_compat_symbols(pass: &mut FilePass<'_>, decl: &mut ImportDecl<'_>) {
    let moved = decl.take_named(|s| COMPAT_SYMBOLS.contains(&s.name.as_str()));
    for text in moved {
        let entry = if decl.type_only && !text.starts_with("type ") {
            format!("type {text}")
        } else {
            text
        };
        pass.imports.insert(ImportTarget::Compat, entry);
    }
}

/// Pick the declaration that receives names for one target
///
/// Value imports are preferred so both value and type names fit.
fn pick_anchor(decls: &[ImportDecl<'_>], members: &[usize]) -> Option<usize> {
    let candidates = || members.iter().copied().filter(move |&i| decls[i].accepts_names());
    candidates()
        .find(|&i| !decls[i].type_only)
        .or_else(|| candidates().next())
}

/// Fold every other declaration of the same module into `anchor`
fn merge_into_anchor(decls: &mut [ImportDecl<'_>], members: &[usize], anchor: usize) {
    for &i in members.iter().filter(|&&i| i != anchor) {
        if !decls[i].has_clause {
            decls[i].deleted = true;
            continue;
        }
        if !decls[i].is_named_only() {
            continue;
        }
        let as_types = decls[i].type_only && !decls[anchor].type_only;
        let moved = std::mem::take(&mut decls[i].named);
        decls[i].deleted = true;
        for spec in moved {
            let entry = if as_types {
                format!("type {}", spec.text)
            } else {
                spec.text
            };
            decls[anchor].push_named(&entry);
        }
        decls[anchor].changed = true;
    }
}

/// Rewrite the file's top-level imports and emit accumulated names
pub fn rewrite_imports<'a>(pass: &mut FilePass<'a>) {
    let text = pass.unit().text();
    let root = pass.unit().root();
    let top_level = named_children(root);
    let statements: Vec<Node<'a>> = top_level
        .iter()
        .copied()
        .filter(|n| n.kind() == "import_statement")
        .collect();

    let mut decls: Vec<ImportDecl<'a>> = statements
        .iter()
        .filter_map(|n| ImportDecl::read(pass, *n))
        .collect();
    let style = decls.first().map_or_else(Style::default, |d| Style {
        quote: d.quote,
        semicolon: d.semicolon,
    });

    for decl in &mut decls {
        match role(&decl.specifier) {
            Some(Role::UiLibrary) => drop_pragma_symbols(pass, decl),
            Some(Role::Target { target, legacy }) => {
                if legacy {
                    decl.specifier = target.module().to_string();
                    decl.changed = true;
                    match target {
                        ImportTarget::Core => move_compat_symbols(pass, decl),
                        ImportTarget::Runtime => {
                            for spec in &decl.named {
                                pass.imports.insert(ImportTarget::Runtime, spec.text.clone());
                            }
                        }
                        ImportTarget::Compat => {}
                    }
                }
            }
            None => {}
        }
    }

    let mut synthesized = String::new();
    for target in ImportTarget::ALL {
        let members: Vec<usize> = decls
            .iter()
            .enumerate()
            .filter(|(_, d)| d.specifier == target.module())
            .map(|(i, _)| i)
            .collect();
        let wanted: Vec<String> = pass.imports.get(target).iter().cloned().collect();

        match pick_anchor(&decls, &members) {
            Some(anchor) => {
                merge_into_anchor(&mut decls, &members, anchor);
                for entry in &wanted {
                    decls[anchor].push_named(entry);
                }
            }
            None if !wanted.is_empty() => {
                tracing::debug!(module = target.module(), names = wanted.len(), "synthesized import");
                synthesized.push_str(&synthesize(target.module(), &wanted, style));
            }
            None => {}
        }
    }

    for decl in &decls {
        if decl.deleted || (decl.changed && decl.binds_nothing()) {
            pass.edits.delete(statement_range(text, decl.node));
        } else if decl.changed {
            pass.edits.replace(decl.node.byte_range(), decl.render());
        }
    }

    if !synthesized.is_empty() {
        let at = match statements.last() {
            Some(last) => line_end(text, last.end_byte()),
            None => top_level
                .first()
                .filter(|n| n.kind() == "hash_bang_line")
                .map_or(0, |n| line_end(text, n.end_byte())),
        };
        if at == text.len() && !text.is_empty() && !text.ends_with('\n') {
            synthesized.insert(0, '\n');
        }
        if statements.is_empty() && at < text.len() {
            synthesized.push('\n');
        }
        pass.edits.insert(at, synthesized);
    }
}
