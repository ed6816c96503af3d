//! Names a file must end up importing

use crate::symbols::{COMPAT_MODULE, PRIMARY_MODULE, RUNTIME_MODULE};
use indexmap::IndexSet;

/// Module an accumulated name is imported from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportTarget {
    /// New primary module
    Core,
    /// Client runtime module
    Runtime,
    /// Legacy compatibility module
    Compat,
}

impl ImportTarget {
    /// All targets in emission order
    pub const ALL: [ImportTarget; 3] = [Self::Core, Self::Runtime, Self::Compat];

    /// Module specifier for this target
    #[inline]
    #[must_use]
    pub fn module(self) -> &'static str {
        match self {
            Self::Core => PRIMARY_MODULE,
            Self::Runtime => RUNTIME_MODULE,
            Self::Compat => COMPAT_MODULE,
        }
    }
}

/// Per-file import sets, filled during the rewrite walk
///
/// Entries are import specifier texts (`Handlers`, `type PageProps`,
/// `Handlers as H`). A local binding lives in at most one set, so
/// `Handlers as H` and `Handlers` are separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportState {
    core: IndexSet<String>,
    runtime: IndexSet<String>,
    compat: IndexSet<String>,
}

impl ImportState {
    /// Create empty state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` for `target`
    ///
    /// Returns `false` if its local binding is already tracked by any set.
    /// A value entry replaces a type-only entry of the same binding in place.
    pub fn insert(&mut self, target: ImportTarget, entry: impl Into<String>) -> bool {
        let entry = entry.into();
        let local = local_name(&entry).to_string();
        for tracked in ImportTarget::ALL {
            let set = self.set_mut(tracked);
            if let Some(index) = set.iter().position(|e| local_name(e) == local) {
                let widen = tracked == target && is_type_entry(&set[index]) && !is_type_entry(&entry);
                if widen {
                    set.shift_remove_index(index);
                    set.shift_insert(index, entry);
                }
                return widen;
            }
        }
        self.set_mut(target).insert(entry)
    }

    /// Entries accumulated for `target`, in insertion order
    #[inline]
    #[must_use]
    pub fn get(&self, target: ImportTarget) -> &IndexSet<String> {
        match target {
            ImportTarget::Core => &self.core,
            ImportTarget::Runtime => &self.runtime,
            ImportTarget::Compat => &self.compat,
        }
    }

    /// Check whether no names were accumulated
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.core.is_empty() && self.runtime.is_empty() && self.compat.is_empty()
    }

    fn set_mut(&mut self, target: ImportTarget) -> &mut IndexSet<String> {
        match target {
            ImportTarget::Core => &mut self.core,
            ImportTarget::Runtime => &mut self.runtime,
            ImportTarget::Compat => &mut self.compat,
        }
    }
}

/// Imported (not local) name of a specifier text
///
/// `type PageProps` → `PageProps`, `Handlers as H` → `Handlers`.
#[must_use]
pub fn imported_name(specifier: &str) -> &str {
    let trimmed = specifier.trim();
    let without_type = trimmed
        .strip_prefix("type ")
        .map_or(trimmed, str::trim_start);
    without_type
        .split_whitespace()
        .next()
        .unwrap_or(without_type)
}

/// Local binding introduced by a specifier text
///
/// `type PageProps` → `PageProps`, `Handlers as H` → `H`.
#[must_use]
pub fn local_name(specifier: &str) -> &str {
    let mut words = specifier.split_whitespace().skip_while(|w| *w == "type");
    let imported = words.next().unwrap_or_default();
    match (words.next(), words.next()) {
        (Some("as"), Some(alias)) => alias,
        _ => imported,
    }
}

/// Check whether a specifier text carries a `type` modifier
#[must_use]
pub fn is_type_entry(specifier: &str) -> bool {
    specifier.trim_start().starts_with("type ")
}
