//! Whole-file rewrite: directives, handlers, imports

use crate::directives::strip_directives;
use crate::error::RewriteResult;
use crate::handler::exported_handlers;
use crate::imports::rewrite_imports;
use crate::params::normalize_parameters;
use crate::pass::FilePass;
use crate::symbols::{PRIVATE_GROUP_PREFIX, ROUTES_DIR};
use crate::walker::walk_statements;
use freshup_syntax::node::named_children;
use freshup_syntax::{SourceLanguage, SourceUnit, SyntaxError};
use std::path::{Component, Path};

/// Outcome of rewriting one file's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRewrite {
    /// Rewritten source
    pub text: String,
    /// Whether `text` differs from the input
    pub changed: bool,
    /// Number of handler functions visited
    pub handlers_rewritten: usize,
    /// Legacy UI symbols dropped from imports
    pub removed_symbols: Vec<String>,
    /// Constructs left untouched, as `path:line: message`
    pub warnings: Vec<String>,
}

/// Check whether a root-relative path is a public route module
///
/// True when some directory is `routes` and no component starts with `(_`.
#[must_use]
pub fn is_route_file(path: &Path) -> bool {
    let names: Vec<&str> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect();
    let in_routes = names
        .split_last()
        .is_some_and(|(_, dirs)| dirs.contains(&ROUTES_DIR));
    in_routes && !names.iter().any(|n| n.starts_with(PRIVATE_GROUP_PREFIX))
}

/// Rewrite one source file
///
/// `path` is relative to the project root; it selects the grammar and
/// decides whether handler rewriting applies.
///
/// # Errors
/// - `SyntaxError::UnsupportedExtension` for non-script files
/// - `SyntaxError::InvalidSyntax` if the file does not parse cleanly
/// - `SyntaxError::OverlappingEdit` if two rewrites collide
pub fn rewrite_source(path: &Path, source: &str) -> RewriteResult<FileRewrite> {
    let language = SourceLanguage::from_path(path).ok_or_else(|| SyntaxError::unsupported(path))?;
    let stripped = strip_directives(source);
    let unit = SourceUnit::parse(stripped.as_ref(), language)?;
    let mut pass = FilePass::new(&unit, path);

    let mut handlers_rewritten = 0;
    if is_route_file(path) {
        for handler in exported_handlers(&unit) {
            for function in handler.shape.functions() {
                if let Some(body) = function.child_by_field_name("body") {
                    let statements = if body.kind() == "statement_block" {
                        named_children(body)
                    } else {
                        vec![body]
                    };
                    walk_statements(&mut pass, &statements);
                }
                normalize_parameters(&mut pass, function, handler.annotate_context);
                handlers_rewritten += 1;
            }
        }
    } else {
        tracing::trace!(path = %path.display(), "not a public route, handlers skipped");
    }

    rewrite_imports(&mut pass);

    let text = pass.render()?;
    let changed = text != source;
    tracing::debug!(path = %path.display(), changed, edits = pass.edits.len(), "rewrote source");
    Ok(FileRewrite {
        text,
        changed,
        handlers_rewritten,
        removed_symbols: pass.removed_symbols,
        warnings: pass.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RewriteError;
    use pretty_assertions::assert_eq;

    #[test]
    fn route_file_detection() {
        assert!(is_route_file(Path::new("routes/index.tsx")));
        assert!(is_route_file(Path::new("routes/api/joke.ts")));
        assert!(is_route_file(Path::new("src/routes/(marketing)/about.tsx")));
        assert!(!is_route_file(Path::new("routes/(_islands)/Counter.tsx")));
        assert!(!is_route_file(Path::new("islands/Counter.tsx")));
        assert!(!is_route_file(Path::new("routes.ts")));
        assert!(!is_route_file(Path::new("components/routes.tsx")));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = rewrite_source(Path::new("routes/a.md"), "# hi\n").unwrap_err();
        assert!(matches!(
            err,
            RewriteError::Syntax(SyntaxError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn invalid_syntax_is_rejected() {
        let err = rewrite_source(Path::new("routes/a.ts"), "export const = ;\n").unwrap_err();
        assert!(matches!(
            err,
            RewriteError::Syntax(SyntaxError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn untouched_file_is_unchanged() {
        let source = "export const x = 1;\n";
        let out = rewrite_source(Path::new("utils/x.ts"), source).unwrap();
        assert!(!out.changed);
        assert_eq!(out.text, source);
    }

    #[test]
    fn non_route_file_gets_imports_only() {
        let source = "/** @jsx h */\nimport { h } from \"preact\";\nexport const handler = (req) => {\n  return req;\n};\n";
        let out = rewrite_source(Path::new("components/Button.tsx"), source).unwrap();
        assert_eq!(
            out.text,
            "export const handler = (req) => {\n  return req;\n};\n"
        );
        assert_eq!(out.handlers_rewritten, 0);
        assert_eq!(out.removed_symbols, vec!["h"]);
    }

    #[test]
    fn private_route_group_is_not_rewritten() {
        let source = "export const handler = (req) => {\n  return req;\n};\n";
        let out = rewrite_source(Path::new("routes/(_components)/x.ts"), source).unwrap();
        assert!(!out.changed);
    }

    #[test]
    fn handler_object_is_migrated() {
        let source = concat!(
            "import { Handlers } from \"$fresh/server.ts\";\n",
            "\n",
            "export const handler: Handlers = {\n",
            "  async GET(req, ctx) {\n",
            "    const ip = ctx.remoteAddr.hostname;\n",
            "    if (!ip) {\n",
            "      return ctx.renderNotFound();\n",
            "    }\n",
            "    return new Response(req.url);\n",
            "  },\n",
            "};\n",
        );
        let out = rewrite_source(Path::new("routes/api/ip.ts"), source).unwrap();
        assert_eq!(
            out.text,
            concat!(
                "import { Handlers } from \"fresh/compat\";\n",
                "\n",
                "export const handler: Handlers = {\n",
                "  async GET(ctx) {\n",
                "    const req = ctx.req;\n",
                "    const ip = ctx.info.remoteAddr.hostname;\n",
                "    if (!ip) {\n",
                "      return ctx.throw(404);\n",
                "    }\n",
                "    return new Response(req.url);\n",
                "  },\n",
                "};\n",
            )
        );
        assert_eq!(out.handlers_rewritten, 1);
    }

    #[test]
    fn untyped_handler_gains_context_import() {
        let source = "export const handler = (req) => {\n  return new Response(req.url);\n};\n";
        let out = rewrite_source(Path::new("routes/index.ts"), source).unwrap();
        assert_eq!(
            out.text,
            concat!(
                "import { FreshContext } from \"fresh\";\n",
                "\n",
                "export const handler = (ctx: FreshContext) => {\n",
                "  const req = ctx.req;\n",
                "  return new Response(req.url);\n",
                "};\n",
            )
        );
    }

    #[test]
    fn route_wrapper_with_route_context() {
        let source = concat!(
            "import { defineRoute, RouteContext } from \"$fresh/server.ts\";\n",
            "\n",
            "export default defineRoute(async (_req: Request, ctx: RouteContext) => {\n",
            "  return <p>{ctx.params.id}</p>;\n",
            "});\n",
        );
        let out = rewrite_source(Path::new("routes/[id].tsx"), source).unwrap();
        assert_eq!(
            out.text,
            concat!(
                "import { FreshContext } from \"fresh\";\n",
                "import { defineRoute, RouteContext } from \"fresh/compat\";\n",
                "\n",
                "export default defineRoute(async (ctx: FreshContext) => {\n",
                "  return <p>{ctx.params.id}</p>;\n",
                "});\n",
            )
        );
    }

    #[test]
    fn expression_bodied_handler_is_reported() {
        let source = "export const handler = (req, ctx) => ctx.render(req);\n";
        let out = rewrite_source(Path::new("routes/index.ts"), source).unwrap();
        assert!(!out.changed);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn underscore_request_gets_no_binding() {
        let source = "export const handler = {\n  GET(_req, ctx) {\n    return ctx.render();\n  },\n};\n";
        let out = rewrite_source(Path::new("routes/index.tsx"), source).unwrap();
        assert!(!out.text.contains("ctx.req"));
        assert!(out.text.contains("GET(ctx: FreshContext)") || out.text.contains("GET(ctx)"));
    }

    #[test]
    fn rewriting_twice_changes_nothing() {
        let source = concat!(
            "/** @jsx h */\n",
            "import { h } from \"preact\";\n",
            "import { Handlers, PageProps } from \"$fresh/server.ts\";\n",
            "\n",
            "export const handler: Handlers = {\n",
            "  GET(req, { remoteAddr }) {\n",
            "    return new Response(remoteAddr.hostname + req.url);\n",
            "  },\n",
            "};\n",
            "\n",
            "export default function Page(props: PageProps) {\n",
            "  return <div>{props.url.href}</div>;\n",
            "}\n",
        );
        let path = Path::new("routes/index.tsx");
        let once = rewrite_source(path, source).unwrap();
        assert!(once.changed);
        let twice = rewrite_source(path, &once.text).unwrap();
        assert!(!twice.changed, "{}", twice.text);
        assert_eq!(twice.text, once.text);
    }
}
