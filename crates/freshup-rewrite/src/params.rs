//! Handler parameter normalization
//!
//! Fresh 1 handlers receive `(req, ctx)`; Fresh 2 handlers receive a single
//! context carrying the request as `ctx.req`. Rather than rewriting every
//! reference to the request inside the body, the old binding is restored by
//! a `const req = ctx.req;` prelude.

use crate::pass::FilePass;
use crate::state::ImportTarget;
use crate::symbols::{
    CONTEXT_PARAM, CONTEXT_TYPE, INFO_MEMBER, LEGACY_CONTEXT_TYPE, RELOCATED_MEMBER, REQUEST_PARAM,
};
use freshup_syntax::node::{first_named_child, line_indent, named_children};
use freshup_syntax::Node;

/// One formal parameter of a function-like node
#[derive(Debug, Clone, Copy)]
pub struct Param<'t> {
    /// Whole parameter, including annotation and default value
    pub node: Node<'t>,
    /// Binding: identifier or destructuring pattern
    pub pattern: Node<'t>,
    /// Type inside the `: T` annotation, if any
    pub annotation: Option<Node<'t>>,
    /// Unparenthesized arrow parameter (`req => ...`)
    pub bare: bool,
}

impl<'t> Param<'t> {
    fn from_node(node: Node<'t>) -> Self {
        match node.kind() {
            "required_parameter" | "optional_parameter" => Self {
                node,
                pattern: node.child_by_field_name("pattern").unwrap_or(node),
                annotation: node.child_by_field_name("type").and_then(first_named_child),
                bare: false,
            },
            _ => Self {
                node,
                pattern: node,
                annotation: None,
                bare: false,
            },
        }
    }

    /// Check whether the binding is a plain identifier
    #[inline]
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.pattern.kind() == "identifier"
    }
}

/// Formal parameters of a function, method or arrow function
#[must_use]
pub fn parameters(function: Node<'_>) -> Vec<Param<'_>> {
    if let Some(single) = function.child_by_field_name("parameter") {
        return vec![Param {
            node: single,
            pattern: single,
            annotation: None,
            bare: true,
        }];
    }
    function
        .child_by_field_name("parameters")
        .map(|list| named_children(list).into_iter().map(Param::from_node).collect())
        .unwrap_or_default()
}

/// Restructure a handler's parameters to the single-context convention
///
/// `annotate_context` asks for `ctx: FreshContext` when the handler's
/// context type is not already inferred from its surroundings.
/// Expression-bodied functions that would need a prelude are left untouched
/// and reported as a warning.
pub fn normalize_parameters<'a>(pass: &mut FilePass<'a>, function: Node<'a>, annotate_context: bool) {
    let params = parameters(function);
    let Some(first) = params.first().copied() else {
        return;
    };

    let request_name = pass.text(first.pattern);
    let annotate = annotate_context && first.annotation.is_none();
    let has_request_var = params.len() > 1 || request_name == REQUEST_PARAM;
    if !has_request_var {
        return;
    }
    let keep_request = !request_name.starts_with('_');

    let mark = pass.edits.checkpoint();
    let mut core_names: Vec<&str> = Vec::new();
    let mut prelude: Vec<String> = Vec::new();

    let survivor = if let [_, second, ..] = params.as_slice() {
        pass.edits
            .delete(first.node.start_byte()..second.node.start_byte());
        if let Some(annotation) = second.annotation {
            if annotation.kind() == "type_identifier" && pass.text(annotation) == LEGACY_CONTEXT_TYPE {
                pass.edits.replace(annotation.byte_range(), CONTEXT_TYPE);
                core_names.push(CONTEXT_TYPE);
            }
        }
        *second
    } else {
        let renamed = if annotate {
            core_names.push(CONTEXT_TYPE);
            format!("{CONTEXT_PARAM}: {CONTEXT_TYPE}")
        } else {
            CONTEXT_PARAM.to_string()
        };
        if first.bare && annotate {
            pass.edits.replace(first.node.byte_range(), format!("({renamed})"));
        } else {
            pass.edits.replace(first.pattern.byte_range(), renamed);
        }
        first
    };
    let survivor_name = if params.len() == 1 {
        CONTEXT_PARAM
    } else {
        pass.text(survivor.pattern)
    };

    if survivor.is_identifier() && keep_request {
        prelude.push(format!("const {request_name} = {survivor_name}.req;"));
    }

    if params.len() > 1 && survivor.pattern.kind() == "object_pattern" {
        let fields = named_children(survivor.pattern);
        let mut moved_to_info = false;
        for field in &fields {
            match field.kind() {
                "shorthand_property_identifier_pattern" if pass.text(*field) == RELOCATED_MEMBER => {
                    pass.edits.replace(field.byte_range(), INFO_MEMBER);
                    moved_to_info = true;
                }
                "pair_pattern" => {
                    let key = field.child_by_field_name("key");
                    let value = field.child_by_field_name("value");
                    if let (Some(key), Some(value)) = (key, value) {
                        if pass.text(key) == RELOCATED_MEMBER {
                            let binding = pass.text(value);
                            pass.edits.replace(
                                field.byte_range(),
                                format!("{INFO_MEMBER}: {{ {RELOCATED_MEMBER}: {binding} }}"),
                            );
                        }
                    }
                }
                _ => {}
            }
        }
        if keep_request {
            let field = if request_name == REQUEST_PARAM {
                REQUEST_PARAM.to_string()
            } else {
                format!("{REQUEST_PARAM}: {request_name}")
            };
            match fields.last() {
                // a rest element must stay last
                Some(rest) if rest.kind() == "rest_pattern" => {
                    pass.edits.insert(rest.start_byte(), format!("{field}, "));
                }
                Some(last) => pass.edits.insert(last.end_byte(), format!(", {field}")),
                None => pass
                    .edits
                    .replace(survivor.pattern.byte_range(), format!("{{ {field} }}")),
            }
        }
        if moved_to_info {
            prelude.insert(
                0,
                format!("const {RELOCATED_MEMBER} = {INFO_MEMBER}.{RELOCATED_MEMBER};"),
            );
        }
    }

    if !prelude.is_empty() {
        let body = function
            .child_by_field_name("body")
            .filter(|b| b.kind() == "statement_block");
        let Some(body) = body else {
            pass.edits.rollback(mark);
            pass.warn(
                function,
                "expression-bodied handler needs a block body to receive the request binding; left unchanged",
            );
            return;
        };
        insert_prelude(pass, body, &prelude);
    }

    for name in core_names {
        pass.imports.insert(ImportTarget::Core, name);
    }
}

/// Insert statements at the top of a block body
fn insert_prelude<'a>(pass: &mut FilePass<'a>, body: Node<'a>, statements: &[String]) {
    let text = pass.unit().text();
    let open = body.start_byte();
    let indent = match named_children(body).first() {
        Some(first) if first.start_position().row > body.start_position().row => {
            line_indent(text, first.start_byte()).to_string()
        }
        _ => format!("{}  ", line_indent(text, open)),
    };
    let inserted: String = statements
        .iter()
        .map(|statement| format!("\n{indent}{statement}"))
        .collect();
    pass.edits.insert(open + 1, inserted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshup_syntax::{SourceLanguage, SourceUnit};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    /// Normalize the first top-level function-like node
    fn normalize(source: &str, annotate: bool) -> (String, Vec<String>, Vec<String>) {
        let unit = SourceUnit::parse(source, SourceLanguage::TypeScript).unwrap();
        let mut pass = FilePass::new(&unit, Path::new("routes/index.ts"));
        let top = named_children(unit.root())[0];
        let function = match top.kind() {
            "function_declaration" => top,
            _ => {
                let declarator = named_children(top)[0];
                declarator.child_by_field_name("value").unwrap()
            }
        };
        normalize_parameters(&mut pass, function, annotate);
        let core = pass.imports.get(ImportTarget::Core).iter().cloned().collect();
        let warnings = pass.warnings.clone();
        (pass.render().unwrap(), core, warnings)
    }

    #[test]
    fn single_request_param_becomes_typed_context() {
        let (out, core, _) = normalize(
            "const h = (req) => {\n  return new Response(req.url);\n};\n",
            true,
        );
        assert_eq!(
            out,
            "const h = (ctx: FreshContext) => {\n  const req = ctx.req;\n  return new Response(req.url);\n};\n"
        );
        assert_eq!(core, vec!["FreshContext"]);
    }

    #[test]
    fn single_request_param_without_annotation_mode() {
        let (out, core, _) = normalize(
            "const h = (req) => {\n  return new Response(req.url);\n};\n",
            false,
        );
        assert_eq!(
            out,
            "const h = (ctx) => {\n  const req = ctx.req;\n  return new Response(req.url);\n};\n"
        );
        assert!(core.is_empty());
    }

    #[test]
    fn existing_annotation_is_respected() {
        let (out, core, _) = normalize("function h(req: Request) {\n  return req;\n}\n", true);
        assert_eq!(
            out,
            "function h(ctx: Request) {\n  const req = ctx.req;\n  return req;\n}\n"
        );
        assert!(core.is_empty());
    }

    #[test]
    fn bare_arrow_param_gets_parentheses() {
        let (out, _, _) = normalize("const h = req => {\n  return req;\n};\n", true);
        assert_eq!(
            out,
            "const h = (ctx: FreshContext) => {\n  const req = ctx.req;\n  return req;\n};\n"
        );
    }

    #[test]
    fn two_params_drop_the_request() {
        let (out, core, _) = normalize(
            "function h(req, ctx) {\n  return ctx.render(req.url);\n}\n",
            true,
        );
        assert_eq!(
            out,
            "function h(ctx) {\n  const req = ctx.req;\n  return ctx.render(req.url);\n}\n"
        );
        assert!(core.is_empty());
    }

    #[test]
    fn route_context_annotation_is_replaced() {
        let (out, core, _) = normalize(
            "async function Page(req: Request, ctx: RouteContext) {\n  return req.url;\n}\n",
            true,
        );
        assert_eq!(
            out,
            "async function Page(ctx: FreshContext) {\n  const req = ctx.req;\n  return req.url;\n}\n"
        );
        assert_eq!(core, vec!["FreshContext"]);
    }

    #[test]
    fn underscore_request_gets_no_prelude() {
        let (out, _, _) = normalize("function h(_req, ctx) {\n  return ctx.render();\n}\n", true);
        assert_eq!(out, "function h(ctx) {\n  return ctx.render();\n}\n");
    }

    #[test]
    fn destructured_context_moves_remote_addr_to_info() {
        let (out, _, _) = normalize(
            "function h(req, { remoteAddr }) {\n  return remoteAddr.hostname;\n}\n",
            false,
        );
        assert_eq!(
            out,
            "function h({ info, req }) {\n  const remoteAddr = info.remoteAddr;\n  return remoteAddr.hostname;\n}\n"
        );
    }

    #[test]
    fn destructured_context_with_other_fields() {
        let (out, _, _) = normalize(
            "function h(_req, { params, remoteAddr: addr }) {\n  return addr;\n}\n",
            false,
        );
        assert_eq!(
            out,
            "function h({ params, info: { remoteAddr: addr } }) {\n  return addr;\n}\n"
        );
    }

    #[test]
    fn renamed_request_is_spliced_with_alias() {
        let (out, _, _) = normalize(
            "function h(request, { params }) {\n  return request;\n}\n",
            false,
        );
        assert_eq!(
            out,
            "function h({ params, req: request }) {\n  return request;\n}\n"
        );
    }

    #[test]
    fn request_is_spliced_before_rest_element() {
        let (out, _, _) = normalize(
            "function h(req, { params, ...rest }) {\n  return req.url + rest;\n}\n",
            false,
        );
        assert_eq!(
            out,
            "function h({ params, req, ...rest }) {\n  return req.url + rest;\n}\n"
        );
        let unit = SourceUnit::parse(&out, SourceLanguage::TypeScript).unwrap();
        let pattern = named_children(unit.root())[0]
            .child_by_field_name("parameters")
            .and_then(first_named_child)
            .and_then(|p| p.child_by_field_name("pattern"))
            .unwrap();
        assert_eq!(named_children(pattern).last().unwrap().kind(), "rest_pattern");
    }

    #[test]
    fn request_is_spliced_into_empty_pattern() {
        let (out, _, _) = normalize(
            "function h(req, {}) {\n  return new Response(req.url);\n}\n",
            false,
        );
        assert_eq!(
            out,
            "function h({ req }) {\n  return new Response(req.url);\n}\n"
        );
    }

    #[test]
    fn props_parameter_is_not_a_request() {
        let source = "function Page(props: PageProps) {\n  return props;\n}\n";
        let (out, core, _) = normalize(source, true);
        assert_eq!(out, source);
        assert!(core.is_empty());
    }

    #[test]
    fn no_parameters_is_a_no_op() {
        let source = "function h() {\n  return 1;\n}\n";
        assert_eq!(normalize(source, true).0, source);
    }

    #[test]
    fn expression_body_is_left_untouched_with_warning() {
        let source = "const h = (req, ctx) => ctx.render(req);\n";
        let (out, core, warnings) = normalize(source, true);
        assert_eq!(out, source);
        assert!(core.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("routes/index.ts:1:"));
    }

    #[test]
    fn expression_body_without_prelude_is_rewritten() {
        let (out, _, warnings) = normalize("const h = (_req, ctx) => ctx.render();\n", true);
        assert_eq!(out, "const h = (ctx) => ctx.render();\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn already_migrated_handler_is_stable() {
        let source = "const h = (ctx: FreshContext) => {\n  const req = ctx.req;\n  return req;\n};\n";
        assert_eq!(normalize(source, true).0, source);
    }

    #[test]
    fn parameters_of_method_and_arrow() {
        let unit = SourceUnit::parse(
            "const o = { GET(req: Request, ctx) {} };\nconst a = req => req;\n",
            SourceLanguage::TypeScript,
        )
        .unwrap();
        let decls = named_children(unit.root());
        let object = named_children(decls[0])[0].child_by_field_name("value").unwrap();
        let method = named_children(object)[0];
        let params = parameters(method);
        assert_eq!(params.len(), 2);
        assert!(params[0].annotation.is_some());
        assert!(params[1].is_identifier());

        let arrow = named_children(decls[1])[0].child_by_field_name("value").unwrap();
        let params = parameters(arrow);
        assert_eq!(params.len(), 1);
        assert!(params[0].bare);
    }
}
