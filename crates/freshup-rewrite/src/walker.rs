//! Statement-tree walker
//!
//! Best-effort scan of a function body for context member accesses. Call
//! arguments, object literals, nested functions and JSX are never opened, so
//! code outside the handled shapes is left byte-for-byte intact.

use crate::member::rewrite_member_access;
use crate::pass::FilePass;
use freshup_syntax::node::{first_named_child, named_children};
use freshup_syntax::Node;

/// Block-like nodes whose children form a statement list
const STATEMENT_CONTAINERS: &[&str] = &[
    "statement_block",
    "else_clause",
    "catch_clause",
    "finally_clause",
    "switch_body",
    "switch_case",
    "switch_default",
];

/// How the walker treats one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeClass<'t> {
    /// `a.b` chain, handed to the member-access rewriter
    MemberAccess(Node<'t>),
    /// `f(args)`: only the callee is visited
    Call {
        /// Called expression
        callee: Node<'t>,
        /// Argument list, if present
        arguments: Option<Node<'t>>,
    },
    /// `return expr;`
    Return(Option<Node<'t>>),
    /// `const a = init, b = init;` with the initializers present
    Declaration(Vec<Node<'t>>),
    /// Expression statement or `await expr`
    Wrapper(Node<'t>),
    /// `left op right`
    Binary {
        /// Left operand
        left: Node<'t>,
        /// Right operand
        right: Node<'t>,
    },
    /// Any other statement: its nested statements
    Nested(Vec<Node<'t>>),
    /// Everything else is left alone
    Opaque,
}

/// Classify a node for the walk
#[must_use]
pub fn classify(node: Node<'_>) -> NodeClass<'_> {
    match node.kind() {
        "member_expression" => NodeClass::MemberAccess(node),
        "call_expression" => match node.child_by_field_name("function") {
            Some(callee) => NodeClass::Call {
                callee,
                arguments: node.child_by_field_name("arguments"),
            },
            None => NodeClass::Opaque,
        },
        "return_statement" => NodeClass::Return(first_named_child(node)),
        "lexical_declaration" | "variable_declaration" => NodeClass::Declaration(
            named_children(node)
                .into_iter()
                .filter(|d| d.kind() == "variable_declarator")
                .filter_map(|d| d.child_by_field_name("value"))
                .collect(),
        ),
        "expression_statement" | "await_expression" => {
            first_named_child(node).map_or(NodeClass::Opaque, NodeClass::Wrapper)
        }
        "binary_expression" => match (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) {
            (Some(left), Some(right)) => NodeClass::Binary { left, right },
            _ => NodeClass::Opaque,
        },
        kind if is_statement_kind(kind) => NodeClass::Nested(
            named_children(node)
                .into_iter()
                .filter(|child| is_statement_kind(child.kind()))
                .collect(),
        ),
        _ => NodeClass::Opaque,
    }
}

fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement")
        || kind == "lexical_declaration"
        || kind == "variable_declaration"
        || STATEMENT_CONTAINERS.contains(&kind)
}

/// Visit a statement list, rewriting context accesses
pub fn walk_statements<'a>(pass: &mut FilePass<'a>, statements: &[Node<'a>]) {
    for statement in statements {
        visit(pass, *statement);
    }
}

fn visit<'a>(pass: &mut FilePass<'a>, node: Node<'a>) {
    match classify(node) {
        NodeClass::MemberAccess(member) => rewrite_member_access(pass, member, None),
        NodeClass::Call { callee, arguments } => {
            if callee.kind() == "member_expression" {
                rewrite_member_access(pass, callee, arguments);
            } else {
                visit(pass, callee);
            }
        }
        NodeClass::Return(Some(expression)) | NodeClass::Wrapper(expression) => {
            visit(pass, expression);
        }
        NodeClass::Declaration(initializers) => walk_statements(pass, &initializers),
        NodeClass::Binary { left, right } => {
            visit(pass, left);
            visit(pass, right);
        }
        NodeClass::Nested(children) => walk_statements(pass, &children),
        NodeClass::Return(None) | NodeClass::Opaque => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshup_syntax::{SourceLanguage, SourceUnit};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn walk(source: &str) -> String {
        let unit = SourceUnit::parse(source, SourceLanguage::Tsx).unwrap();
        let mut pass = FilePass::new(&unit, Path::new("routes/index.tsx"));
        let statements = named_children(unit.root());
        walk_statements(&mut pass, &statements);
        pass.render().unwrap()
    }

    #[test]
    fn classify_dispatch_table() {
        let unit = SourceUnit::parse("a.b;\nconst x = 1, y;\nif (a) {}\n", SourceLanguage::Tsx).unwrap();
        let nodes = named_children(unit.root());
        assert!(matches!(classify(nodes[0]), NodeClass::Wrapper(_)));
        match classify(nodes[1]) {
            NodeClass::Declaration(inits) => assert_eq!(inits.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(classify(nodes[2]), NodeClass::Nested(_)));
    }

    #[test]
    fn rewrites_return_expression() {
        let source = "function f(ctx) {\n  return ctx.renderNotFound();\n}\n";
        let unit = SourceUnit::parse(source, SourceLanguage::Tsx).unwrap();
        let mut pass = FilePass::new(&unit, Path::new("routes/a.tsx"));
        let function = named_children(unit.root())[0];
        let body = function.child_by_field_name("body").unwrap();
        walk_statements(&mut pass, &named_children(body));
        assert_eq!(
            pass.render().unwrap(),
            "function f(ctx) {\n  return ctx.throw(404);\n}\n"
        );
    }

    #[test]
    fn rewrites_declaration_initializers() {
        assert_eq!(
            walk("const ip = ctx.remoteAddr.hostname, other = 1;\n"),
            "const ip = ctx.info.remoteAddr.hostname, other = 1;\n"
        );
    }

    #[test]
    fn rewrites_awaited_calls() {
        assert_eq!(
            walk("await ctx.state.renderNotFound();\n"),
            "await ctx.state.throw(404);\n"
        );
    }

    #[test]
    fn rewrites_both_binary_operands() {
        assert_eq!(
            walk("const same = ctx.remoteAddr === ctx.remoteAddr;\n"),
            "const same = ctx.info.remoteAddr === ctx.info.remoteAddr;\n"
        );
    }

    #[test]
    fn descends_into_nested_statements() {
        let source = "if (!user) {\n  ctx.renderNotFound();\n} else {\n  log(1);\n}\n";
        assert_eq!(
            walk(source),
            "if (!user) {\n  ctx.throw(404);\n} else {\n  log(1);\n}\n"
        );
    }

    #[test]
    fn descends_into_try_and_loops() {
        let source = "try {\n  for (const x of xs) {\n    const a = ctx.remoteAddr;\n  }\n} finally {\n  ctx.renderNotFound();\n}\n";
        assert_eq!(
            walk(source),
            "try {\n  for (const x of xs) {\n    const a = ctx.info.remoteAddr;\n  }\n} finally {\n  ctx.throw(404);\n}\n"
        );
    }

    #[test]
    fn call_arguments_are_not_opened() {
        let source = "log(ctx.remoteAddr);\n";
        assert_eq!(walk(source), source);
    }

    #[test]
    fn nested_functions_are_not_opened() {
        let source = "const f = () => ctx.remoteAddr;\nfunction g() {\n  return ctx.remoteAddr;\n}\n";
        assert_eq!(walk(source), source);
    }
}
