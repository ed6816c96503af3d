//! Classification of exported request handlers

use crate::symbols::{HANDLER_EXPORT, HTTP_METHODS, ROUTE_WRAPPERS};
use freshup_syntax::node::{first_named_child, has_token, named_children};
use freshup_syntax::{Node, SourceUnit};

/// Shape of an exported handler-like declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerShape<'t> {
    /// `{ GET(req, ctx) {...}, POST: (req) => ... }`
    MethodObject(Vec<Node<'t>>),
    /// A single function
    Function(Node<'t>),
    /// `defineRoute(fn)` and the other declarative wrappers
    Wrapped {
        /// Wrapper name, one of the route wrappers
        wrapper: &'t str,
        /// First argument of the wrapper call
        function: Node<'t>,
    },
}

impl<'t> HandlerShape<'t> {
    /// Functions whose body and parameters get rewritten
    #[must_use]
    pub fn functions(&self) -> Vec<Node<'t>> {
        match self {
            Self::MethodObject(methods) => methods.clone(),
            Self::Function(function) | Self::Wrapped { function, .. } => vec![*function],
        }
    }
}

/// A classified handler plus how its context parameter should be typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedHandler<'t> {
    /// Classified shape
    pub shape: HandlerShape<'t>,
    /// Add an explicit context type; false when the type comes from an
    /// annotation or wrapper around the function
    pub annotate_context: bool,
}

/// Check whether a node is a function literal with parameters and a body
#[must_use]
pub fn is_function_like(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "function_declaration" | "method_definition"
    )
}

/// Strip `satisfies T`, `as T` and parentheses around an expression
fn unwrap_expression(mut node: Node<'_>) -> (Node<'_>, bool) {
    let mut typed = false;
    while let "satisfies_expression" | "as_expression" | "parenthesized_expression" = node.kind() {
        typed |= node.kind() != "parenthesized_expression";
        match first_named_child(node) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    (node, typed)
}

/// Find the handler-like exports of a file
#[must_use]
pub fn exported_handlers(unit: &SourceUnit) -> Vec<ExportedHandler<'_>> {
    named_children(unit.root())
        .into_iter()
        .filter(|n| n.kind() == "export_statement")
        .flat_map(|export| classify_export(unit, export))
        .collect()
}

fn classify_export<'t>(unit: &'t SourceUnit, export: Node<'t>) -> Vec<ExportedHandler<'t>> {
    let is_default = has_token(export, "default");

    if let Some(declaration) = export.child_by_field_name("declaration") {
        return match declaration.kind() {
            "function_declaration" | "generator_function_declaration"
                if is_default || declared_name(unit, declaration) == Some(HANDLER_EXPORT) =>
            {
                vec![ExportedHandler {
                    shape: HandlerShape::Function(declaration),
                    annotate_context: true,
                }]
            }
            "lexical_declaration" | "variable_declaration" if !is_default => {
                named_children(declaration)
                    .into_iter()
                    .filter(|d| d.kind() == "variable_declarator")
                    .filter(|d| declared_name(unit, *d) == Some(HANDLER_EXPORT))
                    .filter_map(|d| classify_handler_binding(unit, d))
                    .collect()
            }
            _ => Vec::new(),
        };
    }

    if is_default {
        if let Some(value) = export.child_by_field_name("value") {
            return classify_default_value(unit, value).into_iter().collect();
        }
    }
    Vec::new()
}

fn declared_name<'t>(unit: &'t SourceUnit, node: Node<'t>) -> Option<&'t str> {
    node.child_by_field_name("name").map(|n| unit.node_text(n))
}

/// `const handler[: T] = ...`
fn classify_handler_binding<'t>(unit: &'t SourceUnit, declarator: Node<'t>) -> Option<ExportedHandler<'t>> {
    let (value, typed) = unwrap_expression(declarator.child_by_field_name("value")?);
    let annotate_context = !typed && declarator.child_by_field_name("type").is_none();

    let shape = match value.kind() {
        "object" => {
            let methods: Vec<Node<'t>> = named_children(value)
                .into_iter()
                .filter_map(|member| method_function(unit, member))
                .collect();
            if methods.is_empty() {
                return None;
            }
            HandlerShape::MethodObject(methods)
        }
        _ if is_function_like(value) => HandlerShape::Function(value),
        _ => return None,
    };
    Some(ExportedHandler {
        shape,
        annotate_context,
    })
}

/// Function behind an HTTP method property of a handler object
fn method_function<'t>(unit: &'t SourceUnit, member: Node<'t>) -> Option<Node<'t>> {
    let (key, function) = match member.kind() {
        "method_definition" => (member.child_by_field_name("name")?, member),
        "pair" => {
            let (value, _) = unwrap_expression(member.child_by_field_name("value")?);
            (member.child_by_field_name("key")?, value)
        }
        _ => return None,
    };
    let name = unit.node_text(key);
    (HTTP_METHODS.contains(&name) && is_function_like(function)).then_some(function)
}

/// `export default <expression>`
fn classify_default_value<'t>(unit: &'t SourceUnit, value: Node<'t>) -> Option<ExportedHandler<'t>> {
    let (value, _) = unwrap_expression(value);
    if is_function_like(value) {
        return Some(ExportedHandler {
            shape: HandlerShape::Function(value),
            annotate_context: true,
        });
    }
    if value.kind() != "call_expression" {
        return None;
    }
    let callee = value.child_by_field_name("function")?;
    let wrapper = unit.node_text(callee);
    if callee.kind() != "identifier" || !ROUTE_WRAPPERS.contains(&wrapper) {
        return None;
    }
    let arguments = value.child_by_field_name("arguments")?;
    let function = named_children(arguments).into_iter().next()?;
    is_function_like(function).then_some(ExportedHandler {
        shape: HandlerShape::Wrapped { wrapper, function },
        annotate_context: false,
    })
}
