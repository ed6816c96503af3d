//! Member-access rewrites on the context object
//!
//! - `ctx.remoteAddr` → `ctx.info.remoteAddr`
//! - `x.renderNotFound(args)` → `x.throw(args, 404)`
//!
//! Chains are walked from the outermost access inward, so
//! `ctx.state.renderNotFound()` and `ctx.remoteAddr.hostname` are both found.

use crate::pass::FilePass;
use crate::symbols::{
    CONTEXT_PARAM, INFO_MEMBER, NOT_FOUND_MEMBER, NOT_FOUND_STATUS, RELOCATED_MEMBER, THROW_MEMBER,
};
use freshup_syntax::node::named_children;
use freshup_syntax::Node;

/// Rewrite a `member_expression` chain in place
///
/// `arguments` is the argument list when the access is the callee of a call.
pub fn rewrite_member_access<'a>(pass: &mut FilePass<'a>, node: Node<'a>, arguments: Option<Node<'a>>) {
    let (Some(object), Some(property)) = (
        node.child_by_field_name("object"),
        node.child_by_field_name("property"),
    ) else {
        return;
    };
    let name = pass.text(property);

    if name == RELOCATED_MEMBER && object.kind() == "identifier" && pass.text(object) == CONTEXT_PARAM {
        pass.edits
            .replace(object.byte_range(), format!("{CONTEXT_PARAM}.{INFO_MEMBER}"));
        return;
    }

    if name == NOT_FOUND_MEMBER {
        pass.edits.replace(property.byte_range(), THROW_MEMBER);
        if let Some(arguments) = arguments {
            append_argument(pass, arguments, NOT_FOUND_STATUS);
        }
        return;
    }

    if object.kind() == "member_expression" {
        rewrite_member_access(pass, object, None);
    }
}

fn append_argument<'a>(pass: &mut FilePass<'a>, arguments: Node<'a>, value: &str) {
    match named_children(arguments).last() {
        Some(last) => pass.edits.insert(last.end_byte(), format!(", {value}")),
        None => pass.edits.replace(arguments.byte_range(), format!("({value})")),
    }
}
