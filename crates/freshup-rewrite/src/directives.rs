//! Text-level removal of obsolete compiler directives
//!
//! Runs before parsing. Each pattern matches a whole line, and the line
//! break is removed with it.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static DIRECTIVES: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        directive(r"/\*\*[ \t]*@jsx[ \t]+h[ \t]*\*/"),
        directive(r"/\*\*[ \t]*@jsxFrag[ \t]+Fragment[ \t]*\*/"),
        directive(r#"///[ \t]*<reference[ \t]+no-default-lib[ \t]*=[ \t]*"true"[ \t]*/>"#),
        directive(
            r#"///[ \t]*<reference[ \t]+lib[ \t]*=[ \t]*"(?:dom|dom\.iterable|dom\.asynciterable|deno\.ns)"[ \t]*/>"#,
        ),
    ]
});

fn directive(body: &str) -> Regex {
    Regex::new(&format!(r"(?m)^[ \t]*{body}[ \t]*(?:\r?\n|$)")).expect("directive pattern is valid")
}

/// Remove legacy pragma and triple-slash reference lines
#[must_use]
pub fn strip_directives(source: &str) -> Cow<'_, str> {
    let mut text = Cow::Borrowed(source);
    for pattern in DIRECTIVES.iter() {
        if pattern.is_match(&text) {
            text = Cow::Owned(pattern.replace_all(&text, "").into_owned());
        }
    }
    text
}
