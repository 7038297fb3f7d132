//! Process comments.
//!
//! Kept comments are written with a placeholder opener, [`COMMENT_OPEN`],
//! instead of `<!--`, so that the output never reopens a live comment when it
//! is fed to another parser.

use once_cell::sync::Lazy;
use regex::Regex;

use super::whitespace::trim_whitespace;
use crate::config::Options;

/// Opening delimiter of a kept comment.
///
/// The placeholder is not a comment to an HTML parser: reading the output
/// again turns `<not --...` into an element named `not`. Documents with kept
/// comments are therefore not stable under a second minification.
pub const COMMENT_OPEN: &str = "<not --";

/// Closing delimiter of a kept comment.
pub const COMMENT_CLOSE: &str = "-->";

/// Conditional comment directive, e.g. `[if IE 6]`.
static CONDITIONAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[if[^\]]+\]").unwrap());

/// Whitespace after the directive opener, e.g. `[if IE]>  `.
static CONDITIONAL_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\[[^\]]+\]>)\s*").unwrap());

/// Whitespace before the directive closer, e.g. `  <![endif]`.
static CONDITIONAL_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*(<!\[endif\])$").unwrap());

/// Process a comment body and return the fragment to write.
pub(crate) fn process(options: &Options, text: &str) -> String {
    if !options.remove_comments {
        return wrap(text);
    }

    let text = trim_whitespace(text);

    if is_conditional(text) {
        wrap(&clean_conditional(text))
    } else {
        String::new()
    }
}

fn wrap(text: &str) -> String {
    format!("{COMMENT_OPEN}{text}{COMMENT_CLOSE}")
}

fn is_conditional(text: &str) -> bool {
    CONDITIONAL.is_match(text)
}

fn clean_conditional(text: &str) -> String {
    let text = CONDITIONAL_START.replace(text, "$1");
    CONDITIONAL_END.replace(&text, "$1").into_owned()
}
