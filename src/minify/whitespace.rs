//! Whitespace handling.
//!
//! Elements such as `<pre>` forbid trimming and collapsing of the text they
//! contain, including text of their descendants. Two stacks record the
//! enclosing elements that suppress each operation.

use std::borrow::Cow;

/// Check whether a character is HTML whitespace.
fn is_whitespace(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Remove leading and trailing whitespace.
pub(crate) fn trim_whitespace(s: &str) -> &str {
    s.trim_matches(is_whitespace)
}

/// Replace every run of whitespace by a single space.
pub(crate) fn collapse_whitespace(s: &str) -> Cow<'_, str> {
    let needs_collapse = s
        .as_bytes()
        .windows(2)
        .any(|w| w[0].is_ascii_whitespace() && w[1].is_ascii_whitespace())
        || s.bytes().any(|b| b.is_ascii_whitespace() && b != b' ');

    if !needs_collapse {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut in_run = false;

    for c in s.chars() {
        if is_whitespace(c) {
            if !in_run {
                result.push(' ');
            }
            in_run = true;
        } else {
            result.push(c);
            in_run = false;
        }
    }

    Cow::Owned(result)
}

/// Check whether text directly inside `tag` may be trimmed.
pub(crate) fn can_trim(tag: &str) -> bool {
    !matches!(tag, "pre" | "textarea")
}

/// Check whether text directly inside `tag` may be collapsed.
pub(crate) fn can_collapse(tag: &str) -> bool {
    !matches!(tag, "script" | "style" | "pre" | "textarea")
}

/// Stacks of elements suppressing whitespace trimming and collapsing.
#[derive(Debug, Default)]
pub(crate) struct WhitespaceStacks {
    no_trim: Vec<String>,
    no_collapse: Vec<String>,
}

impl WhitespaceStacks {
    /// Record an opening tag.
    pub(crate) fn enter(&mut self, tag: &str) {
        if !can_trim(tag) {
            self.no_trim.push(tag.to_owned());
        }
        if !can_collapse(tag) {
            self.no_collapse.push(tag.to_owned());
        }
    }

    /// Record a closing tag.
    ///
    /// A stack is only popped when its top matches `tag`; a closing tag that
    /// does not match belongs to another element and leaves it untouched.
    pub(crate) fn leave(&mut self, tag: &str) {
        for stack in [&mut self.no_trim, &mut self.no_collapse] {
            if stack.last().is_some_and(|top| top == tag) {
                stack.pop();
            }
        }
    }

    /// Check whether text in the current element may be trimmed.
    pub(crate) fn can_trim(&self, current_tag: &str) -> bool {
        self.no_trim.is_empty() && can_trim(current_tag)
    }

    /// Check whether text in the current element may be collapsed.
    pub(crate) fn can_collapse(&self, current_tag: &str) -> bool {
        self.no_collapse.is_empty() && can_collapse(current_tag)
    }

    /// Check whether an enclosing element preserves its text verbatim.
    pub(crate) fn is_verbatim(&self) -> bool {
        !self.no_trim.is_empty()
    }
}
