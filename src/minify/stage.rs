//! Staged output.
//!
//! Fragments are first written to a staging buffer shared by every nesting
//! level. A closing tag either flushes the whole buffer to the results or,
//! when its element is empty, discards the element's own opening tag from the
//! buffer. Nothing is ever taken back from the results.

/// Kind of a fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    /// The `<` starting an opening tag.
    TagStart,
    /// Any other markup or text.
    Normal,
    /// Text that must be written as is (e.g. inside `<pre>`).
    Verbatim,
}

#[derive(Debug)]
struct Fragment {
    kind: Kind,
    text: String,
}

/// Staging buffer and results of a run.
#[derive(Debug, Default)]
pub(crate) struct OutputStage {
    buffer: Vec<Fragment>,
    results: Vec<Fragment>,
}

impl OutputStage {
    fn stage(&mut self, kind: Kind, text: String) {
        self.buffer.push(Fragment { kind, text });
    }

    /// Stage the `<` starting an opening tag.
    pub(crate) fn push_tag_start(&mut self) {
        self.stage(Kind::TagStart, "<".to_owned());
    }

    /// Stage a fragment.
    pub(crate) fn push(&mut self, text: impl Into<String>) {
        self.stage(Kind::Normal, text.into());
    }

    /// Stage a fragment left untouched by the final pass.
    pub(crate) fn push_verbatim(&mut self, text: impl Into<String>) {
        self.stage(Kind::Verbatim, text.into());
    }

    /// Check whether nothing but whitespace has been written yet.
    pub(crate) fn is_blank(&self) -> bool {
        self.results
            .iter()
            .chain(&self.buffer)
            .all(|fragment| fragment.text.bytes().all(|b| b.is_ascii_whitespace()))
    }

    /// Discard the most recent opening tag and everything staged after it.
    ///
    /// Returns `false`, leaving the buffer untouched, if no opening tag is
    /// staged.
    pub(crate) fn discard_last_element(&mut self) -> bool {
        match self
            .buffer
            .iter()
            .rposition(|fragment| fragment.kind == Kind::TagStart)
        {
            Some(position) => {
                self.buffer.truncate(position);
                true
            },
            None => false,
        }
    }

    /// Move every staged fragment to the results.
    pub(crate) fn flush(&mut self) {
        self.results.append(&mut self.buffer);
    }

    /// Flush the buffer and assemble the results.
    pub(crate) fn finish(mut self) -> String {
        self.flush();

        let mut output = String::new();

        for fragment in &self.results {
            match fragment.kind {
                Kind::Verbatim => output.push_str(&fragment.text),
                Kind::TagStart | Kind::Normal => output.push_str(trim_boundaries(&fragment.text)),
            }
        }

        output
    }
}

/// Reduce whitespace runs at both ends of a fragment to one character.
///
/// The character nearest to the content is kept. A fragment made of
/// whitespace only is reduced to its first character.
fn trim_boundaries(text: &str) -> &str {
    let Some(first) = text.find(|c: char| !c.is_ascii_whitespace()) else {
        return text.get(..1).unwrap_or_default();
    };

    // Whitespace is ASCII, byte offsets around it are char boundaries.
    let start = first.saturating_sub(1);

    let last = text
        .rfind(|c: char| !c.is_ascii_whitespace())
        .unwrap_or(first);
    let last_len = text[last..].chars().next().map_or(1, char::len_utf8);
    let end = (last + last_len + 1).min(text.len());

    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::{trim_boundaries, OutputStage};

    #[test]
    fn boundaries() {
        const CASES: [(&str, &str); 9] = [
            ("foo", "foo"),
            (" foo ", " foo "),
            ("\n\n  foo", " foo"),
            ("foo \n\n", "foo "),
            ("\n  foo bar  \t", " foo bar "),
            ("   ", " "),
            ("\n\n", "\n"),
            ("", ""),
            ("  é  ", " é "),
        ];

        for (input, expected) in CASES {
            let result = trim_boundaries(input);
            assert_eq!(
                result, expected,
                "\ntrim_boundaries({input:?}) expected {expected:?} but received {result:?}"
            );
        }
    }

    #[test]
    fn flush_moves_everything() {
        let mut stage = OutputStage::default();

        stage.push_tag_start();
        stage.push("p");
        stage.push(">");
        stage.push("hello");
        stage.push("</p>");
        stage.flush();

        assert!(stage.buffer.is_empty());
        assert_eq!(stage.finish(), "<p>hello</p>");
    }

    #[test]
    fn discard_only_removes_last_element() {
        let mut stage = OutputStage::default();

        stage.push_tag_start();
        stage.push("div");
        stage.push(">");
        stage.push("text");
        stage.push_tag_start();
        stage.push("span");
        stage.push(" class=x");
        stage.push(">");

        assert!(stage.discard_last_element());
        stage.push("</div>");

        assert_eq!(stage.finish(), "<div>text</div>");
    }

    #[test]
    fn discard_without_opening_tag() {
        let mut stage = OutputStage::default();

        stage.push("text");

        assert!(!stage.discard_last_element());
        assert_eq!(stage.finish(), "text");
    }

    #[test]
    fn verbatim_is_untouched() {
        let mut stage = OutputStage::default();

        stage.push("\n\n  ");
        stage.push_verbatim("\n\n  code  \n\n");

        assert_eq!(stage.finish(), "\n\n\n  code  \n\n");
    }

    #[test]
    fn blank() {
        let mut stage = OutputStage::default();
        assert!(stage.is_blank());

        stage.push("\n  ");
        assert!(stage.is_blank());

        stage.push("x");
        assert!(!stage.is_blank());
    }
}
