//! Process `<script>` and `<style>` bodies.
//!
//! Legacy guards (`<!--`/`-->` and commented CDATA markers) are stripped from
//! the whole body, since the parser may split it inside a guard. The body is
//! then handed to an injected [`EmbeddedMinifier`] when the element closes; a
//! failing minifier leaves the body unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

use super::whitespace::trim_whitespace;
use crate::{config::Options, event::Attribute};

/// A minifier for embedded code.
///
/// Any `Fn(&str) -> anyhow::Result<String>` closure is an embedded minifier.
/// Implementations may block (e.g. query a remote service); the minifier
/// waits for them.
pub trait EmbeddedMinifier: Send + Sync {
    /// Minify a piece of code.
    fn minify(&self, code: &str) -> anyhow::Result<String>;
}

impl<F> EmbeddedMinifier for F
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    fn minify(&self, code: &str) -> anyhow::Result<String> {
        (self)(code)
    }
}

/// A chain of minifiers tried in order.
///
/// The first successful result wins. If every minifier fails, the error of
/// the last one is returned.
#[derive(Default)]
pub struct Fallback {
    minifiers: Vec<Box<dyn EmbeddedMinifier>>,
}

impl Fallback {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a minifier to the chain.
    pub fn or(mut self, minifier: impl EmbeddedMinifier + 'static) -> Self {
        self.minifiers.push(Box::new(minifier));
        self
    }
}

impl EmbeddedMinifier for Fallback {
    fn minify(&self, code: &str) -> anyhow::Result<String> {
        let mut last_error = anyhow::anyhow!("no minifier available");

        for minifier in &self.minifiers {
            match minifier.minify(code) {
                Ok(result) => return Ok(result),
                Err(error) => last_error = error,
            }
        }

        Err(last_error)
    }
}

/// Injected minifiers for `<script>` and `<style>` bodies.
#[derive(Default)]
pub struct Collaborators {
    /// Minifier for `<script>` bodies.
    pub script: Option<Box<dyn EmbeddedMinifier>>,
    /// Minifier for `<style>` bodies.
    pub style: Option<Box<dyn EmbeddedMinifier>>,
}

// `// <!--` through the end of the line; `<!--` is a line comment in scripts.
static SCRIPT_COMMENT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?://)?\s*<!--[^\n]*\n?").unwrap());

static SCRIPT_COMMENT_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?://)?\s*-->\s*$").unwrap());

// In style sheets the rest of the line is a rule, keep it.
static STYLE_COMMENT_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*<!--\s*").unwrap());

static STYLE_COMMENT_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*-->\s*$").unwrap());

static CDATA_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\s*/\*\s*<!\[CDATA\[\s*\*/|\s*//\s*<!\[CDATA\[[^\n]*)").unwrap()
});

static CDATA_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:/\*\s*\]\]>\s*\*/|//\s*\]\]>)\s*$").unwrap());

/// Check whether `tag` holds embedded code.
pub(crate) fn is_embedded(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Strip legacy guards from a `<script>` or `<style>` body.
pub(crate) fn strip_guards(options: &Options, tag: &str, text: &str) -> String {
    let mut text = text.to_owned();

    if options.remove_comments_from_cdata {
        let (start, end) = match tag {
            "script" => (&*SCRIPT_COMMENT_START, &*SCRIPT_COMMENT_END),
            "style" => (&*STYLE_COMMENT_START, &*STYLE_COMMENT_END),
            _ => return text,
        };
        text = start.replace(&text, "").into_owned();
        text = end.replace(&text, "").into_owned();
    }

    if options.remove_cdata_sections_from_cdata {
        text = CDATA_START.replace(&text, "").into_owned();
        text = CDATA_END.replace(&text, "").into_owned();
    }

    text
}

/// Check whether a `<script>` element holds inline JavaScript.
///
/// Scripts loaded from `src` and data blocks (e.g. `application/ld+json`)
/// are not minified.
fn is_inline_javascript(attributes: &[Attribute]) -> bool {
    let mut has_src = false;
    let mut is_javascript = true;

    for attribute in attributes {
        match attribute.name.to_ascii_lowercase().as_str() {
            "src" => has_src = true,
            "type" => {
                let kind = trim_whitespace(&attribute.value).to_ascii_lowercase();
                is_javascript = matches!(
                    kind.as_str(),
                    "" | "module"
                        | "text/javascript"
                        | "application/javascript"
                        | "text/ecmascript"
                        | "application/ecmascript"
                );
            },
            _ => {},
        }
    }

    !has_src && is_javascript
}

/// Minify a whole `<script>` or `<style>` body.
///
/// Returns `text` unchanged when minification does not apply or fails.
pub(crate) fn minify(
    options: &Options,
    collaborators: &Collaborators,
    tag: &str,
    attributes: &[Attribute],
    text: String,
) -> String {
    let minifier = match tag {
        "script" if options.minify_embedded_script && is_inline_javascript(attributes) => {
            collaborators.script.as_deref()
        },
        "style" if options.minify_embedded_style => collaborators.style.as_deref(),
        _ => None,
    };

    let Some(minifier) = minifier else {
        return text;
    };

    if trim_whitespace(&text).is_empty() {
        return text;
    }

    match minifier.minify(&text) {
        Ok(result) => result,
        Err(error) => {
            tracing::warn!("Keeping <{}> body unminified: {:#}", tag, error);
            text
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{minify, strip_guards, Collaborators, EmbeddedMinifier, Fallback};
    use crate::{config::Options, event::Attribute};

    fn upper(code: &str) -> anyhow::Result<String> {
        Ok(code.to_uppercase())
    }

    fn failing(_: &str) -> anyhow::Result<String> {
        anyhow::bail!("syntax error")
    }

    fn collaborators() -> Collaborators {
        Collaborators {
            script: Some(Box::new(upper)),
            style: Some(Box::new(failing)),
        }
    }

    #[test]
    fn strip_script_guards() {
        let options = Options::default();

        const CASES: [(&str, &str); 5] = [
            ("//<!--\nalert(1);\n//-->\n", "alert(1);"),
            ("  <!-- hide from old browsers\nalert(1);\n-->", "alert(1);"),
            ("\n/*<![CDATA[*/\nalert(1);\n/*]]>*/\n", "\nalert(1);\n"),
            ("//<![CDATA[\nalert(1);\n//]]>", "\nalert(1);\n"),
            ("alert(1);", "alert(1);"),
        ];

        for (input, expected) in CASES {
            let result = strip_guards(&options, "script", input);
            assert_eq!(
                result, expected,
                "\nstrip_guards({input:?}) expected {expected:?} but received {result:?}"
            );
        }
    }

    #[test]
    fn strip_style_guards() {
        let options = Options::default();

        assert_eq!(
            strip_guards(&options, "style", "<!-- p { color: red }\n-->"),
            "p { color: red }"
        );
        assert_eq!(
            strip_guards(&options, "style", "/*<![CDATA[*/p{}/*]]>*/"),
            "p{}"
        );
    }

    #[test]
    fn keep_guards_when_disabled() {
        let options = Options {
            remove_comments_from_cdata: false,
            remove_cdata_sections_from_cdata: false,
            ..Options::default()
        };
        let input = "<!--\nalert(1);\n-->";

        assert_eq!(strip_guards(&options, "script", input), input);
    }

    #[test]
    fn minify_script() {
        let options = Options::default();
        let collaborators = collaborators();

        assert_eq!(
            minify(&options, &collaborators, "script", &[], "a()".into()),
            "A()"
        );
        assert_eq!(
            minify(
                &options,
                &collaborators,
                "script",
                &[Attribute::new("type", "module")],
                "a()".into()
            ),
            "A()"
        );
    }

    #[test]
    fn skip_external_and_data_scripts() {
        let options = Options::default();
        let collaborators = collaborators();

        assert_eq!(
            minify(
                &options,
                &collaborators,
                "script",
                &[Attribute::new("src", "a.js")],
                "a()".into()
            ),
            "a()"
        );
        assert_eq!(
            minify(
                &options,
                &collaborators,
                "script",
                &[Attribute::new("type", "application/ld+json")],
                "{}".into()
            ),
            "{}"
        );
    }

    #[test]
    fn skip_when_disabled_or_blank() {
        let options = Options {
            minify_embedded_script: false,
            ..Options::default()
        };
        let collaborators = collaborators();

        assert_eq!(
            minify(&options, &collaborators, "script", &[], "a()".into()),
            "a()"
        );
        assert_eq!(
            minify(&Options::default(), &collaborators, "script", &[], "  ".into()),
            "  "
        );
        assert_eq!(
            minify(&Options::default(), &Collaborators::default(), "script", &[], "a()".into()),
            "a()"
        );
    }

    #[test]
    fn failure_falls_back_to_input() {
        let options = Options::default();

        assert_eq!(
            minify(&options, &collaborators(), "style", &[], "p { }".into()),
            "p { }"
        );
    }

    #[test]
    fn fallback_chain() {
        let chain = Fallback::new().or(failing).or(upper);
        assert_eq!(chain.minify("abc").unwrap(), "ABC");

        let chain = Fallback::new().or(failing);
        assert!(chain.minify("abc").is_err());

        assert!(Fallback::new().minify("abc").is_err());
    }
}
