//! Minify CSS code.
//!
//! This module uses [`lightningcss`] under the hood.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use thiserror::Error;

use crate::minify::EmbeddedMinifier;

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum MinifyCssError {
    /// Minifier error.
    #[error("{0}")]
    Minify(String),
    /// Parser error.
    #[error("{0}")]
    Parser(String),
    /// Printer error.
    #[error("{0}")]
    Printer(String),
}

/// Minify a CSS string.
///
/// Invalid rules and declarations are dropped rather than failing the whole
/// style sheet, as a browser would do with a `<style>` body.
pub fn minify_css(input: impl AsRef<str>) -> Result<String, MinifyCssError> {
    let input = input.as_ref();

    let parser_options = ParserOptions {
        error_recovery: true,
        ..ParserOptions::default()
    };

    let mut style_sheet = StyleSheet::parse(input, parser_options)
        .map_err(|source| MinifyCssError::Parser(source.to_string()))?;

    style_sheet
        .minify(MinifyOptions::default())
        .map_err(|source| MinifyCssError::Minify(source.to_string()))?;

    let printer_options = PrinterOptions {
        minify: true,
        ..Default::default()
    };

    let result = style_sheet
        .to_css(printer_options)
        .map_err(|source| MinifyCssError::Printer(source.to_string()))?;

    Ok(result.code)
}

/// Minifier for `<style>` bodies.
#[derive(Clone, Copy, Debug, Default)]
pub struct CssMinifier;

impl EmbeddedMinifier for CssMinifier {
    fn minify(&self, code: &str) -> anyhow::Result<String> {
        Ok(minify_css(code)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{minify_css, CssMinifier};
    use crate::minify::EmbeddedMinifier;

    #[test]
    fn minify() {
        // Length: 25
        const INPUT: &str = concat!(
            ".foo {\n",          //
            "  color: black;\n", //
            "}\n"
        );

        let result = minify_css(INPUT).unwrap();

        assert!(result.contains(".foo"));
        assert!(result.contains("color:"));
        // Expected: 16
        assert!(result.len() <= 18);
    }

    #[test]
    fn recover_invalid_rules() {
        let result = minify_css(".a { color: red } ..b { color: blue }").unwrap();

        assert!(result.contains(".a{color:red}"));
        assert!(!result.contains("blue"));
    }

    #[test]
    fn embedded() {
        let result = CssMinifier.minify("p { margin: 0px; }").unwrap();

        assert!(result.starts_with("p{"));
        assert!(!result.contains(' '));
    }
}
