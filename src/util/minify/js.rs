//! Minify JavaScript code.
//!
//! This module uses [`minify_js`] under the hood.

use std::string::FromUtf8Error;

use minify_js::{Session, TopLevelMode};
use thiserror::Error;

use crate::minify::EmbeddedMinifier;

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum MinifyJsError {
    /// JavaScript syntax error.
    #[error("{0}")]
    Syntax(String),
    /// Error converting a string in UTF-8.
    #[error(transparent)]
    FromUtf8(#[from] FromUtf8Error),
}

/// Minify a string of JavaScript code.
pub fn minify_js(input: impl AsRef<str>) -> Result<String, MinifyJsError> {
    let input = input.as_ref();

    let session = Session::new();
    let mut output = Vec::new();

    minify_js::minify(
        &session,
        TopLevelMode::Global,
        input.as_bytes(),
        &mut output,
    )
    .map_err(|source| MinifyJsError::Syntax(source.to_string()))?;

    Ok(String::from_utf8(output)?)
}

/// Minifier for `<script>` bodies.
///
/// Scripts are minified as global code: top-level names are kept, since
/// other scripts of the page may refer to them.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsMinifier;

impl EmbeddedMinifier for JsMinifier {
    fn minify(&self, code: &str) -> anyhow::Result<String> {
        Ok(minify_js(code)?)
    }
}
