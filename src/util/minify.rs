//! Default minifiers for embedded code.
//!
//! Each minifier is enabled by a cargo feature: `js` for scripts and `css`
//! for style sheets.

#[cfg(feature = "css")]
pub mod css;
#[cfg(feature = "js")]
pub mod js;

use crate::minify::EmbeddedMinifier;

/// Default minifier for `<script>` bodies, if the `js` feature is enabled.
pub fn script_minifier() -> Option<Box<dyn EmbeddedMinifier>> {
    #[cfg(feature = "js")]
    return Some(Box::new(js::JsMinifier));

    #[cfg(not(feature = "js"))]
    None
}

/// Default minifier for `<style>` bodies, if the `css` feature is enabled.
pub fn style_minifier() -> Option<Box<dyn EmbeddedMinifier>> {
    #[cfg(feature = "css")]
    return Some(Box::new(css::CssMinifier));

    #[cfg(not(feature = "css"))]
    None
}
