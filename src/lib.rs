//! An event-driven HTML minifier.
//!
//! Htmlmin can be used as both a CLI and a library.
//!
//! ```no_run
//! use htmlmin::HtmlMinifier;
//!
//! let minifier = HtmlMinifier::new();
//! let output = minifier.minify("<p title=\"x\" >  Hello  </p>")?;
//! # Ok::<(), htmlmin::MinifyHtmlError>(())
//! ```
//!
//! # Feature flags
//!
//! - `default`: Enable `css` and `js` feature flags.
//! - `css`: Minify `<style>` bodies with lightningcss.
//! - `js`: Minify `<script>` bodies with minify-js.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod event;
pub mod minify;
pub mod parse;
pub mod util;

pub use config::{Options, PartialOptions};
pub use event::{Attribute, Event};
pub use minify::{EmbeddedMinifier, Fallback, HtmlMinifier, MinifyHtmlError};
