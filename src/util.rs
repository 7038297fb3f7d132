//! Utility modules.

pub mod minify;
