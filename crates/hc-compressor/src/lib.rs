//! HTML compressor: regex-driven minification with placeholder protection.
//!
//! Stages:
//! 1. Protection (user patterns, skip blocks, conditional comments, pre/textarea,
//!    script/style bodies, event handlers), swapped for placeholders
//! 2. Comment removal and embedded JavaScript/CSS minification
//! 3. Whitespace passes
//! 4. Attribute passes (quotes, default attributes, protocols, booleans)
//! 5. Doctype, trim and restoration

pub mod attributes;
pub mod comments;
pub mod doctype;
pub mod embedded;
pub mod minify;
pub mod patterns;
pub mod pipeline;
pub mod protect;
pub mod tags;
pub mod vault;
pub mod whitespace;

pub use hc_core::{
    CompressorConfig, CompressorError, EmbeddedKind, FragmentKind, Minifier, MinifierRef, MinifyWarning, Result,
    SurroundingSpaces,
};
pub use minify::{BuiltinCssMinifier, BuiltinJsMinifier};
pub use patterns::{PHP_TAG_PATTERN, SERVER_SCRIPT_TAG_PATTERN, SERVER_SIDE_INCLUDE_PATTERN};
pub use pipeline::{CompressionResult, HtmlCompressor};
