//! Default minifiers used when the configuration does not supply its own.

mod css;
mod js;

pub use css::{minify_css, BuiltinCssMinifier};
pub use js::{minify_js, BuiltinJsMinifier};
