//! Stylesheet minification through lightningcss.

use anyhow::{anyhow, Result};
use hc_core::Minifier;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCssMinifier;

impl Minifier for BuiltinCssMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        minify_css(source)
    }

    fn name(&self) -> &str {
        "lightningcss"
    }
}

pub fn minify_css(source: &str) -> Result<String> {
    let mut sheet = StyleSheet::parse(source, ParserOptions::default()).map_err(|e| anyhow!("parse: {e}"))?;
    sheet.minify(MinifyOptions::default()).map_err(|e| anyhow!("minify: {e}"))?;
    let printed = sheet
        .to_css(PrinterOptions { minify: true, ..Default::default() })
        .map_err(|e| anyhow!("print: {e}"))?;
    Ok(printed.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minifies_rules() {
        let out = minify_css("body {\n  color: black;\n}\n").unwrap();
        assert!(out.starts_with("body{"));
        assert!(out.contains("color:"));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn reports_name() {
        assert_eq!(BuiltinCssMinifier.name(), "lightningcss");
    }
}
