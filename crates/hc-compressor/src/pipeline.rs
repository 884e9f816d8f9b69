//! Compression engine: runs the protection steps, the rewriting passes and the
//! final restoration in a fixed order.

use hc_core::{CompressorConfig, CompressorError, MinifierRef, MinifyWarning, Result};
use regex::Regex;
use serde::Serialize;

use crate::attributes::{self, OptionalAttributes};
use crate::comments::remove_comments;
use crate::doctype::simple_doctype;
use crate::embedded::{compress_embedded, EmbeddedMinifiers};
use crate::minify::{BuiltinCssMinifier, BuiltinJsMinifier};
use crate::patterns::surrounding_spaces_pattern;
use crate::protect;
use crate::tags::tidy_tags;
use crate::vault::PlaceholderVault;
use crate::whitespace;

/// Compression result with statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionResult {
    pub output: String,
    pub original_len: usize,
    pub compressed_len: usize,
    pub reduction_pct: f64,
    pub passes_applied: Vec<String>,
    /// Regions swapped for placeholders during the run.
    pub preserved_fragments: usize,
    pub warnings: Vec<MinifyWarning>,
}

impl CompressionResult {
    fn unchanged(html: &str) -> Self {
        Self {
            output: html.to_string(),
            original_len: html.len(),
            compressed_len: html.len(),
            reduction_pct: 0.0,
            passes_applied: Vec::new(),
            preserved_fragments: 0,
            warnings: Vec::new(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 { return 1.0; }
        self.compressed_len as f64 / self.original_len as f64
    }
}

/// HTML compressor. Immutable once built and safe to share between threads;
/// every call works on its own text and placeholder vault.
#[derive(Debug, Clone)]
pub struct HtmlCompressor {
    config: CompressorConfig,
    surrounding: Option<Regex>,
    javascript: MinifierRef,
    css: MinifierRef,
}

impl HtmlCompressor {
    pub fn new(config: CompressorConfig) -> Result<Self> {
        config.validate()?;
        let surrounding = config
            .remove_surrounding_spaces
            .as_ref()
            .map(|spaces| {
                surrounding_spaces_pattern(spaces.tag_names().as_deref())
                    .map_err(|e| CompressorError::InvalidConfig(format!("remove_surrounding_spaces: {e}")))
            })
            .transpose()?;
        let javascript = config.javascript_compressor.clone().unwrap_or_else(|| MinifierRef::new(BuiltinJsMinifier));
        let css = config.css_compressor.clone().unwrap_or_else(|| MinifierRef::new(BuiltinCssMinifier));
        Ok(Self { config, surrounding, javascript, css })
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Compress a document. Output is all-or-nothing: any failure returns an
    /// error and no partial text.
    pub fn compress(&self, html: &str) -> Result<String> {
        Ok(self.compress_with_stats(html)?.output)
    }

    pub fn compress_with_stats(&self, html: &str) -> Result<CompressionResult> {
        if !self.config.enabled || html.is_empty() {
            return Ok(CompressionResult::unchanged(html));
        }
        let config = &self.config;
        let mut vault = PlaceholderVault::new(html);
        let mut passes = Vec::new();

        // Protection
        let (text, n) = protect::preserve_user_patterns(html, &config.preserve_patterns, &mut vault);
        if n > 0 { note(&mut passes, "user_patterns", &text); }
        let (text, n) = protect::preserve_skip_blocks(&text, &mut vault);
        if n > 0 { note(&mut passes, "skip_blocks", &text); }
        let (text, n) = protect::preserve_conditional_comments(&text, &mut vault);
        if n > 0 { note(&mut passes, "conditional_comments", &text); }
        let (text, n) = protect::preserve_verbatim_blocks(&text, &mut vault);
        if n > 0 { note(&mut passes, "verbatim_blocks", &text); }
        let (text, n) = protect::preserve_code_blocks(&text, &mut vault);
        if n > 0 { note(&mut passes, "code_blocks", &text); }
        let (mut text, n) = protect::preserve_event_handlers(&text, &mut vault);
        if n > 0 { note(&mut passes, "event_handlers", &text); }

        if config.remove_comments {
            text = remove_comments(&text, &mut vault);
            note(&mut passes, "comments", &text);
        }

        let minifiers = EmbeddedMinifiers {
            javascript: config.compress_javascript.then_some(&*self.javascript),
            css: config.compress_css.then_some(&*self.css),
        };
        let mut warnings = Vec::new();
        if minifiers.javascript.is_some() || minifiers.css.is_some() {
            warnings = compress_embedded(&mut vault, minifiers);
            note(&mut passes, "embedded", &text);
        }

        // Whitespace
        if config.remove_intertag_spaces {
            text = whitespace::remove_intertag_spaces(&text, config.preserve_line_breaks);
            note(&mut passes, "intertag_spaces", &text);
        }
        if config.remove_multi_spaces {
            text = whitespace::remove_multi_spaces(&text, config.preserve_line_breaks);
            note(&mut passes, "multi_spaces", &text);
        }
        text = tidy_tags(&text);
        note(&mut passes, "tidy_tags", &text);
        if let Some(pattern) = &self.surrounding {
            text = whitespace::remove_surrounding_spaces(&text, pattern, config.preserve_line_breaks);
            note(&mut passes, "surrounding_spaces", &text);
        }

        // Attributes
        if config.remove_quotes {
            text = attributes::remove_quotes(&text);
            note(&mut passes, "quotes", &text);
        }
        let optional = OptionalAttributes {
            script: config.remove_script_attributes,
            style: config.remove_style_attributes,
            link: config.remove_link_attributes,
            form: config.remove_form_attributes,
            input: config.remove_input_attributes,
        };
        if optional.any() {
            text = attributes::remove_optional_attributes(&text, &optional);
            note(&mut passes, "optional_attributes", &text);
        }
        if config.remove_javascript_protocol {
            let edited = attributes::remove_javascript_protocol(&mut vault);
            tracing::debug!(handlers = edited, "javascript protocol stripped");
            passes.push("javascript_protocol".to_string());
        }
        if config.remove_http_protocol || config.remove_https_protocol {
            text = attributes::remove_protocols(&text, config.remove_http_protocol, config.remove_https_protocol);
            note(&mut passes, "protocols", &text);
        }
        if config.simple_boolean_attributes {
            text = attributes::simple_boolean_attributes(&text);
            note(&mut passes, "boolean_attributes", &text);
        }

        if config.simple_doctype {
            text = simple_doctype(&text);
            note(&mut passes, "doctype", &text);
        }
        text = whitespace::trim_document(&text);
        note(&mut passes, "trim", &text);

        let output = vault.restore(&text).map_err(|e| {
            tracing::error!(error = %e, fragments = vault.len(), "placeholder restoration failed");
            CompressorError::Restore(e)
        })?;

        let original_len = html.len();
        let compressed_len = output.len();
        let reduction_pct = (1.0 - compressed_len as f64 / original_len as f64) * 100.0;
        tracing::debug!(original_len, compressed_len, reduction_pct, "document compressed");

        Ok(CompressionResult {
            output,
            original_len,
            compressed_len,
            reduction_pct,
            passes_applied: passes,
            preserved_fragments: vault.len(),
            warnings,
        })
    }
}

fn note(passes: &mut Vec<String>, name: &str, text: &str) {
    tracing::debug!(pass = name, len = text.len(), "pass applied");
    passes.push(name.to_string());
}
