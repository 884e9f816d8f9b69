//! Protection steps run before any rewriting pass.

use hc_core::FragmentKind;
use regex::Regex;

use crate::patterns::{
    CONDITIONAL_COMMENT, EVENT_DOUBLE_QUOTED, EVENT_SINGLE_QUOTED, PRE_BLOCK, SCRIPT_BLOCK, SKIP_BLOCK,
    START_TAG, STYLE_BLOCK, TEXTAREA_BLOCK,
};
use crate::tags::lex_attributes;
use crate::vault::{PlaceholderVault, Protection};

const JAVASCRIPT_TYPES: &[&str] = &[
    "text/javascript",
    "application/javascript",
    "application/x-javascript",
    "text/ecmascript",
    "application/ecmascript",
    "module",
];

const CSS_TYPES: &[&str] = &["text/css"];

pub fn preserve_user_patterns(text: &str, patterns: &[Regex], vault: &mut PlaceholderVault) -> (String, usize) {
    vault.protect_all(text, patterns, FragmentKind::UserPattern)
}

/// `<!-- {{{ -->...<!-- }}} -->`: content kept verbatim, markers dropped.
pub fn preserve_skip_blocks(text: &str, vault: &mut PlaceholderVault) -> (String, usize) {
    vault.protect_with(text, &SKIP_BLOCK, |caps| {
        Some(Protection {
            span: caps.get(0)?.range(),
            content: caps.get(1)?.as_str().to_string(),
            kind: FragmentKind::SkipBlock,
        })
    })
}

pub fn preserve_conditional_comments(text: &str, vault: &mut PlaceholderVault) -> (String, usize) {
    vault.protect(text, &CONDITIONAL_COMMENT, FragmentKind::ConditionalComment)
}

/// Bodies of `<pre>` and `<textarea>`; the tags themselves stay visible.
pub fn preserve_verbatim_blocks(text: &str, vault: &mut PlaceholderVault) -> (String, usize) {
    let (result, pre) = vault.protect_with(text, &PRE_BLOCK, |caps| Protection::group(caps, 2, FragmentKind::PreBlock));
    let (result, textarea) =
        vault.protect_with(&result, &TEXTAREA_BLOCK, |caps| Protection::group(caps, 2, FragmentKind::TextareaBlock));
    (result, pre + textarea)
}

/// Bodies of `<script>` and `<style>`. Only JavaScript and CSS bodies are
/// eligible for minification; other types (templates, JSON data) are kept
/// as skip blocks.
pub fn preserve_code_blocks(text: &str, vault: &mut PlaceholderVault) -> (String, usize) {
    let (result, scripts) = vault.protect_with(text, &SCRIPT_BLOCK, |caps| {
        let kind = match type_attribute(&caps[1]) {
            None => FragmentKind::ScriptBlock,
            Some(t) if JAVASCRIPT_TYPES.contains(&t.as_str()) => FragmentKind::ScriptBlock,
            Some(_) => FragmentKind::SkipBlock,
        };
        code_body(caps, kind)
    });
    let (result, styles) = vault.protect_with(&result, &STYLE_BLOCK, |caps| {
        let kind = match type_attribute(&caps[1]) {
            None => FragmentKind::StyleBlock,
            Some(t) if CSS_TYPES.contains(&t.as_str()) => FragmentKind::StyleBlock,
            Some(_) => FragmentKind::SkipBlock,
        };
        code_body(caps, kind)
    });
    (result, scripts + styles)
}

fn code_body(caps: &regex::Captures<'_>, kind: FragmentKind) -> Option<Protection> {
    if caps[2].trim().is_empty() {
        return None;
    }
    Protection::group(caps, 2, kind)
}

/// Lowercased `type` of an opening tag without parameters; `None` when the
/// attribute is absent or empty.
fn type_attribute(open_tag: &str) -> Option<String> {
    let caps = START_TAG.captures(open_tag)?;
    let inner = caps.get(2)?.as_str();
    lex_attributes(inner)
        .iter()
        .find(|a| a.is("type"))
        .and_then(|a| a.value)
        .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
}

/// Values of inline `on*` handlers, so whitespace passes leave their code alone.
pub fn preserve_event_handlers(text: &str, vault: &mut PlaceholderVault) -> (String, usize) {
    let (result, double) =
        vault.protect_with(text, &EVENT_DOUBLE_QUOTED, |caps| Protection::group(caps, 2, FragmentKind::EventHandler));
    let (result, single) =
        vault.protect_with(&result, &EVENT_SINGLE_QUOTED, |caps| Protection::group(caps, 2, FragmentKind::EventHandler));
    (result, double + single)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_type_detection() {
        assert_eq!(type_attribute("<script>"), None);
        assert_eq!(type_attribute("<script type=\"Text/JavaScript; charset=utf-8\">").as_deref(), Some("text/javascript"));
        assert_eq!(type_attribute("<script type='text/template'>").as_deref(), Some("text/template"));
    }

    #[test]
    fn template_scripts_are_not_minifiable() {
        let mut vault = PlaceholderVault::new("");
        let (_, n) = preserve_code_blocks(
            "<script type=\"text/x-tmpl\"><b>{{x}}</b></script><script>var a;</script>",
            &mut vault,
        );
        assert_eq!(n, 2);
        assert_eq!(vault.fragments()[0].kind, FragmentKind::SkipBlock);
        assert_eq!(vault.fragments()[1].kind, FragmentKind::ScriptBlock);
    }

    #[test]
    fn blank_bodies_are_left_alone() {
        let mut vault = PlaceholderVault::new("");
        let (out, n) = preserve_code_blocks("<script src=a.js>  </script>", &mut vault);
        assert_eq!(n, 0);
        assert_eq!(out, "<script src=a.js>  </script>");
    }
}
