use crate::*;
use crate::config::{BLOCK_TAGS_MAX_EXTRA, BLOCK_TAGS_MIN};
use regex::Regex;

// ========== Defaults ==========

#[test]
fn test_default_options() {
    let c = CompressorConfig::default();
    assert!(c.enabled);
    assert!(c.remove_multi_spaces);
    assert!(!c.remove_comments);
    assert!(!c.remove_intertag_spaces);
    assert!(!c.remove_quotes);
    assert!(!c.compress_javascript);
    assert!(!c.compress_css);
    assert!(c.javascript_compressor.is_none());
    assert!(c.css_compressor.is_none());
    assert!(c.remove_surrounding_spaces.is_none());
    assert!(c.preserve_patterns.is_empty());
}

#[test]
fn test_disabled() {
    let c = CompressorConfig::disabled();
    assert!(!c.enabled);
    assert!(c.remove_multi_spaces);
}

#[test]
fn test_default_validates() {
    assert!(CompressorConfig::default().validate().is_ok());
}

// ========== Surrounding spaces ==========

#[test]
fn test_surrounding_presets() {
    assert_eq!("min".parse::<SurroundingSpaces>().unwrap(), SurroundingSpaces::Min);
    assert_eq!("MAX".parse::<SurroundingSpaces>().unwrap(), SurroundingSpaces::Max);
    assert_eq!(" all ".parse::<SurroundingSpaces>().unwrap(), SurroundingSpaces::All);
}

#[test]
fn test_surrounding_tag_list() {
    let s: SurroundingSpaces = "p, br,div".parse().unwrap();
    assert_eq!(s, SurroundingSpaces::Tags(vec!["p".into(), "br".into(), "div".into()]));
    assert_eq!(s.to_string(), "p,br,div");
}

#[test]
fn test_surrounding_tag_names() {
    assert_eq!(SurroundingSpaces::Min.tag_names().unwrap().len(), BLOCK_TAGS_MIN.len());
    assert_eq!(
        SurroundingSpaces::Max.tag_names().unwrap().len(),
        BLOCK_TAGS_MIN.len() + BLOCK_TAGS_MAX_EXTRA.len()
    );
    assert!(SurroundingSpaces::All.tag_names().is_none());
}

#[test]
fn test_surrounding_rejects_bad_tags() {
    assert!(matches!(
        "p,<br>".parse::<SurroundingSpaces>(),
        Err(CompressorError::InvalidConfig(_))
    ));
    assert!("1p".parse::<SurroundingSpaces>().is_err());
    assert!(",,".parse::<SurroundingSpaces>().is_err());
}

#[test]
fn test_validate_catches_constructed_list() {
    let c = CompressorConfig::default().with_surrounding_spaces(SurroundingSpaces::Tags(vec![]));
    assert!(c.validate().is_err());
}

// ========== Preserve patterns ==========

#[test]
fn test_try_with_preserve_pattern() {
    let c = CompressorConfig::default().try_with_preserve_pattern(r"<\?php.*?\?>").unwrap();
    assert_eq!(c.preserve_patterns.len(), 1);
}

#[test]
fn test_invalid_preserve_pattern() {
    let err = CompressorConfig::default().try_with_preserve_pattern("(unclosed").unwrap_err();
    assert!(matches!(err, CompressorError::InvalidPattern { .. }));
    assert!(err.to_string().contains("(unclosed"));
}

#[test]
fn test_empty_matching_pattern_rejected() {
    let c = CompressorConfig::default().with_preserve_pattern(Regex::new("x*").unwrap());
    assert!(c.validate().is_err());
}

// ========== JSON ==========

#[test]
fn test_from_json_partial() {
    let c = CompressorConfig::from_json(r#"{"remove_comments": true, "remove_surrounding_spaces": "p,br"}"#).unwrap();
    assert!(c.remove_comments);
    assert!(c.remove_multi_spaces);
    assert_eq!(c.remove_surrounding_spaces, Some(SurroundingSpaces::Tags(vec!["p".into(), "br".into()])));
}

#[test]
fn test_from_json_unknown_key() {
    let err = CompressorConfig::from_json(r#"{"remove_everything": true}"#).unwrap_err();
    assert!(matches!(err, CompressorError::Serialization(_)));
}

#[test]
fn test_from_json_bad_surrounding() {
    assert!(CompressorConfig::from_json(r#"{"remove_surrounding_spaces": "p,b r"}"#).is_err());
}

#[test]
fn test_from_json_patterns() {
    let c = CompressorConfig::from_json(r#"{"preserve_patterns": ["<%.*?%>", "\\{\\{.*?\\}\\}"]}"#).unwrap();
    assert_eq!(c.preserve_patterns.len(), 2);
    assert!(c.preserve_patterns[1].is_match("{{ name }}"));
    assert!(CompressorConfig::from_json(r#"{"preserve_patterns": ["("]}"#).is_err());
}

#[test]
fn test_json_roundtrip_keeps_options() {
    let c = CompressorConfig {
        remove_quotes: true,
        remove_surrounding_spaces: Some(SurroundingSpaces::Max),
        ..Default::default()
    }
    .try_with_preserve_pattern("<jsp:.*?>")
    .unwrap();
    let back = CompressorConfig::from_json(&c.to_json().unwrap()).unwrap();
    assert!(back.remove_quotes);
    assert_eq!(back.remove_surrounding_spaces, Some(SurroundingSpaces::Max));
    assert_eq!(back.preserve_patterns[0].as_str(), "<jsp:.*?>");
}

// ========== Minifier ==========

#[test]
fn test_closure_minifier() {
    let m = MinifierRef::new(|s: &str| -> anyhow::Result<String> { Ok(s.trim().to_string()) });
    assert_eq!(m.minify("  a  ").unwrap(), "a");
    assert_eq!(m.name(), "custom");
    assert!(format!("{m:?}").contains("custom"));
}

#[test]
fn test_with_compressor_enables_flag() {
    let c = CompressorConfig::default()
        .with_javascript_compressor(|s: &str| -> anyhow::Result<String> { Ok(s.to_string()) });
    assert!(c.compress_javascript);
    assert!(c.javascript_compressor.is_some());
    assert!(!c.compress_css);
}

// ========== Types ==========

#[test]
fn test_fragment_kind_display() {
    assert_eq!(FragmentKind::ConditionalComment.to_string(), "conditional_comment");
    assert!(FragmentKind::ScriptBlock.is_minifiable());
    assert!(!FragmentKind::MinifiedJs.is_minifiable());
}

#[test]
fn test_restore_error_message() {
    let err: CompressorError = RestoreError::UnconsumedFragment { index: 3, kind: FragmentKind::PreBlock }.into();
    assert!(err.to_string().contains("pre_block fragment #3"));
}

#[test]
fn test_warning_display() {
    let w = MinifyWarning {
        block: EmbeddedKind::Css,
        index: 1,
        minifier: "lightningcss".into(),
        message: "unexpected token".into(),
    };
    assert_eq!(w.to_string(), "style block #1 left uncompressed by lightningcss: unexpected token");
}
