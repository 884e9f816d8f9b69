//! Pattern registry: every structural regex the passes rely on.
//!
//! The `regex` crate has no look-around or back-references, so rules that the
//! classic compressor expressed with `(?=[^<]*>)` or `\1` are split into a
//! tag pattern plus per-attribute lexing (see [`crate::tags`]).

use regex::Regex;
use std::sync::LazyLock;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("built-in pattern `{pattern}` is invalid: {e}"))
}

/// `<?php ... ?>` and short `<? ... ?>` blocks.
pub static PHP_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<\?(?:php)?.*?\?>"));

/// `<% ... %>` server script blocks.
pub static SERVER_SCRIPT_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<%.*?%>"));

/// `<!--# ... -->` server side includes.
pub static SERVER_SIDE_INCLUDE_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<!--\s*#.*?-->"));

pub(crate) static SKIP_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?s)<!--\s*\{\{\{\s*-->(.*?)<!--\s*\}\}\}\s*-->"));

pub(crate) static CONDITIONAL_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)(<!(?:--)?\[[^\]]+?\]>)(.*?)(<!\[[^\]]+\]-->)"));

pub(crate) static COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<!---->|<!--[^\[].*?-->"));

pub(crate) static PRE_BLOCK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)(<pre\b[^>]*?>)(.*?)(</pre\s*>)"));
pub(crate) static TEXTAREA_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)(<textarea\b[^>]*?>)(.*?)(</textarea\s*>)"));
pub(crate) static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)(<script\b[^>]*?>)(.*?)(</script\s*>)"));
pub(crate) static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)(<style\b[^>]*?>)(.*?)(</style\s*>)"));

/// Inline handlers: `onclick="..."`, value in group 2.
pub(crate) static EVENT_DOUBLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)(\son[a-z]+\s*=\s*")([^"\\\r\n]*(?:\\.[^"\\\r\n]*)*)(")"#));
pub(crate) static EVENT_SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)(\son[a-z]+\s*=\s*')([^'\\\r\n]*(?:\\.[^'\\\r\n]*)*)(')"#));

pub(crate) static JAVASCRIPT_PROTOCOL: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^\s*javascript:\s*"));

pub(crate) static DOCTYPE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)<!DOCTYPE[^>]*>"));

/// A start tag: name, attribute text, optional self-closing slash.
pub(crate) static START_TAG: LazyLock<Regex> =
    LazyLock::new(|| compile(r"<([a-zA-Z][a-zA-Z0-9:._-]*)([^>]*?)(/?)>"));
pub(crate) static END_TAG_SPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"</([a-zA-Z][a-zA-Z0-9:._-]*)\s+>"));

/// One attribute inside a start tag: name, `=` with spacing, then the value
/// as double-quoted (3), single-quoted (4) or unquoted (5).
pub(crate) static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"([^\s"'<>/=]+)(?:(\s*=\s*)(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
});

pub(crate) static INTERTAG_SPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"(>|~%%%)(\s+)(<|%%%~)"));
pub(crate) static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));
pub(crate) static SURROUNDING_ALL: LazyLock<Regex> = LazyLock::new(|| compile(r"(\s*)(<[^>]+>)(\s*)"));

pub(crate) static CDATA: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)^\s*<!\[CDATA\[(.*)\]\]>\s*$"));

/// Placeholder emitted by the vault: salt in group 1, index in group 2.
pub(crate) static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| compile(r"%%%~HC~([0-9a-f]+)~(\d+)~%%%"));

/// Attributes whose presence alone carries their meaning.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "compact", "controls",
    "declare", "default", "defer", "disabled", "formnovalidate", "hidden", "inert", "ismap",
    "itemscope", "loop", "multiple", "muted", "nohref", "noresize", "noshade", "novalidate",
    "nowrap", "open", "playsinline", "readonly", "required", "reversed", "selected",
];

/// Attributes holding URLs eligible for protocol-relative rewriting.
pub const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite", "action"];

/// Build the surrounding-spaces pattern for a set of tag names, or for every
/// tag when `tags` is `None`.
pub fn surrounding_spaces_pattern(tags: Option<&[String]>) -> Result<Regex, regex::Error> {
    match tags {
        None => Ok(SURROUNDING_ALL.clone()),
        Some(tags) => {
            let alternation = tags.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
            Regex::new(&format!(r"(?i)(\s*)(</?(?:{alternation})(?:>|[\s/][^>]*>))(\s*)"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn php_pattern_matches_both_forms() {
        assert!(PHP_TAG_PATTERN.is_match("<?php echo 1; ?>"));
        assert!(PHP_TAG_PATTERN.is_match("<? echo 1 ?>"));
    }

    #[test]
    fn conditional_comment_groups() {
        let caps = CONDITIONAL_COMMENT.captures("<!--[if IE 6]><p>x</p><![endif]-->").unwrap();
        assert_eq!(&caps[1], "<!--[if IE 6]>");
        assert_eq!(&caps[2], "<p>x</p>");
        assert_eq!(&caps[3], "<![endif]-->");
    }

    #[test]
    fn comment_skips_conditional_syntax() {
        assert!(!COMMENT.is_match("<!--[if IE]>"));
        assert!(COMMENT.is_match("<!-- hi -->"));
        assert!(COMMENT.is_match("<!---->"));
    }

    #[test]
    fn block_patterns_need_word_boundary() {
        assert!(PRE_BLOCK.is_match("<PRE class=x>\n a</pre>"));
        assert!(!PRE_BLOCK.is_match("<prefix>a</pre>"));
    }

    #[test]
    fn attribute_value_forms() {
        let caps: Vec<_> = ATTRIBUTE.captures_iter(r#" a="1" b='2' c=3 d"#).collect();
        assert_eq!(caps.len(), 4);
        assert_eq!(&caps[0][3], "1");
        assert_eq!(&caps[1][4], "2");
        assert_eq!(&caps[2][5], "3");
        assert!(caps[3].get(2).is_none());
    }

    #[test]
    fn surrounding_pattern_for_list() {
        let re = surrounding_spaces_pattern(Some(&["p".to_string(), "br".to_string()])).unwrap();
        assert!(re.is_match(" <br/> "));
        assert!(re.is_match("</P>"));
        assert!(!re.is_match("<pre>"));
    }
}
