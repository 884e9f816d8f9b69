//! Attribute passes: quote removal, HTML5-default attributes, protocol
//! stripping and boolean attribute shortening.

use hc_core::FragmentKind;

use crate::patterns::{BOOLEAN_ATTRIBUTES, JAVASCRIPT_PROTOCOL, URL_ATTRIBUTES};
use crate::tags::{rewrite_attributes, AttrEdit, Attribute, StartTag};
use crate::vault::PlaceholderVault;

/// Which host tags get their default-valued attributes removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionalAttributes {
    pub script: bool,
    pub style: bool,
    pub link: bool,
    pub form: bool,
    pub input: bool,
}

impl OptionalAttributes {
    pub fn any(&self) -> bool {
        self.script || self.style || self.link || self.form || self.input
    }
}

const SCRIPT_TYPE_DEFAULTS: &[&str] = &["text/javascript", "application/javascript"];

fn is_safe_unquoted(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// `attr="value"` → `attr=value` when the value needs no quoting.
pub fn remove_quotes(text: &str) -> String {
    rewrite_attributes(text, |tag, attr| {
        let (Some(value), Some(_)) = (attr.value, attr.quote) else { return AttrEdit::Keep };
        if !is_safe_unquoted(value) || attr.next.is_some_and(|c| !c.is_whitespace()) {
            return AttrEdit::Keep;
        }
        let slash_guard = if tag.self_closing && tag.is_last(attr) { " " } else { "" };
        AttrEdit::Replace(format!("{}={}{}", attr.name, value, slash_guard))
    })
}

fn default_valued(tag: &StartTag<'_>, attr: &Attribute<'_>, enabled: &OptionalAttributes) -> bool {
    if enabled.script && tag.is("script") {
        return (attr.is("type") && attr.value_in(SCRIPT_TYPE_DEFAULTS))
            || (attr.is("language") && attr.value_is("javascript"));
    }
    if enabled.style && tag.is("style") {
        return attr.is("type") && attr.value_is("text/css");
    }
    if enabled.link && tag.is("link") {
        let stylesheet = tag.attr("rel").is_some_and(|rel| rel.value_is("stylesheet"));
        return stylesheet && attr.is("type") && attr.value_is("text/css");
    }
    if enabled.form && tag.is("form") {
        return attr.is("method") && attr.value_is("get");
    }
    if enabled.input && tag.is("input") {
        return attr.is("type") && attr.value_is("text");
    }
    false
}

/// Remove attributes whose value is what HTML5 implies anyway.
pub fn remove_optional_attributes(text: &str, enabled: &OptionalAttributes) -> String {
    if !enabled.any() {
        return text.to_string();
    }
    rewrite_attributes(text, |tag, attr| {
        if default_valued(tag, attr, enabled) { AttrEdit::Remove } else { AttrEdit::Keep }
    })
}

/// Strip a leading `javascript:` from inline handlers. Handler values live in
/// the vault by now, so this edits fragments rather than the document.
pub fn remove_javascript_protocol(vault: &mut PlaceholderVault) -> usize {
    let edits: Vec<(usize, String)> = vault
        .fragments()
        .iter()
        .enumerate()
        .filter(|(_, f)| f.kind == FragmentKind::EventHandler)
        .filter_map(|(i, f)| {
            let m = JAVASCRIPT_PROTOCOL.find(&f.content)?;
            let rest = &f.content[m.end()..];
            (!rest.is_empty()).then(|| (i, rest.to_string()))
        })
        .collect();
    let count = edits.len();
    for (index, content) in edits {
        vault.replace(index, content, FragmentKind::EventHandler);
    }
    count
}

fn is_rel_external(tag: &StartTag<'_>) -> bool {
    tag.attr("rel")
        .and_then(|rel| rel.value)
        .is_some_and(|v| v.split_whitespace().any(|t| t.eq_ignore_ascii_case("external")))
}

fn strip_scheme<'v>(value: &'v str, scheme: &str) -> Option<&'v str> {
    let bytes = value.as_bytes();
    let n = scheme.len();
    let matches = bytes.len() >= n + 3
        && bytes[..n].eq_ignore_ascii_case(scheme.as_bytes())
        && &bytes[n..n + 3] == b"://";
    matches.then(|| &value[n + 1..])
}

/// `href="http://x"` → `href="//x"` on URL attributes. Each value loses at
/// most one scheme; links marked `rel="external"` are left as written.
pub fn remove_protocols(text: &str, http: bool, https: bool) -> String {
    if !http && !https {
        return text.to_string();
    }
    rewrite_attributes(text, |tag, attr| {
        let (Some(value), Some(quote)) = (attr.value, attr.quote) else { return AttrEdit::Keep };
        if !URL_ATTRIBUTES.iter().any(|name| attr.is(name)) || is_rel_external(tag) {
            return AttrEdit::Keep;
        }
        let stripped = https
            .then(|| strip_scheme(value, "https"))
            .flatten()
            .or_else(|| http.then(|| strip_scheme(value, "http")).flatten());
        match stripped {
            Some(rest) => AttrEdit::Replace(format!("{}{}{quote}{rest}{quote}", attr.name, attr.assign.unwrap_or("="))),
            None => AttrEdit::Keep,
        }
    })
}

/// `checked="checked"` → `checked` for known boolean attributes.
pub fn simple_boolean_attributes(text: &str) -> String {
    rewrite_attributes(text, |_, attr| {
        let Some(value) = attr.value else { return AttrEdit::Keep };
        let boolean = BOOLEAN_ATTRIBUTES.iter().any(|name| attr.is(name));
        let separated = attr.next.map_or(true, char::is_whitespace);
        if boolean && separated && (value.is_empty() || value.eq_ignore_ascii_case(attr.name)) {
            AttrEdit::Replace(attr.name.to_string())
        } else {
            AttrEdit::Keep
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_stripping() {
        assert_eq!(strip_scheme("HTTPS://a.b", "https"), Some("//a.b"));
        assert_eq!(strip_scheme("http://a.b", "https"), None);
        assert_eq!(strip_scheme("http:/a", "http"), None);
        assert_eq!(strip_scheme("ht", "http"), None);
    }

    #[test]
    fn unquoted_safety() {
        assert!(is_safe_unquoted("main-nav_2"));
        assert!(!is_safe_unquoted("a b"));
        assert!(!is_safe_unquoted("a/b"));
        assert!(!is_safe_unquoted(""));
    }
}
