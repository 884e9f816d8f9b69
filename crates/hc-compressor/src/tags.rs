//! Start-tag lexing for the attribute passes. Works on one tag's text at a
//! time with [`START_TAG`] and [`ATTRIBUTE`]; nothing here builds a tree.

use regex::Captures;
use std::ops::Range;

use crate::patterns::{ATTRIBUTE, END_TAG_SPACE, START_TAG};

#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// The `=` with whatever spacing surrounds it.
    pub assign: Option<&'a str>,
    /// Value without quotes.
    pub value: Option<&'a str>,
    /// Value as written, quotes included.
    pub raw_value: Option<&'a str>,
    pub quote: Option<char>,
    /// Byte range inside the tag's attribute text.
    pub span: Range<usize>,
    /// Character right after the attribute, if any.
    pub next: Option<char>,
}

impl Attribute<'_> {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn value_is(&self, expected: &str) -> bool {
        self.value.is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
    }

    pub fn value_in(&self, expected: &[&str]) -> bool {
        expected.iter().any(|e| self.value_is(e))
    }
}

#[derive(Debug, Clone)]
pub struct StartTag<'a> {
    pub name: &'a str,
    pub attributes: Vec<Attribute<'a>>,
    pub self_closing: bool,
}

impl StartTag<'_> {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn attr(&self, name: &str) -> Option<&Attribute<'_>> {
        self.attributes.iter().find(|a| a.is(name))
    }

    pub fn is_last(&self, attr: &Attribute<'_>) -> bool {
        self.attributes.last().is_some_and(|a| a.span == attr.span)
    }
}

/// Outcome for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrEdit {
    Keep,
    /// Drop the attribute and the whitespace before it.
    Remove,
    Replace(String),
}

pub fn lex_attributes(inner: &str) -> Vec<Attribute<'_>> {
    ATTRIBUTE
        .captures_iter(inner)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (value, raw_value, quote) = if let Some(v) = caps.get(3) {
                (Some(v.as_str()), Some(&inner[v.start() - 1..v.end() + 1]), Some('"'))
            } else if let Some(v) = caps.get(4) {
                (Some(v.as_str()), Some(&inner[v.start() - 1..v.end() + 1]), Some('\''))
            } else if let Some(v) = caps.get(5) {
                (Some(v.as_str()), Some(v.as_str()), None)
            } else {
                (None, None, None)
            };
            Some(Attribute {
                name: caps.get(1)?.as_str(),
                assign: caps.get(2).map(|m| m.as_str()),
                value,
                raw_value,
                quote,
                span: whole.range(),
                next: inner[whole.end()..].chars().next(),
            })
        })
        .collect()
}

fn parse_tag<'a>(caps: &Captures<'a>) -> Option<(StartTag<'a>, &'a str)> {
    let name = caps.get(1)?.as_str();
    let inner = caps.get(2)?.as_str();
    let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
    Some((StartTag { name, attributes: lex_attributes(inner), self_closing }, inner))
}

/// Run `edit` on every attribute of every start tag; untouched tags are
/// copied byte-for-byte.
pub fn rewrite_attributes<F>(text: &str, mut edit: F) -> String
where
    F: FnMut(&StartTag<'_>, &Attribute<'_>) -> AttrEdit,
{
    START_TAG
        .replace_all(text, |caps: &Captures<'_>| {
            let whole = caps[0].to_string();
            let Some((tag, inner)) = parse_tag(caps) else { return whole };

            let mut out = String::with_capacity(whole.len());
            out.push('<');
            out.push_str(tag.name);
            let mut last = 0;
            let mut changed = false;

            for attr in &tag.attributes {
                match edit(&tag, attr) {
                    AttrEdit::Keep => {}
                    AttrEdit::Remove => {
                        let before = &inner[last..attr.span.start];
                        out.push_str(before.trim_end());
                        last = attr.span.end;
                        changed = true;
                    }
                    AttrEdit::Replace(replacement) => {
                        out.push_str(&inner[last..attr.span.start]);
                        out.push_str(&replacement);
                        last = attr.span.end;
                        changed = true;
                    }
                }
            }

            if !changed {
                return whole;
            }
            out.push_str(&inner[last..]);
            if tag.self_closing {
                out.push('/');
            }
            out.push('>');
            out
        })
        .into_owned()
}

/// Normalise spacing inside tags: one space between attributes, none around
/// `=` or before `>`. A space stays before `/>` after an unquoted value so
/// the slash is not read as part of it.
pub fn tidy_tags(text: &str) -> String {
    let result = START_TAG.replace_all(text, |caps: &Captures<'_>| {
        let whole = caps[0].to_string();
        let Some((tag, inner)) = parse_tag(caps) else { return whole };

        let mut cursor = 0;
        for attr in &tag.attributes {
            if !inner[cursor..attr.span.start].trim().is_empty() {
                return whole;
            }
            cursor = attr.span.end;
        }
        if !inner[cursor..].trim().is_empty() {
            return whole;
        }

        let mut out = String::with_capacity(whole.len());
        out.push('<');
        out.push_str(tag.name);
        for attr in &tag.attributes {
            out.push(' ');
            out.push_str(attr.name);
            if let Some(raw) = attr.raw_value {
                out.push('=');
                out.push_str(raw);
            }
        }
        if tag.self_closing {
            let unquoted_last = tag.attributes.last().is_some_and(|a| a.value.is_some() && a.quote.is_none());
            if unquoted_last {
                out.push(' ');
            }
            out.push('/');
        }
        out.push('>');
        out
    });
    END_TAG_SPACE.replace_all(&result, "</$1>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_quotes_and_next_char() {
        let attrs = lex_attributes(r#" a="x y" b='z'c"#);
        assert_eq!(attrs[0].value, Some("x y"));
        assert_eq!(attrs[0].raw_value, Some("\"x y\""));
        assert_eq!(attrs[0].next, Some(' '));
        assert_eq!(attrs[1].quote, Some('\''));
        assert_eq!(attrs[1].next, Some('c'));
        assert_eq!(attrs[2].name, "c");
        assert_eq!(attrs[2].next, None);
    }

    #[test]
    fn remove_takes_leading_space() {
        let out = rewrite_attributes(r#"<script type="text/javascript" src="a.js">"#, |_, a| {
            if a.is("type") { AttrEdit::Remove } else { AttrEdit::Keep }
        });
        assert_eq!(out, r#"<script src="a.js">"#);
    }

    #[test]
    fn untouched_tags_are_verbatim() {
        let src = "<div  class = \"a\" >x</div >";
        assert_eq!(rewrite_attributes(src, |_, _| AttrEdit::Keep), src);
    }

    #[test]
    fn tidy_spacing() {
        assert_eq!(tidy_tags("<div  class = \"a  b\"   id=x >t</div >"), "<div class=\"a  b\" id=x>t</div>");
        assert_eq!(tidy_tags("<br class=a />"), "<br class=a />");
        assert_eq!(tidy_tags("<br class=\"a\" />"), "<br class=\"a\"/>");
    }

    #[test]
    fn tidy_leaves_odd_tags_alone() {
        let src = "<a / href=x>";
        assert_eq!(tidy_tags(src), src);
    }
}
