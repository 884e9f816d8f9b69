//! Whitespace passes: inter-tag runs, repeated whitespace, space around
//! selected tags and the document edges.

use regex::{Captures, Regex};

use crate::patterns::{INTERTAG_SPACE, WHITESPACE};

/// What a whitespace run shrinks to: a single line break when line breaks are
/// preserved and the run holds one, `otherwise` else.
fn collapse<'a>(run: &str, preserve_line_breaks: bool, otherwise: &'a str) -> &'a str {
    if preserve_line_breaks && run.contains('\n') {
        if run.contains("\r\n") { "\r\n" } else { "\n" }
    } else {
        otherwise
    }
}

/// Drop whitespace between `>` and `<`, treating placeholders as tags.
pub fn remove_intertag_spaces(text: &str, preserve_line_breaks: bool) -> String {
    INTERTAG_SPACE
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{}{}{}", &caps[1], collapse(&caps[2], preserve_line_breaks, ""), &caps[3])
        })
        .into_owned()
}

/// Collapse every whitespace run to one space.
pub fn remove_multi_spaces(text: &str, preserve_line_breaks: bool) -> String {
    WHITESPACE
        .replace_all(text, |caps: &Captures<'_>| collapse(&caps[0], preserve_line_breaks, " ").to_string())
        .into_owned()
}

/// Strip whitespace on both sides of the tags matched by `pattern`
/// (see [`crate::patterns::surrounding_spaces_pattern`]).
pub fn remove_surrounding_spaces(text: &str, pattern: &Regex, preserve_line_breaks: bool) -> String {
    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            format!(
                "{}{}{}",
                collapse(&caps[1], preserve_line_breaks, ""),
                &caps[2],
                collapse(&caps[3], preserve_line_breaks, "")
            )
        })
        .into_owned()
}

pub fn trim_document(text: &str) -> String {
    text.trim().to_string()
}
