//! Conservative JavaScript minifier: drops comments and needless whitespace,
//! never renames or rewrites code. String, template and regex literals are
//! copied as written. A line break is kept wherever automatic semicolon
//! insertion might depend on it.

use anyhow::{bail, Result};
use hc_core::Minifier;

/// Keywords after which `/` starts a regex literal rather than a division.
const KEYWORDS_BEFORE_EXPRESSION: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

/// A line break after one of these can never end a statement.
const CONTINUES_AFTER: &str = "{([,;:=?&|!~^<>*%";
/// A line break before one of these can never end a statement.
const CONTINUES_BEFORE: &str = ")]},;:?.=";

/// Built-in JavaScript minifier.
///
/// Regex literals are told apart from division by the preceding token only.
/// After `)` a `/` is always division, so `if (a) /x/.test(b)` is mangled;
/// plug in a parser-based [`Minifier`] for code written that way.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinJsMinifier;

impl Minifier for BuiltinJsMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        minify_js(source)
    }

    fn name(&self) -> &str {
        "builtin-js"
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// What to put where whitespace (or a comment) separated `prev` and `next`.
fn separator(prev: char, next: char, newline: bool) -> &'static str {
    let keep = if newline { "\n" } else { " " };
    if is_word(prev) && is_word(next) {
        return keep;
    }
    let merges = matches!(
        (prev, next),
        ('+', '+') | ('-', '-') | ('/', '/') | ('/', '*') | ('<', '!') | ('-', '>')
    );
    if merges || (prev.is_ascii_digit() && next == '.') {
        return keep;
    }
    if newline && !CONTINUES_AFTER.contains(prev) && !CONTINUES_BEFORE.contains(next) {
        return "\n";
    }
    ""
}

#[derive(Default)]
struct Emitter {
    out: String,
    /// Whitespace seen since the last token; `true` if it held a line break.
    pending: Option<bool>,
    last_word: String,
    line_start: bool,
}

impl Emitter {
    fn space(&mut self, newline: bool) {
        self.pending = Some(self.pending.unwrap_or(false) || newline);
        if newline {
            self.line_start = true;
        }
    }

    fn emit(&mut self, text: &str) {
        if let Some(newline) = self.pending.take() {
            if let (Some(prev), Some(next)) = (self.out.chars().last(), text.chars().next()) {
                self.out.push_str(separator(prev, next, newline));
            }
        }
        self.out.push_str(text);
        self.line_start = false;
        if text.chars().next().is_some_and(is_word) {
            self.last_word = text.to_string();
        } else {
            self.last_word.clear();
        }
    }

    fn regex_allowed(&self) -> bool {
        let mut tail = self.out.chars().rev();
        match (tail.next(), tail.next()) {
            (None, _) => true,
            (Some('+'), Some('+')) | (Some('-'), Some('-')) => false,
            (Some(c), _) if is_word(c) => KEYWORDS_BEFORE_EXPRESSION.contains(&self.last_word.as_str()),
            (Some(')' | ']' | '"' | '\'' | '`'), _) => false,
            _ => true,
        }
    }
}

pub fn minify_js(source: &str) -> Result<String> {
    let chars: Vec<char> = source.chars().collect();
    let n = chars.len();
    let at = |i: usize| chars.get(i).copied();
    let text = |from: usize, to: usize| chars[from..to].iter().collect::<String>();

    let mut em = Emitter { line_start: true, ..Default::default() };
    let mut braces = 0usize;
    // Brace depths at which a `${` of an enclosing template was opened.
    let mut templates: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < n {
        let c = chars[i];

        if c.is_whitespace() {
            em.space(is_line_break(c));
            i += 1;
            continue;
        }

        let html_open = c == '<' && at(i + 1) == Some('!') && at(i + 2) == Some('-') && at(i + 3) == Some('-');
        let html_close = em.line_start && c == '-' && at(i + 1) == Some('-') && at(i + 2) == Some('>');
        if (c == '/' && at(i + 1) == Some('/')) || html_open || html_close {
            while i < n && !is_line_break(chars[i]) {
                i += 1;
            }
            em.space(false);
            continue;
        }

        if c == '/' && at(i + 1) == Some('*') {
            let start = i;
            i += 2;
            while i < n && !(chars[i] == '*' && at(i + 1) == Some('/')) {
                i += 1;
            }
            if i >= n {
                bail!("unterminated block comment");
            }
            i += 2;
            if at(start + 2) == Some('!') {
                em.emit(&text(start, i));
            } else {
                em.space(chars[start..i].iter().any(|&c| is_line_break(c)));
            }
            continue;
        }

        if c == '"' || c == '\'' {
            let start = i;
            i += 1;
            while i < n && chars[i] != c {
                if chars[i] == '\\' {
                    i += 1;
                } else if is_line_break(chars[i]) {
                    bail!("unterminated string literal");
                }
                i += 1;
            }
            if i >= n {
                bail!("unterminated string literal");
            }
            i += 1;
            em.emit(&text(start, i));
            continue;
        }

        let resumes_template = c == '}' && templates.last() == Some(&braces);
        if c == '`' || resumes_template {
            if resumes_template {
                templates.pop();
            }
            let start = i;
            i += 1;
            loop {
                match at(i) {
                    None => bail!("unterminated template literal"),
                    Some('\\') => i += 2,
                    Some('`') => {
                        i += 1;
                        break;
                    }
                    Some('$') if at(i + 1) == Some('{') => {
                        i += 2;
                        templates.push(braces);
                        break;
                    }
                    Some(_) => i += 1,
                }
            }
            em.emit(&text(start, i.min(n)));
            continue;
        }

        if c == '/' && em.regex_allowed() {
            let start = i;
            let mut in_class = false;
            i += 1;
            loop {
                match at(i) {
                    None => bail!("unterminated regular expression"),
                    Some(ch) if is_line_break(ch) => bail!("unterminated regular expression"),
                    Some('\\') => i += 2,
                    Some('[') => {
                        in_class = true;
                        i += 1;
                    }
                    Some(']') => {
                        in_class = false;
                        i += 1;
                    }
                    Some('/') if !in_class => {
                        i += 1;
                        break;
                    }
                    Some(_) => i += 1,
                }
            }
            while i < n && is_word(chars[i]) {
                i += 1;
            }
            em.emit(&text(start, i.min(n)));
            continue;
        }

        if is_word(c) {
            let start = i;
            while i < n && is_word(chars[i]) {
                i += 1;
            }
            em.emit(&text(start, i));
            continue;
        }

        match c {
            '{' => braces += 1,
            '}' => braces = braces.saturating_sub(1),
            _ => {}
        }
        em.emit(&c.to_string());
        i += 1;
    }

    if !templates.is_empty() {
        bail!("unterminated template substitution");
    }
    Ok(em.out)
}
