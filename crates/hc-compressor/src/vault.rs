//! Placeholder vault. Swaps protected regions for unique tokens and puts them
//! back once every pass has run.
//!
//! Tokens look like `%%%~HC~<salt>~<index>~%%%`. The salt is random per vault
//! and checked to be absent from the input, so a token can never coincide with
//! document text. Fragments may contain tokens of fragments protected earlier
//! (a `<pre>` body holding a user-pattern token); restoration expands them
//! recursively and always towards lower indices.

use hc_core::{FragmentKind, RestoreError};
use regex::{Captures, Regex};
use std::ops::Range;
use uuid::Uuid;

use crate::patterns::PLACEHOLDER;

/// One preserved region.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub kind: FragmentKind,
    /// Text as it was cut from the document.
    pub original: String,
    /// Text that will be restored; differs from `original` after re-protection.
    pub content: String,
    released: bool,
}

impl Fragment {
    /// Whether the token was deleted along with surrounding text.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

/// What to cut out of the text for one pattern match.
#[derive(Debug, Clone)]
pub struct Protection {
    /// Byte range of the text replaced by the token.
    pub span: Range<usize>,
    /// Text stored in the fragment (usually the same bytes as `span`).
    pub content: String,
    pub kind: FragmentKind,
}

impl Protection {
    /// Protect capture group `group` of a match verbatim.
    pub fn group(caps: &Captures<'_>, group: usize, kind: FragmentKind) -> Option<Self> {
        let m = caps.get(group)?;
        Some(Self { span: m.range(), content: m.as_str().to_string(), kind })
    }
}

#[derive(Debug)]
pub struct PlaceholderVault {
    salt: String,
    fragments: Vec<Fragment>,
}

impl PlaceholderVault {
    /// Create a vault whose tokens cannot collide with `document`.
    pub fn new(document: &str) -> Self {
        let salt = loop {
            let candidate = Uuid::new_v4().simple().to_string()[..12].to_string();
            if !document.contains(&candidate) {
                break candidate;
            }
        };
        Self { salt, fragments: Vec::new() }
    }

    pub fn token(&self, index: usize) -> String {
        format!("%%%~HC~{}~{}~%%%", self.salt, index)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Replace every match of `pattern` with a token of the given kind.
    /// Returns the new text and the number of fragments appended.
    pub fn protect(&mut self, text: &str, pattern: &Regex, kind: FragmentKind) -> (String, usize) {
        self.protect_with(text, pattern, |caps| Protection::group(caps, 0, kind))
    }

    /// [`protect`](Self::protect) for a list of patterns, applied in order.
    pub fn protect_all(&mut self, text: &str, patterns: &[Regex], kind: FragmentKind) -> (String, usize) {
        let mut result = text.to_string();
        let mut appended = 0;
        for pattern in patterns {
            let (next, n) = self.protect(&result, pattern, kind);
            result = next;
            appended += n;
        }
        (result, appended)
    }

    /// Scan `text` once, left to right. For each match `select` decides which
    /// span becomes a token and what the fragment holds, or skips the match.
    ///
    /// A span that cuts through an existing token is skipped; a span that
    /// fully contains tokens nests them inside the new fragment.
    pub fn protect_with<F>(&mut self, text: &str, pattern: &Regex, mut select: F) -> (String, usize)
    where
        F: FnMut(&Captures<'_>) -> Option<Protection>,
    {
        let existing = self.token_spans(text);
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut appended = 0;

        for caps in pattern.captures_iter(text) {
            let Some(protection) = select(&caps) else { continue };
            let span = protection.span.clone();
            if span.start < last || span.is_empty() || cuts_token(&existing, &span) {
                continue;
            }
            out.push_str(&text[last..span.start]);
            out.push_str(&self.push(protection.content, protection.kind));
            last = span.end;
            appended += 1;
        }

        if appended == 0 {
            return (text.to_string(), 0);
        }
        out.push_str(&text[last..]);
        (out, appended)
    }

    fn push(&mut self, content: String, kind: FragmentKind) -> String {
        let index = self.fragments.len();
        self.fragments.push(Fragment { kind, original: content.clone(), content, released: false });
        self.token(index)
    }

    /// Re-protect fragment `index` with new content, e.g. minifier output.
    pub fn replace(&mut self, index: usize, content: String, kind: FragmentKind) {
        if let Some(fragment) = self.fragments.get_mut(index) {
            fragment.content = content;
            fragment.kind = kind;
        }
    }

    /// Mark every token inside `removed` (and tokens nested in those
    /// fragments) as intentionally dropped.
    pub fn release_within(&mut self, removed: &str) {
        for index in self.indices_in(removed) {
            let Some(fragment) = self.fragments.get_mut(index) else { continue };
            if fragment.released {
                continue;
            }
            fragment.released = true;
            let nested = fragment.content.clone();
            self.release_within(&nested);
        }
    }

    /// Indices of this vault's tokens occurring in `text`, in order.
    pub fn indices_in(&self, text: &str) -> Vec<usize> {
        PLACEHOLDER
            .captures_iter(text)
            .filter(|caps| caps[1] == *self.salt)
            .filter_map(|caps| caps[2].parse().ok())
            .collect()
    }

    fn token_spans(&self, text: &str) -> Vec<Range<usize>> {
        PLACEHOLDER
            .captures_iter(text)
            .filter(|caps| caps[1] == *self.salt)
            .filter_map(|caps| caps.get(0).map(|m| m.range()))
            .collect()
    }

    /// Expand every token in `text`. Fails on unknown or repeated tokens and on
    /// fragments that were neither restored nor released.
    pub fn restore(&self, text: &str) -> Result<String, RestoreError> {
        let mut uses = vec![0usize; self.fragments.len()];
        let restored = self.expand(text, self.fragments.len(), &mut uses)?;

        for (index, fragment) in self.fragments.iter().enumerate() {
            if !fragment.released && uses[index] == 0 {
                return Err(RestoreError::UnconsumedFragment { index, kind: fragment.kind });
            }
        }
        Ok(restored)
    }

    /// Only tokens below `limit` may appear in `text`; nesting always points
    /// to earlier fragments, which also rules out cycles.
    fn expand(&self, text: &str, limit: usize, uses: &mut [usize]) -> Result<String, RestoreError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(text) {
            if caps[1] != *self.salt {
                continue;
            }
            let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let index: usize = caps[2].parse().map_err(|_| RestoreError::UnknownPlaceholder { index: usize::MAX })?;
            if index >= limit {
                return Err(RestoreError::UnknownPlaceholder { index });
            }
            uses[index] += 1;
            if uses[index] > 1 {
                return Err(RestoreError::DuplicatePlaceholder { index });
            }
            out.push_str(&text[last..whole.start]);
            let inner = self.expand(&self.fragments[index].content, index, uses)?;
            out.push_str(&inner);
            last = whole.end;
        }

        out.push_str(&text[last..]);
        Ok(out)
    }
}

fn cuts_token(tokens: &[Range<usize>], span: &Range<usize>) -> bool {
    tokens.iter().any(|t| {
        let overlaps = t.start < span.end && span.start < t.end;
        let contained = span.start <= t.start && t.end <= span.end;
        overlaps && !contained
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_avoids_document_text() {
        let vault = PlaceholderVault::new("plain");
        assert!(!"plain".contains(&vault.salt));
        assert_eq!(vault.salt.len(), 12);
    }

    #[test]
    fn tokens_are_distinct() {
        let vault = PlaceholderVault::new("");
        assert_ne!(vault.token(1), vault.token(11));
    }

    #[test]
    fn cut_detection() {
        let tokens = vec![5..10];
        assert!(cuts_token(&tokens, &(7..12)));
        assert!(!cuts_token(&tokens, &(4..11)));
        assert!(!cuts_token(&tokens, &(0..5)));
    }
}
