//! Comment removal. Conditional comments never reach this pass: they are
//! already placeholders.

use regex::Captures;

use crate::patterns::COMMENT;
use crate::vault::PlaceholderVault;

/// Strip ordinary comments. Placeholders swallowed by a removed comment are
/// released so restoration does not expect them back.
pub fn remove_comments(text: &str, vault: &mut PlaceholderVault) -> String {
    COMMENT
        .replace_all(text, |caps: &Captures<'_>| {
            vault.release_within(&caps[0]);
            ""
        })
        .into_owned()
}
