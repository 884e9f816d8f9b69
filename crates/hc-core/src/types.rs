use serde::{Deserialize, Serialize};
use std::fmt;

/// What a preserved fragment originally was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    UserPattern,
    SkipBlock,
    ConditionalComment,
    PreBlock,
    TextareaBlock,
    ScriptBlock,
    StyleBlock,
    EventHandler,
    MinifiedJs,
    MinifiedCss,
}

impl FragmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserPattern => "user_pattern",
            Self::SkipBlock => "skip_block",
            Self::ConditionalComment => "conditional_comment",
            Self::PreBlock => "pre_block",
            Self::TextareaBlock => "textarea_block",
            Self::ScriptBlock => "script_block",
            Self::StyleBlock => "style_block",
            Self::EventHandler => "event_handler",
            Self::MinifiedJs => "minified_js",
            Self::MinifiedCss => "minified_css",
        }
    }

    /// Kinds whose content is handed to a minifier.
    pub fn is_minifiable(&self) -> bool {
        matches!(self, Self::ScriptBlock | Self::StyleBlock)
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Embedded code language of a block sent to a minifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddedKind {
    JavaScript,
    Css,
}

/// A minifier failed on one block; the block was kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinifyWarning {
    pub block: EmbeddedKind,
    /// Ordinal of the block among blocks of the same language.
    pub index: usize,
    pub minifier: String,
    pub message: String,
}

impl fmt::Display for MinifyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lang = match self.block {
            EmbeddedKind::JavaScript => "script",
            EmbeddedKind::Css => "style",
        };
        write!(f, "{} block #{} left uncompressed by {}: {}", lang, self.index, self.minifier, self.message)
    }
}
