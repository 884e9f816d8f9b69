use thiserror::Error;

use crate::types::FragmentKind;

#[derive(Error, Debug)]
pub enum CompressorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid preserve pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Placeholder restoration failed: {0}")]
    Restore(#[from] RestoreError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Internal consistency failures detected while putting preserved fragments
/// back into the document. Any of these means a pass corrupted a placeholder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    #[error("placeholder #{index} has no matching fragment")]
    UnknownPlaceholder { index: usize },
    #[error("placeholder #{index} appears more than once")]
    DuplicatePlaceholder { index: usize },
    #[error("{kind} fragment #{index} was never restored")]
    UnconsumedFragment { index: usize, kind: FragmentKind },
}

pub type Result<T> = std::result::Result<T, CompressorError>;
