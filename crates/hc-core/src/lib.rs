//! Shared building blocks for the HTML compressor: configuration, errors,
//! the minifier capability and the fragment/warning types passed between crates.

pub mod config;
pub mod error;
pub mod minifier;
pub mod types;

pub use config::{CompressorConfig, SurroundingSpaces};
pub use error::{CompressorError, RestoreError, Result};
pub use minifier::{Minifier, MinifierRef};
pub use types::{EmbeddedKind, FragmentKind, MinifyWarning};

#[cfg(test)]
mod tests;
