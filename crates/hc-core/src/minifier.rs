use anyhow::Result;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Capability for compressing an extracted script or style body.
///
/// Implementations are shared across concurrent `compress` calls, so they must
/// be `Send + Sync` and must not rely on per-call mutable state.
pub trait Minifier: Send + Sync {
    /// Minify one block of source. Errors leave the block untouched.
    fn minify(&self, source: &str) -> Result<String>;

    /// Name used in warnings and logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Minifier for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn minify(&self, source: &str) -> Result<String> {
        self(source)
    }
}

/// Shared handle to a minifier held by the configuration.
#[derive(Clone)]
pub struct MinifierRef(Arc<dyn Minifier>);

impl MinifierRef {
    pub fn new<M: Minifier + 'static>(minifier: M) -> Self {
        Self(Arc::new(minifier))
    }
}

impl From<Arc<dyn Minifier>> for MinifierRef {
    fn from(inner: Arc<dyn Minifier>) -> Self {
        Self(inner)
    }
}

impl Deref for MinifierRef {
    type Target = dyn Minifier;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for MinifierRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MinifierRef").field(&self.0.name()).finish()
    }
}
