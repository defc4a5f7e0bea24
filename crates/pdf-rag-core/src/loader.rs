//! Document loader trait.
//!
//! Loaders turn a file into an ordered sequence of page-level text blocks.
//! The PDF implementation lives in the `pdf-rag` application crate.

use std::path::Path;

use crate::error::Result;
use crate::models::Page;

/// Produces one [`Page`] per physical page, in document order.
pub trait DocumentLoader: Send + Sync {
    /// # Errors
    ///
    /// [`RagError::DocumentLoad`](crate::error::RagError::DocumentLoad) if the
    /// path does not exist or cannot be parsed.
    fn load(&self, path: &Path) -> Result<Vec<Page>>;
}
