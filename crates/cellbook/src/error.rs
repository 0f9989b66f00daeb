//! Error types for the worksheet engine

use cellbook_core::DocumentRef;
use thiserror::Error;

/// Boxed error returned by document sources
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the worksheet engine
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the core data structures
    #[error(transparent)]
    Core(#[from] cellbook_core::Error),

    /// A document could not be loaded; the in-memory document is unchanged
    #[error("Failed to load {target}: {source}")]
    LoadFailure {
        target: DocumentRef,
        #[source]
        source: BoxError,
    },

    /// A document could not be saved
    #[error("Failed to save {target}: {source}")]
    SaveFailure {
        target: DocumentRef,
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Whether this error reports a locator that no longer names a cell
    pub fn is_stale_locator(&self) -> bool {
        matches!(self, Error::Core(cellbook_core::Error::StaleLocator(_)))
    }
}
