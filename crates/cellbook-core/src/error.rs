//! Error types for cellbook-core

use crate::locator::CellLocator;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellbook-core
#[derive(Debug, Error)]
pub enum Error {
    /// The locator does not name a cell in the document (it was deleted,
    /// or never existed)
    #[error("Stale cell locator: {0}")]
    StaleLocator(CellLocator),

    /// Two cells in a loaded document share a locator
    #[error("Duplicate cell locator: {0}")]
    DuplicateLocator(CellLocator),

    /// Locator id reserved as the end of the locator space
    #[error("Cell locator {0} is out of range")]
    LocatorOutOfRange(CellLocator),

    /// Invalid locator string
    #[error("Invalid cell locator: {0}")]
    InvalidLocator(String),

    /// Cell position out of bounds
    #[error("Cell position {0} out of bounds (count: {1})")]
    PositionOutOfBounds(usize, usize),

    /// URL path that does not describe a document reference
    #[error("Invalid document path: {0}")]
    InvalidPath(String),
}
