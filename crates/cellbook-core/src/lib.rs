//! # cellbook-core
//!
//! Core data structures for the cellbook worksheet engine.
//!
//! This crate provides the fundamental types used throughout cellbook:
//! - [`CellLocator`] - Stable identity of a cell inside a document
//! - [`Cell`] and [`ProofArtifact`] - Committed cell data and verification results
//! - [`CellStore`] - The ordered, authoritative collection of cells
//! - [`LogicContext`] - The context folded from the cells preceding a cell
//! - [`DocumentRef`] - Where a worksheet document lives in a repository
//!
//! ## Example
//!
//! ```rust
//! use cellbook_core::{CellStore, LogicContext};
//! use serde_json::json;
//!
//! let mut store = CellStore::new();
//! let a = store.insert_cell(0, "note", json!("premise"));
//! let b = store.insert_cell(1, "note", json!(""));
//!
//! let context = LogicContext::derive(store.ordered_cells(), b).unwrap();
//! assert_eq!(context.len(), 1);
//! assert_eq!(context.last().unwrap().locator, a);
//! ```

pub mod cell;
pub mod context;
pub mod error;
pub mod locator;
pub mod reference;
pub mod store;

// Re-exports for convenience
pub use cell::{Cell, Payload, ProofArtifact};
pub use context::{ContextEntry, LogicContext};
pub use error::{Error, Result};
pub use locator::CellLocator;
pub use reference::{DocumentRef, RefKind, WORKSHEET_EXTENSION};
pub use store::CellStore;
