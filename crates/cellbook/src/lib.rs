//! # cellbook
//!
//! An interactive worksheet engine. A worksheet is an ordered list of cells;
//! each cell hosts a pluggable app (free-form notes, claims to be checked,
//! ...) chosen by its type name.
//!
//! ## Features
//!
//! - Every cell sees the logic context accumulated by the cells above it
//! - Verification verdicts are stored on the cell and flow into later contexts
//! - Live app instances survive edits and are re-prepared only on external changes
//! - Unknown app types and unreadable data degrade to a warning, never a crash
//! - Asynchronous load and save with last-request-wins ordering
//!
//! ## Example
//!
//! ```rust
//! use cellbook::prelude::*;
//! use serde_json::json;
//!
//! let mut sheet = Sheet::new(AppRegistry::new());
//! let a = sheet.insert_cell_with(0, "note", json!("A"));
//! let b = sheet.insert_cell_with(1, "note", json!("B"));
//!
//! assert!(sheet.context(a).unwrap().is_empty());
//! assert_eq!(sheet.context(b).unwrap().texts().collect::<Vec<_>>(), vec!["A"]);
//!
//! for cell in sheet.render_all() {
//!     println!("{}: {}", cell.locator, cell.view);
//! }
//! ```

pub mod context;
pub mod document;
pub mod error;
pub mod io;
pub mod options;
pub mod prelude;
pub mod runtime;
pub mod sheet;
pub mod verdict;

pub use context::ContextDeriver;
pub use document::{parse_document, write_document};
pub use error::{BoxError, Error, Result};
pub use io::{DocumentSource, Fetched, FileSource, SyncClient};
pub use options::SheetOptions;
pub use runtime::{AppCell, CellState, CellWarning, LiveApp, Session};
pub use sheet::{RenderedCell, Sheet};

// Re-export the data model and app contract
pub use cellbook_apps::{
    App, AppDef, AppEvent, AppInput, AppInstance, AppProps, AppRegistry, PrepareError,
    PrepareResult, UnsupportedApp, View,
};
pub use cellbook_core::{
    Cell, CellLocator, CellStore, ContextEntry, DocumentRef, LogicContext, Payload,
    ProofArtifact, RefKind,
};
