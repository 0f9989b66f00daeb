//! Logic contexts
//!
//! The context visible at a cell is a strict left fold over the committed
//! cells that precede it:
//!
//! ```text
//! context(c0)   = LogicContext::empty()
//! context(c[i]) = context(c[i-1]).fold(c[i-1])
//! ```
//!
//! The fold step reads only a cell's committed payload and proof, so a
//! context can always be rebuilt from the persisted document alone. Each
//! step appends one [`ContextEntry`]; apps that need a richer view (a symbol
//! table, the set of proven statements, ...) compute it from the entries.
//!
//! Entries are reference-counted, so a context folded from a cached
//! predecessor shares that predecessor's entries instead of copying payloads.

use crate::cell::{Cell, Payload, ProofArtifact};
use crate::error::{Error, Result};
use crate::locator::CellLocator;
use std::sync::Arc;

/// The committed state of one preceding cell, as seen by later cells
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEntry {
    pub locator: CellLocator,
    pub type_name: String,
    pub payload: Payload,
    pub proof: Option<ProofArtifact>,
}

impl ContextEntry {
    /// Whether this entry carries a positive verdict
    pub fn is_proven(&self) -> bool {
        self.proof.as_ref().map_or(false, |p| p.verdict)
    }
}

impl From<&Cell> for ContextEntry {
    fn from(cell: &Cell) -> Self {
        Self {
            locator: cell.locator,
            type_name: cell.type_name.clone(),
            payload: cell.payload.clone(),
            proof: cell.proof.clone(),
        }
    }
}

/// Read-only context derived from the cells before a given cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogicContext {
    entries: Vec<Arc<ContextEntry>>,
}

impl LogicContext {
    /// The context of the first cell
    pub fn empty() -> Self {
        Self::default()
    }

    /// One fold step: the context after `cell`
    pub fn fold(mut self, cell: &Cell) -> Self {
        self.entries.push(Arc::new(ContextEntry::from(cell)));
        self
    }

    /// Derive the context at `upto` from scratch
    ///
    /// Returns [`Error::StaleLocator`] if no cell in `cells` has that locator.
    pub fn derive(cells: &[Cell], upto: CellLocator) -> Result<Self> {
        let position = cells
            .iter()
            .position(|c| c.locator == upto)
            .ok_or(Error::StaleLocator(upto))?;

        Ok(cells[..position]
            .iter()
            .fold(Self::empty(), |context, cell| context.fold(cell)))
    }

    /// All entries, in document order
    pub fn entries(&self) -> &[Arc<ContextEntry>] {
        &self.entries
    }

    /// Number of preceding cells
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no cells precede
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The immediately preceding cell
    pub fn last(&self) -> Option<&ContextEntry> {
        self.entries.last().map(Arc::as_ref)
    }

    /// Look up a preceding cell by locator
    pub fn get(&self, locator: CellLocator) -> Option<&ContextEntry> {
        self.entries
            .iter()
            .find(|e| e.locator == locator)
            .map(Arc::as_ref)
    }

    /// Entries with a positive verdict
    pub fn proven(&self) -> impl Iterator<Item = &ContextEntry> + '_ {
        self.entries
            .iter()
            .filter(|e| e.is_proven())
            .map(Arc::as_ref)
    }

    /// String payloads of the preceding cells, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().filter_map(|e| e.payload.as_str())
    }
}
