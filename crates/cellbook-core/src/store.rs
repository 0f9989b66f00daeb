//! Cell store - the authoritative, ordered collection of cells

use crate::cell::{Cell, Payload, ProofArtifact};
use crate::error::{Error, Result};
use crate::locator::CellLocator;
use ahash::AHashSet;

/// The ordered cells of one worksheet document
///
/// Every mutation takes `&mut self` and either completes or leaves the store
/// untouched, so a reader never observes a half-applied change. Each
/// successful mutation bumps [`revision`](Self::revision).
///
/// Mutations that name a locator report [`Error::StaleLocator`] when the cell
/// no longer exists; callers on the write path are free to ignore it.
#[derive(Debug, Clone, Default)]
pub struct CellStore {
    /// Cells in document order
    cells: Vec<Cell>,
    /// Next raw locator id to hand out
    next_id: u64,
    /// Mutation counter
    revision: u64,
}

impl CellStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded cells, keeping their locators
    ///
    /// Fails with [`Error::DuplicateLocator`] if two cells share a locator,
    /// and with [`Error::LocatorOutOfRange`] for the id `u64::MAX`, which is
    /// never allocated.
    pub fn from_cells(cells: Vec<Cell>) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(cells.len());
        let mut next_id = 0;
        for cell in &cells {
            let id = cell
                .locator
                .raw()
                .checked_add(1)
                .ok_or(Error::LocatorOutOfRange(cell.locator))?;
            if !seen.insert(cell.locator) {
                return Err(Error::DuplicateLocator(cell.locator));
            }
            next_id = next_id.max(id);
        }

        Ok(Self {
            cells,
            next_id,
            revision: 0,
        })
    }

    /// Consume the store, returning its cells in order
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Get the number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the document has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Current mutation counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All cells in document order
    pub fn ordered_cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over all locators in document order
    pub fn locators(&self) -> impl Iterator<Item = CellLocator> + '_ {
        self.cells.iter().map(|c| c.locator)
    }

    /// Get the current position of a cell
    pub fn position(&self, locator: CellLocator) -> Option<usize> {
        self.cells.iter().position(|c| c.locator == locator)
    }

    /// Check if a cell exists
    pub fn contains(&self, locator: CellLocator) -> bool {
        self.position(locator).is_some()
    }

    /// Get a cell by locator
    pub fn cell(&self, locator: CellLocator) -> Result<&Cell> {
        self.cells
            .iter()
            .find(|c| c.locator == locator)
            .ok_or(Error::StaleLocator(locator))
    }

    /// Get a cell by position
    pub fn cell_at(&self, position: usize) -> Option<&Cell> {
        self.cells.get(position)
    }

    /// Insert a new cell at `at`, returning its locator
    ///
    /// # Panics
    ///
    /// Panics if `at` is greater than the number of cells, or if every
    /// locator id has been handed out.
    pub fn insert_cell(
        &mut self,
        at: usize,
        type_name: impl Into<String>,
        payload: Payload,
    ) -> CellLocator {
        assert!(
            at <= self.cells.len(),
            "insert position {} out of bounds (count: {})",
            at,
            self.cells.len()
        );

        let Some(next_id) = self.next_id.checked_add(1) else {
            panic!("cell locator space exhausted");
        };
        let locator = CellLocator::from_raw(self.next_id);
        self.next_id = next_id;
        self.cells.insert(at, Cell::new(locator, type_name, payload));
        self.revision += 1;
        locator
    }

    /// Remove a cell, returning the position it had and its data
    pub fn delete_cell(&mut self, locator: CellLocator) -> Result<(usize, Cell)> {
        let position = self
            .position(locator)
            .ok_or(Error::StaleLocator(locator))?;
        let cell = self.cells.remove(position);
        self.revision += 1;
        Ok((position, cell))
    }

    /// Replace a cell's payload, returning the cell's position
    pub fn replace_payload(&mut self, locator: CellLocator, payload: Payload) -> Result<usize> {
        let position = self
            .position(locator)
            .ok_or(Error::StaleLocator(locator))?;
        self.cells[position].payload = payload;
        self.revision += 1;
        Ok(position)
    }

    /// Replace (or clear) a cell's proof, returning the cell's position
    pub fn set_proof(
        &mut self,
        locator: CellLocator,
        proof: Option<ProofArtifact>,
    ) -> Result<usize> {
        let position = self
            .position(locator)
            .ok_or(Error::StaleLocator(locator))?;
        self.cells[position].proof = proof;
        self.revision += 1;
        Ok(position)
    }

    /// Move a cell to a new position, returning `(from, to)`
    pub fn move_cell(&mut self, locator: CellLocator, to: usize) -> Result<(usize, usize)> {
        let from = self
            .position(locator)
            .ok_or(Error::StaleLocator(locator))?;
        if to >= self.cells.len() {
            return Err(Error::PositionOutOfBounds(to, self.cells.len()));
        }

        let cell = self.cells.remove(from);
        self.cells.insert(to, cell);
        self.revision += 1;
        Ok((from, to))
    }
}
