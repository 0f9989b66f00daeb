//! Worksheet documents
//!
//! [`Sheet`] ties the pieces together: it owns the [`CellStore`], the
//! context cache and the session's live instances, and routes every change
//! through one pipeline:
//!
//! ```text
//! edit / verdict / insert / delete --> store mutation --> invalidate contexts after it
//! ```
//!
//! # Example
//!
//! ```rust
//! use cellbook::prelude::*;
//! use serde_json::json;
//!
//! let mut sheet = Sheet::new(AppRegistry::new());
//! let premise = sheet.insert_cell_with(0, "note", json!("p"));
//! let claim = sheet.insert_cell_with(1, "claim", json!({ "statement": "p" }));
//!
//! sheet.handle_input(claim, &AppInput::Verify).unwrap();
//! assert!(sheet.cell(claim).unwrap().is_proven());
//!
//! let context = sheet.context(claim).unwrap();
//! assert_eq!(context.last().unwrap().locator, premise);
//! ```

use crate::context::ContextDeriver;
use crate::error::Result;
use crate::options::SheetOptions;
use crate::runtime::{AppCell, CellWarning, Session};
use crate::verdict;
use cellbook_apps::{AppEvent, AppInput, AppProps, AppRegistry, View};
use cellbook_core::{Cell, CellLocator, CellStore, LogicContext, Payload, ProofArtifact};
use std::sync::Arc;

/// A rendered cell
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub locator: CellLocator,
    pub type_name: String,
    /// Whether this is the cell being edited
    pub is_editable: bool,
    /// Problem noticed while preparing the cell, if any
    pub warning: Option<CellWarning>,
    pub view: View,
}

/// An open worksheet document and its rendering session
#[derive(Debug)]
pub struct Sheet {
    registry: Arc<AppRegistry>,
    store: CellStore,
    deriver: ContextDeriver,
    session: Session,
    /// The one cell currently open for editing
    editing: Option<CellLocator>,
    /// Store revision at the last save or load
    saved_revision: u64,
    options: SheetOptions,
}

impl Sheet {
    /// Create an empty document
    pub fn new(registry: impl Into<Arc<AppRegistry>>) -> Self {
        Self::with_options(registry, SheetOptions::default())
    }

    /// Create an empty document with custom options
    pub fn with_options(registry: impl Into<Arc<AppRegistry>>, options: SheetOptions) -> Self {
        let store = CellStore::new();
        Self {
            registry: registry.into(),
            deriver: ContextDeriver::new(&store, options.memoize_contexts),
            saved_revision: store.revision(),
            store,
            session: Session::new(),
            editing: None,
            options,
        }
    }

    /// Open a document from loaded cells
    pub fn from_cells(
        registry: impl Into<Arc<AppRegistry>>,
        cells: Vec<Cell>,
        options: SheetOptions,
    ) -> Result<Self> {
        let mut sheet = Self::with_options(registry, options);
        sheet.reload(cells)?;
        Ok(sheet)
    }

    /// The app registry
    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    /// The options
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// The underlying store
    pub fn store(&self) -> &CellStore {
        &self.store
    }

    /// All cells in document order
    pub fn cells(&self) -> &[Cell] {
        self.store.ordered_cells()
    }

    /// Get the number of cells
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the document has no cells
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get a committed cell
    pub fn cell(&self, locator: CellLocator) -> Result<&Cell> {
        Ok(self.store.cell(locator)?)
    }

    /// Current position of a cell
    pub fn position(&self, locator: CellLocator) -> Option<usize> {
        self.store.position(locator)
    }

    // ==================== Structure ====================

    /// Insert a cell of `type_name` holding the app's empty state
    ///
    /// Unknown type names are accepted; the cell renders as unsupported.
    ///
    /// # Panics
    ///
    /// Panics if `at` is greater than the number of cells.
    pub fn insert_cell(&mut self, at: usize, type_name: &str) -> CellLocator {
        let payload = self.registry.lookup(type_name).empty_state();
        self.insert_cell_with(at, type_name, payload)
    }

    /// Insert a cell of the default app type
    ///
    /// # Panics
    ///
    /// Panics if `at` is greater than the number of cells.
    pub fn insert_default_cell(&mut self, at: usize) -> CellLocator {
        let type_name = self.options.default_app.clone();
        self.insert_cell(at, &type_name)
    }

    /// Insert a cell with an explicit payload
    ///
    /// # Panics
    ///
    /// Panics if `at` is greater than the number of cells.
    pub fn insert_cell_with(&mut self, at: usize, type_name: &str, payload: Payload) -> CellLocator {
        let locator = self.store.insert_cell(at, type_name, payload);
        self.deriver.invalidate_from(&self.store, at);
        tracing::debug!("Inserted {type_name} cell {locator} at {at}");
        locator
    }

    /// Append a cell of `type_name` holding the app's empty state
    pub fn push_cell(&mut self, type_name: &str) -> CellLocator {
        self.insert_cell(self.store.len(), type_name)
    }

    /// Delete a cell and release its live instance
    ///
    /// Returns the removed cell, or `None` if it was already gone.
    pub fn delete_cell(&mut self, locator: CellLocator) -> Option<Cell> {
        let (position, cell) = match self.store.delete_cell(locator) {
            Ok(removed) => removed,
            Err(err) => {
                tracing::debug!("Ignoring delete: {err}");
                return None;
            }
        };

        self.session.destroy(locator);
        self.deriver.invalidate_from(&self.store, position);
        self.deriver.forget(locator);
        if self.editing == Some(locator) {
            self.editing = None;
        }
        tracing::debug!("Deleted cell {locator} from {position}");
        Some(cell)
    }

    /// Move a cell to a new position
    pub fn move_cell(&mut self, locator: CellLocator, to: usize) -> Result<()> {
        let (from, to) = self.store.move_cell(locator, to)?;
        self.deriver.invalidate_from(&self.store, from.min(to));
        Ok(())
    }

    // ==================== Editing ====================

    /// Open a cell for editing; any other cell stops being editable
    pub fn begin_editing(&mut self, locator: CellLocator) -> Result<()> {
        self.store.cell(locator)?;
        self.editing = Some(locator);
        Ok(())
    }

    /// Close the cell being edited
    pub fn end_editing(&mut self) {
        self.editing = None;
    }

    /// The cell being edited
    pub fn editing(&self) -> Option<CellLocator> {
        self.editing
    }

    /// Replace a cell's payload from outside its live instance
    ///
    /// This is the path for undo, reloads and remote changes: the cell's
    /// live instance may not match the new payload, so it is discarded and
    /// prepared again on next render. Returns `false` if the cell no longer
    /// exists.
    pub fn replace_payload(&mut self, locator: CellLocator, payload: Payload) -> bool {
        match self.store.replace_payload(locator, payload) {
            Ok(position) => {
                self.session.reload(locator);
                self.deriver.invalidate_from(&self.store, position + 1);
                true
            }
            Err(err) => {
                tracing::debug!("Ignoring payload replacement: {err}");
                false
            }
        }
    }

    /// Commit the live instance's state to the store
    ///
    /// This is the edit path: the instance produced the new payload, so it
    /// stays live. Returns `false` if the cell has no committable instance
    /// or no longer exists.
    pub fn commit_instance_state(&mut self, locator: CellLocator) -> bool {
        let Some(state) = self.session.get(locator).and_then(AppCell::current_state) else {
            return false;
        };
        match self.store.replace_payload(locator, state) {
            Ok(position) => {
                self.deriver.invalidate_from(&self.store, position + 1);
                true
            }
            Err(err) => {
                tracing::debug!("Ignoring edit: {err}");
                false
            }
        }
    }

    /// Store a verification outcome for a cell
    ///
    /// Replaces any earlier outcome. Returns `false` if the cell no longer
    /// exists.
    pub fn submit_verdict(&mut self, locator: CellLocator, outcome: ProofArtifact) -> bool {
        verdict::submit_verdict(&mut self.store, &mut self.deriver, locator, Some(outcome))
    }

    /// Remove a cell's verification outcome
    pub fn clear_verdict(&mut self, locator: CellLocator) -> bool {
        verdict::submit_verdict(&mut self.store, &mut self.deriver, locator, None)
    }

    // ==================== Rendering ====================

    /// Context visible at a cell
    pub fn context(&mut self, locator: CellLocator) -> Result<LogicContext> {
        Ok(self.deriver.context(&self.store, locator)?)
    }

    /// Render one cell, preparing its instance on first use
    pub fn render(&mut self, locator: CellLocator) -> Result<RenderedCell> {
        let context = self.deriver.context(&self.store, locator)?;
        let cell = self.store.cell(locator)?;
        let is_editable = self.editing == Some(locator);
        let props = AppProps {
            is_editable,
            context: &context,
            proof: cell.proof.as_ref(),
        };

        let app_cell = self.session.entry(locator);
        let view = app_cell.render(&self.registry, cell, &props);

        Ok(RenderedCell {
            locator,
            type_name: cell.type_name.clone(),
            is_editable,
            warning: app_cell.warning().cloned(),
            view,
        })
    }

    /// Render every cell in document order
    ///
    /// A cell with an unknown type or unreadable data renders with a warning;
    /// it never prevents the other cells from rendering.
    pub fn render_all(&mut self) -> Vec<RenderedCell> {
        let locators: Vec<CellLocator> = self.store.locators().collect();
        locators
            .into_iter()
            .filter_map(|locator| self.render(locator).ok())
            .collect()
    }

    /// Deliver user input to a cell and apply the events it produces
    ///
    /// [`AppEvent::StateChanged`] commits the instance's state;
    /// [`AppEvent::Verdict`] stores the verdict. The events are returned.
    pub fn handle_input(&mut self, locator: CellLocator, input: &AppInput) -> Result<Vec<AppEvent>> {
        let context = self.deriver.context(&self.store, locator)?;
        let cell = self.store.cell(locator)?;
        let props = AppProps {
            is_editable: self.editing == Some(locator),
            context: &context,
            proof: cell.proof.as_ref(),
        };
        let events = self
            .session
            .entry(locator)
            .handle(&self.registry, cell, input, &props);

        for event in &events {
            match event {
                AppEvent::StateChanged => {
                    self.commit_instance_state(locator);
                }
                AppEvent::Verdict(outcome) => {
                    self.submit_verdict(locator, outcome.clone());
                }
            }
        }
        Ok(events)
    }

    /// Whether a cell currently holds a live instance
    pub fn is_live(&self, locator: CellLocator) -> bool {
        self.session.get(locator).map_or(false, AppCell::is_live)
    }

    /// How many instances have been prepared for a cell this session
    pub fn preparations(&self, locator: CellLocator) -> usize {
        self.session.get(locator).map_or(0, AppCell::preparations)
    }

    /// End the rendering session, releasing every live instance
    pub fn end_session(&mut self) {
        self.session.clear();
        self.editing = None;
    }

    // ==================== Persistence ====================

    /// Replace the whole document with loaded cells
    ///
    /// The cells are validated before anything changes; on error the current
    /// document is kept as it was.
    pub fn reload(&mut self, cells: Vec<Cell>) -> Result<()> {
        let store = CellStore::from_cells(cells)?;
        tracing::debug!("Reloading document with {} cells", store.len());

        self.store = store;
        self.session.clear();
        self.deriver.reset(&self.store);
        self.editing = None;
        self.saved_revision = self.store.revision();
        Ok(())
    }

    /// Copy of the committed cells, for saving
    pub fn snapshot(&self) -> Vec<Cell> {
        self.store.ordered_cells().to_vec()
    }

    /// Current store revision
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Record that the document was saved as of `revision`
    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = revision;
    }

    /// Whether there are changes since the last save or load
    pub fn is_dirty(&self) -> bool {
        self.store.revision() != self.saved_revision
    }
}
