//! Cell runtime
//!
//! An [`AppCell`] owns the live app instance of one cell for one rendering
//! session:
//!
//! ```text
//!              first render                    external payload replacement
//! Unprepared ---------------> Live ------------------------------------------> Unprepared
//!                             |  ^
//!                             |  | edits: state() is committed, instance kept
//!                             +--+
//! ```
//!
//! Removing the cell from the [`Session`] drops the instance. Instances are
//! never re-prepared because the context or the proof changed; only the
//! committed payload is an input to `prepare`.

use ahash::AHashMap;
use cellbook_apps::{
    App, AppEvent, AppInput, AppInstance, AppProps, AppRegistry, UnsupportedApp, View,
};
use cellbook_core::{Cell, CellLocator, Payload};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Non-fatal problem found while preparing a cell
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellWarning {
    /// No app is registered for the cell's type; the fallback is shown
    #[error("Unsupported app type: {0}")]
    UnknownAppType(String),

    /// The stored payload could not be prepared; the app's empty state is shown
    #[error("Stored data could not be read and was replaced by an empty {type_name}: {reason}")]
    MalformedPayload { type_name: String, reason: String },
}

/// Lifecycle state of an [`AppCell`]
pub enum CellState {
    /// No instance yet, or the previous one was discarded
    Unprepared,
    /// A prepared instance
    Live(LiveApp),
}

impl fmt::Debug for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellState::Unprepared => f.write_str("Unprepared"),
            CellState::Live(live) => f.debug_tuple("Live").field(&live.instance).finish(),
        }
    }
}

/// A prepared instance and what was noticed while preparing it
pub struct LiveApp {
    instance: Box<dyn AppInstance>,
    warning: Option<CellWarning>,
}

impl LiveApp {
    fn prepare(registry: &AppRegistry, cell: &Cell) -> Self {
        let app: Arc<dyn App> = match registry.get(&cell.type_name) {
            Some(app) => app,
            None => {
                tracing::warn!(
                    "Cell {} has unsupported app type {:?}",
                    cell.locator,
                    cell.type_name
                );
                return Self {
                    instance: UnsupportedApp::new(cell.type_name.as_str()).instance(),
                    warning: Some(CellWarning::UnknownAppType(cell.type_name.clone())),
                };
            }
        };

        match app.prepare(&cell.payload) {
            Ok(instance) => {
                tracing::debug!("Prepared {} instance for {}", cell.type_name, cell.locator);
                Self {
                    instance,
                    warning: None,
                }
            }
            Err(err) => {
                tracing::warn!(
                    "Cell {} has malformed {} payload: {}",
                    cell.locator,
                    cell.type_name,
                    err
                );
                let warning = CellWarning::MalformedPayload {
                    type_name: cell.type_name.clone(),
                    reason: err.to_string(),
                };
                let instance = app.prepare(&app.empty_state()).unwrap_or_else(|err| {
                    tracing::warn!(
                        "Empty state of app {:?} does not prepare: {}",
                        cell.type_name,
                        err
                    );
                    UnsupportedApp::new(cell.type_name.as_str()).instance()
                });
                Self {
                    instance,
                    warning: Some(warning),
                }
            }
        }
    }

    /// Warning raised while preparing, if any
    pub fn warning(&self) -> Option<&CellWarning> {
        self.warning.as_ref()
    }

    /// Whether the instance's state may be written back to the store
    fn is_committable(&self) -> bool {
        !matches!(self.warning, Some(CellWarning::UnknownAppType(_)))
    }
}

/// Runtime wrapper around one cell's live instance
#[derive(Debug)]
pub struct AppCell {
    locator: CellLocator,
    state: CellState,
    /// Number of times an instance was prepared for this cell
    preparations: usize,
}

impl AppCell {
    /// Create an unprepared runtime for a cell
    pub fn new(locator: CellLocator) -> Self {
        Self {
            locator,
            state: CellState::Unprepared,
            preparations: 0,
        }
    }

    /// The cell this runtime belongs to
    pub fn locator(&self) -> CellLocator {
        self.locator
    }

    /// Current lifecycle state
    pub fn state(&self) -> &CellState {
        &self.state
    }

    /// Whether an instance is held
    pub fn is_live(&self) -> bool {
        matches!(self.state, CellState::Live(_))
    }

    /// How many instances have been prepared for this cell in this session
    pub fn preparations(&self) -> usize {
        self.preparations
    }

    /// Warning raised while preparing the current instance
    pub fn warning(&self) -> Option<&CellWarning> {
        match &self.state {
            CellState::Live(live) => live.warning(),
            CellState::Unprepared => None,
        }
    }

    /// Prepare the instance from the committed cell unless already live
    pub fn ensure_live(&mut self, registry: &AppRegistry, cell: &Cell) -> &mut LiveApp {
        debug_assert_eq!(cell.locator, self.locator);
        if let CellState::Unprepared = self.state {
            self.state = CellState::Live(LiveApp::prepare(registry, cell));
            self.preparations += 1;
        }
        match &mut self.state {
            CellState::Live(live) => live,
            CellState::Unprepared => unreachable!("cell was prepared above"),
        }
    }

    /// Render the cell's view, preparing it first if needed
    pub fn render(&mut self, registry: &AppRegistry, cell: &Cell, props: &AppProps<'_>) -> View {
        let live = self.ensure_live(registry, cell);
        let view = live.instance.view(props);
        match &live.warning {
            Some(warning @ CellWarning::MalformedPayload { .. }) => {
                view.with_warning(warning.to_string())
            }
            _ => view,
        }
    }

    /// Deliver input to the instance, preparing it first if needed
    pub fn handle(
        &mut self,
        registry: &AppRegistry,
        cell: &Cell,
        input: &AppInput,
        props: &AppProps<'_>,
    ) -> Vec<AppEvent> {
        self.ensure_live(registry, cell).instance.handle(input, props)
    }

    /// Serializable state of the live instance
    ///
    /// `None` when there is no instance, or when the instance is the
    /// unsupported-type fallback whose state must never replace stored data.
    pub fn current_state(&self) -> Option<Payload> {
        match &self.state {
            CellState::Live(live) if live.is_committable() => Some(live.instance.state()),
            _ => None,
        }
    }

    /// Discard the instance; the next render prepares from the committed payload
    pub fn reload(&mut self) {
        if self.is_live() {
            tracing::debug!("Discarding live instance of {}", self.locator);
        }
        self.state = CellState::Unprepared;
    }
}

/// Arena of the live cells of one rendering session
///
/// Instances are owned here, keyed by locator, and released when their cell
/// is deleted or the session ends.
#[derive(Debug, Default)]
pub struct Session {
    cells: AHashMap<CellLocator, AppCell>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime for a cell, created unprepared on first use
    pub fn entry(&mut self, locator: CellLocator) -> &mut AppCell {
        self.cells
            .entry(locator)
            .or_insert_with(|| AppCell::new(locator))
    }

    /// Runtime for a cell, if it has one
    pub fn get(&self, locator: CellLocator) -> Option<&AppCell> {
        self.cells.get(&locator)
    }

    /// Force a cell to re-prepare on next render
    pub fn reload(&mut self, locator: CellLocator) {
        if let Some(cell) = self.cells.get_mut(&locator) {
            cell.reload();
        }
    }

    /// Release a deleted cell's instance
    pub fn destroy(&mut self, locator: CellLocator) -> bool {
        self.cells.remove(&locator).is_some()
    }

    /// Release every instance
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of cells with a runtime
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cell has a runtime
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
