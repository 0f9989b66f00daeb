//! The app plugin contract
//!
//! An app turns a cell's serialized payload into a live instance
//! ([`App::prepare`]) and back ([`AppInstance::state`]). The instance keeps
//! whatever transient state it likes between the two; it is owned by a single
//! cell runtime and is never shared.
//!
//! Instances do not call back into the document. Instead,
//! [`AppInstance::handle`] returns [`AppEvent`]s which the document turns into
//! store mutations:
//!
//! ```text
//! AppInput --> AppInstance::handle --> AppEvent::StateChanged --> state() --> store
//!                                  \-> AppEvent::Verdict(proof) ------------> store
//! ```

use crate::error::PrepareResult;
use crate::view::View;
use cellbook_core::{LogicContext, Payload, ProofArtifact};
use std::fmt;

/// Everything an instance may look at when rendering or handling input
#[derive(Debug, Clone, Copy)]
pub struct AppProps<'a> {
    /// Whether this cell is the one currently being edited
    pub is_editable: bool,
    /// Context folded from the preceding cells
    pub context: &'a LogicContext,
    /// The cell's last verification result
    pub proof: Option<&'a ProofArtifact>,
}

impl<'a> AppProps<'a> {
    /// Props for a cell that is not being edited
    pub fn read_only(context: &'a LogicContext, proof: Option<&'a ProofArtifact>) -> Self {
        Self {
            is_editable: false,
            context,
            proof,
        }
    }

    /// Props for the cell being edited
    pub fn editable(context: &'a LogicContext, proof: Option<&'a ProofArtifact>) -> Self {
        Self {
            is_editable: true,
            context,
            proof,
        }
    }
}

/// User interaction delivered to an instance
#[derive(Debug, Clone, PartialEq)]
pub enum AppInput {
    /// Replace the instance's text content
    Text(String),
    /// Ask the instance to check itself against its context
    Verify,
    /// App-specific input
    Raw(Payload),
}

/// What an instance asks the document to do after handling input
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The instance changed; its [`state`](AppInstance::state) should be committed
    StateChanged,
    /// A verification outcome for this cell
    Verdict(ProofArtifact),
}

/// A live, stateful app instance bound to one cell
pub trait AppInstance: fmt::Debug {
    /// Project the instance back to its storage form
    fn state(&self) -> Payload;

    /// Render the instance
    fn view(&self, props: &AppProps<'_>) -> View;

    /// Handle user input
    fn handle(&mut self, input: &AppInput, props: &AppProps<'_>) -> Vec<AppEvent> {
        let _ = (input, props);
        Vec::new()
    }
}

/// An app type: how to build live instances from payloads
pub trait App: Send + Sync {
    /// Build a live instance from a committed payload
    fn prepare(&self, payload: &Payload) -> PrepareResult<Box<dyn AppInstance>>;

    /// Payload of a freshly inserted cell, also used in place of payloads
    /// that fail to prepare
    fn empty_state(&self) -> Payload;
}

/// Prepare function signature
pub type PrepareImpl = fn(&Payload) -> PrepareResult<Box<dyn AppInstance>>;

/// Empty-state function signature
pub type EmptyStateImpl = fn() -> Payload;

/// An app defined by a pair of plain functions
#[derive(Debug, Clone, Copy)]
pub struct AppDef {
    /// Implementation of [`App::prepare`]
    pub prepare: PrepareImpl,
    /// Implementation of [`App::empty_state`]
    pub empty_state: EmptyStateImpl,
}

impl App for AppDef {
    fn prepare(&self, payload: &Payload) -> PrepareResult<Box<dyn AppInstance>> {
        (self.prepare)(payload)
    }

    fn empty_state(&self) -> Payload {
        (self.empty_state)()
    }
}
