//! Prelude module - common imports for cellbook users
//!
//! ```rust
//! use cellbook::prelude::*;
//! ```

pub use crate::{
    // App contract
    App,
    AppDef,
    AppEvent,
    AppInput,
    AppInstance,
    AppProps,
    AppRegistry,
    // Data model
    Cell,
    CellLocator,
    CellWarning,
    DocumentRef,
    // I/O
    DocumentSource,
    // Error types
    Error,
    Fetched,
    FileSource,
    LogicContext,
    Payload,
    ProofArtifact,
    RenderedCell,
    Result,
    // Main types
    Sheet,
    SheetOptions,
    SyncClient,
    View,
};
