//! # cellbook-apps
//!
//! App plugins for cellbook worksheets.
//!
//! This crate provides:
//! - The plugin contract ([`App`], [`AppInstance`], [`AppProps`], [`AppEvent`])
//! - The [`AppRegistry`] mapping type names to apps
//! - The fallback for unknown type names ([`UnsupportedApp`])
//! - Built-in apps (`note`, `claim`)
//!
//! ## Example
//!
//! ```rust
//! use cellbook_apps::{AppProps, AppRegistry, View};
//! use cellbook_core::LogicContext;
//! use serde_json::json;
//!
//! let registry = AppRegistry::new();
//! let app = registry.lookup("note");
//! let instance = app.prepare(&json!("hello")).unwrap();
//!
//! let context = LogicContext::empty();
//! let view = instance.view(&AppProps::read_only(&context, None));
//! assert_eq!(view, View::Text("hello".into()));
//! assert_eq!(instance.state(), json!("hello"));
//! ```

pub mod app;
pub mod builtin;
pub mod error;
pub mod fallback;
pub mod registry;
pub mod view;

pub use app::{App, AppDef, AppEvent, AppInput, AppInstance, AppProps, EmptyStateImpl, PrepareImpl};
pub use error::{PrepareError, PrepareResult};
pub use fallback::UnsupportedApp;
pub use registry::AppRegistry;
pub use view::View;
