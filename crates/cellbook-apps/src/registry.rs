//! App registry

use crate::app::{App, AppDef};
use crate::builtin::{claim, note};
use crate::fallback::UnsupportedApp;
use ahash::AHashMap;
use std::sync::Arc;

/// Maps cell type names to apps
///
/// Type names are persisted in documents, so lookups are case-sensitive.
#[derive(Clone, Default)]
pub struct AppRegistry {
    apps: AHashMap<String, Arc<dyn App>>,
}

impl AppRegistry {
    /// Create a new registry with all built-in apps
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_apps();
        registry
    }

    /// Create a registry with no apps
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register an app under `type_name`, replacing any previous one
    pub fn register(&mut self, type_name: impl Into<String>, app: impl App + 'static) {
        let type_name = type_name.into();
        if self
            .apps
            .insert(type_name.clone(), Arc::new(app))
            .is_some()
        {
            tracing::debug!("Replaced app registered for type {type_name:?}");
        }
    }

    /// Look up an app by type name
    pub fn get(&self, type_name: &str) -> Option<Arc<dyn App>> {
        self.apps.get(type_name).cloned()
    }

    /// Look up an app, falling back to [`UnsupportedApp`] for unknown names
    pub fn lookup(&self, type_name: &str) -> Arc<dyn App> {
        self.get(type_name)
            .unwrap_or_else(|| Arc::new(UnsupportedApp::new(type_name)))
    }

    /// Check if an app is registered for `type_name`
    pub fn contains(&self, type_name: &str) -> bool {
        self.apps.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.apps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn register_builtin_apps(&mut self) {
        // Free-form text
        self.register(
            note::TYPE_NAME,
            AppDef {
                prepare: note::prepare,
                empty_state: note::empty_state,
            },
        );

        // Statement checked against the preceding cells
        self.register(
            claim::TYPE_NAME,
            AppDef {
                prepare: claim::prepare,
                empty_state: claim::empty_state,
            },
        );
    }
}

impl std::fmt::Debug for AppRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRegistry")
            .field("type_names", &self.type_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppProps;
    use crate::view::View;
    use cellbook_core::{LogicContext, Payload};
    use serde_json::json;

    #[test]
    fn test_builtin_apps() {
        let registry = AppRegistry::new();
        assert_eq!(registry.type_names(), vec!["claim", "note"]);
        assert!(registry.contains("note"));
        assert!(!registry.contains("Note"));
    }

    #[test]
    fn test_lookup_falls_back() {
        let registry = AppRegistry::empty();
        assert!(registry.get("quiz").is_none());

        let app = registry.lookup("quiz");
        let instance = app.prepare(&json!(null)).unwrap();
        let context = LogicContext::empty();

        assert_eq!(instance.state(), Payload::Null);
        assert_eq!(
            instance.view(&AppProps::read_only(&context, None)),
            View::Unsupported {
                type_name: "quiz".into()
            }
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = AppRegistry::new();
        registry.register("note", UnsupportedApp::new("note"));
        let app = registry.lookup("note");
        assert_eq!(app.empty_state(), Payload::Null);
    }
}
