//! Worksheet options

/// Options for a [`Sheet`](crate::Sheet)
#[derive(Debug, Clone)]
pub struct SheetOptions {
    /// Cache derived contexts per cell (default: true)
    ///
    /// Disabling the cache recomputes every context from scratch; results are
    /// identical either way.
    pub memoize_contexts: bool,
    /// App type used for cells inserted without an explicit type (default: "note")
    pub default_app: String,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            memoize_contexts: true,
            default_app: cellbook_apps::builtin::note::TYPE_NAME.to_string(),
        }
    }
}
