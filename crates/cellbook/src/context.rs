//! Memoized context derivation
//!
//! [`LogicContext::derive`] is the definition; [`ContextDeriver`] is a cache
//! in front of it. A cached context for a cell stays valid until a cell at
//! or before it changes, so every store mutation is followed by
//! [`ContextDeriver::invalidate_from`] with the first position whose context
//! may differ.
//!
//! The deriver also remembers which store revision its cache matches. If the
//! store moved on by more than the one mutation it was told about, the whole
//! cache is dropped rather than trusted.

use ahash::AHashMap;
use cellbook_core::{CellLocator, CellStore, Error, LogicContext, Result};

/// Per-cell cache of derived contexts
#[derive(Debug, Default)]
pub struct ContextDeriver {
    /// Locator → context visible at that cell
    cache: AHashMap<CellLocator, LogicContext>,
    /// Store revision the cache is consistent with
    revision: u64,
    /// Whether to cache at all
    memoize: bool,
}

impl ContextDeriver {
    /// Create a deriver for `store`
    pub fn new(store: &CellStore, memoize: bool) -> Self {
        Self {
            cache: AHashMap::new(),
            revision: store.revision(),
            memoize,
        }
    }

    /// Context visible at `locator`
    ///
    /// Fails with a stale-locator error if the cell does not exist.
    pub fn context(&mut self, store: &CellStore, locator: CellLocator) -> Result<LogicContext> {
        if !self.memoize {
            return LogicContext::derive(store.ordered_cells(), locator);
        }

        self.reconcile(store);

        let cells = store.ordered_cells();
        let position = store
            .position(locator)
            .ok_or(Error::StaleLocator(locator))?;

        if let Some(context) = self.cache.get(&locator) {
            tracing::trace!("Context cache hit for {locator}");
            return Ok(context.clone());
        }

        // Resume from the nearest cached predecessor
        let (start, mut context) = (0..position)
            .rev()
            .find_map(|i| {
                self.cache
                    .get(&cells[i].locator)
                    .map(|context| (i, context.clone()))
            })
            .unwrap_or_else(|| (0, LogicContext::empty()));

        tracing::debug!(
            "Deriving context for {locator}: folding cells {}..{}",
            start,
            position
        );

        for cell in &cells[start..position] {
            self.cache
                .entry(cell.locator)
                .or_insert_with(|| context.clone());
            context = context.fold(cell);
        }
        self.cache.insert(locator, context.clone());

        Ok(context)
    }

    /// Drop cached contexts of the cells at `position` and after
    ///
    /// Call once after each store mutation.
    pub fn invalidate_from(&mut self, store: &CellStore, position: usize) {
        if store.revision() != self.revision.wrapping_add(1) {
            self.reset(store);
            return;
        }

        for cell in store.ordered_cells().iter().skip(position) {
            self.cache.remove(&cell.locator);
        }
        self.revision = store.revision();
    }

    /// Drop the cached context of a cell that no longer exists
    pub fn forget(&mut self, locator: CellLocator) {
        self.cache.remove(&locator);
    }

    /// Drop everything and resynchronize with `store`
    pub fn reset(&mut self, store: &CellStore) {
        if !self.cache.is_empty() {
            tracing::debug!("Dropping {} cached contexts", self.cache.len());
        }
        self.cache.clear();
        self.revision = store.revision();
    }

    /// Number of cached contexts
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn reconcile(&mut self, store: &CellStore) {
        if store.revision() != self.revision {
            tracing::debug!(
                "Store revision {} does not match cache revision {}",
                store.revision(),
                self.revision
            );
            self.reset(store);
        }
    }
}
