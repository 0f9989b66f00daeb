//! Verdict propagation
//!
//! A verdict is stored in exactly one place, the cell's `proof`. Because
//! contexts fold over proofs as well as payloads, every cell after the
//! verified one sees a different context afterwards; their cached contexts
//! are dropped and rebuilt on next read.

use crate::context::ContextDeriver;
use cellbook_core::{CellLocator, CellStore, ProofArtifact};

/// Replace the proof of `locator` and invalidate its dependents
///
/// A later submission for the same cell replaces the earlier one outright.
/// Returns `false` (and changes nothing) if the cell no longer exists.
pub fn submit_verdict(
    store: &mut CellStore,
    deriver: &mut ContextDeriver,
    locator: CellLocator,
    outcome: Option<ProofArtifact>,
) -> bool {
    match store.set_proof(locator, outcome) {
        Ok(position) => {
            deriver.invalidate_from(store, position + 1);
            true
        }
        Err(err) => {
            tracing::debug!("Ignoring verdict: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_later_verdict_supersedes() {
        let mut store = CellStore::new();
        let a = store.insert_cell(0, "claim", json!({"statement": "p"}));
        let b = store.insert_cell(1, "note", json!(""));
        let mut deriver = ContextDeriver::new(&store, true);

        let first = ProofArtifact::with_detail(true, json!({"premises": ["c9"]}));
        assert!(submit_verdict(&mut store, &mut deriver, a, Some(first)));
        let context = deriver.context(&store, b).unwrap();
        assert!(context.get(a).unwrap().is_proven());

        assert!(submit_verdict(
            &mut store,
            &mut deriver,
            a,
            Some(ProofArtifact::new(false))
        ));
        let context = deriver.context(&store, b).unwrap();
        assert_eq!(context.get(a).unwrap().proof, Some(ProofArtifact::new(false)));
    }

    #[test]
    fn test_stale_verdict_is_ignored() {
        let mut store = CellStore::new();
        let a = store.insert_cell(0, "claim", json!({}));
        store.delete_cell(a).unwrap();
        let mut deriver = ContextDeriver::new(&store, true);
        let revision = store.revision();

        assert!(!submit_verdict(
            &mut store,
            &mut deriver,
            a,
            Some(ProofArtifact::new(true))
        ));
        assert_eq!(store.revision(), revision);
    }
}
