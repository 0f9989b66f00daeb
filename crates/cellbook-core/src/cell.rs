//! Cell data
//!
//! A [`Cell`] is the committed, persisted state of one worksheet cell. Its
//! payload is opaque here; only the app registered for the cell's type knows
//! how to read it.

use crate::locator::CellLocator;
use serde::{Deserialize, Serialize};

/// Serialized app state stored in a cell
pub type Payload = serde_json::Value;

/// Verification result attached to a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofArtifact {
    /// Whether the cell's claim was verified
    pub verdict: bool,
    /// Optional structured detail produced by the checker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Payload>,
}

impl ProofArtifact {
    /// A verdict without detail
    pub fn new(verdict: bool) -> Self {
        Self {
            verdict,
            detail: None,
        }
    }

    /// A verdict with structured detail
    pub fn with_detail(verdict: bool, detail: Payload) -> Self {
        Self {
            verdict,
            detail: Some(detail),
        }
    }
}

/// One committed cell of a worksheet
///
/// Serialized as `{"id": 3, "type": "note", "data": ..., "proof": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Stable identity
    #[serde(rename = "id")]
    pub locator: CellLocator,
    /// Name of the app that interprets the payload
    #[serde(rename = "type")]
    pub type_name: String,
    /// Last committed app state
    #[serde(rename = "data", default)]
    pub payload: Payload,
    /// Last submitted verification result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<ProofArtifact>,
}

impl Cell {
    /// Create a cell without a proof
    pub fn new(locator: CellLocator, type_name: impl Into<String>, payload: Payload) -> Self {
        Self {
            locator,
            type_name: type_name.into(),
            payload,
            proof: None,
        }
    }

    /// Whether a proof has been attached and it verified
    pub fn is_proven(&self) -> bool {
        self.proof.as_ref().map_or(false, |p| p.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_document_field_names() {
        let mut cell = Cell::new(CellLocator::from_raw(3), "claim", json!({"statement": "p"}));
        cell.proof = Some(ProofArtifact::new(true));

        let value = serde_json::to_value(&cell).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 3,
                "type": "claim",
                "data": {"statement": "p"},
                "proof": {"verdict": true}
            })
        );
    }

    #[test]
    fn test_missing_data_and_proof() {
        let cell: Cell = serde_json::from_value(json!({"id": 1, "type": "note"})).unwrap();
        assert_eq!(cell.payload, Payload::Null);
        assert!(cell.proof.is_none());
        assert!(!cell.is_proven());
    }
}
