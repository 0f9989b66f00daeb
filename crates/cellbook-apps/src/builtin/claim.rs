//! `claim` - a statement checked against the preceding cells
//!
//! Payload: `{"statement": "..."}`.
//!
//! On [`AppInput::Verify`] the claim holds if some earlier cell supports it:
//! a note with the same text, or an earlier claim with the same statement
//! that has itself been proved. The verdict detail lists the supporting
//! cells as `{"premises": ["c0", ...]}`.

use crate::app::{AppEvent, AppInput, AppInstance, AppProps};
use crate::error::{PrepareError, PrepareResult};
use crate::view::View;
use cellbook_core::{LogicContext, Payload, ProofArtifact};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Type name of the claim app
pub const TYPE_NAME: &str = "claim";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ClaimState {
    statement: String,
}

/// Empty claim
pub fn empty_state() -> Payload {
    json!({ "statement": "" })
}

/// Prepare a claim instance
pub fn prepare(payload: &Payload) -> PrepareResult<Box<dyn AppInstance>> {
    if !payload.is_object() {
        return Err(PrepareError::malformed("object", payload));
    }
    let state: ClaimState =
        serde_json::from_value(payload.clone()).map_err(|e| PrepareError::Invalid(e.to_string()))?;
    Ok(Box::new(Claim { state }))
}

/// Statement text of a claim payload, if it is one
pub fn statement(payload: &Payload) -> Option<&str> {
    payload.get("statement").and_then(Payload::as_str)
}

#[derive(Debug)]
struct Claim {
    state: ClaimState,
}

impl Claim {
    fn check(&self, context: &LogicContext) -> ProofArtifact {
        let statement = self.state.statement.trim();
        if statement.is_empty() {
            return ProofArtifact::with_detail(false, json!({ "reason": "empty statement" }));
        }

        let premises: Vec<String> = context
            .entries()
            .iter()
            .filter(|entry| match entry.type_name.as_str() {
                super::note::TYPE_NAME => entry.payload.as_str().map(str::trim) == Some(statement),
                TYPE_NAME => {
                    entry.is_proven() && statement_matches(&entry.payload, statement)
                }
                _ => false,
            })
            .map(|entry| entry.locator.to_string())
            .collect();

        ProofArtifact::with_detail(!premises.is_empty(), json!({ "premises": premises }))
    }
}

fn statement_matches(payload: &Payload, statement: &str) -> bool {
    self::statement(payload).map(str::trim) == Some(statement)
}

impl AppInstance for Claim {
    fn state(&self) -> Payload {
        json!({ "statement": self.state.statement })
    }

    fn view(&self, props: &AppProps<'_>) -> View {
        let label = match props.proof {
            Some(p) if p.verdict => "follows from the cells above",
            Some(_) => "does not follow from the cells above",
            None => "not checked yet",
        };
        View::Column(vec![
            View::Text(self.state.statement.clone()),
            View::Status {
                verdict: props.proof.map(|p| p.verdict),
                label: label.into(),
            },
        ])
    }

    fn handle(&mut self, input: &AppInput, props: &AppProps<'_>) -> Vec<AppEvent> {
        match input {
            AppInput::Verify => vec![AppEvent::Verdict(self.check(props.context))],
            AppInput::Text(text) if props.is_editable && *text != self.state.statement => {
                self.state.statement = text.clone();
                vec![AppEvent::StateChanged]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellbook_core::{Cell, CellLocator};
    use pretty_assertions::assert_eq;

    fn context_of(cells: &[Cell]) -> LogicContext {
        cells
            .iter()
            .fold(LogicContext::empty(), |context, cell| context.fold(cell))
    }

    fn verify(statement: &str, context: &LogicContext) -> ProofArtifact {
        let mut claim = prepare(&json!({ "statement": statement })).unwrap();
        match claim
            .handle(&AppInput::Verify, &AppProps::read_only(context, None))
            .pop()
        {
            Some(AppEvent::Verdict(proof)) => proof,
            other => panic!("expected a verdict, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_rejects_other_shapes() {
        assert!(prepare(&json!("p")).is_err());
        assert!(prepare(&json!({ "statement": 5 })).is_err());
        assert!(prepare(&json!({})).is_ok());
    }

    #[test]
    fn test_supported_by_note() {
        let context = context_of(&[
            Cell::new(CellLocator::from_raw(0), "note", json!("p")),
            Cell::new(CellLocator::from_raw(1), "note", json!("q")),
        ]);

        let proof = verify("q", &context);
        assert!(proof.verdict);
        assert_eq!(proof.detail, Some(json!({ "premises": ["c1"] })));

        assert!(!verify("r", &context).verdict);
    }

    #[test]
    fn test_supported_only_by_proven_claims() {
        let mut earlier = Cell::new(CellLocator::from_raw(0), "claim", json!({ "statement": "p" }));
        let context = context_of(&[earlier.clone()]);
        assert!(!verify("p", &context).verdict);

        earlier.proof = Some(ProofArtifact::new(true));
        let context = context_of(&[earlier]);
        assert!(verify("p", &context).verdict);
    }

    #[test]
    fn test_empty_statement_is_refuted() {
        let proof = verify("  ", &LogicContext::empty());
        assert!(!proof.verdict);
    }

    #[test]
    fn test_view_reflects_proof() {
        let claim = prepare(&json!({ "statement": "p" })).unwrap();
        let context = LogicContext::empty();
        let proof = ProofArtifact::new(true);

        let view = claim.view(&AppProps::read_only(&context, Some(&proof)));
        assert_eq!(view.to_string(), "p\n[proved] follows from the cells above");
    }
}
