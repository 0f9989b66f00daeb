//! End-to-end tests for worksheet editing, contexts and app lifecycles

use cellbook::prelude::*;
use cellbook::{PrepareResult, RenderedCell};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// App that counts how often it was prepared
struct Counting {
    prepared: Arc<AtomicUsize>,
}

#[derive(Debug)]
struct CountingInstance {
    value: Payload,
}

impl App for Counting {
    fn prepare(&self, payload: &Payload) -> PrepareResult<Box<dyn AppInstance>> {
        self.prepared.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingInstance {
            value: payload.clone(),
        }))
    }

    fn empty_state(&self) -> Payload {
        json!(0)
    }
}

impl AppInstance for CountingInstance {
    fn state(&self) -> Payload {
        self.value.clone()
    }

    fn view(&self, props: &AppProps<'_>) -> View {
        View::Text(format!("{} after {} cells", self.value, props.context.len()))
    }

    fn handle(&mut self, input: &AppInput, _props: &AppProps<'_>) -> Vec<AppEvent> {
        match input {
            AppInput::Raw(value) => {
                self.value = value.clone();
                vec![AppEvent::StateChanged]
            }
            _ => Vec::new(),
        }
    }
}

fn counting_sheet() -> (Sheet, Arc<AtomicUsize>) {
    let prepared = Arc::new(AtomicUsize::new(0));
    let mut registry = AppRegistry::new();
    registry.register(
        "counter",
        Counting {
            prepared: prepared.clone(),
        },
    );
    (Sheet::new(registry), prepared)
}

/// Insert A, insert B after it, edit A: B's context follows
#[test]
fn test_edit_flows_into_later_context() {
    let mut sheet = Sheet::new(AppRegistry::new());
    let a = sheet.insert_cell(0, "note");
    assert!(sheet.context(a).unwrap().is_empty());

    let b = sheet.insert_cell(1, "note");
    let before = sheet.context(b).unwrap();
    let expected = LogicContext::empty().fold(sheet.cell(a).unwrap());
    assert_eq!(before, expected);

    sheet.begin_editing(a).unwrap();
    sheet.handle_input(a, &AppInput::Text("x".into())).unwrap();

    let after = sheet.context(b).unwrap();
    assert_ne!(after, before);
    assert_eq!(after.texts().collect::<Vec<_>>(), vec!["x"]);
    assert!(sheet.context(a).unwrap().is_empty());
}

/// A type with no registered app renders the fallback and holds null
#[test]
fn test_unknown_type_renders_fallback() {
    let mut sheet = Sheet::new(AppRegistry::new());
    let quiz = sheet.push_cell("quiz");

    let rendered = sheet.render(quiz).unwrap();
    assert_eq!(
        rendered.view,
        View::Unsupported {
            type_name: "quiz".into()
        }
    );
    assert_eq!(
        rendered.warning,
        Some(CellWarning::UnknownAppType("quiz".into()))
    );
    assert_eq!(sheet.cell(quiz).unwrap().payload, Payload::Null);
}

/// Stored data of an unknown type is kept as-is
#[test]
fn test_unknown_type_keeps_payload() {
    let quiz = Cell::new(CellLocator::from_raw(4), "quiz", json!({"questions": [1]}));
    let mut sheet =
        Sheet::from_cells(AppRegistry::new(), vec![quiz.clone()], SheetOptions::default()).unwrap();

    sheet.begin_editing(quiz.locator).unwrap();
    sheet
        .handle_input(quiz.locator, &AppInput::Text("x".into()))
        .unwrap();
    assert!(!sheet.commit_instance_state(quiz.locator));
    assert_eq!(sheet.snapshot(), vec![quiz]);
}

/// A malformed payload renders the empty state with a warning
#[test]
fn test_malformed_payload_renders_with_warning() {
    let bad = Cell::new(CellLocator::from_raw(0), "note", json!({"not": "a string"}));
    let good = Cell::new(CellLocator::from_raw(1), "note", json!("fine"));
    let mut sheet = Sheet::from_cells(
        AppRegistry::new(),
        vec![bad.clone(), good.clone()],
        SheetOptions::default(),
    )
    .unwrap();

    let rendered: Vec<RenderedCell> = sheet.render_all();
    assert_eq!(rendered.len(), 2);
    assert!(matches!(
        rendered[0].warning,
        Some(CellWarning::MalformedPayload { .. })
    ));
    assert!(matches!(rendered[0].view, View::Warning { .. }));
    assert_eq!(rendered[1].view, View::Text("fine".into()));

    // Nothing is written back until the user edits the cell
    assert_eq!(sheet.cell(bad.locator).unwrap().payload, bad.payload);
    assert!(!sheet.is_dirty());
}

/// Editing a cell never changes contexts at or before it
#[test]
fn test_edit_leaves_earlier_contexts() {
    let mut sheet = Sheet::new(AppRegistry::new());
    let cells: Vec<CellLocator> = (0..5)
        .map(|i| sheet.insert_cell_with(i, "note", json!(format!("n{i}"))))
        .collect();
    let before: Vec<LogicContext> = cells.iter().map(|&c| sheet.context(c).unwrap()).collect();

    assert!(sheet.replace_payload(cells[2], json!("changed")));

    for (i, &c) in cells.iter().enumerate() {
        let context = sheet.context(c).unwrap();
        if i <= 2 {
            assert_eq!(context, before[i]);
        } else {
            assert_ne!(context, before[i]);
            assert_eq!(context.get(cells[2]).unwrap().payload, json!("changed"));
        }
    }
}

/// After deleting a cell, later contexts are as if it never existed
#[test]
fn test_delete_leaves_no_trace() {
    let mut sheet = Sheet::new(AppRegistry::new());
    let a = sheet.insert_cell_with(0, "note", json!("a"));
    let b = sheet.insert_cell_with(1, "claim", json!({"statement": "a"}));
    let c = sheet.insert_cell_with(2, "note", json!("c"));
    sheet.handle_input(b, &AppInput::Verify).unwrap();
    sheet.render_all();
    assert!(sheet.context(c).unwrap().get(b).is_some());

    sheet.delete_cell(b).unwrap();

    let without_b = vec![sheet.cell(a).unwrap().clone(), sheet.cell(c).unwrap().clone()];
    assert_eq!(
        sheet.context(c).unwrap(),
        LogicContext::derive(&without_b, c).unwrap()
    );
    assert!(!sheet.is_live(b));
    assert!(sheet.render(b).unwrap_err().is_stale_locator());
}

/// A verdict is visible to the next cell and a later one replaces it
#[test]
fn test_verdict_visible_and_superseded() {
    let mut sheet = Sheet::new(AppRegistry::new());
    let claim = sheet.insert_cell_with(0, "claim", json!({"statement": "q"}));
    let next = sheet.push_cell("note");

    sheet.handle_input(claim, &AppInput::Verify).unwrap();
    let seen = sheet.context(next).unwrap();
    assert_eq!(seen.get(claim).unwrap().proof.as_ref().map(|p| p.verdict), Some(false));

    sheet.submit_verdict(claim, ProofArtifact::new(true));
    let seen = sheet.context(next).unwrap();
    assert_eq!(seen.get(claim).unwrap().proof, Some(ProofArtifact::new(true)));
    assert_eq!(seen.proven().count(), 1);

    sheet.clear_verdict(claim);
    assert!(sheet.context(next).unwrap().get(claim).unwrap().proof.is_none());
}

/// Proven claims support later claims with the same statement
#[test]
fn test_claims_chain() {
    let mut sheet = Sheet::new(AppRegistry::new());
    let premise = sheet.insert_cell_with(0, "note", json!("p"));
    let first = sheet.insert_cell_with(1, "claim", json!({"statement": "p"}));
    let second = sheet.insert_cell_with(2, "claim", json!({"statement": "p"}));

    sheet.handle_input(first, &AppInput::Verify).unwrap();
    sheet.handle_input(second, &AppInput::Verify).unwrap();
    assert!(sheet.cell(second).unwrap().is_proven());

    // Without the note, the first claim fails and no longer supports the second
    sheet.delete_cell(premise);
    sheet.handle_input(first, &AppInput::Verify).unwrap();
    sheet.handle_input(second, &AppInput::Verify).unwrap();
    assert!(!sheet.cell(first).unwrap().is_proven());
    assert!(!sheet.cell(second).unwrap().is_proven());
}

/// Context and verdict changes reach the live instance through props only
#[test]
fn test_instance_survives_context_changes() {
    let (mut sheet, prepared) = counting_sheet();
    let first = sheet.insert_cell_with(0, "note", json!("a"));
    let counter = sheet.insert_cell_with(1, "counter", json!(1));

    assert_eq!(
        sheet.render(counter).unwrap().view,
        View::Text("1 after 1 cells".into())
    );
    assert_eq!(prepared.load(Ordering::SeqCst), 1);

    sheet.replace_payload(first, json!("b"));
    sheet.submit_verdict(counter, ProofArtifact::new(true));
    sheet.insert_cell_with(0, "note", json!("c"));

    assert_eq!(
        sheet.render(counter).unwrap().view,
        View::Text("1 after 2 cells".into())
    );
    assert_eq!(prepared.load(Ordering::SeqCst), 1);
    assert_eq!(sheet.preparations(counter), 1);
}

/// Edits keep the instance; external replacement re-prepares it
#[test]
fn test_external_replace_reprepares() {
    let (mut sheet, prepared) = counting_sheet();
    let counter = sheet.push_cell("counter");
    assert_eq!(sheet.cell(counter).unwrap().payload, json!(0));

    sheet.render(counter).unwrap();
    sheet.handle_input(counter, &AppInput::Raw(json!(5))).unwrap();
    assert_eq!(sheet.cell(counter).unwrap().payload, json!(5));
    assert_eq!(prepared.load(Ordering::SeqCst), 1);

    assert!(sheet.replace_payload(counter, json!(9)));
    assert!(!sheet.is_live(counter));
    assert_eq!(
        sheet.render(counter).unwrap().view,
        View::Text("9 after 0 cells".into())
    );
    assert_eq!(prepared.load(Ordering::SeqCst), 2);
}

/// Preparing from an instance's own state gives an equivalent instance
#[test]
fn test_state_round_trip() {
    let registry = AppRegistry::new();
    let context = LogicContext::empty();
    let props = AppProps::read_only(&context, None);

    for (type_name, payload) in [
        ("note", json!("some text")),
        ("claim", json!({"statement": "p"})),
    ] {
        let app = registry.lookup(type_name);
        let first = app.prepare(&payload).unwrap();
        let second = app.prepare(&first.state()).unwrap();
        assert_eq!(second.state(), first.state());
        assert_eq!(second.view(&props), first.view(&props));
    }
}

/// Ending the session drops every instance; the document remains
#[test]
fn test_end_session() {
    let (mut sheet, prepared) = counting_sheet();
    let counter = sheet.push_cell("counter");
    sheet.render(counter).unwrap();
    sheet.end_session();

    assert!(!sheet.is_live(counter));
    assert_eq!(sheet.len(), 1);
    sheet.render(counter).unwrap();
    assert_eq!(prepared.load(Ordering::SeqCst), 2);
}
