//! `note` - free-form text
//!
//! Payload: a JSON string.

use crate::app::{AppEvent, AppInput, AppInstance, AppProps};
use crate::error::{PrepareError, PrepareResult};
use crate::view::View;
use cellbook_core::Payload;

/// Type name of the note app
pub const TYPE_NAME: &str = "note";

/// Empty note
pub fn empty_state() -> Payload {
    Payload::String(String::new())
}

/// Prepare a note instance
pub fn prepare(payload: &Payload) -> PrepareResult<Box<dyn AppInstance>> {
    match payload {
        Payload::String(text) => Ok(Box::new(Note { text: text.clone() })),
        other => Err(PrepareError::malformed("string", other)),
    }
}

#[derive(Debug)]
struct Note {
    text: String,
}

impl AppInstance for Note {
    fn state(&self) -> Payload {
        Payload::String(self.text.clone())
    }

    fn view(&self, _props: &AppProps<'_>) -> View {
        View::Text(self.text.clone())
    }

    fn handle(&mut self, input: &AppInput, props: &AppProps<'_>) -> Vec<AppEvent> {
        if !props.is_editable {
            return Vec::new();
        }
        let text = match input {
            AppInput::Text(text) => text,
            AppInput::Raw(Payload::String(text)) => text,
            _ => return Vec::new(),
        };
        if *text == self.text {
            return Vec::new();
        }
        self.text = text.clone();
        vec![AppEvent::StateChanged]
    }
}
