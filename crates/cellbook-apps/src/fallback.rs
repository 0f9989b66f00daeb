//! Fallback app for unknown type names
//!
//! Saved documents may reference app types this build does not have. Such
//! cells still render (as an "unsupported" indicator) and keep their stored
//! payload untouched, since the fallback instance never reports a change.

use crate::app::{App, AppInstance, AppProps};
use crate::error::PrepareResult;
use crate::view::View;
use cellbook_core::Payload;

/// Stand-in app for a type name with no registered app
#[derive(Debug, Clone)]
pub struct UnsupportedApp {
    type_name: String,
}

impl UnsupportedApp {
    /// Fallback for `type_name`
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }

    /// The type name that could not be resolved
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// A fresh placeholder instance; never fails
    pub fn instance(&self) -> Box<dyn AppInstance> {
        Box::new(UnsupportedInstance {
            type_name: self.type_name.clone(),
        })
    }
}

impl App for UnsupportedApp {
    fn prepare(&self, _payload: &Payload) -> PrepareResult<Box<dyn AppInstance>> {
        Ok(self.instance())
    }

    fn empty_state(&self) -> Payload {
        Payload::Null
    }
}

#[derive(Debug)]
struct UnsupportedInstance {
    type_name: String,
}

impl AppInstance for UnsupportedInstance {
    fn state(&self) -> Payload {
        Payload::Null
    }

    fn view(&self, _props: &AppProps<'_>) -> View {
        View::Unsupported {
            type_name: self.type_name.clone(),
        }
    }
}
