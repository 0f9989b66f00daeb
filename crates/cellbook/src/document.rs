//! Worksheet file format
//!
//! A `.workbook` file is a JSON object with the cells in document order:
//!
//! ```json
//! {
//!   "cells": [
//!     { "id": 0, "type": "note", "data": "p" },
//!     { "id": 1, "type": "claim", "data": { "statement": "p" }, "proof": { "verdict": true } }
//!   ]
//! }
//! ```

use cellbook_core::Cell;
use serde::de::Unexpected;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct DocumentFile {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Serialize)]
struct DocumentFileRef<'a> {
    cells: &'a [Cell],
}

/// Parse a worksheet file
///
/// The top level must be a JSON object; arrays and scalars are rejected
/// rather than read as an empty document.
pub fn parse_document(text: &str) -> serde_json::Result<Vec<Cell>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(<serde_json::Error as serde::de::Error>::invalid_type(
            unexpected(&value),
            &"a worksheet object",
        ));
    }
    let file: DocumentFile = serde_json::from_value(value)?;
    Ok(file.cells)
}

fn unexpected(value: &serde_json::Value) -> Unexpected<'_> {
    match value {
        serde_json::Value::Null => Unexpected::Unit,
        serde_json::Value::Bool(b) => Unexpected::Bool(*b),
        serde_json::Value::Number(_) => Unexpected::Other("number"),
        serde_json::Value::String(s) => Unexpected::Str(s),
        serde_json::Value::Array(_) => Unexpected::Seq,
        serde_json::Value::Object(_) => Unexpected::Map,
    }
}

/// Write a worksheet file
pub fn write_document(cells: &[Cell]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DocumentFileRef { cells })
}
