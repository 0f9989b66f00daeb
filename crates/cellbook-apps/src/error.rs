//! App error types

use thiserror::Error;

/// Result type for [`App::prepare`](crate::App::prepare)
pub type PrepareResult<T> = std::result::Result<T, PrepareError>;

/// Errors raised while turning a payload into a live instance
#[derive(Debug, Error)]
pub enum PrepareError {
    /// The payload does not have the shape the app stores
    #[error("Malformed payload: expected {expected}, got {actual}")]
    MalformedPayload {
        expected: &'static str,
        actual: String,
    },

    /// The payload has the right shape but invalid content
    #[error("Invalid payload: {0}")]
    Invalid(String),
}

impl PrepareError {
    /// Shape mismatch for `payload`
    pub fn malformed(expected: &'static str, payload: &serde_json::Value) -> Self {
        let actual = match payload {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        PrepareError::MalformedPayload {
            expected,
            actual: actual.into(),
        }
    }
}
