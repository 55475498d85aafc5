// src/error.rs
//! Typed errors surfaced by the resume pipeline

use thiserror::Error;

/// Message shown to users whenever a generated resume cannot be decoded.
pub const USER_PARSE_FAILURE: &str = "could not parse generated resume";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unrecognized resume format: {reason}")]
    FormatUnrecognized { reason: String },

    #[error("Expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Failed to decode {context}: {source}")]
    Schema {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Generation service returned an empty payload")]
    EmptyPayload,
}

impl PipelineError {
    pub fn unrecognized(reason: impl Into<String>) -> Self {
        Self::FormatUnrecognized {
            reason: reason.into(),
        }
    }

    /// True for failures that mean "the generated resume could not be decoded".
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Self::FormatUnrecognized { .. }
                | Self::InvalidJson(_)
                | Self::Schema { .. }
                | Self::EmptyPayload
        )
    }

    /// Text safe to present to an end user.
    pub fn user_message(&self) -> String {
        if self.is_decode_failure() {
            USER_PARSE_FAILURE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Short JSON type name used in error messages and traces.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
