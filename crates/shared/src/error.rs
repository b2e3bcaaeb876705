use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure body sent by the directory service with a non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    /// The detail text, when the service sent one as a non-empty string.
    pub fn detail_text(&self) -> Option<&str> {
        match &self.detail {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("activity directory is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("activity directory must be a json object, got {0}")]
    NotAnObject(&'static str),
}
