//! Error types for the selection action bar
//!
//! `InvalidState` and `NoSelection` are guards: callers treat them as silent
//! no-ops and never surface them to the user. The remaining variants come
//! from configuration loading and folder serialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SelectionError {
    #[error("Operation invoked while the action bar is inactive")]
    InvalidState,

    #[error("Operation invoked on an empty selection")]
    NoSelection,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SelectionError {
    /// Whether this error is one of the defensive guards that callers drop silently
    pub fn is_guard(&self) -> bool {
        matches!(self, Self::InvalidState | Self::NoSelection)
    }
}

impl From<std::io::Error> for SelectionError {
    fn from(err: std::io::Error) -> Self {
        SelectionError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for SelectionError {
    fn from(err: toml::de::Error) -> Self {
        SelectionError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SelectionError {
    fn from(err: serde_json::Error) -> Self {
        SelectionError::Serialization(err.to_string())
    }
}

/// Result type alias using SelectionError
pub type Result<T> = std::result::Result<T, SelectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_errors() {
        assert!(SelectionError::InvalidState.is_guard());
        assert!(SelectionError::NoSelection.is_guard());
        assert!(!SelectionError::Config("bad".into()).is_guard());
    }

    #[test]
    fn test_error_serializes_tagged() {
        let json = serde_json::to_string(&SelectionError::Parse("oops".into())).unwrap();
        assert_eq!(json, r#"{"type":"Parse","message":"oops"}"#);
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let err: SelectionError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert!(matches!(err, SelectionError::Config(_)));
    }
}
