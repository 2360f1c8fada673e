// SPDX-License-Identifier: MIT

//! Typed error handling for pattern-check
//!
//! Every fatal error maps to the `Failed` step outcome at the action
//! boundary; nothing here is retried internally.

use thiserror::Error;

/// Top-level error type for pattern-check
#[derive(Debug, Error)]
pub enum CheckError {
    /// Payload could not be turned into a comparable document
    #[error("Failed to serialize payload: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The reporting sink rejected a step update
    #[error("Failed to report update for step {step_id}: {message}")]
    Reporting { step_id: String, message: String },

    /// Step state machine was driven out of order
    #[error("Invalid step transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Configuration errors (invalid env vars)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Flow definition errors
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing errors (flow or payload files)
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Flow-definition errors
#[derive(Debug, Error)]
pub enum FlowError {
    /// File not found when loading a flow
    #[error("Flow file not found: {0}")]
    FileNotFound(String),

    /// Extension is neither YAML nor JSON
    #[error("Unsupported flow format: {0}")]
    UnsupportedFormat(String),
}

impl CheckError {
    /// Create a reporting error
    pub fn reporting(step_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Reporting {
            step_id: step_id.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporting_error_display() {
        let err = CheckError::reporting("step-1", "sink closed");
        assert_eq!(
            err.to_string(),
            "Failed to report update for step step-1: sink closed"
        );
    }

    #[test]
    fn test_flow_error_converts() {
        let err: CheckError = FlowError::FileNotFound("flow.yaml".to_string()).into();
        assert!(matches!(err, CheckError::Flow(FlowError::FileNotFound(_))));
        assert_eq!(err.to_string(), "Flow error: Flow file not found: flow.yaml");
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = CheckError::InvalidTransition {
            from: "pending".to_string(),
            to: "continue".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid step transition from pending to continue"
        );
    }
}
