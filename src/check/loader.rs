//! Flow loader - YAML/JSON flow definition files
//!
//! The format is picked by file extension; `.yaml`/`.yml` and `.json`
//! are supported.

use crate::runner::error::{CheckError, FlowError};
use crate::runner::models::Flow;
use std::fs;
use std::path::Path;

/// Loads flow definitions from disk
pub struct FlowLoader;

impl FlowLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a flow definition from a YAML or JSON file
    pub fn load_flow<P: AsRef<Path>>(&self, path: P) -> Result<Flow, CheckError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FlowError::FileNotFound(path.display().to_string()).into());
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let content = fs::read_to_string(path)?;
        match extension.as_str() {
            "yaml" | "yml" => Self::parse_yaml(&content),
            "json" => Self::parse_json(&content),
            _ => Err(FlowError::UnsupportedFormat(path.display().to_string()).into()),
        }
    }

    /// Parse a flow definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Flow, CheckError> {
        let flow: Flow = serde_yaml::from_str(content)?;
        log::debug!("Loaded flow '{}' with {} patterns", flow.name, flow.patterns.len());
        Ok(flow)
    }

    /// Parse a flow definition from a JSON string
    pub fn parse_json(content: &str) -> Result<Flow, CheckError> {
        let flow: Flow = serde_json::from_str(content)?;
        log::debug!("Loaded flow '{}' with {} patterns", flow.name, flow.patterns.len());
        Ok(flow)
    }
}

impl Default for FlowLoader {
    fn default() -> Self {
        Self::new()
    }
}
