// SPDX-License-Identifier: MIT

//! Environment-driven settings for the pattern check action

use crate::runner::error::CheckError;

pub const DEFAULT_ACTION_TYPE: &str = "pattern_check";

const REPORT_UNSUPPORTED_VAR: &str = "PATTERN_CHECK_REPORT_UNSUPPORTED";
const ACTION_TYPE_VAR: &str = "PATTERN_CHECK_ACTION_TYPE";

#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    /// Emit a step message for patterns with an unsupported type. The
    /// outcome is the same either way.
    pub report_unsupported: bool,
    /// Registry key for the action
    pub action_type: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            report_unsupported: true,
            action_type: DEFAULT_ACTION_TYPE.to_string(),
        }
    }
}

impl CheckConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, CheckError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(REPORT_UNSUPPORTED_VAR) {
            config.report_unsupported = parse_bool(REPORT_UNSUPPORTED_VAR, &raw)?;
        }

        if let Some(raw) = lookup(ACTION_TYPE_VAR) {
            let action_type = raw.trim();
            if action_type.is_empty() {
                return Err(CheckError::config(format!("{} must not be empty", ACTION_TYPE_VAR)));
            }
            config.action_type = action_type.to_string();
        }

        Ok(config)
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, CheckError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CheckError::config(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}
