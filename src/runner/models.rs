// SPDX-License-Identifier: MIT

//! Host data model shared between the flow runner and its actions
//!
//! These mirror the records the orchestrator owns. Actions only ever read
//! them, except for step updates which travel as [`StepPatch`] values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::check::Pattern;

/// A single run of a flow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Execution {
    pub id: Uuid,
    pub flow_id: String,
    pub created_at: DateTime<Utc>,
}

impl Execution {
    pub fn new(flow_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            flow_id: flow_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Flow definition as far as actions are concerned
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Flow {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Patterns checked by the `pattern_check` action, in order
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    /// Actions configured on the flow
    #[serde(default)]
    pub actions: Vec<FlowAction>,
}

impl Flow {
    /// Identifier used for executions; falls back to the flow name
    pub fn flow_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

/// An action configured on a flow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowAction {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Action type used for registry lookup (e.g. "pattern_check")
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub params: Option<HashMap<String, serde_json::Value>>,
}

impl FlowAction {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action_type: action_type.into(),
            name: None,
            params: None,
        }
    }
}

/// Event payload an execution was started with
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Payload {
    pub id: Uuid,
    pub flow_id: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Payload {
    pub fn new(flow_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            flow_id: flow_id.into(),
            payload,
            created_at: Utc::now(),
        }
    }
}

/// Step record as stored by the orchestrator
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExecutionStep {
    pub id: Uuid,
    pub action_id: Option<String>,
    pub messages: Vec<String>,
    pub pending: bool,
    pub running: bool,
    pub canceled: bool,
    pub finished: bool,
    pub no_pattern_match: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExecutionStep {
    /// Fresh step in the `pending` state
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            action_id: None,
            messages: Vec::new(),
            pending: true,
            running: false,
            canceled: false,
            finished: false,
            no_pattern_match: false,
            started_at: None,
            finished_at: None,
        }
    }

    /// Apply a patch: messages are appended, present fields overwrite
    pub fn apply(&mut self, patch: &StepPatch) {
        if let Some(action_id) = &patch.action_id {
            self.action_id = Some(action_id.clone());
        }
        self.messages.extend(patch.messages.iter().cloned());

        if let Some(v) = patch.pending {
            self.pending = v;
        }
        if let Some(v) = patch.running {
            self.running = v;
        }
        if let Some(v) = patch.canceled {
            self.canceled = v;
        }
        if let Some(v) = patch.finished {
            self.finished = v;
        }
        if let Some(v) = patch.no_pattern_match {
            self.no_pattern_match = v;
        }
        if patch.started_at.is_some() {
            self.started_at = patch.started_at;
        }
        if patch.finished_at.is_some() {
            self.finished_at = patch.finished_at;
        }
    }
}

impl Default for ExecutionStep {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update for a step; `None` leaves the stored field untouched
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StepPatch {
    pub step_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_pattern_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl StepPatch {
    pub fn new(step_id: Uuid) -> Self {
        Self {
            step_id,
            action_id: None,
            messages: Vec::new(),
            pending: None,
            running: None,
            canceled: None,
            finished: None,
            no_pattern_match: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn action_id(mut self, action_id: impl Into<String>) -> Self {
        self.action_id = Some(action_id.into());
        self
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = Some(pending);
        self
    }

    pub fn running(mut self, running: bool) -> Self {
        self.running = Some(running);
        self
    }

    pub fn canceled(mut self, canceled: bool) -> Self {
        self.canceled = Some(canceled);
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = Some(finished);
        self
    }

    pub fn no_pattern_match(mut self, no_pattern_match: bool) -> Self {
        self.no_pattern_match = Some(no_pattern_match);
        self
    }

    pub fn started_now(mut self) -> Self {
        self.started_at = Some(Utc::now());
        self
    }

    pub fn finished_now(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_step_is_pending() {
        let step = ExecutionStep::new();
        assert!(step.pending);
        assert!(!step.running);
        assert!(!step.finished);
        assert!(step.messages.is_empty());
    }

    #[test]
    fn test_apply_appends_messages_in_order() {
        let mut step = ExecutionStep::new();
        step.apply(&StepPatch::new(step.id).message("first"));
        step.apply(&StepPatch::new(step.id).message("second"));

        assert_eq!(step.messages, vec!["first", "second"]);
    }

    #[test]
    fn test_apply_only_overwrites_present_fields() {
        let mut step = ExecutionStep::new();
        step.apply(
            &StepPatch::new(step.id)
                .pending(false)
                .running(true)
                .started_now(),
        );
        assert!(!step.pending);
        assert!(step.running);
        assert!(step.started_at.is_some());

        step.apply(&StepPatch::new(step.id).canceled(true));
        assert!(step.running);
        assert!(step.canceled);

        step.apply(
            &StepPatch::new(step.id)
                .running(false)
                .canceled(false)
                .finished(true)
                .finished_now(),
        );
        assert!(!step.running);
        assert!(!step.canceled);
        assert!(step.finished);
        assert!(step.finished_at.is_some());
    }

    #[test]
    fn test_patch_serialization_skips_absent_flags() {
        let patch = StepPatch::new(Uuid::nil()).message("hi").running(true);
        let json = serde_json::to_value(&patch).unwrap();

        assert_eq!(json["messages"], serde_json::json!(["hi"]));
        assert_eq!(json["running"], serde_json::json!(true));
        assert!(json.get("finished").is_none());
        assert!(json.get("no_pattern_match").is_none());
    }

    #[test]
    fn test_flow_id_falls_back_to_name() {
        let flow: Flow = serde_yaml::from_str("name: Alerts").unwrap();
        assert_eq!(flow.flow_id(), "Alerts");
        assert!(flow.patterns.is_empty());
        assert!(flow.actions.is_empty());

        let flow: Flow = serde_yaml::from_str("id: abc\nname: Alerts").unwrap();
        assert_eq!(flow.flow_id(), "abc");
    }
}
