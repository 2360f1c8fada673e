// SPDX-License-Identifier: MIT

//! Invocation interface between the flow runner and action nodes

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{Execution, ExecutionStep, Flow, FlowAction, Payload};
use super::reporter::StepReporter;

/// Terminal classification of one action run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// Proceed to the next step
    Continue,
    /// Execution canceled (reserved; pattern checks report `NoPatternMatch`)
    Canceled,
    /// One or more patterns did not match; stop without error
    NoPatternMatch,
    /// Operational error unrelated to pattern semantics
    Failed,
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepOutcome::Continue => write!(f, "continue"),
            StepOutcome::Canceled => write!(f, "canceled"),
            StepOutcome::NoPatternMatch => write!(f, "no_pattern_match"),
            StepOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// Plugin identity as shown by the runner
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PluginInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub plugin_type: String,
    pub version: String,
    pub creator: String,
}

/// Action metadata used for registration and display
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ActionDetails {
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Registry key, e.g. "pattern_check"
    #[serde(rename = "type")]
    pub action_type: String,
    pub category: String,
    pub is_hidden: bool,
    pub params: Option<serde_json::Value>,
}

/// Everything an action sees for one step invocation
pub struct ActionContext<'a> {
    pub execution: &'a Execution,
    pub flow: &'a Flow,
    pub payload: &'a Payload,
    pub step: &'a ExecutionStep,
    pub action: &'a FlowAction,
    pub reporter: &'a dyn StepReporter,
}

impl ActionContext<'_> {
    pub fn execution_id(&self) -> Uuid {
        self.execution.id
    }

    pub fn step_id(&self) -> Uuid {
        self.step.id
    }
}

/// Result handed back to the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub outcome: StepOutcome,
    /// Derived data for later steps, if the action produces any
    pub data: Option<serde_json::Value>,
}

impl ActionResult {
    pub fn new(outcome: StepOutcome) -> Self {
        Self {
            outcome,
            data: None,
        }
    }

    pub fn failed() -> Self {
        Self::new(StepOutcome::Failed)
    }
}

/// Trait for action nodes the runner can dispatch a step to
#[async_trait]
pub trait Action: Send + Sync {
    fn info(&self) -> &PluginInfo;

    fn details(&self) -> &ActionDetails;

    /// Run the action for one step. Errors are folded into the outcome.
    async fn execute(&self, ctx: &ActionContext<'_>) -> ActionResult;
}
