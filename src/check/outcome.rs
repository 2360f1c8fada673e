// SPDX-License-Identifier: MIT

//! Step outcome reduction and the per-step state machine
//!
//! A step moves `pending -> running -> finished(outcome)`. The terminal
//! outcome is set exactly once; the reducer only looks at the mismatch
//! count.

use uuid::Uuid;

use super::pattern::EvaluationResult;
use crate::runner::action::StepOutcome;
use crate::runner::error::CheckError;
use crate::runner::models::StepPatch;

pub const CHECKING_MESSAGE: &str = "Checking for patterns";
pub const NO_PATTERNS_MESSAGE: &str = "No patterns are defined. Continue to next step";
pub const ALL_MATCHED_MESSAGE: &str = "All patterns matched. Continue to next step";
pub const MISMATCH_MESSAGE: &str = "Some patterns did not match. Cancel execution";

/// Number of rules that did not match
pub fn mismatch_count(results: &[EvaluationResult]) -> usize {
    results.iter().filter(|r| !r.matched).count()
}

/// Map per-rule results to the terminal outcome
pub fn reduce(results: &[EvaluationResult]) -> StepOutcome {
    if mismatch_count(results) == 0 {
        StepOutcome::Continue
    } else {
        StepOutcome::NoPatternMatch
    }
}

/// Final step message for a given number of mismatched rules
pub fn outcome_message(mismatches: usize) -> &'static str {
    if mismatches == 0 {
        ALL_MATCHED_MESSAGE
    } else {
        MISMATCH_MESSAGE
    }
}

/// Lifecycle state of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Running,
    Finished(StepOutcome),
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepState::Pending => write!(f, "pending"),
            StepState::Running => write!(f, "running"),
            StepState::Finished(outcome) => write!(f, "{}", outcome),
        }
    }
}

/// Drives one step through its states and builds the matching patches
#[derive(Debug)]
pub struct StepLifecycle {
    step_id: Uuid,
    state: StepState,
}

impl StepLifecycle {
    pub fn new(step_id: Uuid) -> Self {
        Self {
            step_id,
            state: StepState::Pending,
        }
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    /// `pending -> running`
    pub fn start(&mut self, action_id: impl Into<String>) -> Result<StepPatch, CheckError> {
        if self.state != StepState::Pending {
            return Err(self.invalid("running"));
        }
        self.state = StepState::Running;

        Ok(StepPatch::new(self.step_id)
            .action_id(action_id)
            .message(CHECKING_MESSAGE)
            .pending(false)
            .running(true)
            .started_now())
    }

    /// `running -> finished(outcome)`
    pub fn finish(
        &mut self,
        outcome: StepOutcome,
        message: impl Into<String>,
    ) -> Result<StepPatch, CheckError> {
        if self.state != StepState::Running {
            return Err(self.invalid(&outcome.to_string()));
        }
        self.state = StepState::Finished(outcome);

        let patch = StepPatch::new(self.step_id)
            .message(message)
            .running(false)
            .finished(true)
            .finished_now();

        Ok(match outcome {
            StepOutcome::NoPatternMatch => patch.canceled(false).no_pattern_match(true),
            StepOutcome::Canceled => patch.canceled(true),
            StepOutcome::Continue | StepOutcome::Failed => patch,
        })
    }

    /// Any non-terminal state -> `finished(failed)`. Nothing is reported;
    /// the orchestrator records failures from the returned outcome.
    pub fn fail(&mut self) -> Result<(), CheckError> {
        if let StepState::Finished(_) = self.state {
            return Err(self.invalid("failed"));
        }
        self.state = StepState::Finished(StepOutcome::Failed);
        Ok(())
    }

    fn invalid(&self, to: &str) -> CheckError {
        CheckError::InvalidTransition {
            from: self.state.to_string(),
            to: to.to_string(),
        }
    }
}
