// SPDX-License-Identifier: MIT

//! The `pattern_check` action node
//!
//! Reports `running`, evaluates the flow's patterns against the execution
//! payload and finishes the step with `continue` or `no_pattern_match`.
//! Any serialization or reporting error ends the invocation as `failed`.

use async_trait::async_trait;
use once_cell::sync::Lazy;

use super::config::CheckConfig;
use super::evaluator::PatternEvaluator;
use super::outcome::{self, StepLifecycle, NO_PATTERNS_MESSAGE};
use crate::runner::action::{
    Action, ActionContext, ActionDetails, ActionResult, PluginInfo, StepOutcome,
};
use crate::runner::error::CheckError;

static PLUGIN_INFO: Lazy<PluginInfo> = Lazy::new(|| PluginInfo {
    name: "Pattern Check".to_string(),
    plugin_type: "action".to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    creator: "pattern-check".to_string(),
});

pub struct PatternCheckAction {
    config: CheckConfig,
    details: ActionDetails,
}

impl PatternCheckAction {
    pub fn new(config: CheckConfig) -> Self {
        let details = ActionDetails {
            name: "Pattern Check".to_string(),
            description: "Check flow patterns".to_string(),
            icon: "solar:list-check-minimalistic-bold".to_string(),
            action_type: config.action_type.clone(),
            category: "Utility".to_string(),
            is_hidden: true,
            params: None,
        };
        Self { config, details }
    }

    async fn run(
        &self,
        ctx: &ActionContext<'_>,
        lifecycle: &mut StepLifecycle,
    ) -> Result<StepOutcome, CheckError> {
        let reporter = ctx.reporter;
        let execution_id = ctx.execution_id();

        let start = lifecycle.start(ctx.action.id.to_string())?;
        reporter.update_step(execution_id, start).await?;

        let patterns = &ctx.flow.patterns;
        if patterns.is_empty() {
            log::info!("Step {}: no patterns defined", ctx.step_id());
            let patch = lifecycle.finish(StepOutcome::Continue, NO_PATTERNS_MESSAGE)?;
            reporter.update_step(execution_id, patch).await?;
            return Ok(StepOutcome::Continue);
        }

        let results = PatternEvaluator::new(reporter, execution_id, ctx.step_id())
            .report_unsupported(self.config.report_unsupported)
            .evaluate_payload(&ctx.payload.payload, patterns)
            .await?;

        let outcome = outcome::reduce(&results);
        let mismatches = outcome::mismatch_count(&results);
        log::info!(
            "Step {}: {} of {} patterns mismatched, outcome {}",
            ctx.step_id(),
            mismatches,
            results.len(),
            outcome
        );

        let patch = lifecycle.finish(outcome, outcome::outcome_message(mismatches))?;
        reporter.update_step(execution_id, patch).await?;

        Ok(outcome)
    }
}

impl Default for PatternCheckAction {
    fn default() -> Self {
        Self::new(CheckConfig::default())
    }
}

#[async_trait]
impl Action for PatternCheckAction {
    fn info(&self) -> &PluginInfo {
        &PLUGIN_INFO
    }

    fn details(&self) -> &ActionDetails {
        &self.details
    }

    async fn execute(&self, ctx: &ActionContext<'_>) -> ActionResult {
        let mut lifecycle = StepLifecycle::new(ctx.step_id());

        match self.run(ctx, &mut lifecycle).await {
            Ok(outcome) => ActionResult::new(outcome),
            Err(e) => {
                log::error!("Pattern check failed for step {}: {}", ctx.step_id(), e);
                if let Err(e) = lifecycle.fail() {
                    log::warn!("Step {}: {}", ctx.step_id(), e);
                }
                ActionResult::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::outcome::{ALL_MATCHED_MESSAGE, CHECKING_MESSAGE, MISMATCH_MESSAGE};
    use crate::check::Pattern;
    use crate::runner::models::{Execution, ExecutionStep, Flow, FlowAction, Payload};
    use crate::runner::reporter::MemoryReporter;
    use serde_json::{json, Value};

    fn flow(patterns: Vec<Pattern>) -> Flow {
        Flow {
            id: Some("flow-1".to_string()),
            name: "Alerts".to_string(),
            description: String::new(),
            patterns,
            actions: vec![FlowAction::new("pattern_check")],
        }
    }

    async fn run(patterns: Vec<Pattern>, payload: Value) -> (ActionResult, ExecutionStep) {
        let reporter = MemoryReporter::new();
        let flow = flow(patterns);
        let execution = Execution::new(flow.flow_id());
        let payload = Payload::new(flow.flow_id(), payload);
        let step = ExecutionStep::new();

        let ctx = ActionContext {
            execution: &execution,
            flow: &flow,
            payload: &payload,
            step: &step,
            action: &flow.actions[0],
            reporter: &reporter,
        };
        let result = PatternCheckAction::default().execute(&ctx).await;
        let recorded = reporter.step(step.id).await.unwrap();
        (result, recorded)
    }

    #[test]
    fn test_details() {
        let action = PatternCheckAction::default();
        assert_eq!(action.details().action_type, "pattern_check");
        assert_eq!(action.details().category, "Utility");
        assert!(action.details().is_hidden);
        assert_eq!(action.info().name, "Pattern Check");
        assert_eq!(action.info().plugin_type, "action");
    }

    #[test]
    fn test_details_follow_configured_type() {
        let action = PatternCheckAction::new(CheckConfig {
            action_type: "check_v2".to_string(),
            ..CheckConfig::default()
        });
        assert_eq!(action.details().action_type, "check_v2");
    }

    #[tokio::test]
    async fn test_all_matched() {
        let (result, step) = run(
            vec![Pattern::equals("status", "ok")],
            json!({"status": "ok"}),
        )
        .await;

        assert_eq!(result, ActionResult::new(StepOutcome::Continue));
        assert_eq!(
            step.messages,
            vec![
                CHECKING_MESSAGE,
                "Pattern: status == ok matched. Continue to next step",
                ALL_MATCHED_MESSAGE,
            ]
        );
        assert!(step.finished);
        assert!(!step.running);
        assert!(!step.no_pattern_match);
    }

    #[tokio::test]
    async fn test_mismatch_finishes_with_no_pattern_match() {
        let (result, step) = run(
            vec![Pattern::equals("status", "ok")],
            json!({"status": "error"}),
        )
        .await;

        assert_eq!(result.outcome, StepOutcome::NoPatternMatch);
        assert!(result.data.is_none());
        assert_eq!(step.messages.last().map(String::as_str), Some(MISMATCH_MESSAGE));
        assert!(step.no_pattern_match);
        assert!(!step.canceled);
        assert!(step.finished);
        assert!(step.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_no_patterns() {
        let (result, step) = run(vec![], json!({"anything": true})).await;

        assert_eq!(result.outcome, StepOutcome::Continue);
        assert_eq!(step.messages, vec![CHECKING_MESSAGE, NO_PATTERNS_MESSAGE]);
        assert!(step.finished);
    }
}
