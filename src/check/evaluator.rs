//! Pattern evaluator
//!
//! Resolves every pattern against the payload and reports one progress
//! message per rule. All rules are evaluated even after a mismatch so the
//! step log carries the full picture.

use serde::Serialize;
use uuid::Uuid;

use super::path::Document;
use super::pattern::{EvaluationResult, Operator, Pattern};
use crate::runner::error::CheckError;
use crate::runner::models::StepPatch;
use crate::runner::reporter::StepReporter;

/// Check a single pattern against a document
pub fn check(document: &Document, pattern: &Pattern) -> EvaluationResult {
    let resolved_value = document.get_string(&pattern.key);
    let matched = pattern.operator.matches(&resolved_value, &pattern.value);

    EvaluationResult {
        key: pattern.key.clone(),
        operator: pattern.operator.clone(),
        expected_value: pattern.value.clone(),
        resolved_value,
        matched,
    }
}

/// Evaluates patterns for one step and reports each result
pub struct PatternEvaluator<'a> {
    reporter: &'a dyn StepReporter,
    execution_id: Uuid,
    step_id: Uuid,
    report_unsupported: bool,
}

impl<'a> PatternEvaluator<'a> {
    pub fn new(reporter: &'a dyn StepReporter, execution_id: Uuid, step_id: Uuid) -> Self {
        Self {
            reporter,
            execution_id,
            step_id,
            report_unsupported: true,
        }
    }

    /// Whether unsupported operators get a step message (they are always
    /// logged)
    pub fn report_unsupported(mut self, enabled: bool) -> Self {
        self.report_unsupported = enabled;
        self
    }

    /// Serialize the payload once, then evaluate every pattern against it
    pub async fn evaluate_payload<T>(
        &self,
        payload: &T,
        patterns: &[Pattern],
    ) -> Result<Vec<EvaluationResult>, CheckError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let document = Document::from_payload(payload)?;
        self.evaluate(&document, patterns).await
    }

    /// Evaluate patterns in order; stops only on a reporting failure
    pub async fn evaluate(
        &self,
        document: &Document,
        patterns: &[Pattern],
    ) -> Result<Vec<EvaluationResult>, CheckError> {
        let mut results = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let result = check(document, pattern);
            log::debug!(
                "Pattern {} {} {:?}: resolved {:?}, matched: {}",
                result.key,
                result.operator,
                result.expected_value,
                result.resolved_value,
                result.matched
            );
            self.report(&result).await?;
            results.push(result);
        }

        Ok(results)
    }

    async fn report(&self, result: &EvaluationResult) -> Result<(), CheckError> {
        let patch = StepPatch::new(self.step_id).message(result.message());

        let patch = match &result.operator {
            Operator::Unknown(name) => {
                log::warn!(
                    "Pattern '{}' uses unsupported type '{}', treating as matched",
                    result.key,
                    name
                );
                if !self.report_unsupported {
                    return Ok(());
                }
                patch
            }
            // Informational only; the terminal state comes from the reducer
            _ if !result.matched => patch.canceled(true),
            _ => patch,
        };

        self.reporter.update_step(self.execution_id, patch).await
    }
}
