// SPDX-License-Identifier: MIT

//! Step reporting sinks
//!
//! The orchestrator owns step persistence; actions only push [`StepPatch`]
//! values through a [`StepReporter`] handed to them at call time.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::CheckError;
use super::models::{ExecutionStep, StepPatch};

/// Sink for step updates.
///
/// Implementations must keep message append order as received. A returned
/// error fails the whole invocation that produced the patch.
#[async_trait]
pub trait StepReporter: Send + Sync {
    async fn update_step(&self, execution_id: Uuid, patch: StepPatch) -> Result<(), CheckError>;
}

/// Reporter that only writes patches to the log
#[derive(Debug, Clone, Default)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StepReporter for LogReporter {
    async fn update_step(&self, execution_id: Uuid, patch: StepPatch) -> Result<(), CheckError> {
        for message in &patch.messages {
            log::info!("[{}/{}] {}", execution_id, patch.step_id, message);
        }
        if patch.finished == Some(true) {
            log::debug!(
                "[{}/{}] step finished (no_pattern_match: {:?})",
                execution_id,
                patch.step_id,
                patch.no_pattern_match
            );
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Recorded {
    patches: Vec<(Uuid, StepPatch)>,
    steps: HashMap<Uuid, ExecutionStep>,
}

/// In-memory reporter that records every patch and folds them into step
/// records. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    inner: Arc<RwLock<Recorded>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All patches received, in arrival order
    pub async fn patches(&self) -> Vec<StepPatch> {
        let inner = self.inner.read().await;
        inner.patches.iter().map(|(_, p)| p.clone()).collect()
    }

    /// Patches received for one execution
    pub async fn patches_for(&self, execution_id: Uuid) -> Vec<StepPatch> {
        let inner = self.inner.read().await;
        inner
            .patches
            .iter()
            .filter(|(id, _)| *id == execution_id)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Current state of a step after all patches were applied
    pub async fn step(&self, step_id: Uuid) -> Option<ExecutionStep> {
        let inner = self.inner.read().await;
        inner.steps.get(&step_id).cloned()
    }

    /// Messages recorded for a step
    pub async fn messages(&self, step_id: Uuid) -> Vec<String> {
        self.step(step_id)
            .await
            .map(|s| s.messages)
            .unwrap_or_default()
    }
}

#[async_trait]
impl StepReporter for MemoryReporter {
    async fn update_step(&self, execution_id: Uuid, patch: StepPatch) -> Result<(), CheckError> {
        let mut inner = self.inner.write().await;
        inner
            .steps
            .entry(patch.step_id)
            .or_insert_with(|| ExecutionStep::with_id(patch.step_id))
            .apply(&patch);
        inner.patches.push((execution_id, patch));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_reporter_records_in_order() {
        let reporter = MemoryReporter::new();
        let execution_id = Uuid::new_v4();
        let step_id = Uuid::new_v4();

        reporter
            .update_step(execution_id, StepPatch::new(step_id).message("one"))
            .await
            .unwrap();
        reporter
            .update_step(execution_id, StepPatch::new(step_id).message("two"))
            .await
            .unwrap();

        assert_eq!(reporter.messages(step_id).await, vec!["one", "two"]);
        assert_eq!(reporter.patches().await.len(), 2);
    }

    #[tokio::test]
    async fn test_memory_reporter_folds_flags() {
        let reporter = MemoryReporter::new();
        let execution_id = Uuid::new_v4();
        let step_id = Uuid::new_v4();

        reporter
            .update_step(
                execution_id,
                StepPatch::new(step_id).pending(false).running(true),
            )
            .await
            .unwrap();
        reporter
            .update_step(
                execution_id,
                StepPatch::new(step_id).running(false).finished(true),
            )
            .await
            .unwrap();

        let step = reporter.step(step_id).await.unwrap();
        assert!(!step.pending);
        assert!(!step.running);
        assert!(step.finished);
    }

    #[tokio::test]
    async fn test_memory_reporter_separates_executions() {
        let reporter = MemoryReporter::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        reporter
            .update_step(first, StepPatch::new(Uuid::new_v4()).message("a"))
            .await
            .unwrap();
        reporter
            .update_step(second, StepPatch::new(Uuid::new_v4()).message("b"))
            .await
            .unwrap();

        let patches = reporter.patches_for(second).await;
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].messages, vec!["b"]);
    }

    #[tokio::test]
    async fn test_memory_reporter_clone_shares_state() {
        let reporter = MemoryReporter::new();
        let cloned = reporter.clone();
        let step_id = Uuid::new_v4();

        cloned
            .update_step(Uuid::new_v4(), StepPatch::new(step_id).message("shared"))
            .await
            .unwrap();

        assert_eq!(reporter.messages(step_id).await, vec!["shared"]);
    }

    #[tokio::test]
    async fn test_log_reporter_accepts_patches() {
        let reporter = LogReporter::new();
        let result = reporter
            .update_step(
                Uuid::new_v4(),
                StepPatch::new(Uuid::new_v4()).message("logged").finished(true),
            )
            .await;
        assert!(result.is_ok());
    }
}
