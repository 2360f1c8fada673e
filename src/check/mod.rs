// SPDX-License-Identifier: MIT

//! Pattern checking for flow steps
//!
//! Patterns are simple field rules like:
//! - `status equals ok`
//! - `alert.labels.env not_equals staging`
//!
//! The evaluator resolves each rule against the payload and the reducer
//! turns the results into the step outcome.

pub mod action;
pub mod config;
pub mod evaluator;
pub mod loader;
pub mod outcome;
pub mod path;
pub mod pattern;

pub use action::PatternCheckAction;
pub use config::CheckConfig;
pub use evaluator::{check, PatternEvaluator};
pub use loader::FlowLoader;
pub use outcome::{reduce, StepLifecycle, StepState};
pub use path::Document;
pub use pattern::{EvaluationResult, Operator, Pattern};
