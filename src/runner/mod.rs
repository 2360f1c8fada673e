// SPDX-License-Identifier: MIT

//! Runner-side contract for action nodes
//!
//! This module provides the pieces the flow runner owns:
//! - `Action` - trait every action node implements
//! - `StepReporter` - sink for step updates
//! - `ActionRegistry` - lookup of actions by type

pub mod action;
pub mod error;
pub mod models;
pub mod registry;
pub mod reporter;

pub use action::{Action, ActionContext, ActionDetails, ActionResult, PluginInfo, StepOutcome};
pub use error::{CheckError, FlowError};
pub use registry::ActionRegistry;
pub use reporter::{LogReporter, MemoryReporter, StepReporter};
