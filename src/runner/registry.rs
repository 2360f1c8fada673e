// SPDX-License-Identifier: MIT

use crate::runner::action::Action;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Actions keyed by their action type
#[derive(Clone)]
pub struct ActionRegistry {
    actions: Arc<RwLock<HashMap<String, Arc<dyn Action>>>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn register(&self, action: Arc<dyn Action>) {
        let action_type = action.details().action_type.clone();
        log::debug!("Registered action: {}", action_type);
        let mut actions = self.actions.write().await;
        actions.insert(action_type, action);
    }

    pub async fn get(&self, action_type: &str) -> Option<Arc<dyn Action>> {
        let actions = self.actions.read().await;
        actions.get(action_type).cloned()
    }

    /// Registered action types, sorted
    pub async fn action_types(&self) -> Vec<String> {
        let actions = self.actions.read().await;
        let mut types: Vec<String> = actions.keys().cloned().collect();
        types.sort();
        types
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
