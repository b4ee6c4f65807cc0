//! Shared UI state: the ad account the views are scoped to

use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default)]
pub struct AdAccountStore {
    selected: Arc<RwLock<String>>,
}

impl AdAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the user's account choice
    pub fn select(&self, account_id: impl Into<String>) {
        let account_id = account_id.into();
        tracing::debug!(account_id = %account_id, "Selected ad account");
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = account_id;
    }

    /// Currently selected account, if any
    pub fn selected(&self) -> Option<String> {
        let selected = self.selected.read().unwrap_or_else(PoisonError::into_inner);
        (!selected.is_empty()).then(|| selected.clone())
    }

    pub fn clear(&self) {
        self.select(String::new());
    }
}
