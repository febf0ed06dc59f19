use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the per-category cap counts a seller's existing listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScope {
    /// Every listing the seller holds in the category, whatever its dates.
    #[default]
    Category,
    /// Only listings in the category whose window overlaps the requested one.
    CategoryWindow,
}

/// Engine wiring. Numeric thresholds are not here, they come from the condition store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on every individual store read.
    pub store_timeout: Duration,
    pub category_scope: CategoryScope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(2),
            category_scope: CategoryScope::default(),
        }
    }
}
