//! Threshold lookup with local recovery.
//!
//! A condition can be missing, carry the legacy `-1` sentinel, or the store can
//! be down. All three resolve to the hard-coded default; configuration trouble
//! never fails an admission check.

use std::sync::Arc;
use std::time::Duration;

use bidgate_common::conditions::{ABSENT_SENTINEL, ConditionName, ConditionStore};
use tracing::{debug, warn};

use crate::deadline;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionSource {
    Configured,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCondition {
    pub name: ConditionName,
    pub value: i64,
    pub source: ConditionSource,
}

/// Every threshold one admission check needs, read together.
///
/// Resolving once and passing the snapshot down keeps the scorer and the quota
/// mapper on the same scale even when the store answers differently between
/// reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// `K`
    pub max_active: i64,
    /// `M`
    pub max_per_category: i64,
    /// `S`
    pub max_grade: i64,
    /// `N`
    pub window: i64,
    /// `T`
    pub ceiling: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_active: ConditionName::K.default_value(),
            max_per_category: ConditionName::M.default_value(),
            max_grade: ConditionName::S.default_value(),
            window: ConditionName::N.default_value(),
            ceiling: ConditionName::T.default_value(),
        }
    }
}

#[derive(Clone)]
pub struct ConditionReader {
    store: Arc<dyn ConditionStore>,
    timeout: Duration,
}

impl ConditionReader {
    pub fn new(store: Arc<dyn ConditionStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn value(&self, name: ConditionName) -> i64 {
        self.resolve(name).await.value
    }

    pub async fn resolve(&self, name: ConditionName) -> ResolvedCondition {
        let fallback = ResolvedCondition {
            name,
            value: name.default_value(),
            source: ConditionSource::Default,
        };

        match deadline::bounded(self.timeout, self.store.get(name.as_str())).await {
            Ok(Some(value)) if value != ABSENT_SENTINEL => ResolvedCondition {
                name,
                value,
                source: ConditionSource::Configured,
            },
            Ok(_) => {
                debug!(condition = %name, default = fallback.value, "condition not configured");
                fallback
            }
            Err(e) => {
                warn!(condition = %name, default = fallback.value, "condition lookup failed: {e}");
                fallback
            }
        }
    }

    /// One read per condition, each falling back on its own.
    pub async fn thresholds(&self) -> Thresholds {
        Thresholds {
            max_active: self.value(ConditionName::K).await,
            max_per_category: self.value(ConditionName::M).await,
            max_grade: self.value(ConditionName::S).await,
            window: self.value(ConditionName::N).await,
            ceiling: self.value(ConditionName::T).await,
        }
    }

    pub async fn resolve_all(&self) -> Vec<ResolvedCondition> {
        let mut resolved = Vec::with_capacity(ConditionName::ALL.len());
        for name in ConditionName::ALL {
            resolved.push(self.resolve(name).await);
        }
        resolved
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
