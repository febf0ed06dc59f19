//! # Conditions
//!
//! Administrator-tunable integer thresholds, looked up by name.
//!
//! | Name | Default | Meaning                                              |
//! |------|---------|------------------------------------------------------|
//! | `K`  | 10      | max active + future listings per seller              |
//! | `M`  | 5       | max listings per seller in one category              |
//! | `S`  | 10      | highest rating grade, and the score of unrated users |
//! | `N`  | 5       | how many recent ratings feed the trust score         |
//! | `T`  | 20      | quota granted to a perfect score                     |

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Stored value meaning "not configured". Legacy rows carry it instead of being deleted.
pub const ABSENT_SENTINEL: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionName {
    K,
    M,
    S,
    N,
    T,
}

impl ConditionName {
    pub const ALL: [ConditionName; 5] = [Self::K, Self::M, Self::S, Self::N, Self::T];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::K => "K",
            Self::M => "M",
            Self::S => "S",
            Self::N => "N",
            Self::T => "T",
        }
    }

    /// Hard-coded fallback used whenever the store has nothing usable.
    pub fn default_value(self) -> i64 {
        match self {
            Self::K => 10,
            Self::M => 5,
            Self::S => 10,
            Self::N => 5,
            Self::T => 20,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::K => "max active and future listings",
            Self::M => "max listings per category",
            Self::S => "maximum rating grade",
            Self::N => "ratings considered",
            Self::T => "quota at a perfect score",
        }
    }
}

impl fmt::Display for ConditionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "K" => Ok(Self::K),
            "M" => Ok(Self::M),
            "S" => Ok(Self::S),
            "N" => Ok(Self::N),
            "T" => Ok(Self::T),
            other => Err(format!("unknown condition: {other}")),
        }
    }
}

/// Named numeric key-value table.
///
/// Returns `Ok(None)` for names that are not configured. Implementations never
/// need to apply defaults, the engine does that.
#[async_trait]
pub trait ConditionStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<i64>, StoreError>;
}
