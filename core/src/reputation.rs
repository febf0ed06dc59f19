//! # Reputation Scoring
//!
//! A user's trust score is the plain average of their `N` newest rating grades.
//! Users nobody has rated yet score `S`, the top of the scale.
//!
//! Scores are kept as exact fractions so that threshold comparisons downstream
//! never depend on floating point rounding.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bidgate_common::error::StoreError;
use bidgate_common::ids::UserId;
use bidgate_common::ratings::RatingStore;
use tracing::{debug, instrument, warn};

use crate::conditions::{ConditionReader, Thresholds};
use crate::deadline;

/// Exact rational score, `numerator / denominator` with a positive denominator.
#[derive(Debug, Clone, Copy)]
pub struct TrustScore {
    numerator: i64,
    denominator: i64,
}

impl TrustScore {
    /// Returns `None` for a zero denominator. A negative denominator is normalized,
    /// which fails with `None` when either side is `i64::MIN`.
    pub fn new(numerator: i64, denominator: i64) -> Option<Self> {
        match denominator.cmp(&0) {
            Ordering::Equal => None,
            Ordering::Greater => Some(Self {
                numerator,
                denominator,
            }),
            Ordering::Less => Some(Self {
                numerator: numerator.checked_neg()?,
                denominator: denominator.checked_neg()?,
            }),
        }
    }

    pub fn whole(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }

    /// Mean of `grades`, or `None` when there are none.
    pub fn mean<I>(grades: I) -> Option<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let (sum, count) = grades
            .into_iter()
            .fold((0_i64, 0_i64), |(sum, count), g| (sum + g, count + 1));
        Self::new(sum, count)
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// For display. Decisions never go through this.
    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    fn cross(&self, other: &Self) -> (i128, i128) {
        (
            i128::from(self.numerator) * i128::from(other.denominator),
            i128::from(other.numerator) * i128::from(self.denominator),
        )
    }
}

impl PartialEq for TrustScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TrustScore {}

impl PartialOrd for TrustScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TrustScore {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = self.cross(other);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for TrustScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

/// Lowest grade a rating can carry.
pub const MIN_GRADE: i64 = 1;

#[derive(Clone)]
pub struct ReputationScorer {
    conditions: ConditionReader,
    ratings: Arc<dyn RatingStore>,
    timeout: Duration,
}

impl ReputationScorer {
    pub fn new(conditions: ConditionReader, ratings: Arc<dyn RatingStore>, timeout: Duration) -> Self {
        Self {
            conditions,
            ratings,
            timeout,
        }
    }

    /// Trust score of `user` over at most `N` of their newest ratings.
    ///
    /// Fewer than `N` ratings are averaged as they are, without padding.
    pub async fn score(&self, user: UserId) -> Result<TrustScore, StoreError> {
        let thresholds = self.conditions.thresholds().await;
        self.score_with(user, &thresholds).await
    }

    /// [`score`](Self::score) against thresholds the caller already resolved.
    ///
    /// Grades outside `1..=S` are clamped into the scale before averaging.
    #[instrument(skip(self, thresholds), level = "debug")]
    pub async fn score_with(&self, user: UserId, thresholds: &Thresholds) -> Result<TrustScore, StoreError> {
        let max_grade = thresholds.max_grade;
        let limit = usize::try_from(thresholds.window).unwrap_or(0);

        let ratings = if limit == 0 {
            Vec::new()
        } else {
            deadline::bounded(self.timeout, self.ratings.recent_ratings_for(user, limit)).await?
        };

        let top = max_grade.max(MIN_GRADE);
        let grades = ratings.iter().take(limit).map(|r| {
            if !(MIN_GRADE..=top).contains(&r.grade) {
                warn!(%user, rating = %r.id, grade = r.grade, max_grade, "grade outside the scale, clamped");
            }
            r.grade.clamp(MIN_GRADE, top)
        });
        let score = TrustScore::mean(grades).unwrap_or_else(|| TrustScore::whole(max_grade));
        debug!(%user, considered = ratings.len().min(limit), %score, "trust score computed");
        Ok(score)
    }
}
