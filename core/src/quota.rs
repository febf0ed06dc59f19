//! # Quota Mapping
//!
//! Turns a trust score into the number of overlapping listings a seller may hold.
//!
//! With `a = floor(S / 2)`, `b = S`:
//! * `score < a` maps to `0`.
//! * `a <= score <= b` interpolates linearly from `1` at `a` to `T` at `b`, then
//!   rounds half away from zero.
//!
//! The result never leaves `[0, T]`.
//!
//! Everything is evaluated on the score's exact numerator and denominator in
//! 128-bit integers.

use tracing::debug;

use crate::conditions::{ConditionReader, Thresholds};
use crate::reputation::TrustScore;

/// Quota at the cutoff score `a`.
const FLOOR_QUOTA: i128 = 1;

#[derive(Clone)]
pub struct QuotaMapper {
    conditions: ConditionReader,
}

impl QuotaMapper {
    pub fn new(conditions: ConditionReader) -> Self {
        Self { conditions }
    }

    pub async fn quota(&self, score: TrustScore) -> u64 {
        let thresholds = self.conditions.thresholds().await;
        self.quota_with(score, &thresholds)
    }

    /// [`quota`](Self::quota) against thresholds the caller already resolved.
    pub fn quota_with(&self, score: TrustScore, thresholds: &Thresholds) -> u64 {
        let Thresholds {
            max_grade, ceiling, ..
        } = *thresholds;
        let quota = map_score(score, max_grade, ceiling);
        debug!(%score, max_grade, ceiling, quota, "quota mapped");
        quota
    }
}

/// Pure form of [`QuotaMapper::quota`] for explicit `S` and `T`.
///
/// When the scale collapses (`S - floor(S / 2) <= 0`, i.e. `S <= 0`) there is
/// nothing to interpolate over: scores at or above the cutoff get `T`.
/// Results are clamped to `[0, T]`, which also covers scores above `S` and a
/// `T` below one.
pub fn map_score(score: TrustScore, max_grade: i64, ceiling: i64) -> u64 {
    let cutoff = i128::from(max_grade.div_euclid(2));
    let num = i128::from(score.numerator());
    let den = i128::from(score.denominator());

    if num < cutoff * den {
        return 0;
    }

    let span = i128::from(max_grade) - cutoff;
    if span <= 0 {
        return clamp(i128::from(ceiling), ceiling);
    }

    // FLOOR_QUOTA + (T - FLOOR_QUOTA) * (score - a) / (b - a), over a common denominator.
    let rise = i128::from(ceiling) - FLOOR_QUOTA;
    let top = FLOOR_QUOTA * span * den + rise * (num - cutoff * den);
    let bottom = span * den;
    clamp(round_half_away(top, bottom), ceiling)
}

/// `top / bottom` rounded half away from zero. `bottom` must be positive.
fn round_half_away(top: i128, bottom: i128) -> i128 {
    if top >= 0 {
        (2 * top + bottom) / (2 * bottom)
    } else {
        -((-2 * top + bottom) / (2 * bottom))
    }
}

fn clamp(value: i128, ceiling: i64) -> u64 {
    let upper = i128::from(ceiling.max(0));
    u64::try_from(value.clamp(0, upper)).unwrap_or(u64::MAX)
}
