use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::error::GameError;
use crate::model::price::Series;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 100;
pub const DEFAULT_MIN_AGE_DAYS: i64 = 7;
pub const DEFAULT_CONTEXT_DAYS: usize = 6;

/// Calendar range a round's first "today" is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartWindow {
    /// Oldest allowed start, in calendar days before today.
    pub lookback_days: i64,
    /// Newest allowed start, in calendar days before today.
    pub min_age_days: i64,
    /// Trading days that must precede the start for the initial chart.
    pub context_days: usize,
}

impl Default for StartWindow {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            min_age_days: DEFAULT_MIN_AGE_DAYS,
            context_days: DEFAULT_CONTEXT_DAYS,
        }
    }
}

impl StartWindow {
    /// Inclusive `(lower, upper)` date bounds relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (
            today - Duration::days(self.lookback_days),
            today - Duration::days(self.min_age_days),
        )
    }

    pub fn candidates(&self, series: &Series, today: NaiveDate) -> Vec<usize> {
        let (lower, upper) = self.bounds(today);
        let len = series.len();
        series
            .points()
            .iter()
            .enumerate()
            .filter(|(i, p)| {
                p.date >= lower && p.date <= upper && *i >= self.context_days && i + 1 < len
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Pick a start index uniformly among the candidates.
    pub fn select<R: Rng + ?Sized>(
        &self,
        series: &Series,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<usize, GameError> {
        let candidates = self.candidates(series, today);
        if candidates.is_empty() {
            return Err(GameError::InsufficientData);
        }
        Ok(candidates[rng.gen_range(0..candidates.len())])
    }
}
