use std::fmt;

use crate::indicator::sma::sma_at;

pub const DEFAULT_SMA_PERIOD: usize = 5;

/// Which way a close is expected (or guessed) to move next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "UP"),
            Self::Down => write!(f, "DOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
    Up,
    Down,
    Unavailable,
}

impl Suggestion {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Unavailable => None,
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "UP"),
            Self::Down => write!(f, "DOWN"),
            Self::Unavailable => write!(f, "---"),
        }
    }
}

/// Naive benchmark: follow the slope of a short simple moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaSlopePredictor {
    period: usize,
}

impl SmaSlopePredictor {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn sma(&self, closes: &[f64], idx: usize) -> Option<f64> {
        sma_at(closes, idx, self.period)
    }

    /// Call for the transition from `idx` to `idx + 1`.
    ///
    /// A flat average (equal to the previous one) is called `Down`.
    pub fn suggest(&self, closes: &[f64], idx: usize) -> Suggestion {
        // both SMA(idx) and SMA(idx - 1) need a full window
        if idx < self.period || idx >= closes.len() {
            return Suggestion::Unavailable;
        }
        // SMA(idx) - SMA(idx - 1) == (close[idx] - close[idx - period]) / period,
        // compared on the closes so rounding cannot break a tie
        if closes[idx] > closes[idx - self.period] {
            Suggestion::Up
        } else {
            Suggestion::Down
        }
    }
}

impl Default for SmaSlopePredictor {
    fn default() -> Self {
        Self::new(DEFAULT_SMA_PERIOD)
    }
}
