use chrono::NaiveDate;
use rand::Rng;

use crate::error::GameError;
use crate::model::price::{PricePoint, Series};

use super::predictor::{Direction, SmaSlopePredictor, Suggestion};
use super::window::StartWindow;

/// Parameters fixed for every game a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameRules {
    pub window: StartWindow,
    /// `None` disables the baseline model.
    pub baseline: Option<SmaSlopePredictor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InRound,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTrack {
    pub suggestion: Suggestion,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct RoundState {
    pub ticker: String,
    pub series: Series,
    /// Closing prices of `series`, kept for the baseline model.
    pub closes: Vec<f64>,
    pub start_index: usize,
    pub current_index: usize,
    pub score: u32,
    pub model: Option<ModelTrack>,
    pub in_round: bool,
    pub ended: bool,
}

impl RoundState {
    pub fn current_point(&self) -> Option<&PricePoint> {
        self.series.get(self.current_index)
    }

    pub fn guesses_made(&self) -> usize {
        self.current_index - self.start_index
    }
}

/// Returned by a successful start.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundStart {
    pub start_index: usize,
    /// Context points up to and including the start day.
    pub chart_window: Vec<PricePoint>,
    pub suggestion: Option<Suggestion>,
}

/// One resolved trading-day transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub guess: Direction,
    pub date: NaiveDate,
    pub close: f64,
    pub correct: bool,
    pub moved_up: bool,
    pub moved_down: bool,
    pub percent_change: f64,
    /// Model call that was scored, and whether it was right.
    pub model: Option<(Suggestion, bool)>,
    /// Model call for the following transition.
    pub next_suggestion: Option<Suggestion>,
}

impl Resolution {
    pub fn percent_text(&self) -> String {
        let sign = if self.percent_change >= 0.0 { "+" } else { "" };
        format!("{}{:.2}%", sign, self.percent_change)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    /// No round in progress; nothing changed.
    Ignored,
    /// The series ran out; the round is now ended.
    Exhausted,
    Resolved(Resolution),
}

/// Direction of the move from `today` to `next` and its size in percent.
pub fn classify_move(today: f64, next: f64) -> (bool, bool, f64) {
    let moved_up = next > today;
    let moved_down = next < today;
    let percent_change = if today == 0.0 {
        0.0
    } else {
        (next - today) / today * 100.0
    };
    (moved_up, moved_down, percent_change)
}

/// Flat moves match neither direction.
pub fn is_correct(direction: Direction, moved_up: bool, moved_down: bool) -> bool {
    match direction {
        Direction::Up => moved_up,
        Direction::Down => moved_down,
    }
}

/// The single game a player is running.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    rules: GameRules,
    round: Option<RoundState>,
}

impl GameSession {
    pub fn new(rules: GameRules) -> Self {
        Self { rules, round: None }
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn phase(&self) -> Phase {
        match &self.round {
            None => Phase::NotStarted,
            Some(r) if r.ended => Phase::Ended,
            Some(_) => Phase::InRound,
        }
    }

    pub fn score(&self) -> u32 {
        self.round.as_ref().map(|r| r.score).unwrap_or(0)
    }

    pub fn model_score(&self) -> Option<u32> {
        self.round.as_ref().and_then(|r| r.model).map(|m| m.score)
    }

    /// Replace any prior round with a fresh one over `series`.
    ///
    /// On failure the session is left `NotStarted`.
    pub fn start_game<R: Rng + ?Sized>(
        &mut self,
        ticker: &str,
        series: Series,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<RoundStart, GameError> {
        self.round = None;
        let start_index = self.rules.window.select(&series, today, rng)?;
        let context_from = start_index.saturating_sub(self.rules.window.context_days);
        let chart_window = series.points()[context_from..=start_index].to_vec();

        let closes = series.closes();
        let model = self.rules.baseline.map(|predictor| ModelTrack {
            suggestion: predictor.suggest(&closes, start_index),
            score: 0,
        });

        tracing::info!(
            ticker = %ticker,
            start_index,
            start_date = %series.points()[start_index].date,
            points = series.len(),
            "Round started"
        );

        self.round = Some(RoundState {
            ticker: ticker.to_string(),
            series,
            closes,
            start_index,
            current_index: start_index,
            score: 0,
            model,
            in_round: true,
            ended: false,
        });

        Ok(RoundStart {
            start_index,
            chart_window,
            suggestion: model.map(|m| m.suggestion),
        })
    }

    pub fn resolve_guess(&mut self, direction: Direction) -> GuessOutcome {
        let baseline = self.rules.baseline;
        let Some(round) = self.round.as_mut() else {
            return GuessOutcome::Ignored;
        };
        if !round.in_round || round.ended {
            return GuessOutcome::Ignored;
        }

        let i = round.current_index;
        let (Some(today), Some(next)) = (round.series.get(i).copied(), round.series.get(i + 1).copied())
        else {
            round.ended = true;
            tracing::info!(ticker = %round.ticker, index = i, "Series exhausted, round ended");
            return GuessOutcome::Exhausted;
        };

        let (moved_up, moved_down, percent_change) = classify_move(today.close, next.close);
        let correct = is_correct(direction, moved_up, moved_down);
        if correct {
            round.score += 1;
        }

        let mut scored_model = None;
        if let Some(track) = round.model.as_mut() {
            if let Some(call) = track.suggestion.direction() {
                let model_correct = is_correct(call, moved_up, moved_down);
                if model_correct {
                    track.score += 1;
                }
                scored_model = Some((track.suggestion, model_correct));
            }
        }

        round.current_index = i + 1;

        let mut next_suggestion = None;
        if let (Some(track), Some(predictor)) = (round.model.as_mut(), baseline) {
            track.suggestion = predictor.suggest(&round.closes, round.current_index);
            next_suggestion = Some(track.suggestion);
        }

        tracing::debug!(
            ticker = %round.ticker,
            date = %next.date,
            guess = %direction,
            correct,
            score = round.score,
            "Guess resolved"
        );

        GuessOutcome::Resolved(Resolution {
            guess: direction,
            date: next.date,
            close: next.close,
            correct,
            moved_up,
            moved_down,
            percent_change,
            model: scored_model,
            next_suggestion,
        })
    }

    /// Idempotent; has no effect before a game started.
    pub fn end_game(&mut self) {
        if let Some(round) = self.round.as_mut() {
            if !round.ended {
                tracing::info!(ticker = %round.ticker, score = round.score, "Round ended");
            }
            round.ended = true;
        }
    }

    pub fn reset(&mut self) {
        self.round = None;
    }
}
