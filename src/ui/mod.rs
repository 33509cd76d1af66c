pub mod chart;
pub mod dashboard;

use chrono::NaiveDate;
use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout};
use ratatui::Frame;

use crate::error::GameError;
use crate::event::AppEvent;
use crate::game::{Direction, GameRules, GameSession, GuessOutcome, Phase, Suggestion};
use crate::input::{parse_form_command, parse_game_command, FormCommand, GameCommand};
use crate::market::loader::SeriesOrigin;

use chart::{ChartSink, PriceChart, PriceHistory};
use dashboard::{KeybindBar, LogPanel, RoundPanel, StatusBar, TickerForm};

const MAX_LOG_MESSAGES: usize = 200;
const MAX_TICKER_LEN: usize = 16;

pub const PROMPT_MESSAGE: &str = "Make a prediction for the next trading day.";
pub const EMPTY_TICKER_MESSAGE: &str = "Please enter a stock ticker symbol.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTone {
    Neutral,
    Win,
    Lose,
}

/// A fetch the UI loop should start on the player's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: u64,
    pub ticker: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Fetch(FetchRequest),
    Quit,
}

pub struct AppState {
    pub session: GameSession,
    pub ticker_input: String,
    pub input_focused: bool,
    pub loading: bool,
    pub session_token: u64,
    pub form_error: String,
    pub form_note: String,
    pub round_result: String,
    pub result_tone: ResultTone,
    pub history: PriceHistory,
    pub log_messages: Vec<String>,
}

impl AppState {
    pub fn new(rules: GameRules, last_ticker: Option<String>) -> Self {
        Self {
            session: GameSession::new(rules),
            ticker_input: last_ticker.unwrap_or_default(),
            input_focused: true,
            loading: false,
            session_token: 0,
            form_error: String::new(),
            form_note: String::new(),
            round_result: String::new(),
            result_tone: ResultTone::Neutral,
            history: PriceHistory::default(),
            log_messages: Vec::new(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn ticker(&self) -> Option<&str> {
        self.session.round().map(|r| r.ticker.as_str())
    }

    pub fn current_date(&self) -> Option<NaiveDate> {
        self.session
            .round()
            .and_then(|r| r.current_point())
            .map(|p| p.date)
    }

    pub fn suggestion(&self) -> Option<Suggestion> {
        self.session
            .round()
            .and_then(|r| r.model)
            .map(|m| m.suggestion)
    }

    /// Baseline SMA at the current day, when the model is enabled.
    pub fn current_sma(&self) -> Option<f64> {
        let predictor = self.session.rules().baseline?;
        let round = self.session.round()?;
        predictor.sma(&round.closes, round.current_index)
    }

    fn playable(&self) -> bool {
        !self.loading && self.session.phase() == Phase::InRound
    }

    fn show_error(&mut self, err: &GameError) {
        let lookback = self.session.rules().window.lookback_days;
        self.form_error = err.user_message(lookback);
        self.form_note = err.hint().unwrap_or_default().to_string();
        self.push_log(format!("[ERR] {}", self.form_error));
    }

    /// Drop the running game and any fetch still in flight.
    pub fn reset_for_new_game(&mut self) {
        self.session.reset();
        self.session_token += 1;
        self.loading = false;
        self.form_error.clear();
        self.form_note.clear();
        self.round_result.clear();
        self.result_tone = ResultTone::Neutral;
        self.history.clear();
    }

    pub fn submit_ticker(&mut self) -> Option<FetchRequest> {
        if self.loading {
            return None;
        }
        let ticker = self.ticker_input.trim().to_ascii_uppercase();
        if ticker.is_empty() {
            self.form_error = EMPTY_TICKER_MESSAGE.to_string();
            self.form_note.clear();
            return None;
        }
        self.ticker_input = ticker.clone();
        self.reset_for_new_game();
        self.loading = true;
        self.push_log(format!("Loading {}...", ticker));
        Some(FetchRequest {
            token: self.session_token,
            ticker,
        })
    }

    pub fn restart(&mut self) {
        self.reset_for_new_game();
        self.input_focused = true;
    }

    pub fn guess(&mut self, direction: Direction) {
        if self.loading {
            return;
        }
        match self.session.resolve_guess(direction) {
            GuessOutcome::Ignored => {}
            GuessOutcome::Exhausted => {
                self.round_result = GameError::DataExhausted.to_string();
                self.result_tone = ResultTone::Neutral;
                self.push_log(self.round_result.clone());
            }
            GuessOutcome::Resolved(r) => {
                let verdict = if r.correct { "Correct!" } else { "Wrong." };
                let mut msg = format!(
                    "{} {} close: {:.2} ({}).",
                    verdict,
                    r.date,
                    r.close,
                    r.percent_text()
                );
                if let Some((call, model_correct)) = r.model {
                    msg.push_str(&format!(
                        " Model said {} ({}).",
                        call,
                        if model_correct { "right" } else { "wrong" }
                    ));
                }
                self.result_tone = if r.moved_up {
                    ResultTone::Win
                } else if r.moved_down {
                    ResultTone::Lose
                } else {
                    ResultTone::Neutral
                };
                self.history.append_point(r.date, r.close);
                self.push_log(format!("{} {} -> {}", r.guess, r.date, verdict));
                self.round_result = msg;
            }
        }
    }

    pub fn end_game(&mut self) {
        if !self.playable() {
            return;
        }
        self.session.end_game();
        self.result_tone = ResultTone::Neutral;
        self.round_result = match self.session.model_score() {
            Some(model) => format!(
                "Game over. Final score: {} (model: {}).",
                self.session.score(),
                model
            ),
            None => format!("Game over. Final score: {}.", self.session.score()),
        };
        self.push_log(self.round_result.clone());
    }

    pub fn apply(&mut self, event: AppEvent) {
        let today = chrono::Local::now().date_naive();
        self.apply_with(event, today, &mut rand::thread_rng());
    }

    pub fn apply_with<R: Rng + ?Sized>(&mut self, event: AppEvent, today: NaiveDate, rng: &mut R) {
        match event {
            AppEvent::SeriesLoaded {
                token,
                ticker,
                loaded,
            } => {
                if token != self.session_token {
                    tracing::debug!(token, current = self.session_token, ticker = %ticker, "Ignoring stale series");
                    return;
                }
                self.loading = false;
                let points = loaded.series.len();
                match self.session.start_game(&ticker, loaded.series, today, rng) {
                    Ok(start) => {
                        let (labels, values) = start
                            .chart_window
                            .iter()
                            .map(|p| (p.date, p.close))
                            .unzip();
                        self.history.init_chart(labels, values);
                        self.round_result = PROMPT_MESSAGE.to_string();
                        self.result_tone = ResultTone::Neutral;
                        self.input_focused = false;
                        let origin = match loaded.origin {
                            SeriesOrigin::Cache => "cache",
                            SeriesOrigin::Network => "network",
                        };
                        self.push_log(format!(
                            "{} loaded from {} ({} days)",
                            ticker, origin, points
                        ));
                    }
                    Err(e) => {
                        tracing::warn!(ticker = %ticker, kind = e.kind(), "Round could not start");
                        self.show_error(&e);
                    }
                }
            }
            AppEvent::SeriesFailed {
                token,
                ticker,
                error,
            } => {
                if token != self.session_token {
                    tracing::debug!(token, current = self.session_token, ticker = %ticker, "Ignoring stale fetch failure");
                    return;
                }
                self.loading = false;
                self.session.reset();
                tracing::warn!(ticker = %ticker, kind = error.kind(), error = %error, "Series fetch failed");
                self.show_error(&error);
            }
        }
    }

    pub fn handle_key(&mut self, key_code: &KeyCode) -> KeyOutcome {
        if self.input_focused {
            return self.handle_form_key(key_code);
        }
        let Some(cmd) = parse_game_command(key_code) else {
            return KeyOutcome::Handled;
        };
        match cmd {
            GameCommand::Quit => return KeyOutcome::Quit,
            GameCommand::FocusTicker => self.input_focused = true,
            GameCommand::Restart => self.restart(),
            GameCommand::GuessUp if self.playable() => self.guess(Direction::Up),
            GameCommand::GuessDown if self.playable() => self.guess(Direction::Down),
            GameCommand::EndGame => self.end_game(),
            GameCommand::GuessUp | GameCommand::GuessDown => {}
        }
        KeyOutcome::Handled
    }

    fn handle_form_key(&mut self, key_code: &KeyCode) -> KeyOutcome {
        let Some(cmd) = parse_form_command(key_code) else {
            return KeyOutcome::Handled;
        };
        match cmd {
            FormCommand::Insert(c) => {
                if !self.loading && self.ticker_input.len() < MAX_TICKER_LEN {
                    self.ticker_input.push(c.to_ascii_uppercase());
                }
            }
            FormCommand::Backspace => {
                if !self.loading {
                    self.ticker_input.pop();
                }
            }
            FormCommand::Submit => {
                if let Some(req) = self.submit_ticker() {
                    return KeyOutcome::Fetch(req);
                }
            }
            FormCommand::Cancel => self.input_focused = false,
        }
        KeyOutcome::Handled
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(5), // ticker form
            Constraint::Min(10),   // chart + round panel
            Constraint::Length(6), // log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    let round = state.session.round();
    frame.render_widget(
        StatusBar {
            ticker: state.ticker(),
            date: state.current_date().map(|d| d.to_string()),
            score: state.session.score(),
            model_score: state.session.model_score(),
            loading: state.loading,
            ended: state.session.phase() == Phase::Ended,
        },
        outer[0],
    );

    frame.render_widget(
        TickerForm {
            input: &state.ticker_input,
            focused: state.input_focused,
            loading: state.loading,
            error: &state.form_error,
            note: &state.form_note,
        },
        outer[1],
    );

    let main_area = Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(32)])
        .split(outer[2]);

    let sma = state.current_sma();
    frame.render_widget(
        PriceChart::new(&state.history, state.ticker()).sma(sma),
        main_area[0],
    );

    frame.render_widget(
        RoundPanel {
            result: &state.round_result,
            tone: state.result_tone,
            suggestion: state.suggestion(),
            sma,
            guesses: round.map(|r| r.guesses_made()).unwrap_or(0),
        },
        main_area[1],
    );

    frame.render_widget(LogPanel::new(&state.log_messages), outer[3]);

    frame.render_widget(
        KeybindBar {
            typing: state.input_focused,
        },
        outer[4],
    );
}
