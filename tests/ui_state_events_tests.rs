use chrono::{Duration, NaiveDate};
use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ticker_guess::error::GameError;
use ticker_guess::event::AppEvent;
use ticker_guess::game::{GameRules, Phase, SmaSlopePredictor, StartWindow};
use ticker_guess::market::loader::{LoadedSeries, SeriesOrigin};
use ticker_guess::model::price::{PricePoint, Series};
use ticker_guess::ui::{AppState, KeyOutcome, ResultTone, EMPTY_TICKER_MESSAGE, PROMPT_MESSAGE};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn june_series(closes: &[f64]) -> Series {
    let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    Series::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| PricePoint::new(start + Duration::days(i as i64), *c))
            .collect(),
    )
}

fn rules(with_model: bool) -> GameRules {
    GameRules {
        window: StartWindow::default(),
        baseline: with_model.then(|| SmaSlopePredictor::new(5)),
    }
}

fn loaded(token: u64, ticker: &str, closes: &[f64]) -> AppEvent {
    AppEvent::SeriesLoaded {
        token,
        ticker: ticker.to_string(),
        loaded: LoadedSeries {
            series: june_series(closes),
            origin: SeriesOrigin::Network,
        },
    }
}

fn started_state(with_model: bool) -> AppState {
    let mut s = AppState::new(rules(with_model), Some("ACME".to_string()));
    let req = s.submit_ticker().expect("fetch should be requested");
    s.apply_with(
        loaded(req.token, &req.ticker, &[10.0, 11.0, 9.0, 9.0, 9.0, 9.0, 9.0, 12.0]),
        today(),
        &mut StdRng::seed_from_u64(1),
    );
    s
}

#[test]
/// Verifies form validation: a blank ticker shows the prompt error and does
/// not start a fetch.
fn blank_ticker_is_rejected() {
    let mut s = AppState::new(rules(false), None);
    s.ticker_input = "   ".to_string();
    assert!(s.submit_ticker().is_none());
    assert_eq!(s.form_error, EMPTY_TICKER_MESSAGE);
    assert!(!s.loading);
}

#[test]
/// Verifies submission normalizes the ticker and enters the loading gate, in
/// which guesses are ignored.
fn submit_normalizes_and_gates_guesses() {
    let mut s = AppState::new(rules(false), None);
    s.ticker_input = " aapl ".to_string();
    let req = s.submit_ticker().expect("fetch should be requested");
    assert_eq!(req.ticker, "AAPL");
    assert_eq!(req.token, s.session_token);
    assert!(s.loading);
    assert!(s.submit_ticker().is_none());

    s.input_focused = false;
    assert_eq!(s.handle_key(&KeyCode::Up), KeyOutcome::Handled);
    assert!(s.history.is_empty());
    assert_eq!(s.session.phase(), Phase::NotStarted);
}

#[test]
/// Verifies a matching fetch result starts the round and draws the seven-day
/// context window.
fn loaded_series_starts_round() {
    let s = started_state(false);
    assert!(!s.loading);
    assert!(!s.input_focused);
    assert_eq!(s.session.phase(), Phase::InRound);
    assert_eq!(s.history.len(), 7);
    assert_eq!(s.round_result, PROMPT_MESSAGE);
    assert_eq!(s.ticker(), Some("ACME"));
    assert_eq!(s.current_date(), NaiveDate::from_ymd_opt(2024, 6, 7));
}

#[test]
/// Verifies the stale-result guard: a result for an abandoned request does not
/// start a game.
fn stale_result_is_ignored() {
    let mut s = AppState::new(rules(false), Some("OLD".to_string()));
    let stale = s.submit_ticker().unwrap();
    s.restart();
    assert!(!s.loading);

    s.apply_with(
        loaded(stale.token, &stale.ticker, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]),
        today(),
        &mut StdRng::seed_from_u64(1),
    );
    assert_eq!(s.session.phase(), Phase::NotStarted);
    assert!(s.history.is_empty());

    s.apply_with(
        AppEvent::SeriesFailed {
            token: stale.token,
            ticker: stale.ticker,
            error: GameError::InvalidTicker,
        },
        today(),
        &mut StdRng::seed_from_u64(1),
    );
    assert!(s.form_error.is_empty());
}

#[test]
/// Verifies fetch failures surface the player message and hint and leave no
/// game running.
fn fetch_failure_shows_message_and_hint() {
    let mut s = AppState::new(rules(false), Some("IBM".to_string()));
    let req = s.submit_ticker().unwrap();
    s.apply_with(
        AppEvent::SeriesFailed {
            token: req.token,
            ticker: req.ticker,
            error: GameError::RateLimited {
                message: "API limit reached. Please wait a minute and try again.".to_string(),
            },
        },
        today(),
        &mut StdRng::seed_from_u64(1),
    );
    assert!(!s.loading);
    assert_eq!(
        s.form_error,
        "API limit reached. Please wait a minute and try again."
    );
    assert_eq!(
        s.form_note,
        "Alpha Vantage limits 5 requests/minute on free tier."
    );
    assert_eq!(s.session.phase(), Phase::NotStarted);
}

#[test]
/// Verifies a series without a usable start window reports insufficient data.
fn insufficient_window_reports_error() {
    let mut s = AppState::new(rules(false), Some("NEW".to_string()));
    let req = s.submit_ticker().unwrap();
    s.apply_with(
        loaded(req.token, &req.ticker, &[1.0, 2.0, 3.0]),
        today(),
        &mut StdRng::seed_from_u64(1),
    );
    assert_eq!(
        s.form_error,
        "Not enough data in the last 100 days for this ticker."
    );
    assert_eq!(s.session.phase(), Phase::NotStarted);
}

#[test]
/// Verifies the keyboard round trip: up arrow resolves a guess, appends the
/// revealed day to the chart and colors the result.
fn arrow_key_guess_appends_point() {
    let mut s = started_state(false);
    s.handle_key(&KeyCode::Up);
    assert_eq!(s.session.score(), 1);
    assert_eq!(s.history.len(), 8);
    assert_eq!(s.result_tone, ResultTone::Win);
    assert_eq!(
        s.round_result,
        "Correct! 2024-06-08 close: 12.00 (+33.33%)."
    );

    s.handle_key(&KeyCode::Down);
    assert_eq!(s.session.phase(), Phase::Ended);
    assert_eq!(s.round_result, "No more data available. The game has ended.");
}

#[test]
/// Verifies ending the game reports the final score, after which only
/// restart is accepted.
fn end_key_reports_final_score() {
    let mut s = started_state(true);
    s.handle_key(&KeyCode::Char('E'));
    assert_eq!(s.session.phase(), Phase::Ended);
    assert_eq!(s.round_result, "Game over. Final score: 0 (model: 0).");

    s.handle_key(&KeyCode::Up);
    assert_eq!(s.history.len(), 7);

    s.handle_key(&KeyCode::Char('r'));
    assert_eq!(s.session.phase(), Phase::NotStarted);
    assert!(s.input_focused);
    assert!(s.history.is_empty());
}

#[test]
/// Verifies typing edits the ticker field and Enter requests a fetch.
fn typing_then_enter_requests_fetch() {
    let mut s = AppState::new(rules(false), None);
    for c in ['m', 's', 'f', 'x'] {
        s.handle_key(&KeyCode::Char(c));
    }
    s.handle_key(&KeyCode::Backspace);
    assert_eq!(s.ticker_input, "MSF");
    s.handle_key(&KeyCode::Char('t'));

    let KeyOutcome::Fetch(req) = s.handle_key(&KeyCode::Enter) else {
        panic!("enter should request a fetch");
    };
    assert_eq!(req.ticker, "MSFT");

    s.handle_key(&KeyCode::Esc);
    assert!(!s.input_focused);
    assert_eq!(s.handle_key(&KeyCode::Char('q')), KeyOutcome::Quit);
}

#[test]
/// Verifies the model's call is reported alongside the player's result.
fn model_call_is_reported() {
    let mut s = started_state(true);
    assert!(s.suggestion().is_some());
    assert!(s.current_sma().is_some());
    s.handle_key(&KeyCode::Down);
    assert!(s.round_result.starts_with("Wrong. 2024-06-08 close: 12.00"));
    assert!(s.round_result.contains("Model said"));
}
