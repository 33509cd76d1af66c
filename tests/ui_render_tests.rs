use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use ticker_guess::event::AppEvent;
use ticker_guess::game::{GameRules, SmaSlopePredictor, StartWindow};
use ticker_guess::market::loader::{LoadedSeries, SeriesOrigin};
use ticker_guess::model::price::{PricePoint, Series};
use ticker_guess::ui::{self, AppState};

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn draw(state: &AppState) -> String {
    let backend = TestBackend::new(120, 40);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    terminal
        .draw(|frame| ui::render(frame, state))
        .expect("render should succeed");
    buffer_text(&terminal)
}

#[test]
/// Verifies the idle screen: no round yet, so the chart shows its placeholder
/// and the form carries the remembered ticker.
fn render_idle_screen() {
    let state = AppState::new(GameRules::default(), Some("IBM".to_string()));
    let text = draw(&state);
    assert!(text.contains("ticker-guess"));
    assert!(text.contains("IDLE"));
    assert!(text.contains("Ticker: IBM_"));
    assert!(text.contains("Enter a ticker to start a round."));
    assert!(text.contains("[Enter] start"));
}

#[test]
/// Verifies an active round renders the titled chart, the score, the model
/// call and the prompt.
fn render_round_in_progress() {
    let rules = GameRules {
        window: StartWindow::default(),
        baseline: Some(SmaSlopePredictor::default()),
    };
    let mut state = AppState::new(rules, Some("AAPL".to_string()));
    let req = state.submit_ticker().unwrap();

    let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let series = Series::new(
        (0..8)
            .map(|i| PricePoint::new(start + Duration::days(i), 100.0 + i as f64))
            .collect(),
    );
    state.apply_with(
        AppEvent::SeriesLoaded {
            token: req.token,
            ticker: req.ticker,
            loaded: LoadedSeries {
                series,
                origin: SeriesOrigin::Cache,
            },
        },
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        &mut StdRng::seed_from_u64(3),
    );

    let text = draw(&state);
    assert!(text.contains("Close (AAPL)"));
    assert!(text.contains("2024-06-07"));
    assert!(text.contains("score: 0"));
    assert!(text.contains("model: 0"));
    assert!(text.contains("IN ROUND"));
    assert!(text.contains("Model:  UP"));
    assert!(text.contains("AAPL loaded from cache (8 days)"));
    assert!(text.contains("[R]estart"));
}

#[test]
fn render_loading_state() {
    let mut state = AppState::new(GameRules::default(), Some("MSFT".to_string()));
    state.submit_ticker().unwrap();
    let text = draw(&state);
    assert!(text.contains("LOADING"));
    assert!(text.contains("Loading MSFT..."));
}
