use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use ticker_guess::config::Config;
use ticker_guess::event::AppEvent;
use ticker_guess::market::alphavantage::AlphaVantageClient;
use ticker_guess::market::cache::SeriesCache;
use ticker_guess::market::loader::{load_series, SharedCache};
use ticker_guess::prefs;
use ticker_guess::ui::{self, AppState, FetchRequest, KeyOutcome};

fn open_cache(config: &Config) -> Option<SharedCache> {
    if !config.cache.enabled {
        return None;
    }
    match SeriesCache::open(&config.cache.path, config.cache.ttl_ms()) {
        Ok(cache) => {
            tracing::info!(path = %config.cache.path.display(), ttl_ms = cache.ttl_ms(), "Series cache opened");
            Some(Arc::new(Mutex::new(cache)))
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %config.cache.path.display(), "Series cache unavailable, fetching without it");
            None
        }
    }
}

fn spawn_fetch(
    req: FetchRequest,
    client: &Arc<AlphaVantageClient>,
    cache: &Option<SharedCache>,
    app_tx: &mpsc::Sender<AppEvent>,
) {
    if let Err(e) = prefs::persist_last_ticker(&req.ticker) {
        tracing::warn!(error = %e, "Failed to persist last ticker");
    }

    let client = client.clone();
    let cache = cache.clone();
    let tx = app_tx.clone();
    tokio::spawn(async move {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let result = load_series(&req.ticker, cache.as_ref(), now_ms, move |ticker| async move {
            client.fetch_series(&ticker).await
        })
        .await;
        let event = match result {
            Ok(loaded) => AppEvent::SeriesLoaded {
                token: req.token,
                ticker: req.ticker,
                loaded,
            },
            Err(error) => AppEvent::SeriesFailed {
                token: req.token,
                ticker: req.ticker,
                error,
            },
        };
        if let Err(e) = tx.send(event).await {
            tracing::error!(error = %e, "Failed to deliver fetch result");
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure .env file exists with ALPHAVANTAGE_API_KEY");
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create(&config.logging.file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        base_url = %config.alphavantage.base_url,
        cache_enabled = config.cache.enabled,
        baseline_model = config.game.baseline_model,
        "Starting ticker-guess"
    );

    let client = match AlphaVantageClient::new(&config.alphavantage) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let cache = open_cache(&config);

    let last_ticker = match prefs::load_last_ticker() {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load last ticker");
            None
        }
    };

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(64);

    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(config.game.rules(), last_ticker);
    app_state.push_log("ticker-guess started | enter a ticker".to_string());
    if cache.is_none() && config.cache.enabled {
        app_state.push_log("[WARN] Series cache unavailable".to_string());
    }

    loop {
        terminal.draw(|frame| ui::render(frame, &app_state))?;

        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c'))
                {
                    tracing::info!("Ctrl+C received");
                    break;
                }
                match app_state.handle_key(&key.code) {
                    KeyOutcome::Quit => {
                        tracing::info!("User quit");
                        break;
                    }
                    KeyOutcome::Fetch(req) => {
                        tracing::info!(ticker = %req.ticker, token = req.token, "Starting game");
                        spawn_fetch(req, &client, &cache, &app_tx);
                    }
                    KeyOutcome::Handled => {}
                }
            }
        }

        while let Ok(event) = app_rx.try_recv() {
            app_state.apply(event);
        }
    }

    ratatui::restore();
    tracing::info!(score = app_state.session.score(), "Shutdown complete");
    println!("Goodbye! Check {} for details.", config.logging.file.display());
    Ok(())
}
