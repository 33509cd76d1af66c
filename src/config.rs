use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::game::predictor::{SmaSlopePredictor, DEFAULT_SMA_PERIOD};
use crate::game::round::GameRules;
use crate::game::window::{
    StartWindow, DEFAULT_CONTEXT_DAYS, DEFAULT_LOOKBACK_DAYS, DEFAULT_MIN_AGE_DAYS,
};

/// Roughly a century; larger offsets overflow calendar arithmetic.
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub alphavantage: AlphaVantageConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlphaVantageConfig {
    pub base_url: String,
    #[serde(default = "default_function")]
    pub function: String,
    #[serde(default = "default_outputsize")]
    pub outputsize: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub lookback_days: i64,
    pub min_age_days: i64,
    pub context_days: usize,
    pub baseline_model: bool,
    pub sma_period: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub ttl_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: PathBuf,
}

fn default_function() -> String {
    "TIME_SERIES_DAILY_ADJUSTED".to_string()
}

fn default_outputsize() -> String {
    "full".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            min_age_days: DEFAULT_MIN_AGE_DAYS,
            context_days: DEFAULT_CONTEXT_DAYS,
            baseline_model: true,
            sma_period: DEFAULT_SMA_PERIOD,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("data/series_cache.sqlite"),
            ttl_hours: 12,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("ticker-guess.log"),
        }
    }
}

impl GameConfig {
    pub fn rules(&self) -> GameRules {
        GameRules {
            window: StartWindow {
                lookback_days: self.lookback_days,
                min_age_days: self.min_age_days,
                context_days: self.context_days,
            },
            baseline: self
                .baseline_model
                .then(|| SmaSlopePredictor::new(self.sma_period)),
        }
    }
}

impl CacheConfig {
    pub fn ttl_ms(&self) -> i64 {
        (self.ttl_hours as i64).saturating_mul(3_600_000)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config: Config =
            toml::from_str(&config_str).context("failed to parse config/default.toml")?;

        config.alphavantage.api_key = std::env::var("ALPHAVANTAGE_API_KEY")
            .context("ALPHAVANTAGE_API_KEY not set in .env or environment")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let game = &self.game;
        if game.min_age_days < 0 {
            bail!("game.min_age_days must be >= 0, got {}", game.min_age_days);
        }
        if game.lookback_days <= game.min_age_days {
            bail!(
                "game.lookback_days ({}) must be greater than game.min_age_days ({})",
                game.lookback_days,
                game.min_age_days
            );
        }
        if game.lookback_days > MAX_LOOKBACK_DAYS {
            bail!(
                "game.lookback_days must be <= {}, got {}",
                MAX_LOOKBACK_DAYS,
                game.lookback_days
            );
        }
        if game.sma_period == 0 {
            bail!("game.sma_period must be > 0");
        }
        if self.cache.ttl_hours == 0 {
            bail!("cache.ttl_hours must be > 0");
        }
        if self.alphavantage.base_url.trim().is_empty() {
            bail!("alphavantage.base_url must not be empty");
        }
        Ok(())
    }
}
