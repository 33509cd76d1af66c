use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::AlphaVantageConfig;
use crate::error::GameError;
use crate::model::price::{PricePoint, Series};

const RATE_LIMIT_MARKER: &str = "Thank you for using Alpha Vantage";
const RATE_LIMIT_MESSAGE: &str = "API limit reached. Please wait a minute and try again.";
const SERIES_KEY: &str = "Time Series (Daily)";
const CLOSE_KEY: &str = "4. close";

pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    function: String,
    outputsize: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(cfg: &AlphaVantageConfig) -> Result<Self, GameError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| GameError::NetworkError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            function: cfg.function.clone(),
            outputsize: cfg.outputsize.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    fn compact_body(body: &str) -> String {
        let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.chars().count() > 180 {
            format!("{}...", normalized.chars().take(180).collect::<String>())
        } else {
            normalized
        }
    }

    /// Fetch the full daily history for `ticker`, ascending by date.
    pub async fn fetch_series(&self, ticker: &str) -> Result<Series, GameError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("function", self.function.as_str()),
                ("symbol", ticker),
                ("apikey", self.api_key.as_str()),
                ("outputsize", self.outputsize.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                ticker = %ticker,
                detail = %Self::compact_body(&body),
                "alphavantage daily series returned non-success"
            );
            return Err(GameError::NetworkError(status.as_u16().to_string()));
        }

        let root: Value = response.json().await.map_err(|e| {
            tracing::warn!(ticker = %ticker, error = %e, "alphavantage JSON parse failed");
            GameError::MalformedResponse
        })?;
        parse_daily_series(&root)
    }
}

/// Classify an Alpha Vantage daily-series payload.
///
/// Service notices are checked before the series itself; their precedence is
/// `Note`, `Information`, `Error Message`.
pub fn parse_daily_series(root: &Value) -> Result<Series, GameError> {
    if let Some(note) = root.get("Note") {
        let note = note.as_str().unwrap_or_default();
        let message = if note.contains(RATE_LIMIT_MARKER) {
            RATE_LIMIT_MESSAGE.to_string()
        } else {
            note.to_string()
        };
        return Err(GameError::RateLimited { message });
    }
    if let Some(info) = root.get("Information") {
        return Err(GameError::InformationalRejection(
            info.as_str().unwrap_or_default().to_string(),
        ));
    }
    if root.get("Error Message").is_some() {
        return Err(GameError::InvalidTicker);
    }

    let Some(entries) = root.get(SERIES_KEY).and_then(Value::as_object) else {
        tracing::warn!(
            detail = %AlphaVantageClient::compact_body(&root.to_string()),
            "alphavantage unexpected response"
        );
        return Err(GameError::MalformedResponse);
    };

    let mut points = Vec::with_capacity(entries.len());
    for (date_str, bar) in entries {
        let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
            tracing::debug!(date = %date_str, "skipping unparsable date key");
            continue;
        };
        let close = match bar.get(CLOSE_KEY) {
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(Value::Number(n)) => n.as_f64(),
            _ => None,
        };
        if let Some(close) = close.filter(|c| c.is_finite()) {
            points.push(PricePoint::new(date, close));
        }
    }
    Ok(Series::new(points))
}
