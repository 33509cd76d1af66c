use thiserror::Error;

const RATE_LIMIT_HINT: &str = "Alpha Vantage limits 5 requests/minute on free tier.";
const API_KEY_HINT: &str = "Check your API key value and daily limits.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("{message}")]
    RateLimited { message: String },

    #[error("Invalid ticker symbol. Please try another.")]
    InvalidTicker,

    #[error("{0}")]
    InformationalRejection(String),

    #[error("Unexpected API response. Please try again in a moment.")]
    MalformedResponse,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Not enough historical data within the required window for this ticker.")]
    InsufficientData,

    #[error("No more data available. The game has ended.")]
    DataExhausted,
}

impl GameError {
    /// Text shown in the form error line.
    ///
    /// `lookback_days` is only used to word [`GameError::InsufficientData`].
    pub fn user_message(&self, lookback_days: i64) -> String {
        match self {
            Self::InvalidTicker => "Ticker not found. Please try another.".to_string(),
            Self::InsufficientData => format!(
                "Not enough data in the last {} days for this ticker.",
                lookback_days
            ),
            other => {
                let msg = other.to_string();
                if msg.trim().is_empty() {
                    "Something went wrong. Please try again.".to_string()
                } else {
                    msg
                }
            }
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RateLimited { .. } => Some(RATE_LIMIT_HINT),
            Self::InformationalRejection(text) if text.to_ascii_lowercase().contains("api key") => {
                Some(API_KEY_HINT)
            }
            _ => None,
        }
    }

    /// Short stable tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::InvalidTicker => "invalid_ticker",
            Self::InformationalRejection(_) => "information",
            Self::MalformedResponse => "malformed_response",
            Self::NetworkError(_) => "network",
            Self::InsufficientData => "insufficient_data",
            Self::DataExhausted => "data_exhausted",
        }
    }
}

impl From<reqwest::Error> for GameError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::NetworkError(status.as_u16().to_string()),
            None => Self::NetworkError(err.to_string()),
        }
    }
}
