use crate::error::GameError;
use crate::market::loader::LoadedSeries;

/// Messages delivered to the UI loop from background tasks.
///
/// Fetch results carry the session token they were requested under so the
/// UI can drop results that belong to an abandoned game.
#[derive(Debug, Clone)]
pub enum AppEvent {
    SeriesLoaded {
        token: u64,
        ticker: String,
        loaded: LoadedSeries,
    },
    SeriesFailed {
        token: u64,
        ticker: String,
        error: GameError,
    },
}
