use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct PersistedPrefs {
    last_ticker: String,
}

fn prefs_path() -> PathBuf {
    std::env::var("TG_LAST_TICKER_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/last_ticker.json"))
}

pub fn load_last_ticker() -> Result<Option<String>> {
    load_last_ticker_from_path(&prefs_path())
}

pub fn load_last_ticker_from_path(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let persisted: PersistedPrefs =
        serde_json::from_str(&payload).context("failed to parse last ticker json")?;

    let ticker = persisted.last_ticker.trim().to_ascii_uppercase();
    Ok((!ticker.is_empty()).then_some(ticker))
}

pub fn persist_last_ticker(ticker: &str) -> Result<()> {
    persist_last_ticker_to_path(&prefs_path(), ticker)
}

pub fn persist_last_ticker_to_path(path: &Path, ticker: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let payload = PersistedPrefs {
        last_ticker: ticker.to_string(),
    };
    let json = serde_json::to_string_pretty(&payload)
        .context("failed to serialize last ticker json")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
