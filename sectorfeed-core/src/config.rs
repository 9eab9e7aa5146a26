//! Run configuration.
//!
//! Every field has a compiled-in default; with no config file and no overrides
//! the run fetches the NIFTY 50 map over five years with a 500 ms pause between
//! tickers and writes `indian_sector_ticker_data2.csv`.
//!
//! Optional TOML layout:
//!
//! ```toml
//! lookback_years = 5
//! delay_ms = 500
//! output = "indian_sector_ticker_data2.csv"
//!
//! [[sector]]
//! name = "Telecommunication"
//! tickers = ["BHARTIARTL.NS"]
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::data::pacing::FixedInterval;
use crate::data::universe::{Sector, SectorMap, UniverseError};

pub const DEFAULT_LOOKBACK_YEARS: u32 = 5;
pub const DEFAULT_DELAY_MS: u64 = 500;
pub const DEFAULT_OUTPUT: &str = "indian_sector_ticker_data2.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {message}")]
    Io { path: String, message: String },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid sector map: {0}")]
    Universe(#[from] UniverseError),
}

/// On-disk shape; every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    lookback_years: Option<u32>,
    delay_ms: Option<u64>,
    output: Option<PathBuf>,
    preview_rows: Option<usize>,
    timeout_secs: Option<u64>,
    #[serde(default, rename = "sector")]
    sectors: Vec<Sector>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub sectors: SectorMap,
    pub lookback_years: u32,
    pub delay: Duration,
    pub output: PathBuf,
    pub preview_rows: usize,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            sectors: SectorMap::nifty50(),
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            output: PathBuf::from(DEFAULT_OUTPUT),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FetchConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string, filling gaps with defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let sectors = if raw.sectors.is_empty() {
            defaults.sectors
        } else {
            SectorMap::new(raw.sectors)?
        };

        Ok(Self {
            sectors,
            lookback_years: raw.lookback_years.unwrap_or(defaults.lookback_years),
            delay: raw.delay_ms.map(Duration::from_millis).unwrap_or(defaults.delay),
            output: raw.output.unwrap_or(defaults.output),
            preview_rows: raw.preview_rows.unwrap_or(defaults.preview_rows),
            timeout: raw
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        })
    }

    pub fn pacer(&self) -> FixedInterval {
        FixedInterval::new(self.delay)
    }
}
