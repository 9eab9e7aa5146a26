//! History provider trait and structured error types.
//!
//! The HistoryProvider trait abstracts over the market-data source so the batch
//! fetcher can be driven by Yahoo Finance in production and by a scripted
//! provider in tests.

use chrono::{Months, NaiveDate};
use thiserror::Error;

/// One daily observation as returned by a provider, before tagging.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

/// Per-ticker fetch failures. None of these abort a batch.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider error: {0}")]
    Provider(String),
}

/// Inclusive date range requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HistoryWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window covering the last `years` calendar years up to and including `today`.
    ///
    /// Feb 29 clamps to Feb 28 when the start year is not a leap year.
    pub fn lookback_years(years: u32, today: NaiveDate) -> Self {
        let start = today
            .checked_sub_months(Months::new(years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }
}

/// Trait for daily-history sources.
pub trait HistoryProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily close/volume bars for one symbol, oldest first.
    ///
    /// An empty vector is a valid answer: the symbol exists but has no
    /// trading days inside the window.
    fn fetch_history(
        &self,
        symbol: &str,
        window: HistoryWindow,
    ) -> Result<Vec<HistoryBar>, DataError>;
}
