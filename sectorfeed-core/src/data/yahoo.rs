//! Yahoo Finance history provider.
//!
//! Fetches daily bars from Yahoo's v8 chart API and keeps only the close and
//! volume series. Every request is a single attempt: retry and backoff are left
//! to the caller's pacing, so a failure here is reported and the ticker skipped.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::provider::{DataError, HistoryBar, HistoryProvider, HistoryWindow};
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

const CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart/";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds (19800 for NSE).
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance history provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Provider(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Build the chart API URL for a symbol and window.
    fn chart_url(symbol: &str, window: HistoryWindow) -> Result<Url, DataError> {
        let start_ts = start_of_day(window.start);
        let end_ts = start_of_day(window.end) + 86_399;

        let mut url = Url::parse(CHART_BASE)
            .map_err(|e| DataError::Provider(format!("bad chart base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| DataError::Provider("chart base URL cannot take a path".into()))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("period1", &start_ts.to_string())
            .append_pair("period2", &end_ts.to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        Ok(url)
    }

    /// Parse the chart API response into bars, oldest first.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<HistoryBar>, DataError> {
        if let Some(err) = resp.chart.error {
            return Err(if err.code == "Not Found" {
                DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }
            } else {
                DataError::Provider(format!("{}: {}", err.code, err.description))
            });
        }

        let data = resp
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::ResponseFormatChanged("empty result with no error".into()))?;

        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        // Yahoo omits the timestamp array entirely when the window holds no trading days.
        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Holidays and suspended sessions come back as all-null rows
            if close.is_none() && volume.is_none() {
                continue;
            }

            bars.push(HistoryBar {
                date,
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
            });
        }

        Ok(bars)
    }
}

fn start_of_day(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

impl HistoryProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        window: HistoryWindow,
    ) -> Result<Vec<HistoryBar>, DataError> {
        let url = Self::chart_url(symbol, window)?;
        tracing::debug!(%url, symbol, "requesting chart");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        // Unknown symbols answer 404 with a chart error body, so parse before
        // giving up on a non-success status.
        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        match serde_json::from_str::<ChartResponse>(&body) {
            Ok(chart) => Self::parse_response(symbol, chart),
            Err(_) if !status.is_success() => Err(DataError::Http {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            }),
            Err(e) => Err(DataError::ResponseFormatChanged(format!(
                "failed to parse response for {symbol}: {e}"
            ))),
        }
    }
}
