//! Batch fetcher: walks the sector map, fetches each ticker, tags the rows.

use super::pacing::Pacer;
use super::provider::{DataError, HistoryProvider, HistoryWindow};
use super::universe::SectorMap;
use crate::table::{HistoryRow, ResultTable, TableError};

/// Outcome of fetching a single ticker.
#[derive(Debug)]
pub struct TickerOutcome {
    pub sector: String,
    pub ticker: String,
    pub result: Result<Vec<HistoryRow>, DataError>,
}

/// Progress callback for batch fetches.
pub trait FetchProgress {
    /// Called before requesting a ticker.
    fn on_start(&self, ticker: &str, index: usize, total: usize);

    /// Called once the ticker's request has finished.
    fn on_complete(
        &self,
        ticker: &str,
        index: usize,
        total: usize,
        result: Result<usize, &DataError>,
    );

    /// Called when every ticker has been tried.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Writes the per-ticker error line to stderr and nothing else.
pub struct StderrProgress;

impl FetchProgress for StderrProgress {
    fn on_start(&self, _ticker: &str, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        ticker: &str,
        _index: usize,
        _total: usize,
        result: Result<usize, &DataError>,
    ) {
        if let Err(e) = result {
            eprintln!("{}", failure_line(ticker, e));
        }
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}

/// Console line reported for a ticker whose fetch failed.
pub fn failure_line(ticker: &str, error: &DataError) -> String {
    format!("Error fetching data for {ticker}: {error}")
}

/// Fetch every ticker in the map, in sector-then-ticker order.
///
/// Failures are reported and skipped; nothing is retried. The pacer runs after
/// every request regardless of the outcome.
pub fn fetch_sectors(
    provider: &dyn HistoryProvider,
    sectors: &SectorMap,
    window: HistoryWindow,
    pacer: &dyn Pacer,
    progress: &dyn FetchProgress,
) -> BatchReport {
    let total = sectors.ticker_count();
    let mut outcomes = Vec::with_capacity(total);

    tracing::info!(
        provider = provider.name(),
        tickers = total,
        start = %window.start,
        end = %window.end,
        "starting batch fetch"
    );

    for (i, (sector, ticker)) in sectors.pairs().enumerate() {
        progress.on_start(ticker, i, total);

        let result = provider.fetch_history(ticker, window).map(|bars| {
            bars.iter()
                .map(|bar| HistoryRow::tag(bar, ticker, sector))
                .collect::<Vec<_>>()
        });

        match &result {
            Ok(rows) => tracing::debug!(ticker, sector, rows = rows.len(), "fetched"),
            Err(e) => tracing::debug!(ticker, sector, error = %e, "fetch failed"),
        }

        progress.on_complete(ticker, i, total, result.as_ref().map(Vec::len));

        outcomes.push(TickerOutcome {
            sector: sector.to_string(),
            ticker: ticker.to_string(),
            result,
        });

        pacer.pace();
    }

    let report = BatchReport::fold(outcomes);
    progress.on_batch_complete(report.succeeded(), report.failed(), total);
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "batch fetch complete"
    );
    report
}

/// Per-ticker outcomes folded into successes and failures.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful row batches, in fetch order.
    pub batches: Vec<(String, Vec<HistoryRow>)>,
    /// Failed tickers with their errors, in fetch order.
    pub failures: Vec<(String, DataError)>,
}

impl BatchReport {
    pub fn fold(outcomes: impl IntoIterator<Item = TickerOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut report, outcome| {
                match outcome.result {
                    Ok(rows) => report.batches.push((outcome.ticker, rows)),
                    Err(e) => report.failures.push((outcome.ticker, e)),
                }
                report
            })
    }

    pub fn succeeded(&self) -> usize {
        self.batches.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded() + self.failed()
    }

    /// Concatenate the successful batches; fails if nothing succeeded.
    pub fn into_table(self) -> Result<ResultTable, TableError> {
        ResultTable::concat(self.batches.into_iter().map(|(_, rows)| rows).collect())
    }
}
