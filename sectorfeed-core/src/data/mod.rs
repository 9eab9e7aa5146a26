//! Market data: sector map, providers, pacing and the batch fetcher.

pub mod download;
pub mod pacing;
pub mod provider;
pub mod universe;
pub mod yahoo;

pub use download::{
    failure_line, fetch_sectors, BatchReport, FetchProgress, StderrProgress, TickerOutcome,
};
pub use pacing::{FixedInterval, NoPacing, Pacer};
pub use provider::{DataError, HistoryBar, HistoryProvider, HistoryWindow};
pub use universe::{Sector, SectorMap, UniverseError};
pub use yahoo::YahooProvider;
