//! sectorfeed core: sector-grouped daily history fetching.
//!
//! - Ordered sector map with a one-sector-per-ticker invariant
//! - History provider trait and a Yahoo Finance implementation
//! - Sequential batch fetcher with per-ticker error isolation and fixed pacing
//! - Result table with fixed column order, CSV output and console preview

pub mod config;
pub mod data;
pub mod table;

pub use config::{ConfigError, FetchConfig};
pub use table::{HistoryRow, ResultTable, TableError, COLUMNS};
