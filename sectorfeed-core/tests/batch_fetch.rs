//! End-to-end batch runs against a scripted provider.
//!
//! Each test drives the full pipeline (sector map → fetch → concat → CSV) and
//! inspects the file that lands on disk.

use chrono::NaiveDate;
use sectorfeed_core::data::{
    failure_line, fetch_sectors, DataError, HistoryBar, HistoryProvider, HistoryWindow, NoPacing,
    SectorMap, StderrProgress,
};
use sectorfeed_core::{ResultTable, TableError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// Provider answering from a fixed table; unknown symbols are "not found".
#[derive(Default)]
struct ScriptedProvider {
    series: HashMap<String, Vec<HistoryBar>>,
    requests: RefCell<Vec<String>>,
}

impl ScriptedProvider {
    fn with(mut self, symbol: &str, bars: Vec<HistoryBar>) -> Self {
        self.series.insert(symbol.to_string(), bars);
        self
    }
}

impl HistoryProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        _window: HistoryWindow,
    ) -> Result<Vec<HistoryBar>, DataError> {
        self.requests.borrow_mut().push(symbol.to_string());
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

fn bar(y: i32, m: u32, d: u32, close: f64, volume: u64) -> HistoryBar {
    HistoryBar {
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        close,
        volume,
    }
}

fn window() -> HistoryWindow {
    HistoryWindow::lookback_years(5, NaiveDate::from_ymd_opt(2025, 6, 13).unwrap())
}

fn run(provider: &ScriptedProvider, map: &SectorMap, out: &Path) -> Result<ResultTable, TableError> {
    let report = fetch_sectors(provider, map, window(), &NoPacing, &StderrProgress);
    let table = report.into_table()?;
    table.write_csv(out)?;
    Ok(table)
}

fn read_records(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let header = rdr.headers().unwrap().iter().map(String::from).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

#[test]
fn single_ticker_two_rows() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let map = SectorMap::from_pairs(&[("Telecommunication", &["BHARTIARTL.NS"])]).unwrap();
    let provider = ScriptedProvider::default().with(
        "BHARTIARTL.NS",
        vec![
            bar(2025, 6, 12, 1850.5, 4_200_000),
            bar(2025, 6, 13, 1862.0, 3_900_000),
        ],
    );

    run(&provider, &map, &out).unwrap();

    let (header, rows) = read_records(&out);
    assert_eq!(header, vec!["Date", "ticker", "sector", "Close", "Volume"]);
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row[1], "BHARTIARTL.NS");
        assert_eq!(row[2], "Telecommunication");
    }
    assert_eq!(rows[0], vec!["2025-06-12", "BHARTIARTL.NS", "Telecommunication", "1850.5", "4200000"]);
    assert_eq!(rows[1][0], "2025-06-13");
}

#[test]
fn every_row_carries_its_tickers_sector() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let map = SectorMap::from_pairs(&[
        ("Power", &["NTPC.NS", "POWERGRID.NS"]),
        ("Oil, Gas & Consumable Fuels", &["ONGC.NS"]),
    ])
    .unwrap();
    let provider = ScriptedProvider::default()
        .with("NTPC.NS", vec![bar(2025, 1, 1, 300.0, 1), bar(2025, 1, 2, 301.0, 2)])
        .with("POWERGRID.NS", vec![bar(2025, 1, 1, 280.0, 3)])
        .with("ONGC.NS", vec![bar(2025, 1, 1, 250.0, 4)]);

    run(&provider, &map, &out).unwrap();

    let (_, rows) = read_records(&out);
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(Some(row[2].as_str()), map.sector_of(&row[1]));
    }
}

#[test]
fn rows_follow_sector_then_ticker_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let map = SectorMap::from_pairs(&[("Z", &["ZZ.NS"]), ("A", &["BB.NS", "AA.NS"])]).unwrap();
    let provider = ScriptedProvider::default()
        .with("ZZ.NS", vec![bar(2025, 1, 1, 1.0, 1)])
        .with("AA.NS", vec![bar(2025, 1, 1, 1.0, 1)])
        .with("BB.NS", vec![bar(2025, 1, 1, 1.0, 1), bar(2025, 1, 2, 1.0, 1)]);

    run(&provider, &map, &out).unwrap();

    assert_eq!(
        *provider.requests.borrow(),
        vec!["ZZ.NS", "BB.NS", "AA.NS"]
    );
    let (_, rows) = read_records(&out);
    let tickers: Vec<_> = rows.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(tickers, vec!["ZZ.NS", "BB.NS", "BB.NS", "AA.NS"]);
}

#[test]
fn failed_ticker_is_skipped_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let map = SectorMap::from_pairs(&[("IT", &["GONE.NS", "TCS.NS"])]).unwrap();
    let provider = ScriptedProvider::default().with("TCS.NS", vec![bar(2025, 1, 1, 3500.0, 9)]);

    let report = fetch_sectors(&provider, &map, window(), &NoPacing, &StderrProgress);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "GONE.NS");
    let (ticker, err) = &report.failures[0];
    assert_eq!(
        failure_line(ticker, err),
        "Error fetching data for GONE.NS: symbol not found: GONE.NS"
    );

    report.into_table().unwrap().write_csv(&out).unwrap();
    let (_, rows) = read_records(&out);
    assert_eq!(rows.len(), 1);
    assert!(rows.iter().all(|r| r[1] == "TCS.NS"));
}

#[test]
fn all_failures_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let map = SectorMap::from_pairs(&[("IT", &["GONE.NS", "ALSO_GONE.NS"])]).unwrap();

    let err = run(&ScriptedProvider::default(), &map, &out).unwrap_err();
    assert!(matches!(err, TableError::NothingToConcatenate));
    assert!(!out.exists());
}

#[test]
fn all_failures_leave_previous_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    std::fs::write(&out, "previous run\n").unwrap();
    let map = SectorMap::from_pairs(&[("IT", &["GONE.NS"])]).unwrap();

    assert!(run(&ScriptedProvider::default(), &map, &out).is_err());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "previous run\n");
}

#[test]
fn existing_file_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    std::fs::write(&out, "stale,content\nthat,is,much,longer,than,the,new,file\n").unwrap();
    let map = SectorMap::from_pairs(&[("IT", &["TCS.NS"])]).unwrap();
    let provider = ScriptedProvider::default().with("TCS.NS", vec![bar(2025, 1, 1, 3500.0, 9)]);

    run(&provider, &map, &out).unwrap();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "Date,ticker,sector,Close,Volume\n2025-01-01,TCS.NS,IT,3500.0,9\n"
    );
    assert!(!dir.path().join("out.csv.tmp").exists());
}

#[test]
fn empty_series_is_a_zero_row_success() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let map = SectorMap::from_pairs(&[("New", &["FRESH.NS"])]).unwrap();
    let provider = ScriptedProvider::default().with("FRESH.NS", vec![]);

    let report = fetch_sectors(&provider, &map, window(), &NoPacing, &StderrProgress);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 0);

    let table = report.into_table().unwrap();
    table.write_csv(&out).unwrap();
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "Date,ticker,sector,Close,Volume\n"
    );
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    let map = SectorMap::from_pairs(&[
        ("Financial Services", &["HDFCBANK.NS", "SBIN.NS"]),
        ("FMCG", &["ITC.NS"]),
    ])
    .unwrap();
    let provider = ScriptedProvider::default()
        .with("HDFCBANK.NS", vec![bar(2024, 3, 1, 1421.35, 11), bar(2024, 3, 4, 1430.1, 12)])
        .with("SBIN.NS", vec![bar(2024, 3, 1, 752.0, 13)])
        .with("ITC.NS", vec![bar(2024, 3, 1, 0.1 + 0.2, 14)]);

    run(&provider, &map, &first).unwrap();
    run(&provider, &map, &second).unwrap();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn output_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/deeper/out.csv");
    let map = SectorMap::from_pairs(&[("IT", &["TCS.NS"])]).unwrap();
    let provider = ScriptedProvider::default().with("TCS.NS", vec![bar(2025, 1, 1, 1.0, 1)]);

    run(&provider, &map, &out).unwrap();
    assert!(out.exists());
}
