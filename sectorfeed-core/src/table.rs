//! Result table: tagged history rows, concatenation, CSV output and preview.
//!
//! Column order is fixed as `Date, ticker, sector, Close, Volume`.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::data::provider::HistoryBar;

/// Header written to every output file.
pub const COLUMNS: [&str; 5] = ["Date", "ticker", "sector", "Close", "Volume"];

/// One observation tagged with ticker and sector.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub ticker: String,
    pub sector: String,
    pub close: f64,
    pub volume: u64,
}

impl HistoryRow {
    pub fn tag(bar: &HistoryBar, ticker: &str, sector: &str) -> Self {
        Self {
            date: bar.date,
            ticker: ticker.to_string(),
            sector: sector.to_string(),
            close: bar.close,
            volume: bar.volume,
        }
    }

    /// Cell values in column order.
    fn cells(&self) -> [String; 5] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.ticker.clone(),
            self.sector.clone(),
            format_close(self.close),
            self.volume.to_string(),
        ]
    }
}

/// NaN is written as an empty field; everything else in shortest round-trip
/// form, keeping the trailing `.0` on whole numbers.
fn format_close(close: f64) -> String {
    if close.is_nan() {
        String::new()
    } else {
        format!("{close:?}")
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("no objects to concatenate: every ticker failed")]
    NothingToConcatenate,

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Concatenated rows of every successful ticker, in fetch order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    rows: Vec<HistoryRow>,
}

impl ResultTable {
    /// Concatenate per-ticker batches in the given order.
    ///
    /// Fails when there are no batches at all. A batch with zero rows still
    /// counts, so a run where only empty series came back writes a header-only
    /// file.
    pub fn concat(batches: Vec<Vec<HistoryRow>>) -> Result<Self, TableError> {
        if batches.is_empty() {
            return Err(TableError::NothingToConcatenate);
        }
        Ok(Self {
            rows: batches.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the full table as CSV bytes with a header row.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, TableError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(COLUMNS)?;
        for row in &self.rows {
            wtr.write_record(row.cells())?;
        }
        wtr.into_inner()
            .map_err(|e| TableError::Csv(csv::Error::from(e.into_error())))
    }

    /// Write the CSV to `path`, replacing any existing file.
    ///
    /// The bytes go to a sibling `.tmp` file first and are renamed into place,
    /// so a failed write leaves the previous output untouched.
    pub fn write_csv(&self, path: &Path) -> Result<Vec<u8>, TableError> {
        let bytes = self.to_csv_bytes()?;
        let write_err = |source| TableError::Write {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);

        fs::write(&tmp, &bytes).map_err(write_err)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }

        tracing::info!(path = %path.display(), rows = self.rows.len(), "wrote CSV");
        Ok(bytes)
    }

    /// First `n` rows rendered as an aligned text table with a row index.
    pub fn preview(&self, n: usize) -> String {
        let shown = &self.rows[..n.min(self.rows.len())];

        let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown.len() + 1);
        let mut header = vec![String::new()];
        header.extend(COLUMNS.iter().map(|c| c.to_string()));
        grid.push(header);
        for (i, row) in shown.iter().enumerate() {
            let mut line = vec![i.to_string()];
            line.extend(row.cells());
            grid.push(line);
        }

        let widths: Vec<usize> = (0..grid[0].len())
            .map(|col| grid.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for line in &grid {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(col, (cell, &w))| {
                    // Index and text columns left-aligned, numbers right-aligned
                    if col >= 4 {
                        format!("{cell:>w$}")
                    } else {
                        format!("{cell:<w$}")
                    }
                })
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}
