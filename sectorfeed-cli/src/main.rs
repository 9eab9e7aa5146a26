//! sectorfeed CLI: fetch sector-grouped daily history and write one CSV.
//!
//! With no arguments the run uses the compiled-in NIFTY 50 sector map, a
//! five-year lookback, a 500 ms pause between tickers and writes
//! `indian_sector_ticker_data2.csv` in the working directory.

use anyhow::{Context, Result};
use clap::Parser;
use sectorfeed_core::data::{
    fetch_sectors, HistoryWindow, SectorMap, StderrProgress, YahooProvider,
};
use sectorfeed_core::FetchConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sectorfeed",
    about = "Fetch daily close/volume history for sector-grouped tickers into one CSV"
)]
struct Cli {
    /// TOML config with lookback, delay, output path and [[sector]] tables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output CSV path (overrides the config file).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Years of daily history to request.
    #[arg(long)]
    lookback_years: Option<u32>,

    /// Pause after each ticker, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Print the effective sector map and exit without fetching.
    #[arg(long, default_value_t = false)]
    list: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = build_config(&cli)?;

    if cli.list {
        print_sectors(&config.sectors);
        return Ok(());
    }

    run_fetch(&config)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<FetchConfig> {
    let mut config = match &cli.config {
        Some(path) => FetchConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FetchConfig::default(),
    };

    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(years) = cli.lookback_years {
        config.lookback_years = years;
    }
    if let Some(ms) = cli.delay_ms {
        config.delay = Duration::from_millis(ms);
    }

    Ok(config)
}

fn run_fetch(config: &FetchConfig) -> Result<()> {
    let provider = YahooProvider::new(config.timeout)?;
    let today = chrono::Local::now().date_naive();
    let window = HistoryWindow::lookback_years(config.lookback_years, today);

    let report = fetch_sectors(
        &provider,
        &config.sectors,
        window,
        &config.pacer(),
        &StderrProgress,
    );
    let (succeeded, failed) = (report.succeeded(), report.failed());

    // Nothing succeeded: fail before touching the output file
    let table = report
        .into_table()
        .context("no ticker returned data; output file not written")?;

    let bytes = table
        .write_csv(&config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    print!("{}", table.preview(config.preview_rows));
    println!();
    println!(
        "Wrote {} rows to {} ({succeeded} tickers ok, {failed} failed)",
        table.len(),
        config.output.display()
    );
    println!("blake3: {}", blake3::hash(&bytes).to_hex());

    Ok(())
}

fn print_sectors(sectors: &SectorMap) {
    for sector in sectors.sectors() {
        println!("{} ({})", sector.name, sector.tickers.len());
        for ticker in &sector.tickers {
            println!("  {ticker}");
        }
    }
    println!();
    println!(
        "{} sectors, {} tickers",
        sectors.sectors().len(),
        sectors.ticker_count()
    );
}
