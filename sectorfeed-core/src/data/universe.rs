//! Sector map: ordered, sector-grouped ticker lists.
//!
//! Order matters: the batch fetcher walks sectors in declaration order and
//! tickers in list order, and the output CSV follows that walk. The map is
//! therefore a sequence of sectors rather than a sorted map.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A sector and its member tickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub name: String,
    pub tickers: Vec<String>,
}

/// Errors raised while building or validating a sector map.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UniverseError {
    #[error("ticker {ticker} listed under both '{first}' and '{second}'")]
    DuplicateTicker {
        ticker: String,
        first: String,
        second: String,
    },

    #[error("sector '{0}' is declared twice")]
    DuplicateSector(String),

    #[error("sector name is empty")]
    EmptySectorName,

    #[error("empty ticker symbol in sector '{0}'")]
    EmptyTicker(String),
}

/// Immutable, ordered mapping from sector name to tickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sector>", into = "Vec<Sector>")]
pub struct SectorMap {
    sectors: Vec<Sector>,
}

impl SectorMap {
    /// Build a sector map, rejecting duplicate tickers or sectors.
    pub fn new(sectors: Vec<Sector>) -> Result<Self, UniverseError> {
        let map = Self { sectors };
        map.validate()?;
        Ok(map)
    }

    /// Convenience constructor from `(sector, &[tickers])` pairs.
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Result<Self, UniverseError> {
        Self::new(
            pairs
                .iter()
                .map(|(name, tickers)| Sector {
                    name: name.to_string(),
                    tickers: tickers.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
        )
    }

    /// Every ticker belongs to exactly one sector; names are non-empty.
    pub fn validate(&self) -> Result<(), UniverseError> {
        let mut owner: HashMap<&str, &str> = HashMap::new();
        let mut seen_sectors: HashSet<&str> = HashSet::new();

        for sector in &self.sectors {
            if sector.name.trim().is_empty() {
                return Err(UniverseError::EmptySectorName);
            }
            if !seen_sectors.insert(&sector.name) {
                return Err(UniverseError::DuplicateSector(sector.name.clone()));
            }
            for ticker in &sector.tickers {
                if ticker.trim().is_empty() {
                    return Err(UniverseError::EmptyTicker(sector.name.clone()));
                }
                if let Some(first) = owner.insert(ticker, &sector.name) {
                    return Err(UniverseError::DuplicateTicker {
                        ticker: ticker.clone(),
                        first: first.to_string(),
                        second: sector.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Sectors in declaration order.
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// `(sector, ticker)` pairs in map-then-list order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.sectors.iter().flat_map(|s| {
            s.tickers
                .iter()
                .map(move |t| (s.name.as_str(), t.as_str()))
        })
    }

    /// Sector a ticker belongs to.
    pub fn sector_of(&self, ticker: &str) -> Option<&str> {
        self.pairs().find(|(_, t)| *t == ticker).map(|(s, _)| s)
    }

    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn ticker_count(&self) -> usize {
        self.sectors.iter().map(|s| s.tickers.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ticker_count() == 0
    }

    /// NIFTY 50 constituents grouped by NSE industry classification.
    pub fn nifty50() -> Self {
        const NIFTY50: &[(&str, &[&str])] = &[
            (
                "Metals & Mining",
                &["ADANIENT.NS", "HINDALCO.NS", "JSWSTEEL.NS", "TATASTEEL.NS"],
            ),
            ("Services", &["ADANIPORTS.NS"]),
            ("Healthcare", &["APOLLOHOSP.NS", "CIPLA.NS", "SUNPHARMA.NS"]),
            ("Consumer Durables", &["TITAN.NS"]),
            (
                "Financial Services",
                &[
                    "AXISBANK.NS",
                    "BAJFINANCE.NS",
                    "BAJAJFINSV.NS",
                    "HDFCBANK.NS",
                    "HDFCLIFE.NS",
                    "ICICIBANK.NS",
                    "INDUSINDBK.NS",
                    "JIOFIN.NS",
                    "KOTAKBANK.NS",
                    "SBILIFE.NS",
                    "SBIN.NS",
                    "SHRIRAMFIN.NS",
                ],
            ),
            ("Telecommunication", &["BHARTIARTL.NS"]),
            (
                "FMCG",
                &["HINDUNILVR.NS", "ITC.NS", "NESTLEIND.NS", "TATACONSUM.NS"],
            ),
            (
                "Automobile & Auto Components",
                &[
                    "BAJAJ-AUTO.NS",
                    "EICHERMOT.NS",
                    "HEROMOTOCO.NS",
                    "M&M.NS",
                    "MARUTI.NS",
                    "TATAMOTORS.NS",
                ],
            ),
            ("Capital Goods", &["BEL.NS"]),
            (
                "Oil, Gas & Consumable Fuels",
                &["COALINDIA.NS", "ONGC.NS", "RELIANCE.NS"],
            ),
            (
                "Construction / Construction Materials",
                &["GRASIM.NS", "LT.NS", "ULTRACEMCO.NS"],
            ),
            (
                "Information Technology",
                &["HCLTECH.NS", "INFY.NS", "TCS.NS", "TECHM.NS", "WIPRO.NS"],
            ),
            ("Power", &["NTPC.NS", "POWERGRID.NS"]),
            ("Consumer Services", &["ETERNAL.NS", "TRENT.NS"]),
        ];

        Self {
            sectors: NIFTY50
                .iter()
                .map(|(name, tickers)| Sector {
                    name: name.to_string(),
                    tickers: tickers.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<Sector>> for SectorMap {
    type Error = UniverseError;

    fn try_from(sectors: Vec<Sector>) -> Result<Self, Self::Error> {
        Self::new(sectors)
    }
}

impl From<SectorMap> for Vec<Sector> {
    fn from(map: SectorMap) -> Self {
        map.sectors
    }
}
