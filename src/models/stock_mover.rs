use crate::constants::{MISSING_SECTOR_VALUES, UNCLASSIFIED_SECTOR};
use super::MarketCapCategory;
use serde::{Deserialize, Serialize};

/// Snapshot of one ticker's price movement
///
/// # Percent Format
/// `price_change_percent` is already a percentage (5.2 means +5.2%), it is
/// never a ratio. Negative values are losers, zero is meaningful.
///
/// # Classification
/// Both classification fields are optional on the wire. Use [`sector_key`](Self::sector_key)
/// and [`market_cap_key`](Self::market_cap_key) to read them normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMoverRecord {
    /// Ticker symbol, unique key within one aggregation pass
    #[serde(alias = "ticker")]
    pub symbol: String,

    /// Company name, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Latest close (or last trade) price
    #[serde(default)]
    pub close_price: f64,

    /// Absolute price change versus previous close
    #[serde(default)]
    pub price_change: f64,

    /// Percent price change versus previous close
    pub price_change_percent: f64,

    /// Shares traded
    #[serde(default)]
    pub volume: u64,

    /// Sector name as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    /// Market cap bracket as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap_category: Option<MarketCapCategory>,

    /// Market capitalization in USD, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}

impl StockMoverRecord {
    /// Create a record with only the fields the aggregation needs
    pub fn new(symbol: impl Into<String>, price_change_percent: f64) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            close_price: 0.0,
            price_change: 0.0,
            price_change_percent,
            volume: 0,
            sector: None,
            market_cap_category: None,
            market_cap: None,
        }
    }

    /// Builder-style sector setter
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Builder-style market cap bracket setter
    pub fn with_market_cap(mut self, category: MarketCapCategory) -> Self {
        self.market_cap_category = Some(category);
        self
    }

    /// Builder-style price setter
    pub fn with_price(mut self, close_price: f64, price_change: f64, volume: u64) -> Self {
        self.close_price = close_price;
        self.price_change = price_change;
        self.volume = volume;
        self
    }

    /// Sector normalized: absent, blank or "N/A" become "Unclassified"
    pub fn sector_key(&self) -> String {
        normalize_sector(self.sector.as_deref())
    }

    /// Market cap bracket normalized: absent becomes `Unknown`
    pub fn market_cap_key(&self) -> MarketCapCategory {
        self.market_cap_category.unwrap_or_default()
    }
}

/// Normalize a raw sector value
pub fn normalize_sector(sector: Option<&str>) -> String {
    match sector.map(str::trim) {
        Some(s) if !is_missing_sector(s) => s.to_string(),
        _ => UNCLASSIFIED_SECTOR.to_string(),
    }
}

fn is_missing_sector(s: &str) -> bool {
    MISSING_SECTOR_VALUES
        .iter()
        .any(|missing| missing.eq_ignore_ascii_case(s))
}
