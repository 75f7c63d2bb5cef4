use crate::error::{AppError, Result};
use super::StockMoverRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One category of movers as supplied by the backend
///
/// The backend has already partitioned the records into gainers and losers;
/// that split is never revisited here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoversGroup {
    /// Sector name or market cap bracket, depending on the feed
    pub category: String,

    #[serde(default)]
    pub gainers: Vec<StockMoverRecord>,

    #[serde(default)]
    pub losers: Vec<StockMoverRecord>,
}

impl MoversGroup {
    pub fn new(
        category: impl Into<String>,
        gainers: Vec<StockMoverRecord>,
        losers: Vec<StockMoverRecord>,
    ) -> Self {
        Self {
            category: category.into(),
            gainers,
            losers,
        }
    }

    /// Number of raw records (duplicates included)
    pub fn record_count(&self) -> usize {
        self.gainers.len() + self.losers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gainers.is_empty() && self.losers.is_empty()
    }
}

/// Both movers feeds as consumed by the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoversSnapshot {
    /// Movers grouped by sector
    #[serde(default)]
    pub sectors: Vec<MoversGroup>,

    /// Movers grouped by market cap bracket
    #[serde(default, alias = "market_cap")]
    pub market_caps: Vec<MoversGroup>,
}

impl MoversSnapshot {
    pub fn new(sectors: Vec<MoversGroup>, market_caps: Vec<MoversGroup>) -> Self {
        Self { sectors, market_caps }
    }

    /// Load a snapshot from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "Snapshot file '{}' does not exist",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let snapshot: MoversSnapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    /// Total raw records across both feeds
    pub fn record_count(&self) -> usize {
        self.sectors
            .iter()
            .chain(self.market_caps.iter())
            .map(MoversGroup::record_count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_group_defaults_missing_lists() {
        let group: MoversGroup = serde_json::from_str(r#"{"category": "Energy"}"#).unwrap();
        assert_eq!(group.category, "Energy");
        assert!(group.is_empty());
    }

    #[test]
    fn test_snapshot_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "sectors": [{{"category": "Tech", "gainers": [{{"symbol": "AAPL", "price_change_percent": 5.2}}], "losers": []}}],
                "market_caps": []
            }}"#
        )
        .unwrap();

        let snapshot = MoversSnapshot::from_file(file.path()).unwrap();
        assert_eq!(snapshot.sectors.len(), 1);
        assert_eq!(snapshot.record_count(), 1);
        assert_eq!(snapshot.sectors[0].gainers[0].sector_key(), "Unclassified");
    }

    #[test]
    fn test_snapshot_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MoversSnapshot::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_snapshot_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = MoversSnapshot::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
