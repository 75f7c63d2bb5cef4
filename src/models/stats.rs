use super::StockMoverRecord;
use serde::Serialize;

/// One classification bucket inside a card
///
/// Built fresh on every recomputation, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStats {
    /// Matching key (market cap bracket key or normalized sector name)
    pub key: String,
    pub label: String,

    /// Deduplicated gainers, in first-seen order
    pub gainers: Vec<StockMoverRecord>,
    /// Deduplicated losers, in first-seen order
    pub losers: Vec<StockMoverRecord>,

    /// Mean percent change over gainers and losers combined (0 when empty)
    pub net_change: f64,
    /// gainers.len() + losers.len()
    pub total: usize,

    /// Up to three gainers, highest percent first
    pub top_gainers: Vec<StockMoverRecord>,
    /// Up to three losers, lowest percent first
    pub top_losers: Vec<StockMoverRecord>,
}

impl SegmentStats {
    pub fn gainer_count(&self) -> usize {
        self.gainers.len()
    }

    pub fn loser_count(&self) -> usize {
        self.losers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// One top-level card: a sector or a market cap bracket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardStats {
    /// Category the card was built from
    pub key: String,
    pub label: String,
    pub total_gainers: usize,
    pub total_losers: usize,
    pub total: usize,
    /// Mean percent change over every record in every segment
    pub net_change: f64,
    pub segments: Vec<SegmentStats>,
}

impl CardStats {
    /// Roll segment statistics up into a card
    ///
    /// The card net change is the count-weighted mean of the segment net
    /// changes, which equals the plain mean over all segment records.
    pub fn from_segments(key: String, label: String, segments: Vec<SegmentStats>) -> Self {
        let total_gainers: usize = segments.iter().map(SegmentStats::gainer_count).sum();
        let total_losers: usize = segments.iter().map(SegmentStats::loser_count).sum();
        let total: usize = segments.iter().map(|s| s.total).sum();

        let weighted_sum: f64 = segments
            .iter()
            .map(|s| s.net_change * s.total as f64)
            .sum();
        let net_change = if total > 0 {
            weighted_sum / total as f64
        } else {
            0.0
        };

        Self {
            key,
            label,
            total_gainers,
            total_losers,
            total,
            net_change,
            segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(key: &str, net_change: f64, gainers: usize, losers: usize) -> SegmentStats {
        SegmentStats {
            key: key.to_string(),
            label: key.to_string(),
            gainers: (0..gainers).map(|i| StockMoverRecord::new(format!("G{}", i), 1.0)).collect(),
            losers: (0..losers).map(|i| StockMoverRecord::new(format!("L{}", i), -1.0)).collect(),
            net_change,
            total: gainers + losers,
            top_gainers: vec![],
            top_losers: vec![],
        }
    }

    #[test]
    fn test_card_rollup_weighted() {
        // 3 records averaging 2.0 and 1 record at -2.0 → (6 - 2) / 4 = 1.0
        let card = CardStats::from_segments(
            "Tech".to_string(),
            "Tech".to_string(),
            vec![segment("mega", 2.0, 3, 0), segment("small", -2.0, 0, 1)],
        );
        assert_eq!(card.total_gainers, 3);
        assert_eq!(card.total_losers, 1);
        assert_eq!(card.total, 4);
        assert!((card.net_change - 1.0).abs() < 1e-9);
        let keys: Vec<&str> = card.segments.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["mega", "small"]);
    }

    #[test]
    fn test_card_rollup_empty() {
        let card = CardStats::from_segments("X".to_string(), "X".to_string(), vec![]);
        assert_eq!(card.total, 0);
        assert_eq!(card.net_change, 0.0);
    }
}
