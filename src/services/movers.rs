use crate::constants::TOP_MOVERS_PER_SEGMENT;
use crate::models::{
    ActiveView, CardStats, Filter, MarketCapCategory, MoversGroup, MoversSnapshot,
    MoversViewState, SegmentStats, StockMoverRecord,
};
use crate::services::movers_table::{compare_f64, SortDirection};
use crate::utils::deduplication::SymbolDeduplicator;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Raw records of one segment before deduplication
struct SegmentBucket<'a> {
    key: String,
    gainers: Vec<&'a StockMoverRecord>,
    losers: Vec<&'a StockMoverRecord>,
}

/// Service for turning movers groups into heatmap cards
///
/// Every function is pure: inputs are borrowed, outputs are freshly built.
pub struct MoversAggregator;

impl MoversAggregator {
    /// Compute statistics for one classification bucket
    ///
    /// # Arguments
    /// * `gainers` - Raw gainer records (may repeat symbols)
    /// * `losers` - Raw loser records (may repeat symbols)
    /// * `key` - Segment key used for filtering
    /// * `label` - Display label
    ///
    /// # Returns
    /// Segment statistics; gainers and losers are deduplicated independently
    /// before being combined for `net_change` and `total`.
    pub fn aggregate_segment<'a, G, L>(gainers: G, losers: L, key: &str, label: &str) -> SegmentStats
    where
        G: IntoIterator<Item = &'a StockMoverRecord>,
        L: IntoIterator<Item = &'a StockMoverRecord>,
    {
        let gainers = SymbolDeduplicator::dedupe_gainers(gainers);
        let losers = SymbolDeduplicator::dedupe_losers(losers);

        let total = gainers.len() + losers.len();
        let net_change = if total > 0 {
            let sum: f64 = gainers
                .iter()
                .chain(losers.iter())
                .map(|r| r.price_change_percent)
                .sum();
            sum / total as f64
        } else {
            0.0
        };

        let mut top_gainers = gainers.clone();
        top_gainers.sort_by(|a, b| {
            compare_f64(a.price_change_percent, b.price_change_percent, SortDirection::Desc)
        });
        top_gainers.truncate(TOP_MOVERS_PER_SEGMENT);

        let mut top_losers = losers.clone();
        top_losers.sort_by(|a, b| {
            compare_f64(a.price_change_percent, b.price_change_percent, SortDirection::Asc)
        });
        top_losers.truncate(TOP_MOVERS_PER_SEGMENT);

        SegmentStats {
            key: key.to_string(),
            label: label.to_string(),
            gainers,
            losers,
            net_change,
            total,
            top_gainers,
            top_losers,
        }
    }

    /// Fan a group out into segments and roll them up into one card
    ///
    /// # Arguments
    /// * `group` - Movers group; its category becomes the card key and label
    /// * `segment_key_of` - Classifier assigning each record a segment key
    /// * `segment_label_of` - Display label for a segment key
    /// * `segment_order` - Fixed segment order; keys missing from it follow in
    ///   first-encountered order. `None` keeps first-encountered order.
    ///
    /// # Returns
    /// `None` when every segment is empty
    pub fn build_card<K, L>(
        group: &MoversGroup,
        segment_key_of: K,
        segment_label_of: L,
        segment_order: Option<&[&str]>,
    ) -> Option<CardStats>
    where
        K: Fn(&StockMoverRecord) -> String,
        L: Fn(&str) -> String,
    {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut buckets: Vec<SegmentBucket> = Vec::new();

        let tagged = group
            .gainers
            .iter()
            .map(|r| (r, true))
            .chain(group.losers.iter().map(|r| (r, false)));

        for (record, is_gainer) in tagged {
            let key = segment_key_of(record);
            let index = match positions.get(&key) {
                Some(&index) => index,
                None => {
                    positions.insert(key.clone(), buckets.len());
                    buckets.push(SegmentBucket {
                        key,
                        gainers: Vec::new(),
                        losers: Vec::new(),
                    });
                    buckets.len() - 1
                }
            };

            if is_gainer {
                buckets[index].gainers.push(record);
            } else {
                buckets[index].losers.push(record);
            }
        }

        if let Some(order) = segment_order {
            buckets.sort_by_key(|b| {
                order
                    .iter()
                    .position(|k| *k == b.key)
                    .unwrap_or(order.len())
            });
        }

        let segments: Vec<SegmentStats> = buckets
            .into_iter()
            .map(|b| {
                let label = segment_label_of(&b.key);
                Self::aggregate_segment(b.gainers, b.losers, &b.key, &label)
            })
            .filter(|s| !s.is_empty())
            .collect();

        if segments.is_empty() {
            debug!("Group '{}' has no movers, skipping card", group.category);
            return None;
        }

        Some(CardStats::from_segments(
            group.category.clone(),
            group.category.clone(),
            segments,
        ))
    }

    /// Sector view: one card per sector group, segmented by market cap bracket
    pub fn build_sector_cards(groups: &[MoversGroup]) -> Vec<CardStats> {
        let order: Vec<&str> = MarketCapCategory::ALL.iter().map(|c| c.as_str()).collect();

        let mut cards: Vec<CardStats> = groups
            .iter()
            .filter_map(|group| {
                Self::build_card(
                    group,
                    |r| r.market_cap_key().as_str().to_string(),
                    |key| MarketCapCategory::normalize(key).label().to_string(),
                    Some(order.as_slice()),
                )
            })
            .collect();

        Self::sort_cards(&mut cards);
        debug!("Built {} sector cards from {} groups", cards.len(), groups.len());
        cards
    }

    /// Merge groups whose categories normalize to the same bracket
    ///
    /// Brackets keep first-encountered order; records are concatenated and
    /// deduplicated later, per segment.
    fn merge_by_bracket(groups: &[MoversGroup]) -> Vec<(MarketCapCategory, MoversGroup)> {
        let mut merged: Vec<(MarketCapCategory, MoversGroup)> = Vec::new();

        for group in groups {
            let bracket = MarketCapCategory::normalize(&group.category);
            match merged.iter_mut().find(|(b, _)| *b == bracket) {
                Some((_, existing)) => {
                    warn!(
                        "Market cap group '{}' merged into '{}' bracket",
                        group.category,
                        bracket.as_str()
                    );
                    existing.gainers.extend(group.gainers.iter().cloned());
                    existing.losers.extend(group.losers.iter().cloned());
                }
                None => merged.push((bracket, group.clone())),
            }
        }

        merged
    }

    /// Market cap view: one card per bracket, segmented by sector
    pub fn build_market_cap_cards(groups: &[MoversGroup]) -> Vec<CardStats> {
        let mut cards: Vec<CardStats> = Self::merge_by_bracket(groups)
            .iter()
            .filter_map(|(bracket, group)| {
                Self::build_card(group, StockMoverRecord::sector_key, str::to_string, None).map(
                    |mut card| {
                        card.key = bracket.as_str().to_string();
                        card.label = bracket.label().to_string();
                        card
                    },
                )
            })
            .collect();

        Self::sort_cards(&mut cards);
        debug!(
            "Built {} market cap cards from {} groups",
            cards.len(),
            groups.len()
        );
        cards
    }

    /// Order cards by magnitude of net change, strongest first (stable on ties)
    ///
    /// Cards with a non-finite net change go last.
    pub fn sort_cards(cards: &mut [CardStats]) {
        cards.sort_by(|a, b| {
            compare_f64(a.net_change.abs(), b.net_change.abs(), SortDirection::Desc)
        });
    }

    /// Narrow cards to the segments matching a filter value
    ///
    /// `Filter::All` passes the cards through unchanged. Otherwise each card
    /// keeps only matching segments (key compared case-insensitively), its
    /// totals are rolled up again from those segments, cards left without
    /// segments are dropped and the result is re-sorted.
    pub fn apply_filter(cards: &[CardStats], filter: &Filter<String>) -> Vec<CardStats> {
        let value = match filter {
            Filter::All => return cards.to_vec(),
            Filter::Only(value) => value,
        };

        let mut filtered: Vec<CardStats> = cards
            .iter()
            .filter_map(|card| {
                let segments: Vec<SegmentStats> = card
                    .segments
                    .iter()
                    .filter(|s| s.key.eq_ignore_ascii_case(value))
                    .cloned()
                    .collect();

                if segments.is_empty() {
                    None
                } else {
                    Some(CardStats::from_segments(
                        card.key.clone(),
                        card.label.clone(),
                        segments,
                    ))
                }
            })
            .collect();

        Self::sort_cards(&mut filtered);
        debug!(
            "Filter '{}' kept {} of {} cards",
            value,
            filtered.len(),
            cards.len()
        );
        filtered
    }

    /// Build and filter the cards for the current view state
    pub fn cards_for_view(snapshot: &MoversSnapshot, state: &MoversViewState) -> Vec<CardStats> {
        let cards = match state.active_view() {
            ActiveView::Sector => Self::build_sector_cards(&snapshot.sectors),
            ActiveView::MarketCap => Self::build_market_cap_cards(&snapshot.market_caps),
        };
        Self::apply_filter(&cards, &state.active_filter())
    }
}
