//! Symbol Deduplication Utilities
//!
//! The same stock can show up in several source lists. These helpers collapse
//! a record sequence to one record per symbol using a caller-supplied
//! tie-break rule.

use crate::models::StockMoverRecord;
use std::collections::HashMap;

/// Centralized per-symbol deduplication
pub struct SymbolDeduplicator;

impl SymbolDeduplicator {
    /// Deduplication key for a record
    pub fn get_key(record: &StockMoverRecord) -> &str {
        &record.symbol
    }

    /// Collapse records to one per symbol
    ///
    /// Records are visited in order. The first record for a symbol is kept
    /// unless a later one satisfies `replace(current, candidate)`, in which
    /// case the candidate takes the current record's position.
    ///
    /// # Arguments
    /// * `records` - Records in source order
    /// * `replace` - Tie-break rule: true if `candidate` should replace `current`
    ///
    /// # Returns
    /// One record per symbol, in order of each symbol's first appearance
    pub fn dedupe<'a, I, F>(records: I, replace: F) -> Vec<StockMoverRecord>
    where
        I: IntoIterator<Item = &'a StockMoverRecord>,
        F: Fn(&StockMoverRecord, &StockMoverRecord) -> bool,
    {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut unique: Vec<StockMoverRecord> = Vec::new();

        for record in records {
            match positions.get(Self::get_key(record)) {
                Some(&index) => {
                    if replace(&unique[index], record) {
                        unique[index] = record.clone();
                    }
                }
                None => {
                    positions.insert(Self::get_key(record), unique.len());
                    unique.push(record.clone());
                }
            }
        }

        unique
    }

    /// Gainers: keep the larger percent change per symbol
    pub fn dedupe_gainers<'a, I>(records: I) -> Vec<StockMoverRecord>
    where
        I: IntoIterator<Item = &'a StockMoverRecord>,
    {
        Self::dedupe(records, |current, candidate| {
            candidate.price_change_percent > current.price_change_percent
        })
    }

    /// Losers: keep the smaller (more negative) percent change per symbol
    pub fn dedupe_losers<'a, I>(records: I) -> Vec<StockMoverRecord>
    where
        I: IntoIterator<Item = &'a StockMoverRecord>,
    {
        Self::dedupe(records, |current, candidate| {
            candidate.price_change_percent < current.price_change_percent
        })
    }

    /// Count records whose symbol was already seen
    pub fn count_duplicates<'a, I>(records: I) -> usize
    where
        I: IntoIterator<Item = &'a StockMoverRecord>,
    {
        let mut seen = std::collections::HashSet::new();
        let mut duplicate_count = 0;

        for record in records {
            if !seen.insert(Self::get_key(record)) {
                duplicate_count += 1;
            }
        }

        duplicate_count
    }
}
