//! Movers table view
//!
//! Flattens movers groups into one row per symbol, then filters and sorts
//! them like the dashboard table does.

use crate::constants::{TABLE_DEFAULT_LIMIT, TABLE_MAX_LIMIT, TABLE_MIN_LIMIT};
use crate::models::{Filter, MarketCapCategory, MoversGroup, StockMoverRecord};
use crate::utils::deduplication::SymbolDeduplicator;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Column to sort the table by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Percent,
    Change,
    Price,
    Volume,
    Symbol,
}

impl SortColumn {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "percent" | "change_percent" | "price_change_percent" => Ok(SortColumn::Percent),
            "change" | "price_change" => Ok(SortColumn::Change),
            "price" | "close" | "close_price" => Ok(SortColumn::Price),
            "volume" => Ok(SortColumn::Volume),
            "symbol" | "ticker" => Ok(SortColumn::Symbol),
            _ => Err(format!(
                "Invalid sort column: '{}'. Valid values: percent, change, price, volume, symbol",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid direction: '{}'. Valid values: asc, desc", s)),
        }
    }
}

/// Table query parameters
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    pub sort_by: SortColumn,
    pub direction: SortDirection,
    pub sector: Filter<String>,
    pub market_cap: Filter<MarketCapCategory>,
    /// Number of rows to return (default: 20, max: 200)
    pub limit: Option<usize>,
}

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverRow {
    pub symbol: String,
    pub name: Option<String>,
    pub close_price: f64,
    pub price_change: f64,
    pub price_change_percent: f64,
    pub volume: u64,
    /// Normalized sector
    pub sector: String,
    pub market_cap_category: MarketCapCategory,
    pub market_cap: Option<f64>,
    pub is_gainer: bool,
}

impl MoverRow {
    fn from_record(record: &StockMoverRecord, is_gainer: bool) -> Self {
        Self {
            symbol: record.symbol.clone(),
            name: record.name.clone(),
            close_price: record.close_price,
            price_change: record.price_change,
            price_change_percent: record.price_change_percent,
            volume: record.volume,
            sector: record.sector_key(),
            market_cap_category: record.market_cap_key(),
            market_cap: record.market_cap,
            is_gainer,
        }
    }
}

/// Validate and clamp the row limit
pub fn validate_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(TABLE_DEFAULT_LIMIT)
        .clamp(TABLE_MIN_LIMIT, TABLE_MAX_LIMIT)
}

pub struct MoversTable;

impl MoversTable {
    /// One row per symbol across all groups
    ///
    /// Gainers and losers are deduplicated with their usual tie-break rules.
    /// A symbol present on both sides keeps its gainer row.
    pub fn build_rows<'a, I>(groups: I) -> Vec<MoverRow>
    where
        I: IntoIterator<Item = &'a MoversGroup>,
    {
        let groups: Vec<&MoversGroup> = groups.into_iter().collect();

        let repeated = SymbolDeduplicator::count_duplicates(
            groups
                .iter()
                .flat_map(|g| g.gainers.iter().chain(g.losers.iter())),
        );
        if repeated > 0 {
            debug!("Collapsing {} repeated symbol entries into single rows", repeated);
        }

        let gainers =
            SymbolDeduplicator::dedupe_gainers(groups.iter().flat_map(|g| g.gainers.iter()));
        let losers =
            SymbolDeduplicator::dedupe_losers(groups.iter().flat_map(|g| g.losers.iter()));

        let gainer_symbols: HashSet<&str> = gainers.iter().map(|r| r.symbol.as_str()).collect();

        let mut rows: Vec<MoverRow> = gainers
            .iter()
            .map(|r| MoverRow::from_record(r, true))
            .collect();
        rows.extend(
            losers
                .iter()
                .filter(|r| !gainer_symbols.contains(r.symbol.as_str()))
                .map(|r| MoverRow::from_record(r, false)),
        );

        rows
    }

    /// Filter, sort and truncate rows
    pub fn query(rows: &[MoverRow], query: &TableQuery) -> Vec<MoverRow> {
        let mut result: Vec<MoverRow> = rows
            .iter()
            .filter(|row| match &query.sector {
                Filter::All => true,
                Filter::Only(sector) => row.sector.eq_ignore_ascii_case(sector),
            })
            .filter(|row| match &query.market_cap {
                Filter::All => true,
                Filter::Only(cap) => row.market_cap_category == *cap,
            })
            .cloned()
            .collect();

        Self::sort_rows(&mut result, query.sort_by, query.direction);

        let limit = validate_limit(query.limit);
        result.truncate(limit);

        debug!(
            "Table query kept {} of {} rows (limit {})",
            result.len(),
            rows.len(),
            limit
        );
        result
    }

    /// Sort rows; non-finite numbers always sort last
    pub fn sort_rows(rows: &mut [MoverRow], column: SortColumn, direction: SortDirection) {
        rows.sort_by(|a, b| {
            let ordering = match column {
                SortColumn::Percent => {
                    return compare_f64(a.price_change_percent, b.price_change_percent, direction)
                }
                SortColumn::Change => return compare_f64(a.price_change, b.price_change, direction),
                SortColumn::Price => return compare_f64(a.close_price, b.close_price, direction),
                SortColumn::Volume => a.volume.cmp(&b.volume),
                SortColumn::Symbol => a.symbol.cmp(&b.symbol),
            };
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

/// Compare two floats in `direction`; non-finite values sort last either way
pub(crate) fn compare_f64(a: f64, b: f64, direction: SortDirection) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => {
            let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, percent: f64, sector: &str, cap: MarketCapCategory) -> StockMoverRecord {
        StockMoverRecord::new(symbol, percent)
            .with_sector(sector)
            .with_market_cap(cap)
    }

    fn sample_groups() -> Vec<MoversGroup> {
        vec![
            MoversGroup::new(
                "Tech",
                vec![
                    record("AAPL", 2.0, "Tech", MarketCapCategory::Mega),
                    record("SMCI", 9.0, "Tech", MarketCapCategory::Small),
                ],
                vec![record("INTC", -3.0, "Tech", MarketCapCategory::Large)],
            ),
            MoversGroup::new(
                "Energy",
                vec![record("AAPL", 4.0, "Tech", MarketCapCategory::Mega)],
                vec![
                    record("XOM", -1.0, "Energy", MarketCapCategory::Mega),
                    record("XOM", -2.5, "Energy", MarketCapCategory::Mega),
                ],
            ),
        ]
    }

    #[test]
    fn test_build_rows_dedupes() {
        let rows = MoversTable::build_rows(&sample_groups());
        assert_eq!(rows.len(), 4);

        let aapl = rows.iter().find(|r| r.symbol == "AAPL").unwrap();
        assert_eq!(aapl.price_change_percent, 4.0);
        assert!(aapl.is_gainer);

        let xom = rows.iter().find(|r| r.symbol == "XOM").unwrap();
        assert_eq!(xom.price_change_percent, -2.5);
        assert!(!xom.is_gainer);
    }

    #[test]
    fn test_symbol_on_both_sides_keeps_gainer() {
        let groups = vec![MoversGroup::new(
            "Tech",
            vec![StockMoverRecord::new("TSLA", 1.0)],
            vec![StockMoverRecord::new("TSLA", -6.0)],
        )];
        let rows = MoversTable::build_rows(&groups);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_gainer);
    }

    #[test]
    fn test_query_default_sort_percent_desc() {
        let rows = MoversTable::build_rows(&sample_groups());
        let result = MoversTable::query(&rows, &TableQuery::default());
        let symbols: Vec<&str> = result.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["SMCI", "AAPL", "XOM", "INTC"]);
    }

    #[test]
    fn test_query_filters_and_limit() {
        let rows = MoversTable::build_rows(&sample_groups());

        let query = TableQuery {
            market_cap: Filter::Only(MarketCapCategory::Mega),
            direction: SortDirection::Asc,
            ..TableQuery::default()
        };
        let result = MoversTable::query(&rows, &query);
        let symbols: Vec<&str> = result.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["XOM", "AAPL"]);

        let query = TableQuery {
            sector: Filter::Only("tech".to_string()),
            sort_by: SortColumn::Symbol,
            direction: SortDirection::Asc,
            limit: Some(2),
            ..TableQuery::default()
        };
        let result = MoversTable::query(&rows, &query);
        let symbols: Vec<&str> = result.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "INTC"]);
    }

    #[test]
    fn test_non_finite_sorts_last() {
        let groups = vec![MoversGroup::new(
            "X",
            vec![
                StockMoverRecord::new("NAN", f64::NAN),
                StockMoverRecord::new("ONE", 1.0),
                StockMoverRecord::new("TWO", 2.0),
            ],
            vec![],
        )];
        let rows = MoversTable::build_rows(&groups);

        let mut desc = rows.clone();
        MoversTable::sort_rows(&mut desc, SortColumn::Percent, SortDirection::Desc);
        assert_eq!(desc.last().unwrap().symbol, "NAN");

        let mut asc = rows;
        MoversTable::sort_rows(&mut asc, SortColumn::Percent, SortDirection::Asc);
        assert_eq!(asc[0].symbol, "ONE");
        assert_eq!(asc.last().unwrap().symbol, "NAN");
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(None), 20);
        assert_eq!(validate_limit(Some(0)), 1);
        assert_eq!(validate_limit(Some(5000)), 200);
    }

    #[test]
    fn test_parse_sort_options() {
        assert_eq!(SortColumn::from_str("Volume").unwrap(), SortColumn::Volume);
        assert!(SortColumn::from_str("beta").is_err());
        assert_eq!(SortDirection::from_str("ASC").unwrap(), SortDirection::Asc);
        assert!(SortDirection::from_str("up").is_err());
    }
}
