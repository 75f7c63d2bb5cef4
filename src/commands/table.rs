use super::DataSource;
use crate::error::{AppError, Result};
use crate::models::Filter;
use crate::services::{MoverRow, MoversTable, SortColumn, SortDirection, TableQuery};
use crate::utils::format::{format_market_cap, format_percent, format_price, format_volume};
use std::fmt::Write;

/// Raw CLI options for the table command
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub sort_by: String,
    pub direction: String,
    pub sector: String,
    pub market_cap: String,
    pub limit: Option<usize>,
    pub json: bool,
}

impl TableOptions {
    /// Validate the options into a query
    pub fn to_query(&self) -> Result<TableQuery> {
        Ok(TableQuery {
            sort_by: SortColumn::from_str(&self.sort_by).map_err(AppError::InvalidInput)?,
            direction: SortDirection::from_str(&self.direction).map_err(AppError::InvalidInput)?,
            sector: Filter::parse_sector(&self.sector),
            market_cap: Filter::parse_market_cap(&self.market_cap).map_err(AppError::InvalidInput)?,
            limit: self.limit,
        })
    }
}

pub async fn run(source: DataSource, options: TableOptions) {
    match show_table(&source, &options).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn show_table(source: &DataSource, options: &TableOptions) -> Result<()> {
    let query = options.to_query()?;
    let snapshot = source.load().await?;

    let rows = MoversTable::build_rows(snapshot.sectors.iter().chain(snapshot.market_caps.iter()));
    let result = MoversTable::query(&rows, &query);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_rows(&result));
    }

    Ok(())
}

/// Text rendering of table rows
pub fn render_rows(rows: &[MoverRow]) -> String {
    let mut out = String::new();

    if rows.is_empty() {
        let _ = writeln!(out, "⚠️  No movers match the current filters.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>9} {:>9} {:>10} {:>10}  {:<11} {}",
        "Symbol", "Price", "Change", "Change%", "Volume", "Mkt Cap", "Cap", "Sector"
    );
    let _ = writeln!(out, "{}", "─".repeat(90));

    for row in rows {
        let _ = writeln!(
            out,
            "{:<8} {:>10} {:>+9.2} {:>9} {:>10} {:>10}  {:<11} {}",
            row.symbol,
            format_price(row.close_price),
            row.price_change,
            format_percent(row.price_change_percent),
            format_volume(row.volume),
            format_market_cap(row.market_cap),
            row.market_cap_category.label(),
            row.sector
        );
    }

    out
}
