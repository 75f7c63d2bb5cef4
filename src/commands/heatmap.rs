use super::DataSource;
use crate::error::{AppError, Result};
use crate::models::{ActiveView, CardStats, Filter, StockMoverRecord};
use crate::services::trading_hours::get_refresh_interval;
use crate::services::MoversDashboard;
use crate::utils::format::{format_percent, format_price};
use std::fmt::Write;
use std::time::Duration;
use tracing::{info, warn};

/// Refresh cadence for `--watch` while quotes move
const WATCH_TRADING_INTERVAL: Duration = Duration::from_secs(60);
/// Refresh cadence for `--watch` while the market is closed
const WATCH_CLOSED_INTERVAL: Duration = Duration::from_secs(300);

/// Heatmap selection as given on the command line
#[derive(Debug, Clone)]
pub struct HeatmapOptions {
    pub view: String,
    pub market_cap: String,
    pub sector: String,
    pub json: bool,
    pub watch: bool,
}

pub async fn run(source: DataSource, options: HeatmapOptions) {
    match show_heatmap(&source, &options).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Build a dashboard with the view and filter from the options applied
fn configure_dashboard(options: &HeatmapOptions) -> Result<MoversDashboard> {
    let view = ActiveView::from_str(&options.view).map_err(AppError::InvalidInput)?;
    let market_cap_filter =
        Filter::parse_market_cap(&options.market_cap).map_err(AppError::InvalidInput)?;
    let sector_filter = Filter::parse_sector(&options.sector);

    let mut dashboard = MoversDashboard::default();
    dashboard.set_active_view(view);
    match view {
        ActiveView::Sector => {
            if !sector_filter.is_all() {
                warn!("--sector only applies to the market-cap view, ignoring");
            }
            dashboard.select_market_cap(market_cap_filter);
        }
        ActiveView::MarketCap => {
            if !market_cap_filter.is_all() {
                warn!("--market-cap only applies to the sector view, ignoring");
            }
            dashboard.select_sector(sector_filter);
        }
    }

    Ok(dashboard)
}

fn print_cards(dashboard: &mut MoversDashboard, json: bool) -> Result<()> {
    let view = dashboard.state().active_view();
    let filter_label = dashboard.state().active_filter().to_string();
    let cards = dashboard.cards();

    if json {
        println!("{}", serde_json::to_string_pretty(cards)?);
    } else {
        print!("{}", render_cards(cards, view, &filter_label));
    }

    Ok(())
}

async fn show_heatmap(source: &DataSource, options: &HeatmapOptions) -> Result<()> {
    let mut dashboard = configure_dashboard(options)?;

    dashboard.set_snapshot(source.load().await?);
    print_cards(&mut dashboard, options.json)?;

    if !options.watch {
        return Ok(());
    }

    loop {
        let interval = get_refresh_interval(WATCH_TRADING_INTERVAL, WATCH_CLOSED_INTERVAL);
        info!("Next refresh in {}s", interval.as_secs());
        tokio::time::sleep(interval).await;

        // A failed refresh keeps the previous cards on screen
        match source.load().await {
            Ok(snapshot) => {
                dashboard.set_snapshot(snapshot);
                print_cards(&mut dashboard, options.json)?;
            }
            Err(e) => warn!("Refresh failed, keeping previous data: {}", e),
        }
    }
}

fn movers_line(records: &[StockMoverRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{} {}", r.symbol, format_percent(r.price_change_percent)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text rendering of the cards
pub fn render_cards(cards: &[CardStats], view: ActiveView, filter: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "📊 Market Movers by {} (filter: {})\n", view, filter);

    if cards.is_empty() {
        let _ = writeln!(out, "⚠️  No movers match the current selection.");
        return out;
    }

    for card in cards {
        let _ = writeln!(
            out,
            "🔹 {:<24} {:>8}   ▲ {:<3} ▼ {:<3}",
            card.label,
            format_percent(card.net_change),
            card.total_gainers,
            card.total_losers
        );

        for segment in &card.segments {
            let _ = writeln!(
                out,
                "   {:<20} {:>8}   {} movers",
                segment.label,
                format_percent(segment.net_change),
                segment.total
            );
            if !segment.top_gainers.is_empty() {
                let _ = writeln!(out, "      ▲ {}", movers_line(&segment.top_gainers));
            }
            if !segment.top_losers.is_empty() {
                let _ = writeln!(out, "      ▼ {}", movers_line(&segment.top_losers));
            }
            if let Some(best) = segment.top_gainers.first() {
                let _ = writeln!(
                    out,
                    "      best: {} @ {}",
                    best.symbol,
                    format_price(best.close_price)
                );
            }
        }
        let _ = writeln!(out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MarketCapCategory, MoversGroup};
    use crate::services::MoversAggregator;

    fn options(view: &str, market_cap: &str, sector: &str) -> HeatmapOptions {
        HeatmapOptions {
            view: view.to_string(),
            market_cap: market_cap.to_string(),
            sector: sector.to_string(),
            json: false,
            watch: false,
        }
    }

    #[test]
    fn test_configure_dashboard_sector_view() {
        let dashboard = configure_dashboard(&options("sector", "large", "Energy")).unwrap();
        assert_eq!(dashboard.state().active_view(), ActiveView::Sector);
        assert_eq!(dashboard.state().active_filter(), Filter::Only("large".to_string()));
        // Sector filter is not used by the sector view
        assert!(dashboard.state().selected_sector().is_all());
    }

    #[test]
    fn test_configure_dashboard_market_cap_view() {
        let dashboard = configure_dashboard(&options("market-cap", "all", "Energy")).unwrap();
        assert_eq!(dashboard.state().active_view(), ActiveView::MarketCap);
        assert_eq!(dashboard.state().active_filter(), Filter::Only("Energy".to_string()));
    }

    #[test]
    fn test_configure_dashboard_rejects_bad_input() {
        assert!(matches!(
            configure_dashboard(&options("bubbles", "all", "all")),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            configure_dashboard(&options("sector", "jumbo", "all")),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_empty() {
        let out = render_cards(&[], ActiveView::Sector, "micro");
        assert!(out.contains("Market Movers by sector (filter: micro)"));
        assert!(out.contains("No movers match"));
    }

    #[test]
    fn test_render_cards() {
        let groups = vec![MoversGroup::new(
            "Tech",
            vec![StockMoverRecord::new("AAPL", 5.2)
                .with_market_cap(MarketCapCategory::Mega)
                .with_price(190.0, 9.4, 1_000)],
            vec![StockMoverRecord::new("XOM", -1.1).with_market_cap(MarketCapCategory::Large)],
        )];
        let cards = MoversAggregator::build_sector_cards(&groups);
        let out = render_cards(&cards, ActiveView::Sector, "all");

        assert!(out.contains("Tech"));
        assert!(out.contains("▲ 1"));
        assert!(out.contains("Mega Cap"));
        assert!(out.contains("AAPL +5.2%"));
        assert!(out.contains("XOM -1.1%"));
        assert!(out.contains("best: AAPL @ $190.00"));
    }
}
