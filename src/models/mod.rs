mod market_cap;
mod movers_group;
mod stats;
mod stock_mover;
pub mod view_state;

pub use market_cap::MarketCapCategory;
pub use movers_group::{MoversGroup, MoversSnapshot};
pub use stats::{CardStats, SegmentStats};
pub use stock_mover::{normalize_sector, StockMoverRecord};
pub use view_state::{ActiveView, Filter, MoversViewState};
