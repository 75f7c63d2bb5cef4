pub mod dashboard;
pub mod movers;
pub mod movers_client;
pub mod movers_table;
pub mod trading_hours;

pub use dashboard::{MoversDashboard, StockSelectHandler};
pub use movers::MoversAggregator;
pub use movers_client::{load_snapshot, MoversClient};
pub use movers_table::{MoverRow, MoversTable, SortColumn, SortDirection, TableQuery};
pub use trading_hours::{MarketSession, TradingHours};
