//! Movers Dashboard Constants
//!
//! Fixed values shared by the aggregation pipeline, the table view and the CLI.

/// Number of top gainers/losers kept per segment
pub const TOP_MOVERS_PER_SEGMENT: usize = 3;

/// Sector label used when a record has no usable sector
pub const UNCLASSIFIED_SECTOR: &str = "Unclassified";

/// Sector values treated as "no sector" (compared case-insensitively after trimming)
pub const MISSING_SECTOR_VALUES: &[&str] = &["", "N/A", "NA", "NONE", "NULL"];

/// Sentinel accepted by filters and CLI flags meaning "no restriction"
pub const FILTER_ALL: &str = "all";

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default HTTP timeout in seconds
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Backend path for movers grouped by sector
pub const SECTOR_MOVERS_PATH: &str = "/api/movers/sectors";

/// Backend path for movers grouped by market-cap bracket
pub const MARKET_CAP_MOVERS_PATH: &str = "/api/movers/market-caps";

/// Table view row limit defaults
///
/// | Setting | Value |
/// |---------|-------|
/// | default | 20    |
/// | minimum | 1     |
/// | maximum | 200   |
pub const TABLE_DEFAULT_LIMIT: usize = 20;
pub const TABLE_MIN_LIMIT: usize = 1;
pub const TABLE_MAX_LIMIT: usize = 200;

/// Market cap thresholds (USD) used for display suffixes
pub const THOUSAND: f64 = 1_000.0;
pub const MILLION: f64 = 1_000_000.0;
pub const BILLION: f64 = 1_000_000_000.0;
pub const TRILLION: f64 = 1_000_000_000_000.0;
