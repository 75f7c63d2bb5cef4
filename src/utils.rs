pub mod deduplication;
pub mod format;

use crate::constants::{DEFAULT_API_TIMEOUT_SECS, DEFAULT_API_URL};

/// Get backend base URL from environment variable or use default
pub fn get_api_base_url() -> String {
    std::env::var("MOVERS_API_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Get HTTP timeout (seconds) from environment variable or use default
pub fn get_api_timeout_secs() -> u64 {
    std::env::var("MOVERS_API_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_API_TIMEOUT_SECS)
}
