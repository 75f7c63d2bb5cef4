use crate::constants::{MARKET_CAP_MOVERS_PATH, SECTOR_MOVERS_PATH};
use crate::error::Error;
use crate::models::{MoversGroup, MoversSnapshot};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

/// Client for the movers endpoints of the dashboard backend
pub struct MoversClient {
    base_url: String,
    client: reqwest::Client,
}

impl MoversClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend (e.g., "http://localhost:8000")
    /// * `timeout_secs` - Per-request timeout
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, Error> {
        // Trim whitespace and remove trailing slashes from base_url
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Invalid base_url: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created MoversClient: base_url='{}', timeout={}s", base_url, timeout_secs);

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /api/movers/sectors
    pub async fn fetch_sector_movers(&self) -> Result<Vec<MoversGroup>, Error> {
        self.fetch_groups(SECTOR_MOVERS_PATH).await
    }

    /// GET /api/movers/market-caps
    pub async fn fetch_market_cap_movers(&self) -> Result<Vec<MoversGroup>, Error> {
        self.fetch_groups(MARKET_CAP_MOVERS_PATH).await
    }

    /// Fetch both feeds concurrently
    pub async fn fetch_snapshot(&self) -> Result<MoversSnapshot, Error> {
        let (sectors, market_caps) =
            tokio::try_join!(self.fetch_sector_movers(), self.fetch_market_cap_movers())?;

        let snapshot = MoversSnapshot::new(sectors, market_caps);
        info!(
            "Fetched movers snapshot: {} sector groups, {} market cap groups, {} records",
            snapshot.sectors.len(),
            snapshot.market_caps.len(),
            snapshot.record_count()
        );
        Ok(snapshot)
    }

    async fn fetch_groups(&self, path: &str) -> Result<Vec<MoversGroup>, Error> {
        let url = self.endpoint(path);
        debug!("Sending request to: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            let error_msg = format!("API request failed: {} (url: {})", e, url);
            error!("{}", error_msg);
            Error::Network(error_msg)
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(Error::Network(format!(
                "API returned error status {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response body: {}", e)))?;

        parse_groups(&body)
    }
}

/// Parse a movers feed body
///
/// Accepts either a bare array of groups or an object wrapping it in `data`.
pub fn parse_groups(body: &str) -> Result<Vec<MoversGroup>, Error> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Feed {
        Bare(Vec<MoversGroup>),
        Wrapped { data: Vec<MoversGroup> },
    }

    let feed: Feed = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("Failed to parse movers response: {}", e)))?;

    Ok(match feed {
        Feed::Bare(groups) => groups,
        Feed::Wrapped { data } => data,
    })
}

/// Load a movers snapshot from a JSON file without blocking the runtime
pub async fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<MoversSnapshot, Error> {
    let path = path.as_ref().to_path_buf();
    let shown = path.display().to_string();

    let snapshot = tokio::task::spawn_blocking(move || MoversSnapshot::from_file(&path))
        .await
        .map_err(|e| Error::Other(format!("Snapshot loader task failed: {}", e)))??;

    info!(
        "Loaded movers snapshot from {}: {} records",
        shown,
        snapshot.record_count()
    );
    Ok(snapshot)
}
