pub mod clock;
pub mod heatmap;
pub mod table;

use crate::error::Result;
use crate::models::MoversSnapshot;
use crate::services::{load_snapshot, MoversClient};
use std::path::PathBuf;

/// Where a command reads its movers from
#[derive(Debug, Clone)]
pub struct DataSource {
    pub file: Option<PathBuf>,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl DataSource {
    pub fn new(file: Option<PathBuf>, api_url: String, timeout_secs: u64) -> Self {
        Self {
            file,
            api_url,
            timeout_secs,
        }
    }

    /// Load from the snapshot file if given, otherwise fetch from the backend
    pub async fn load(&self) -> Result<MoversSnapshot> {
        match &self.file {
            Some(path) => load_snapshot(path).await,
            None => {
                let client = MoversClient::new(&self.api_url, self.timeout_secs)?;
                client.fetch_snapshot().await
            }
        }
    }
}
