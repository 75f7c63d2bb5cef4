use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::commands::DataSource;
use crate::utils::{get_api_base_url, get_api_timeout_secs};

#[derive(Parser)]
#[command(name = "moverboard")]
#[command(about = "Market movers dashboard CLI", long_about = None)]
pub struct Cli {
    /// Backend base URL (default: $MOVERS_API_URL or http://localhost:8000)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// HTTP timeout in seconds (default: $MOVERS_API_TIMEOUT_SECS or 30)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show movers cards grouped by sector or market cap
    Heatmap {
        /// Read movers from a JSON snapshot instead of the backend
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Grouping: sector or market-cap
        #[arg(long, default_value = "sector")]
        view: String,

        /// Market cap filter for the sector view (all, mega, large, mid, small, micro, unknown)
        #[arg(long, default_value = "all")]
        market_cap: String,

        /// Sector filter for the market cap view
        #[arg(long, default_value = "all")]
        sector: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Keep refreshing (every minute while trading, every 5 minutes otherwise)
        #[arg(short, long)]
        watch: bool,
    },
    /// Show movers as a sortable table
    Table {
        /// Read movers from a JSON snapshot instead of the backend
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Column: percent, change, price, volume, symbol
        #[arg(long, default_value = "percent")]
        sort_by: String,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        direction: String,

        /// Sector filter
        #[arg(long, default_value = "all")]
        sector: String,

        /// Market cap filter
        #[arg(long, default_value = "all")]
        market_cap: String,

        /// Number of rows (default: 20, max: 200)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the US market session clock
    Clock {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    let api_url = cli.api_url.unwrap_or_else(get_api_base_url);
    let timeout_secs = cli.timeout.unwrap_or_else(get_api_timeout_secs);

    match cli.command {
        Commands::Heatmap {
            file,
            view,
            market_cap,
            sector,
            json,
            watch,
        } => {
            let source = DataSource::new(file, api_url, timeout_secs);
            let options = commands::heatmap::HeatmapOptions {
                view,
                market_cap,
                sector,
                json,
                watch,
            };
            commands::heatmap::run(source, options).await;
        }
        Commands::Table {
            file,
            sort_by,
            direction,
            sector,
            market_cap,
            limit,
            json,
        } => {
            let source = DataSource::new(file, api_url, timeout_secs);
            let options = commands::table::TableOptions {
                sort_by,
                direction,
                sector,
                market_cap,
                limit,
                json,
            };
            commands::table::run(source, options).await;
        }
        Commands::Clock { json } => {
            commands::clock::run(json);
        }
    }
}
