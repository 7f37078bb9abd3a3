//! Inventory Value - Steam inventory valuation
//!
//! Prices a Steam inventory on the Community Market and appends the total to
//! a value history. Runs once by default, or repeatedly with --interval-hours.

use clap::Parser;
use inventory_value::{logging, Config, SteamClient, ValueHistory};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::interval;

/// One year
const MAX_INTERVAL_HOURS: u64 = 8760;

/// Steam inventory value tracker
#[derive(Parser, Debug)]
#[command(name = "inventory_value")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON settings file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Re-run every N hours (1 to 8760) instead of exiting after one run
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_HOURS))]
    interval_hours: Option<u64>,

    /// Default log filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init_stderr(&args.log_level);
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.log_file, &args.log_level) {
        logging::init_stderr(&args.log_level);
        log::error!("{}", e);
        std::process::exit(1);
    }

    log::info!("Starting inventory_value...");
    log::info!("Value history: {}", config.database.display());

    let client = match SteamClient::with_base_url(&config.community_url, &config.identity) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    match args.interval_hours {
        None => {
            if !run_once(&config, &client).await {
                std::process::exit(1);
            }
        }
        Some(hours) => {
            log::info!("Running in daemon mode, every {} hour(s)", hours);
            run_daemon(&config, &client, hours).await;
        }
    }
}

/// Run the tracker periodically; the first run starts immediately
async fn run_daemon(config: &Config, client: &SteamClient, interval_hours: u64) {
    let mut ticker = interval(Duration::from_secs(interval_hours.saturating_mul(3600)));
    loop {
        ticker.tick().await;
        run_once(config, client).await;
    }
}

/// Run a single valuation; false if the inventory could not be fetched
async fn run_once(config: &Config, client: &SteamClient) -> bool {
    let mut sink = match ValueHistory::open(&config.database) {
        Ok(db) => Some(db),
        Err(e) => {
            log::error!("Failed to open value history: {}", e);
            None
        }
    };

    match inventory_value::execute(config, client, &config.pacing(), &mut sink).await {
        Ok(report) => {
            log::debug!(
                "Run finished: {} items priced, total {:.2}",
                report.summary.items.len(),
                report.total_value()
            );
            true
        }
        Err(e) => {
            log::error!("Exiting due to inventory fetch failure: {}", e);
            false
        }
    }
}
