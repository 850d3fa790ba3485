//! Sync worker binary.
//!
//! Operational entry point for template materialization: periodically
//! drains the sync queue and reports per-venue refreshed-row counts.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin sync-worker
//! ```
//!
//! # Environment Variables
//!
//! - `SYNC_INTERVAL_SECS`: seconds between batch runs (default: 60)
//! - `SCHEDULER_HORIZON_DAYS` / `SCHEDULER_SYNC_BATCH_LIMIT`: engine config
//! - `REPOSITORY_TYPE`: storage backend (default: local)
//! - `RUST_LOG`: log filter (default: info)

use std::env;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use venue_scheduler::config::EngineConfig;
use venue_scheduler::db::RepositoryFactory;
use venue_scheduler::models::SystemClock;
use venue_scheduler::services::materializer::process_sync_queue;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting sync worker");

    let config = EngineConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let repository = RepositoryFactory::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let clock = SystemClock;

    let interval_secs: u64 = env::var("SYNC_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60);
    info!(
        interval_secs,
        horizon_days = config.horizon_days,
        batch_limit = config.sync_batch_limit,
        "Worker configured"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        ticker.tick().await;

        match process_sync_queue(
            repository.as_ref(),
            &clock,
            config.sync_batch_limit,
            config.horizon_days,
        )
        .await
        {
            Ok(reports) if reports.is_empty() => {}
            Ok(reports) => {
                for report in &reports {
                    info!(
                        venue = report.venue_id.value(),
                        refreshed_rows = report.refreshed_rows,
                        "Venue window refreshed"
                    );
                }
            }
            Err(e) => error!(error = %e, "Sync batch failed"),
        }
    }
}
