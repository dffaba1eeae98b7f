//! Portfolio-Smoke entry point
//!
//! Runs the smoke suite against the configured live target: connect to the
//! Chrome debugging endpoint, execute the five cases (one fresh session
//! each), log a per-case summary, print the report as JSON, and exit nonzero
//! when anything failed.

use portfolio_smoke::{
    config::SmokeConfig,
    session::CdpSessionProvider,
    suite::SmokeSuite,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first; its log level is the fallback when RUST_LOG
    // is unset.
    let config = SmokeConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Portfolio-Smoke v{}", portfolio_smoke::VERSION);
    info!(
        "Target: {} (CDP endpoint: {})",
        config.target_url, config.cdp_endpoint
    );

    let provider = Arc::new(CdpSessionProvider::connect(&config).await?);
    let suite = SmokeSuite::new(provider, config.tuning.clone());

    let report = suite.run_all().await;

    info!(
        "Suite finished in {}ms: {} passed, {} failed, {} errored",
        report.duration_ms, report.passed, report.failed, report.errored
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.all_passed() {
        warn!("Smoke suite did not pass");
        std::process::exit(1);
    }

    Ok(())
}
