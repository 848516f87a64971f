// =============================================================================
// Trend Scanner — Main Entry Point
// =============================================================================
//
// One-shot scan: fetch weekly and monthly history for every configured ticker,
// classify the trend, rank by ROC and write the report.  Ctrl+C abandons the
// scan without writing a partial report.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod aggregator;
mod classifier;
mod config;
mod crossover;
mod error;
mod export;
mod indicators;
mod market_data;
mod scanner;
mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::aggregator::TickerOutcome;
use crate::config::ScannerConfig;
use crate::market_data::{RateLimiter, YahooClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Trend Scanner — Weekly / Monthly Momentum         ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path =
        std::env::var("SCANNER_CONFIG").unwrap_or_else(|_| "scanner_config.json".into());
    let mut config = ScannerConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScannerConfig::default()
    });

    if let Ok(list) = std::env::var("SCANNER_TICKERS") {
        config.override_tickers(&list);
    }

    info!(
        tickers = config.tickers.len(),
        range = %config.history_range,
        concurrency = config.concurrency,
        "Scan configured"
    );

    // ── 2. Market data client ────────────────────────────────────────────
    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
        config.request_interval_ms,
    )));
    let client = YahooClient::new(
        config.history_range.clone(),
        limiter,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    // ── 3. Scan (abandoned on Ctrl+C) ────────────────────────────────────
    let scan = scanner::run_scan(
        &config.tickers,
        config.concurrency,
        &config.indicators,
        |ticker| scanner::fetch_history(client.clone(), ticker),
    );

    let outcomes = tokio::select! {
        outcomes = scan => outcomes,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            warn!("Interrupted, scan abandoned and no report written");
            return Ok(());
        }
    };

    // ── 4. Rank, summarise, export ───────────────────────────────────────
    let report = aggregator::aggregate(outcomes, chrono::Utc::now())
        .context("nothing to aggregate")?;

    export::write_report(&report, &config.output_path)?;

    for (rank, row) in report.rows.iter().enumerate() {
        match row {
            TickerOutcome::Valid(r) => info!(
                rank = rank + 1,
                ticker = %r.ticker,
                roc = format!("{:.2}", r.roc),
                weekly = %r.weekly,
                monthly = %r.monthly,
                quarterly = %r.quarterly,
                crossover = %r.crossover,
                "ranked"
            ),
            TickerOutcome::Invalid { ticker, reason, .. } => {
                info!(ticker = %ticker, ?reason, "no classification")
            }
        }
    }

    let s = &report.summary;
    info!(
        total = s.total,
        valid = s.valid,
        invalid = s.invalid,
        best = ?s.best.as_ref().map(|b| (&b.ticker, b.roc)),
        worst = ?s.worst.as_ref().map(|w| (&w.ticker, w.roc)),
        mean_roc = ?s.mean_roc,
        std_dev_roc = ?s.std_dev_roc,
        positive_pct = ?s.positive_pct,
        "Scan complete"
    );

    Ok(())
}
