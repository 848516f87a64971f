// =============================================================================
// Scan Pipeline — per-ticker analysis over a bounded worker pool
// =============================================================================
//
// Each ticker is fetched (weekly + monthly), analysed and reduced to a single
// `TickerOutcome`.  Analysis is synchronous and pure, so a ticker's outcome is
// either produced whole or not at all; dropping the scan future abandons
// in-flight fetches without leaving partial results behind.
//
// Up to `concurrency` tickers are in flight at once.  Outcomes arrive in
// completion order and are put back into ticker order before returning.
// =============================================================================

use std::future::Future;

use anyhow::Result;
use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::aggregator::{InvalidReason, TickerOutcome};
use crate::classifier::classify;
use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::indicators::IndicatorSet;
use crate::market_data::{PriceSeries, YahooClient};
use crate::types::Timeframe;

/// Weekly and monthly history for one ticker.
#[derive(Debug, Clone, Default)]
pub struct TickerHistory {
    pub weekly: PriceSeries,
    pub monthly: PriceSeries,
}

/// Fetch both timeframes for `ticker`.
pub async fn fetch_history(client: YahooClient, ticker: String) -> Result<TickerHistory> {
    let weekly = client.fetch_series(&ticker, Timeframe::Weekly).await?;
    let monthly = client.fetch_series(&ticker, Timeframe::Monthly).await?;
    Ok(TickerHistory { weekly, monthly })
}

/// Classify one ticker from already-fetched history.
pub fn analyze_ticker(ticker: &str, history: &TickerHistory, config: &IndicatorConfig) -> TickerOutcome {
    for (timeframe, series) in [
        (Timeframe::Weekly, &history.weekly),
        (Timeframe::Monthly, &history.monthly),
    ] {
        if series.is_empty() {
            return TickerOutcome::invalid(
                ticker,
                InvalidReason::FetchFailed,
                format!("no {timeframe} bars returned"),
            );
        }
    }

    let weekly = IndicatorSet::compute(&history.weekly, config);
    let monthly = IndicatorSet::compute(&history.monthly, config);

    match classify(ticker, &weekly, &monthly, config) {
        Ok(result) => TickerOutcome::Valid(result),
        Err(err) => TickerOutcome::from_error(ticker, &err),
    }
}

/// Map a fetch failure to an invalid row, keeping validation failures distinct
/// from transport failures.
fn fetch_failure(ticker: &str, err: &anyhow::Error) -> TickerOutcome {
    let malformed = err
        .chain()
        .find_map(|e| e.downcast_ref::<IndicatorError>())
        .filter(|e| matches!(e, IndicatorError::MalformedSeries(_)));
    match malformed {
        Some(e) => TickerOutcome::from_error(ticker, e),
        None => TickerOutcome::invalid(ticker, InvalidReason::FetchFailed, format!("{err:#}")),
    }
}

/// Run the scan for `tickers`, fetching through `fetch` with at most
/// `concurrency` tickers in flight.  Returns one outcome per ticker, in input
/// order.
pub async fn run_scan<F, Fut>(
    tickers: &[String],
    concurrency: usize,
    config: &IndicatorConfig,
    fetch: F,
) -> Vec<TickerOutcome>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<TickerHistory>>,
{
    let total = tickers.len();

    let mut indexed: Vec<(usize, TickerOutcome)> = stream::iter(tickers.iter().enumerate())
        .map(|(idx, ticker)| {
            let pending = fetch(ticker.clone());
            async move {
                let outcome = match pending.await {
                    Ok(history) => analyze_ticker(ticker, &history, config),
                    Err(err) => {
                        warn!(ticker = %ticker, error = %format!("{err:#}"), "fetch failed");
                        fetch_failure(ticker, &err)
                    }
                };
                match &outcome {
                    TickerOutcome::Valid(r) => info!(
                        ticker = %ticker,
                        progress = format!("{}/{}", idx + 1, total),
                        roc = format!("{:.2}", r.roc),
                        "ticker processed"
                    ),
                    TickerOutcome::Invalid { reason, detail, .. } => warn!(
                        ticker = %ticker,
                        progress = format!("{}/{}", idx + 1, total),
                        ?reason,
                        detail = %detail,
                        "ticker skipped"
                    ),
                }
                (idx, outcome)
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    indexed.sort_by_key(|(idx, _)| *idx);
    indexed.into_iter().map(|(_, outcome)| outcome).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::test_support::{ascending, descending, series_from_closes};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn history(closes: &[f64]) -> TickerHistory {
        TickerHistory {
            weekly: series_from_closes(closes),
            monthly: series_from_closes(closes),
        }
    }

    #[test]
    fn analyze_valid_ticker() {
        let outcome = analyze_ticker("UP", &history(&ascending(200)), &IndicatorConfig::default());
        assert!(matches!(outcome, TickerOutcome::Valid(ref r) if r.roc > 0.0));
    }

    #[test]
    fn analyze_empty_series_is_fetch_failure() {
        let h = TickerHistory {
            weekly: series_from_closes(&ascending(200)),
            monthly: PriceSeries::default(),
        };
        let outcome = analyze_ticker("GONE", &h, &IndicatorConfig::default());
        assert!(matches!(
            outcome,
            TickerOutcome::Invalid { reason: InvalidReason::FetchFailed, .. }
        ));
    }

    #[test]
    fn analyze_short_monthly_history_stays_ranked() {
        let h = TickerHistory {
            weekly: series_from_closes(&ascending(140)),
            monthly: series_from_closes(&ascending(34)),
        };
        let outcome = analyze_ticker("IBIT", &h, &IndicatorConfig::default());
        assert!(matches!(outcome, TickerOutcome::Valid(_)));
        assert!(outcome.roc().is_some_and(|roc| roc > 0.0));
    }

    #[test]
    fn analyze_short_weekly_history_is_insufficient() {
        let outcome = analyze_ticker("IPO", &history(&ascending(20)), &IndicatorConfig::default());
        assert!(matches!(
            outcome,
            TickerOutcome::Invalid { reason: InvalidReason::InsufficientData, .. }
        ));
        assert!(outcome.roc().is_none());
    }

    #[test]
    fn malformed_fetch_error_is_classified() {
        let err = anyhow::Error::new(IndicatorError::MalformedSeries("bad".into()))
            .context("invalid chart");
        assert!(matches!(
            fetch_failure("X", &err),
            TickerOutcome::Invalid { reason: InvalidReason::MalformedSeries, .. }
        ));

        let err = anyhow::anyhow!("connection reset");
        assert!(matches!(
            fetch_failure("X", &err),
            TickerOutcome::Invalid { reason: InvalidReason::FetchFailed, .. }
        ));
    }

    #[tokio::test]
    async fn run_scan_restores_ticker_order() {
        let tickers: Vec<String> = ["SLOW", "FAST", "DOWN", "BROKEN"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let outcomes = run_scan(&tickers, 4, &IndicatorConfig::default(), |ticker| async move {
            match ticker.as_str() {
                "SLOW" => {
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    Ok(history(&ascending(200)))
                }
                "FAST" => Ok(history(&ascending(250))),
                "DOWN" => Ok(history(&descending(200))),
                _ => Err(anyhow::anyhow!("HTTP 404")),
            }
        })
        .await;

        let order: Vec<&str> = outcomes.iter().map(TickerOutcome::ticker).collect();
        assert_eq!(order, vec!["SLOW", "FAST", "DOWN", "BROKEN"]);
        assert!(matches!(outcomes[0], TickerOutcome::Valid(_)));
        assert!(matches!(
            outcomes[3],
            TickerOutcome::Invalid { reason: InvalidReason::FetchFailed, .. }
        ));
    }

    #[tokio::test]
    async fn run_scan_bounds_concurrency() {
        let tickers: Vec<String> = (0..8).map(|i| format!("T{i}")).collect();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let outcomes = run_scan(&tickers, 2, &IndicatorConfig::default(), |_ticker| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(history(&ascending(200)))
            }
        })
        .await;

        assert_eq!(outcomes.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
}
