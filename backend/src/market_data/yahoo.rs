// =============================================================================
// Yahoo Finance Chart Client — weekly / monthly OHLC history
// =============================================================================
//
// Fetches `v8/finance/chart/{symbol}` for a range and interval and turns the
// columnar payload into a validated `PriceSeries`:
//   - bars with any missing OHLC field are skipped,
//   - prices are split/dividend adjusted with `adjclose / close` when the
//     payload carries adjusted closes,
//   - bars are sorted by date and deduplicated (last bar for a date wins).
//
// Every request goes through the shared `RateLimiter`.
// =============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::rate_limit::RateLimiter;
use super::series::{PriceBar, PriceSeries};
use crate::types::Timeframe;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
    #[serde(default)]
    adjclose: Vec<ChartAdjClose>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Normalize a symbol for Yahoo (share classes use hyphens: BRK-B, not BRK.B).
fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

/// Parse a chart payload into a validated series.
fn parse_chart(body: &str) -> Result<PriceSeries> {
    let response: ChartResponse =
        serde_json::from_str(body).context("failed to parse chart JSON")?;

    if let Some(err) = response.chart.error {
        anyhow::bail!("Yahoo chart error {}: {}", err.code, err.description);
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .context("chart response has no result")?;

    // A symbol with no history returns a result without timestamps.
    let Some(timestamps) = result.timestamp else {
        return Ok(PriceSeries::default());
    };

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .context("chart response has no quote block")?;
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

    let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
    for (i, &ts) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        ) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts, 0)
            .with_context(|| format!("timestamp {ts} out of range"))?
            .date_naive();

        let factor = match at(&adjclose, i) {
            Some(adj) if close > 0.0 && adj.is_finite() => adj / close,
            _ => 1.0,
        };

        by_date.insert(
            date,
            PriceBar {
                date,
                open: open * factor,
                high: high * factor,
                low: low * factor,
                close: close * factor,
            },
        );
    }

    let series = PriceSeries::new(by_date.into_values().collect())?;
    Ok(series)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Yahoo Finance chart client shared by all scan workers.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    range: String,
}

impl YahooClient {
    pub fn new(range: impl Into<String>, limiter: Arc<RateLimiter>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            limiter,
            range: range.into(),
        })
    }

    /// Fetch the full history of `symbol` at `timeframe` resolution.
    #[instrument(skip(self), name = "yahoo::fetch_series")]
    pub async fn fetch_series(&self, symbol: &str, timeframe: Timeframe) -> Result<PriceSeries> {
        let url = format!(
            "{}/{}?range={}&interval={}&includePrePost=false&events=div%2Csplit",
            BASE_URL,
            normalize_symbol(symbol),
            self.range,
            timeframe.interval()
        );

        self.limiter.acquire().await;
        debug!(%url, "fetching chart");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET chart for {symbol} failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read chart body for {symbol}"))?;

        if !status.is_success() {
            anyhow::bail!("chart request for {symbol} returned {status}");
        }

        let series = parse_chart(&body)
            .with_context(|| format!("invalid {timeframe} chart for {symbol}"))?;
        debug!(bars = series.len(), last = ?series.last_date(), "chart parsed");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01, 2024-02-01, 2024-03-01, 2024-03-01 (dup), 2024-04-01 (nulls)
    const FIXTURE: &str = r#"{
      "chart": {
        "result": [{
          "meta": { "symbol": "SPY" },
          "timestamp": [1706745600, 1704067200, 1709251200, 1709272800, 1711929600],
          "indicators": {
            "quote": [{
              "open":  [11.0, 10.0, 12.0, 12.5, null],
              "high":  [13.0, 12.0, 14.0, 14.5, 15.0],
              "low":   [10.0,  9.0, 11.0, 11.5, 13.0],
              "close": [12.0, 11.0, 13.0, 14.0, 14.0],
              "volume": [100, 100, 100, 100, 100]
            }],
            "adjclose": [{ "adjclose": [6.0, 11.0, 13.0, 14.0, 14.0] }]
          }
        }],
        "error": null
      }
    }"#;

    #[test]
    fn parses_sorts_and_deduplicates() {
        let series = parse_chart(FIXTURE).unwrap();
        let dates: Vec<String> = series.bars().iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-02-01", "2024-03-01"]);
        // The later bar for 2024-03-01 wins.
        assert_eq!(series.bars()[2].close, 14.0);
    }

    #[test]
    fn applies_adjustment_factor() {
        let series = parse_chart(FIXTURE).unwrap();
        let feb = series.bars()[1];
        // adjclose 6 / close 12 => factor 0.5
        assert_eq!(feb.close, 6.0);
        assert_eq!(feb.open, 5.5);
        assert_eq!(feb.high, 6.5);
        assert_eq!(feb.low, 5.0);
    }

    #[test]
    fn missing_timestamps_is_empty_series() {
        let body = r#"{ "chart": { "result": [{ "indicators": { "quote": [{}] } }], "error": null } }"#;
        assert!(parse_chart(body).unwrap().is_empty());
    }

    #[test]
    fn api_error_is_reported() {
        let body = r#"{ "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } } }"#;
        let err = parse_chart(body).unwrap_err();
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn negative_price_is_rejected() {
        let body = r#"{ "chart": { "result": [{
            "timestamp": [1704067200],
            "indicators": { "quote": [{ "open": [1.0], "high": [1.0], "low": [-1.0], "close": [1.0] }] }
        }], "error": null } }"#;
        assert!(parse_chart(body).is_err());
    }

    #[test]
    fn normalizes_share_class_symbols() {
        assert_eq!(normalize_symbol(" brk.b "), "BRK-B");
        assert_eq!(normalize_symbol("spy"), "SPY");
    }
}
