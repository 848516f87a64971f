// =============================================================================
// Scanner Configuration — JSON file with per-field defaults
// =============================================================================
//
// Every tunable lives here: the ticker universe, the pacing of the price
// source and every indicator window or span.  Nothing in the indicator core
// reads a global constant; it receives an `IndicatorConfig` value instead.
//
// All fields carry `#[serde(default)]` so that a partial (or empty) JSON file
// still loads, with missing fields taking their defaults.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::crossover::CrossoverParams;
use crate::indicators::{MacdParams, StochasticParams};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_tickers() -> Vec<String> {
    [
        "SPY", "TLT", "QQQ", "SLV", "GLD", "USO", "XLE", "XLRE", "XLI", "XLF", "XLB", "XLY",
        "XLK", "XLP", "XLV", "XLU", "UUP", "MTUM", "MOAT", "SPYV", "SPYG", "RSP", "IWO", "IWN",
        "GMF", "IBIT", "FXI",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_concurrency() -> usize {
    4
}

fn default_request_interval_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_history_range() -> String {
    "10y".to_string()
}

fn default_output_path() -> String {
    "scan_report.json".to_string()
}

fn default_roc_window() -> usize {
    26
}

fn default_macd_quarterly() -> MacdParams {
    MacdParams::QUARTERLY
}

fn default_overbought() -> f64 {
    85.0
}

// =============================================================================
// IndicatorConfig
// =============================================================================

/// Windows and spans handed to the indicator calculator and classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Look-back (bars) for the Rate of Change.
    #[serde(default = "default_roc_window")]
    pub roc_window: usize,

    /// Standard MACD (12, 26, 9).
    #[serde(default)]
    pub macd_standard: MacdParams,

    /// Quarter-scaled MACD (36, 78, 21), evaluated on monthly bars.
    #[serde(default = "default_macd_quarterly")]
    pub macd_quarterly: MacdParams,

    /// Stochastic window (89) and %D smoothing (3).
    #[serde(default)]
    pub stochastic: StochasticParams,

    /// EMA spans and history for the crossover detector (12 vs 9, 5 bars).
    #[serde(default)]
    pub crossover: CrossoverParams,

    /// %K level above which the monthly view counts as strong regardless of
    /// %D.
    #[serde(default = "default_overbought")]
    pub stochastic_overbought: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            roc_window: default_roc_window(),
            macd_standard: MacdParams::STANDARD,
            macd_quarterly: MacdParams::QUARTERLY,
            stochastic: StochasticParams::default(),
            crossover: CrossoverParams::default(),
            stochastic_overbought: default_overbought(),
        }
    }
}

impl IndicatorConfig {
    /// Reject windows and spans of zero; every indicator needs at least one
    /// bar of look-back or smoothing.
    pub fn validate(&self) -> Result<()> {
        let spans = [
            ("roc_window", self.roc_window),
            ("macd_standard.fast", self.macd_standard.fast),
            ("macd_standard.slow", self.macd_standard.slow),
            ("macd_standard.signal", self.macd_standard.signal),
            ("macd_quarterly.fast", self.macd_quarterly.fast),
            ("macd_quarterly.slow", self.macd_quarterly.slow),
            ("macd_quarterly.signal", self.macd_quarterly.signal),
            ("stochastic.window", self.stochastic.window),
            ("stochastic.smooth", self.stochastic.smooth),
            ("crossover.fast_span", self.crossover.fast_span),
            ("crossover.slow_span", self.crossover.slow_span),
        ];
        if let Some((name, _)) = spans.iter().find(|(_, value)| *value == 0) {
            anyhow::bail!("indicators.{name} must be at least 1");
        }
        if !self.stochastic_overbought.is_finite() {
            anyhow::bail!("indicators.stochastic_overbought must be finite");
        }
        Ok(())
    }
}

// =============================================================================
// ScannerConfig
// =============================================================================

/// Top-level configuration for a scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    // --- Universe & source ---------------------------------------------------

    /// Tickers to scan, in report order for ties.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,

    /// Yahoo chart range for both timeframes.
    #[serde(default = "default_history_range")]
    pub history_range: String,

    /// Maximum tickers processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Minimum spacing between two price requests, in milliseconds.
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    /// Per-request HTTP timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // --- Output --------------------------------------------------------------

    /// Where the JSON report is written.
    #[serde(default = "default_output_path")]
    pub output_path: String,

    // --- Indicators ----------------------------------------------------------

    #[serde(default)]
    pub indicators: IndicatorConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            history_range: default_history_range(),
            concurrency: default_concurrency(),
            request_interval_ms: default_request_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            output_path: default_output_path(),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or unreadable file is an error so the caller can fall back to
    /// defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scanner config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scanner config from {}", path.display()))?;

        config
            .indicators
            .validate()
            .with_context(|| format!("invalid scanner config in {}", path.display()))?;

        info!(
            path = %path.display(),
            tickers = config.tickers.len(),
            concurrency = config.concurrency,
            "scanner config loaded"
        );

        Ok(config)
    }

    /// Replace the ticker list from a comma-separated string (e.g. the
    /// `SCANNER_TICKERS` environment variable).  Blank entries are dropped and
    /// symbols are upper-cased.
    pub fn override_tickers(&mut self, list: &str) {
        let tickers: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !tickers.is_empty() {
            self.tickers = tickers;
        }
    }
}
