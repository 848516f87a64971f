// =============================================================================
// Result Aggregator — ranking and summary statistics for a scan
// =============================================================================
//
// Runs once every ticker has produced an outcome.  Valid rows are ranked by
// ROC (descending, stable, so ties keep ticker order); invalid rows follow in
// their original order.  Statistics only cover valid rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::SignalResult;
use crate::error::{AggregateError, IndicatorError};

/// Why a ticker has no classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidReason {
    FetchFailed,
    MalformedSeries,
    InsufficientData,
    UndefinedIndicator,
}

impl From<&IndicatorError> for InvalidReason {
    fn from(err: &IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData { .. } => Self::InsufficientData,
            IndicatorError::MalformedSeries(_) => Self::MalformedSeries,
            IndicatorError::DegenerateRange { .. } | IndicatorError::ZeroReference { .. } => {
                Self::UndefinedIndicator
            }
        }
    }
}

/// Result of processing one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickerOutcome {
    Valid(SignalResult),
    Invalid {
        ticker: String,
        reason: InvalidReason,
        detail: String,
    },
}

impl TickerOutcome {
    pub fn invalid(ticker: impl Into<String>, reason: InvalidReason, detail: impl Into<String>) -> Self {
        Self::Invalid {
            ticker: ticker.into(),
            reason,
            detail: detail.into(),
        }
    }

    pub fn from_error(ticker: impl Into<String>, err: &IndicatorError) -> Self {
        Self::invalid(ticker, InvalidReason::from(err), err.to_string())
    }

    pub fn ticker(&self) -> &str {
        match self {
            Self::Valid(result) => &result.ticker,
            Self::Invalid { ticker, .. } => ticker,
        }
    }

    /// ROC for valid rows; `None` is the insufficient-data marker.
    pub fn roc(&self) -> Option<f64> {
        match self {
            Self::Valid(result) => Some(result.roc),
            Self::Invalid { .. } => None,
        }
    }
}

/// Ticker and ROC of an extreme row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocExtreme {
    pub ticker: String,
    pub roc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub mean_roc: Option<f64>,
    /// Sample standard deviation (n - 1); needs two valid rows.
    pub std_dev_roc: Option<f64>,
    pub positive_count: usize,
    pub positive_pct: Option<f64>,
    pub best: Option<RocExtreme>,
    pub worst: Option<RocExtreme>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<TickerOutcome>,
    pub summary: ScanSummary,
}

/// Rank `outcomes` (given in ticker order) and compute the summary.
pub fn aggregate(
    outcomes: Vec<TickerOutcome>,
    generated_at: DateTime<Utc>,
) -> Result<ScanReport, AggregateError> {
    if outcomes.is_empty() {
        return Err(AggregateError::NoTickers);
    }

    let total = outcomes.len();
    let (mut valid, invalid): (Vec<TickerOutcome>, Vec<TickerOutcome>) = outcomes
        .into_iter()
        .partition(|o| matches!(o, TickerOutcome::Valid(_)));

    // `sort_by` is stable: equal ROCs keep their input order.
    valid.sort_by(|a, b| {
        let (a, b) = (a.roc().unwrap_or(f64::NAN), b.roc().unwrap_or(f64::NAN));
        b.total_cmp(&a)
    });

    let rocs: Vec<f64> = valid.iter().filter_map(TickerOutcome::roc).collect();
    let summary = summarise(total, &valid, &rocs);

    let mut rows = valid;
    rows.extend(invalid);

    Ok(ScanReport {
        generated_at,
        rows,
        summary,
    })
}

fn summarise(total: usize, ranked: &[TickerOutcome], rocs: &[f64]) -> ScanSummary {
    let n = rocs.len();
    let mean_roc = (n > 0).then(|| rocs.iter().sum::<f64>() / n as f64);
    let std_dev_roc = match mean_roc {
        Some(mean) if n >= 2 => {
            let variance = rocs.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            Some(variance.sqrt())
        }
        _ => None,
    };
    let positive_count = rocs.iter().filter(|&&r| r > 0.0).count();
    let positive_pct = (n > 0).then(|| positive_count as f64 / n as f64 * 100.0);

    let extreme = |o: Option<&TickerOutcome>| {
        o.and_then(|o| {
            Some(RocExtreme {
                ticker: o.ticker().to_string(),
                roc: o.roc()?,
            })
        })
    };

    ScanSummary {
        total,
        valid: n,
        invalid: total - n,
        mean_roc,
        std_dev_roc,
        positive_count,
        positive_pct,
        best: extreme(ranked.first()),
        worst: extreme(ranked.last()),
    }
}
