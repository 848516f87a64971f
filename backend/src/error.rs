// =============================================================================
// Error taxonomy for the indicator core
// =============================================================================
//
// Indicator and classification code never panics on bad input.  Every failure
// is one of the variants below and is isolated to the ticker that produced it.
// Only `AggregateError` can stop a whole scan.

use thiserror::Error;

/// Failure of a single indicator or of series validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("insufficient data for {indicator}: need {required} bars, have {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("degenerate range for {indicator}: highest high equals lowest low")]
    DegenerateRange { indicator: &'static str },

    #[error("malformed series: {0}")]
    MalformedSeries(String),

    #[error("zero reference price for {indicator}")]
    ZeroReference { indicator: &'static str },
}

impl IndicatorError {
    pub fn insufficient(indicator: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            indicator,
            required,
            available,
        }
    }
}

/// Batch-level failure of the aggregator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no tickers supplied to the scan")]
    NoTickers,
}

pub type IndicatorResult<T> = std::result::Result<T, IndicatorError>;
