// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   line      = EMA(close, fast) - EMA(close, slow)
//   signal    = EMA(line, signal)
//   histogram = line - signal
//
// All three series have the same length as the input closes.  Two
// parameterisations are used by the classifier: the standard (12, 26, 9) and
// a quarter-scaled (36, 78, 21) variant evaluated on monthly bars.

use serde::{Deserialize, Serialize};

use super::ema::calculate_ema;
use crate::error::{IndicatorError, IndicatorResult};

const NAME: &str = "macd";

/// Fast, slow and signal spans for one MACD instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl MacdParams {
    pub const STANDARD: Self = Self {
        fast: 12,
        slow: 26,
        signal: 9,
    };

    pub const QUARTERLY: Self = Self {
        fast: 36,
        slow: 78,
        signal: 21,
    };
}

impl Default for MacdParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Full MACD output, aligned bar-for-bar with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Values of the three MACD series on a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdSeries {
    /// Values on the most recent bar.
    pub fn latest(&self) -> Option<MacdPoint> {
        Some(MacdPoint {
            line: *self.line.last()?,
            signal: *self.signal.last()?,
            histogram: *self.histogram.last()?,
        })
    }
}

/// Compute MACD over `closes`.
///
/// Fails with `InsufficientData` on an empty input or a zero span; any
/// non-empty series yields a fully defined result because the EMA is seeded
/// from the first close.
pub fn calculate_macd(closes: &[f64], params: MacdParams) -> IndicatorResult<MacdSeries> {
    if params.fast == 0 || params.slow == 0 || params.signal == 0 || closes.is_empty() {
        return Err(IndicatorError::insufficient(NAME, 1, closes.len()));
    }

    let fast = calculate_ema(closes, params.fast);
    let slow = calculate_ema(closes, params.slow);

    let line: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&line, params.signal);
    let histogram = line.iter().zip(signal.iter()).map(|(l, s)| l - s).collect();

    Ok(MacdSeries {
        line,
        signal,
        histogram,
    })
}
