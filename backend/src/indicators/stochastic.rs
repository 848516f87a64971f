// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
// Compares each close to the high/low range of the trailing window:
//   %K = 100 * (close - lowest_low) / (highest_high - lowest_low)
//   %D = SMA(%K, smooth)
//
// A window whose highest high equals its lowest low has no range; %K is left
// undefined on that bar instead of being forced to 0, 50 or 100.  The latest
// reading then reports `DegenerateRange` so the classifier can handle it
// explicitly.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::rolling::{rolling_max, rolling_mean_opt, rolling_min};
use crate::error::{IndicatorError, IndicatorResult};
use crate::market_data::PriceSeries;

const NAME: &str = "stochastic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StochasticParams {
    pub window: usize,
    pub smooth: usize,
}

impl StochasticParams {
    /// Bars needed for %D to be defined on the last bar.
    pub fn required_bars(&self) -> usize {
        self.window + self.smooth.saturating_sub(1)
    }
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            window: 89,
            smooth: 3,
        }
    }
}

/// %K and %D for every bar; `None` where undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// %K and %D on the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticPoint {
    pub k: f64,
    pub d: f64,
}

impl StochasticSeries {
    /// Latest %K/%D.  Undefined values at this point can only come from a
    /// degenerate range, since the input length was checked up front.
    pub fn latest(&self) -> IndicatorResult<StochasticPoint> {
        match (self.k.last().copied().flatten(), self.d.last().copied().flatten()) {
            (Some(k), Some(d)) => Ok(StochasticPoint { k, d }),
            _ => Err(IndicatorError::DegenerateRange { indicator: NAME }),
        }
    }
}

/// Compute the Stochastic oscillator for `series`.
pub fn calculate_stochastic(
    series: &PriceSeries,
    params: StochasticParams,
) -> IndicatorResult<StochasticSeries> {
    let required = params.required_bars();
    if params.window == 0 || params.smooth == 0 || series.len() < required {
        return Err(IndicatorError::insufficient(NAME, required, series.len()));
    }

    let closes = series.closes();
    let lowest = rolling_min(&series.lows(), params.window);
    let highest = rolling_max(&series.highs(), params.window);

    let k: Vec<Option<f64>> = closes
        .iter()
        .zip(lowest.iter().zip(highest.iter()))
        .map(|(&close, (low, high))| {
            let (low, high) = ((*low)?, (*high)?);
            let range = high - low;
            if range > 0.0 {
                Some(100.0 * (close - low) / range)
            } else {
                None
            }
        })
        .collect();

    let d = rolling_mean_opt(&k, params.smooth);

    Ok(StochasticSeries { k, d })
}
