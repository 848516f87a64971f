// =============================================================================
// IndicatorSet — every indicator for one series, computed once
// =============================================================================
//
// The classifier and the crossover detector read from this value instead of
// recomputing EMAs on their own, so all consumers see the same numbers.  Each
// indicator is stored as a `Result`: an undefined indicator stays visibly
// undefined rather than being filled from partial data.

use tracing::debug;

use super::ema::calculate_ema;
use super::macd::{calculate_macd, MacdSeries};
use super::roc::current_roc;
use super::stochastic::{calculate_stochastic, StochasticSeries};
use crate::config::IndicatorConfig;
use crate::error::{IndicatorError, IndicatorResult};
use crate::market_data::PriceSeries;

#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub bars: usize,
    pub roc: IndicatorResult<f64>,
    pub macd_standard: IndicatorResult<MacdSeries>,
    pub macd_quarterly: IndicatorResult<MacdSeries>,
    pub stochastic: IndicatorResult<StochasticSeries>,
    /// Fast EMA for the crossover detector (span 12 by default).
    pub ema_fast: Vec<f64>,
    /// Slow EMA for the crossover detector (span 9 by default).
    pub ema_slow: Vec<f64>,
}

impl IndicatorSet {
    pub fn compute(series: &PriceSeries, config: &IndicatorConfig) -> Self {
        let closes = series.closes();

        let set = Self {
            bars: series.len(),
            roc: current_roc(&closes, config.roc_window),
            macd_standard: calculate_macd(&closes, config.macd_standard),
            macd_quarterly: calculate_macd(&closes, config.macd_quarterly),
            stochastic: calculate_stochastic(series, config.stochastic),
            ema_fast: calculate_ema(&closes, config.crossover.fast_span),
            ema_slow: calculate_ema(&closes, config.crossover.slow_span),
        };

        debug!(
            bars = set.bars,
            first_error = ?set.first_error(),
            "indicator set computed"
        );

        set
    }

    /// First error among the indicators a caller depends on, if any.
    pub fn first_error(&self) -> Option<&IndicatorError> {
        [
            self.roc.as_ref().err(),
            self.macd_standard.as_ref().err(),
            self.macd_quarterly.as_ref().err(),
            self.stochastic.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .next()
    }
}
