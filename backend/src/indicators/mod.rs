// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// classifier.  Functions that can fail return `IndicatorResult<T>` so callers
// are forced to handle insufficient-data and degenerate-range cases.

pub mod ema;
pub mod macd;
pub mod roc;
pub mod rolling;
pub mod set;
pub mod stochastic;

pub use macd::{MacdParams, MacdPoint, MacdSeries};
pub use set::IndicatorSet;
pub use stochastic::{StochasticParams, StochasticPoint};
