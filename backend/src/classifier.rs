// =============================================================================
// Multi-Timeframe Signal Classifier
// =============================================================================
//
// Reduces the weekly and monthly indicator sets of one ticker to categorical
// labels.
//
// Decision rules:
//   weekly     = Bullish  iff  standard MACD histogram (weekly) > 0
//   quarterly  = Bullish  iff  quarterly MACD line > quarterly signal (monthly)
//   monthly    = table below, standard MACD histogram + Stochastic (monthly)
//
//   | histogram | stochastic                     | monthly |
//   |-----------|--------------------------------|---------|
//   | > 0       | %K > %D  or  %K > overbought   | Bullish |
//   | > 0       | otherwise                      | Neutral |
//   | <= 0      | %K < %D  and %K < overbought   | Bearish |
//   | <= 0      | otherwise                      | Neutral |
//
// A monthly Stochastic that is undefined (degenerate range, or a history
// shorter than its window) yields Neutral and is flagged on the result; the
// ticker keeps its weekly ROC and labels.
// ROC and the crossover event come from the weekly set.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IndicatorConfig;
use crate::crossover::CrossoverDetector;
use crate::error::{IndicatorError, IndicatorResult};
use crate::indicators::{IndicatorSet, MacdPoint, MacdSeries, StochasticPoint};
use crate::types::{CrossoverEvent, MonthlyLabel, TrendLabel};

/// Monthly Stochastic as seen by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum StochasticReading {
    Defined { k: f64, d: f64 },
    DegenerateRange,
    Insufficient { required: usize, available: usize },
}

/// Full classification for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub ticker: String,
    pub roc: f64,
    pub weekly: TrendLabel,
    pub monthly: MonthlyLabel,
    pub quarterly: TrendLabel,
    pub crossover: CrossoverEvent,
    pub stochastic: StochasticReading,
}

/// Weekly label from the standard MACD histogram.
pub fn weekly_label(macd: &MacdSeries) -> IndicatorResult<TrendLabel> {
    let point = latest_macd(macd)?;
    Ok(TrendLabel::from_condition(point.histogram > 0.0))
}

/// Quarterly label from the quarter-scaled MACD line versus its signal.
pub fn quarterly_label(macd: &MacdSeries) -> IndicatorResult<TrendLabel> {
    let point = latest_macd(macd)?;
    Ok(TrendLabel::from_condition(point.line > point.signal))
}

/// Monthly tri-state label from the MACD histogram and a Stochastic reading.
pub fn monthly_label(histogram: f64, stochastic: StochasticReading, overbought: f64) -> MonthlyLabel {
    let StochasticReading::Defined { k, d } = stochastic else {
        return MonthlyLabel::Neutral;
    };

    if histogram > 0.0 {
        if k > d || k > overbought {
            MonthlyLabel::Bullish
        } else {
            MonthlyLabel::Neutral
        }
    } else if k < d && k < overbought {
        MonthlyLabel::Bearish
    } else {
        MonthlyLabel::Neutral
    }
}

/// Classify one ticker from its weekly and monthly indicator sets.
///
/// An undefined monthly Stochastic only neutralises the monthly label.  Any
/// other undefined indicator makes the whole ticker fail with that error.
pub fn classify(
    ticker: &str,
    weekly: &IndicatorSet,
    monthly: &IndicatorSet,
    config: &IndicatorConfig,
) -> IndicatorResult<SignalResult> {
    let roc = weekly.roc.clone()?;
    let weekly_macd = weekly.macd_standard.as_ref().map_err(Clone::clone)?;
    let weekly_trend = weekly_label(weekly_macd)?;
    let crossover = CrossoverDetector::new(config.crossover.lookback)
        .latest(&weekly.ema_fast, &weekly.ema_slow)?;

    let monthly_macd = monthly.macd_standard.as_ref().map_err(Clone::clone)?;
    let quarterly_macd = monthly.macd_quarterly.as_ref().map_err(Clone::clone)?;
    let stochastic = match monthly.stochastic.as_ref() {
        Ok(series) => match series.latest() {
            Ok(StochasticPoint { k, d }) => StochasticReading::Defined { k, d },
            Err(IndicatorError::DegenerateRange { .. }) => StochasticReading::DegenerateRange,
            Err(e) => return Err(e),
        },
        Err(&IndicatorError::InsufficientData {
            required,
            available,
            ..
        }) => StochasticReading::Insufficient {
            required,
            available,
        },
        Err(e) => return Err(e.clone()),
    };

    let histogram = latest_macd(monthly_macd)?.histogram;
    let monthly_trend = monthly_label(histogram, stochastic, config.stochastic_overbought);
    let quarterly = quarterly_label(quarterly_macd)?;

    debug!(
        ticker,
        roc = format!("{:.2}", roc),
        weekly = %weekly_trend,
        monthly = %monthly_trend,
        quarterly = %quarterly,
        crossover = %crossover,
        "ticker classified"
    );

    Ok(SignalResult {
        ticker: ticker.to_string(),
        roc,
        weekly: weekly_trend,
        monthly: monthly_trend,
        quarterly,
        crossover,
        stochastic,
    })
}

fn latest_macd(macd: &MacdSeries) -> IndicatorResult<MacdPoint> {
    macd.latest()
        .ok_or_else(|| IndicatorError::insufficient("macd", 1, 0))
}
