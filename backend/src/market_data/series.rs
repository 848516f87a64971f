use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, IndicatorResult};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLC bar for one interval (week or month).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    fn validate(&self) -> IndicatorResult<()> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(IndicatorError::MalformedSeries(format!(
                    "{field} on {} is {value}, expected a finite non-negative price",
                    self.date
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PriceSeries -- validated, chronologically ascending bars
// ---------------------------------------------------------------------------

/// Chronologically ascending bars with unique dates.
///
/// The only way to build one is [`PriceSeries::new`], which rejects
/// out-of-order or duplicate dates and non-finite prices, so indicator code can
/// rely on those properties without re-checking.  An empty series is allowed:
/// it is how a total fetch failure is represented.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> IndicatorResult<Self> {
        for bar in &bars {
            bar.validate()?;
        }
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(IndicatorError::MalformedSeries(format!(
                    "dates not strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }
        Ok(Self { bars })
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Keep only the most recent `count` bars.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn tail(&self, count: usize) -> Self {
        let start = self.bars.len().saturating_sub(count);
        Self {
            bars: self.bars[start..].to_vec(),
        }
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
