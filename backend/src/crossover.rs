// =============================================================================
// EMA Crossover Detector
// =============================================================================
//
// Watches the difference between a fast and a slow EMA (EMA12 - EMA9 by
// default) and reports a cross when its sign flips between the two most
// recent bars:
//
//   diff[-2] < 0  and  diff[-1] > 0   =>  BullishCross
//   diff[-2] > 0  and  diff[-1] < 0   =>  BearishCross
//   anything else                     =>  None
//
// A diff of exactly zero on either bar is not a flip, and there is no tolerance
// band.  `latest` only looks at the last pair but still requires `lookback`
// bars of history before it reports anything.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{IndicatorError, IndicatorResult};
use crate::types::CrossoverEvent;

const NAME: &str = "crossover";

/// EMA spans compared by the detector and the history it requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverParams {
    pub fast_span: usize,
    pub slow_span: usize,
    pub lookback: usize,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            fast_span: 12,
            slow_span: 9,
            lookback: 5,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CrossoverDetector {
    lookback: usize,
}

impl CrossoverDetector {
    pub fn new(lookback: usize) -> Self {
        // Two bars are the minimum for a sign comparison.
        Self {
            lookback: lookback.max(2),
        }
    }

    /// Event between the two most recent bars of `fast` and `slow`.
    pub fn latest(&self, fast: &[f64], slow: &[f64]) -> IndicatorResult<CrossoverEvent> {
        let len = fast.len().min(slow.len());
        if len < self.lookback {
            return Err(IndicatorError::insufficient(NAME, self.lookback, len));
        }

        let window: Vec<f64> = fast[fast.len() - self.lookback..]
            .iter()
            .zip(&slow[slow.len() - self.lookback..])
            .map(|(f, s)| f - s)
            .collect();
        trace!(diffs = ?window, "crossover window");

        let prev = window[window.len() - 2];
        let curr = window[window.len() - 1];
        Ok(classify_flip(prev, curr))
    }

    /// Event at every bar index; index 0 is always `None`.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn scan(&self, fast: &[f64], slow: &[f64]) -> Vec<CrossoverEvent> {
        let diffs: Vec<f64> = fast.iter().zip(slow).map(|(f, s)| f - s).collect();
        let mut events = Vec::with_capacity(diffs.len());
        if diffs.is_empty() {
            return events;
        }
        events.push(CrossoverEvent::None);
        events.extend(diffs.windows(2).map(|pair| classify_flip(pair[0], pair[1])));
        events
    }
}

impl Default for CrossoverDetector {
    fn default() -> Self {
        Self::new(CrossoverParams::default().lookback)
    }
}

fn classify_flip(prev: f64, curr: f64) -> CrossoverEvent {
    if prev < 0.0 && curr > 0.0 {
        CrossoverEvent::BullishCross
    } else if prev > 0.0 && curr < 0.0 {
        CrossoverEvent::BearishCross
    } else {
        CrossoverEvent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::ema::calculate_ema;

    /// Feed `diffs` through the detector with a zero slow line.
    fn detect(diffs: &[f64]) -> IndicatorResult<CrossoverEvent> {
        let slow = vec![0.0; diffs.len()];
        CrossoverDetector::default().latest(diffs, &slow)
    }

    #[test]
    fn bullish_flip() {
        assert_eq!(
            detect(&[-1.0, -1.0, -1.0, -0.5, 0.2]).unwrap(),
            CrossoverEvent::BullishCross
        );
    }

    #[test]
    fn bearish_flip() {
        assert_eq!(
            detect(&[1.0, 1.0, 1.0, 0.5, -0.2]).unwrap(),
            CrossoverEvent::BearishCross
        );
    }

    #[test]
    fn only_last_pair_counts() {
        // A flip earlier in the window is ignored.
        assert_eq!(
            detect(&[-1.0, 1.0, 1.0, 1.0, 1.0]).unwrap(),
            CrossoverEvent::None
        );
    }

    #[test]
    fn tiny_flip_is_not_filtered() {
        assert_eq!(
            detect(&[-1.0, -1.0, -1.0, -0.0001, 0.0001]).unwrap(),
            CrossoverEvent::BullishCross
        );
    }

    #[test]
    fn touching_zero_is_not_a_flip() {
        assert_eq!(detect(&[-1.0, -1.0, -1.0, -1.0, 0.0]).unwrap(), CrossoverEvent::None);
        assert_eq!(detect(&[-1.0, -1.0, -1.0, 0.0, 1.0]).unwrap(), CrossoverEvent::None);
    }

    #[test]
    fn requires_lookback_bars() {
        assert!(matches!(
            detect(&[-1.0, 1.0]),
            Err(IndicatorError::InsufficientData { required: 5, available: 2, .. })
        ));
    }

    #[test]
    fn scan_reports_single_cross_at_boundary() {
        let mut diffs = vec![-1.0; 10];
        diffs.extend(vec![1.0; 10]);
        let slow = vec![0.0; diffs.len()];
        let events = CrossoverDetector::default().scan(&diffs, &slow);

        assert_eq!(events.len(), 20);
        let crosses: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| **e != CrossoverEvent::None)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(crosses, vec![10]);
        assert_eq!(events[10], CrossoverEvent::BullishCross);
    }

    #[test]
    fn latest_agrees_with_scan() {
        let closes: Vec<f64> = (0..60).map(|x| 30.0 + (x as f64 * 0.4).sin() * 3.0).collect();
        let params = CrossoverParams::default();
        let fast = calculate_ema(&closes, params.fast_span);
        let slow = calculate_ema(&closes, params.slow_span);
        let detector = CrossoverDetector::new(params.lookback);
        let scanned = detector.scan(&fast, &slow);
        for end in params.lookback..=closes.len() {
            assert_eq!(
                detector.latest(&fast[..end], &slow[..end]).unwrap(),
                scanned[end - 1],
                "mismatch at bar {}",
                end - 1
            );
        }
    }

    #[test]
    fn price_turn_produces_cross() {
        // Falling then sharply rising closes: EMA12 lags EMA9, so the diff is
        // positive while falling and flips negative once prices turn up.
        let mut closes: Vec<f64> = (0..30).map(|x| 100.0 - x as f64).collect();
        closes.extend((0..30).map(|x| 71.0 + 3.0 * x as f64));
        let params = CrossoverParams::default();
        let fast = calculate_ema(&closes, params.fast_span);
        let slow = calculate_ema(&closes, params.slow_span);
        let events = CrossoverDetector::new(params.lookback).scan(&fast, &slow);
        let bearish = events.iter().filter(|e| **e == CrossoverEvent::BearishCross).count();
        let bullish = events.iter().filter(|e| **e == CrossoverEvent::BullishCross).count();
        assert_eq!(bearish, 1);
        assert_eq!(bullish, 0);
    }
}
