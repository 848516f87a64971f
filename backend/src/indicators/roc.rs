// =============================================================================
// Rate of Change (ROC) — Momentum Indicator
// =============================================================================
//
// ROC measures the percentage change in price over a look-back window:
//   ROC = ((close - close_n) / close_n) * 100
//
// Positive ROC indicates upward momentum; negative indicates downward.

use crate::error::{IndicatorError, IndicatorResult};

const NAME: &str = "roc";

/// Return the ROC of the most recent close against the close `window` bars
/// earlier.
///
/// Only the reference and the latest close are read, so older history never
/// affects the result.
pub fn current_roc(closes: &[f64], window: usize) -> IndicatorResult<f64> {
    if window == 0 || closes.len() <= window {
        return Err(IndicatorError::insufficient(NAME, window + 1, closes.len()));
    }
    let last = closes[closes.len() - 1];
    let reference = closes[closes.len() - 1 - window];
    if reference == 0.0 {
        return Err(IndicatorError::ZeroReference { indicator: NAME });
    }
    Ok(((last - reference) / reference) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roc_basic() {
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        // From 1 to 15: ROC = (15-1)/1 * 100 = 1400%
        assert!((current_roc(&closes, 14).unwrap() - 1400.0).abs() < 1e-10);
    }

    #[test]
    fn roc_ignores_history_before_reference() {
        let closes: Vec<f64> = (0..60).map(|x| 50.0 + x as f64 * 0.5).collect();
        let full = current_roc(&closes, 26).unwrap();
        let trimmed = current_roc(&closes[closes.len() - 27..], 26).unwrap();
        assert_eq!(full.to_bits(), trimmed.to_bits());
    }

    #[test]
    fn roc_insufficient_data() {
        let closes = vec![1.0, 2.0, 3.0];
        assert!(matches!(
            current_roc(&closes, 14),
            Err(IndicatorError::InsufficientData { required: 15, available: 3, .. })
        ));
        // Length equal to the window is still too short.
        let closes = vec![1.0; 26];
        assert!(current_roc(&closes, 26).is_err());
    }

    #[test]
    fn roc_constant_series_is_zero() {
        let closes = vec![25.0; 40];
        assert_eq!(current_roc(&closes, 26).unwrap(), 0.0);
    }

    #[test]
    fn roc_zero_reference() {
        let mut closes = vec![1.0; 30];
        closes[30 - 1 - 26] = 0.0;
        assert_eq!(
            current_roc(&closes, 26),
            Err(IndicatorError::ZeroReference { indicator: "roc" })
        );
    }

    #[test]
    fn roc_negative_on_decline() {
        let closes: Vec<f64> = (0..40).map(|x| 200.0 - x as f64).collect();
        assert!(current_roc(&closes, 26).unwrap() < 0.0);
    }
}
