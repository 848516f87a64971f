// =============================================================================
// Rolling-window aggregates
// =============================================================================
//
// Element `i` of every output is `None` while fewer than `window` values are
// available (`i < window - 1`), otherwise the aggregate over the inclusive
// range `[i - window + 1, i]`.  A zero window yields all `None`.

/// Rolling minimum.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Rolling maximum.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Rolling arithmetic mean.
#[cfg_attr(not(test), allow(dead_code))]
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Rolling mean over a series that may itself contain undefined points.
///
/// A window containing any `None` produces `None`; undefined inputs are never
/// skipped or filled.
pub fn rolling_mean_opt(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum = slice.iter().try_fold(0.0, |acc, v| v.map(|x| acc + x))?;
            Some(sum / window as f64)
        })
        .collect()
}

fn rolling_fold<F>(values: &[f64], window: usize, aggregate: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                Some(aggregate(&values[i + 1 - window..=i]))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: [f64; 6] = [5.0, 3.0, 8.0, 1.0, 9.0, 2.0];

    #[test]
    fn leading_points_are_undefined() {
        let out = rolling_min(&VALUES, 3);
        assert_eq!(out.len(), VALUES.len());
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        assert!(out[2].is_some());
    }

    #[test]
    fn min_max_mean_values() {
        assert_eq!(
            rolling_min(&VALUES, 3),
            vec![None, None, Some(3.0), Some(1.0), Some(1.0), Some(1.0)]
        );
        assert_eq!(
            rolling_max(&VALUES, 3),
            vec![None, None, Some(8.0), Some(8.0), Some(9.0), Some(9.0)]
        );
        let mean = rolling_mean(&VALUES, 2);
        assert!(mean[0].is_none());
        assert!((mean[1].unwrap() - 4.0).abs() < 1e-12);
        assert!((mean[5].unwrap() - 5.5).abs() < 1e-12);
    }

    #[test]
    fn window_longer_than_input_is_all_undefined() {
        assert!(rolling_max(&VALUES, 10).iter().all(Option::is_none));
    }

    #[test]
    fn zero_window_is_all_undefined() {
        assert!(rolling_mean(&VALUES, 0).iter().all(Option::is_none));
        assert!(rolling_mean_opt(&[Some(1.0)], 0).iter().all(Option::is_none));
    }

    #[test]
    fn mean_opt_propagates_gaps() {
        let values = [Some(1.0), None, Some(3.0), Some(5.0), Some(7.0)];
        let out = rolling_mean_opt(&values, 2);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], None);
        assert_eq!(out[3], Some(4.0));
        assert_eq!(out[4], Some(6.0));
    }
}
