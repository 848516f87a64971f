// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent values than a simple moving average.
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = value_0
//   EMA_t  = alpha * value_t + (1 - alpha) * EMA_{t-1}
//          = EMA_{t-1} + alpha * (value_t - EMA_{t-1})
//
// The second form is used so that a constant input stays exactly constant.
//
// The recursion has infinite memory and is seeded with the first value, so the
// output is exactly as long as the input.  No SMA warm-up is applied.
// =============================================================================

/// Compute the full EMA series for `values` with the given `span`.
///
/// Returns an empty `Vec` when `values` is empty or `span == 0`.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };
    if span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    result.push(seed);

    let mut prev = seed;
    for &value in &values[1..] {
        let ema = prev + alpha * (value - prev);
        result.push(ema);
        prev = ema;
    }

    result
}
