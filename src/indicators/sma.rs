// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted trailing mean of the last `period` closes:
//
//   SMA_t = (close_{t-period+1} + ... + close_t) / period
//
// The output is aligned with the input: row `i` is `None` until `i >= period-1`.
// =============================================================================

/// Compute the SMA series for `closes` and look-back `period`.
///
/// # Edge cases
/// - `period == 0` => every row `None`
/// - `closes.len() < period` => every row `None`
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return result;
    }

    let period_f = period as f64;
    for i in (period - 1)..closes.len() {
        let window = &closes[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period_f;
        result[i] = mean.is_finite().then_some(mean);
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 20).is_empty());
    }

    #[test]
    fn sma_period_zero() {
        assert_eq!(calculate_sma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn sma_insufficient_data() {
        assert_eq!(calculate_sma(&[1.0, 2.0], 3), vec![None, None]);
    }

    #[test]
    fn sma_short_example() {
        assert_eq!(
            calculate_sma(&[10.0, 11.0, 9.0], 2),
            vec![None, Some(10.5), Some(10.0)]
        );
    }

    #[test]
    fn sma_20_matches_window_mean() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let sma = calculate_sma(&closes, 20);
        assert_eq!(sma.len(), closes.len());

        for (i, value) in sma.iter().enumerate() {
            if i < 19 {
                assert!(value.is_none(), "row {i} should be undefined");
            } else {
                let expected = closes[i - 19..=i].iter().sum::<f64>() / 20.0;
                let got = value.expect("defined from row 19");
                assert!((got - expected).abs() < 1e-9, "row {i}: got {got}, expected {expected}");
            }
        }
    }

    #[test]
    fn sma_nan_window_is_undefined() {
        let sma = calculate_sma(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert_eq!(sma[1], None);
        assert_eq!(sma[2], None);
        assert_eq!(sma[3], Some(3.5));
    }
}
