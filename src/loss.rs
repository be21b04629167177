//! Sum-of-squared-errors loss.

/// Error for a single example: `0.5 * Σ_k (expected[k] - output[k])^2`.
///
/// Both slices must have the same length.
pub fn example_error(output: &[f64], expected: &[f64]) -> f64 {
    debug_assert_eq!(output.len(), expected.len());
    let total: f64 = output
        .iter()
        .zip(expected)
        .map(|(&actual, &target)| {
            let difference = target - actual;
            difference * difference
        })
        .sum();
    0.5 * total
}

/// Average of an accumulated error sum over `count` examples.
pub fn average_error(sum: f64, count: usize) -> f64 {
    sum / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_error_zero_when_exact() {
        assert_eq!(example_error(&[0.2, 0.8], &[0.2, 0.8]), 0.0);
    }

    #[test]
    fn test_example_error_half_sum_of_squares() {
        // 0.5 * (0.5^2 + 0.25^2) = 0.15625
        let error = example_error(&[0.5, 0.75], &[1.0, 0.5]);
        assert!((error - 0.15625).abs() < 1e-15);
    }

    #[test]
    fn test_average_error() {
        assert_eq!(average_error(1.5, 3), 0.5);
    }
}
