//! Statistical utility functions.

use statrs::distribution::{ContinuousCDF, Normal};

/// Quantile function of the standard normal distribution.
///
/// # Arguments
/// * `p` - Probability value (0.0 to 1.0)
///
/// # Returns
/// The z-score corresponding to the given probability.
///
/// # Example
/// ```
/// use tsstat::utils::quantile_normal;
///
/// // 95% confidence level -> z ≈ 1.96
/// let z = quantile_normal(0.975);
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (n denominator), ignoring NaN entries.
///
/// Returns NaN when no finite value is present.
pub fn nan_population_variance(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    let m = mean(&finite);
    finite.iter().map(|x| (x - m).powi(2)).sum::<f64>() / finite.len() as f64
}

/// Mean ignoring NaN entries.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Whether every value equals the first one exactly.
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

/// Greatest common divisor.
pub fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantile_normal_known_values() {
        assert_relative_eq!(quantile_normal(0.5), 0.0, epsilon = 1e-6);
        assert_relative_eq!(quantile_normal(0.975), 1.959964, epsilon = 1e-4);
        assert_relative_eq!(quantile_normal(0.025), -1.959964, epsilon = 1e-4);
        assert_relative_eq!(quantile_normal(0.995), 2.575829, epsilon = 1e-4);
    }

    #[test]
    fn quantile_normal_boundary_values() {
        assert_eq!(quantile_normal(0.0), f64::NEG_INFINITY);
        assert_eq!(quantile_normal(1.0), f64::INFINITY);
    }

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn nan_population_variance_skips_missing() {
        let values = [f64::NAN, 1.0, 2.0, 3.0, 4.0, 5.0, f64::NAN];
        assert_relative_eq!(nan_population_variance(&values), 2.0, epsilon = 1e-10);
        assert!(nan_population_variance(&[f64::NAN]).is_nan());
    }

    #[test]
    fn nan_mean_skips_missing() {
        assert_relative_eq!(nan_mean(&[f64::NAN, 2.0, 4.0]), 3.0, epsilon = 1e-10);
        assert!(nan_mean(&[f64::NAN, f64::NAN]).is_nan());
    }

    #[test]
    fn constant_detection() {
        assert!(is_constant(&[3.0, 3.0, 3.0]));
        assert!(!is_constant(&[3.0, 3.0, 3.0000001]));
        assert!(is_constant(&[]));
    }

    #[test]
    fn gcd_known_values() {
        assert_eq!(gcd(52, 30), 2);
        assert_eq!(gcd(12, 7), 1);
        assert_eq!(gcd(60, 15), 15);
    }
}
