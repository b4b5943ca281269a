//! Additive versus multiplicative seasonality classification.

use crate::core::SeasonalityType;
use crate::error::Result;
use crate::seasonality::{decompose, DecompositionModel};
use tracing::{debug, warn};

/// Seasonal strength of the additive and multiplicative decompositions at `period`.
///
/// Returns `(additive, multiplicative)`.
pub fn seasonal_strengths(series: &[f64], period: usize) -> Result<(f64, f64)> {
    let additive = decompose(series, period, DecompositionModel::Additive)?;
    let multiplicative = decompose(series, period, DecompositionModel::Multiplicative)?;
    Ok((
        additive.seasonal_strength(),
        multiplicative.seasonal_strength(),
    ))
}

/// Classify the kind of seasonality of a series.
///
/// - not seasonal: `None`
/// - seasonal with some non-positive value: `Additive`
/// - otherwise the decomposition with the larger seasonal strength wins;
///   ties and failed decompositions give `Multiplicative`
pub fn classify_seasonality_type(
    series: &[f64],
    is_seasonal: bool,
    is_strictly_positive: bool,
    primary_sp: usize,
) -> Option<SeasonalityType> {
    if !is_seasonal {
        return None;
    }
    if !is_strictly_positive {
        return Some(SeasonalityType::Additive);
    }

    match seasonal_strengths(series, primary_sp) {
        Ok((fs_add, fs_mult)) => {
            debug!(fs_add, fs_mult, primary_sp, "seasonal strength per decomposition");
            if fs_add > fs_mult {
                Some(SeasonalityType::Additive)
            } else {
                Some(SeasonalityType::Multiplicative)
            }
        }
        Err(e) => {
            warn!(error = %e, primary_sp, "seasonal decomposition failed, assuming multiplicative");
            Some(SeasonalityType::Multiplicative)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn not_seasonal_has_no_type() {
        let series: Vec<f64> = (0..48).map(|i| 10.0 + i as f64).collect();
        assert_eq!(classify_seasonality_type(&series, false, true, 12), None);
    }

    #[test]
    fn non_positive_seasonal_is_additive() {
        let series: Vec<f64> = (0..48)
            .map(|i| (2.0 * PI * i as f64 / 12.0).sin())
            .collect();
        assert_eq!(
            classify_seasonality_type(&series, true, false, 12),
            Some(SeasonalityType::Additive)
        );
    }

    #[test]
    fn growing_amplitude_is_multiplicative() {
        // Seasonal swing proportional to the level.
        let series: Vec<f64> = (0..144)
            .map(|i| {
                let level = 20.0 * 1.03_f64.powi(i);
                level * (1.0 + 0.4 * (2.0 * PI * i as f64 / 12.0).sin())
            })
            .collect();

        let (fs_add, fs_mult) = seasonal_strengths(&series, 12).unwrap();
        assert!(fs_mult > fs_add);
        assert_eq!(
            classify_seasonality_type(&series, true, true, 12),
            Some(SeasonalityType::Multiplicative)
        );
    }

    #[test]
    fn constant_amplitude_on_trend_is_additive() {
        // Fixed seasonal swing on a strong level change.
        let series: Vec<f64> = (0..144)
            .map(|i| 20.0 + 2.0 * i as f64 + 10.0 * (2.0 * PI * i as f64 / 12.0).sin())
            .collect();

        let (fs_add, fs_mult) = seasonal_strengths(&series, 12).unwrap();
        assert!(fs_add > fs_mult);
        assert_eq!(
            classify_seasonality_type(&series, true, true, 12),
            Some(SeasonalityType::Additive)
        );
    }

    #[test]
    fn failed_decomposition_defaults_to_multiplicative() {
        let series: Vec<f64> = (0..10).map(|i| 5.0 + (i % 3) as f64).collect();
        assert_eq!(
            classify_seasonality_type(&series, true, true, 12),
            Some(SeasonalityType::Multiplicative)
        );
    }
}
