//! Staged statistics extraction.
//!
//! Each stage consumes the output of the previous one, so a stage can only
//! run once everything it depends on has been computed:
//!
//! 1. positivity: strict positivity of the values
//! 2. seasonality degree: seasonal periods and their significance
//! 3. seasonality kind: additive or multiplicative seasonality
//! 4. differencing: non-seasonal differencing order
//! 5. seasonal differencing order, folded into the final [`SeriesStat`]

use super::config::ExtractConfig;
use crate::core::{SeasonalityType, SeriesStat, SeriesStatParts};
use crate::detection::{
    acf_seasonality_test, classify_seasonality_type, remove_harmonics, SeasonalityAcf,
};
use crate::error::{Result, StatsError};
use crate::transform::Differencer;
use crate::utils::stats::is_constant;
use crate::validation::{
    ndiffs, nsdiffs, seasonal_order_with_fallback, NdiffsConfig, SEASONAL_ORDER_ATTEMPTS,
};
use tracing::{debug, info};

/// Extracts structural statistics from a univariate series.
///
/// Holds only its configuration: one extractor can serve any number of
/// series, from any number of threads.
///
/// # Example
/// ```
/// use tsstat::extract::{ExtractConfig, ExtractStats};
///
/// let series: Vec<f64> = (0..240)
///     .map(|i| 100.0 + (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
///     .collect();
///
/// let extractor = ExtractStats::new(ExtractConfig::default().with_frequency("M")).unwrap();
/// let stats = extractor.extract_statistics(&series).unwrap();
///
/// assert!(stats.is_seasonal());
/// assert_eq!(stats.primary_seasonal_period(), 12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractStats {
    config: ExtractConfig,
}

/// Stage 1 output.
#[derive(Debug, Clone)]
struct Positivity {
    is_strictly_positive: bool,
}

/// Stage 2 output.
#[derive(Debug, Clone)]
struct SeasonalityDegree {
    positivity: Positivity,
    /// Order used to stationarize the series before period estimation.
    stationarizing_order: usize,
    candidate_sps: Vec<usize>,
    significant_sps: Vec<usize>,
    all_sps_to_use: Vec<usize>,
    is_seasonal: bool,
    primary_sp: usize,
}

/// Stage 3 output.
#[derive(Debug, Clone)]
struct SeasonalityKind {
    degree: SeasonalityDegree,
    seasonality_type: Option<SeasonalityType>,
}

/// Stage 4 output.
#[derive(Debug, Clone)]
struct Differencing {
    kind: SeasonalityKind,
    d: usize,
}

impl ExtractStats {
    /// Create an extractor, validating the configuration.
    ///
    /// # Errors
    /// `Configuration` for a zero `max_sp`, an `alpha` outside (0, 1) or the
    /// `Index` detection mode.
    pub fn new(config: ExtractConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Compute the statistics of `series`.
    ///
    /// # Errors
    /// * `EmptyData` for an empty series
    /// * `InvalidInput` for non-finite values or a constant series
    /// * `InsufficientData` / `EstimatorFitting` when the seasonal period
    ///   cannot be estimated
    ///
    /// Failures of the seasonal differencing test are recovered and give a
    /// seasonal order of 0.
    pub fn extract_statistics(&self, series: &[f64]) -> Result<SeriesStat> {
        validate_series(series)?;

        info!(
            n = series.len(),
            frequency = %self.config.frequency,
            "extracting series statistics"
        );

        let positivity = self.positivity(series);
        let degree = self.seasonality_degree(series, positivity)?;
        let kind = self.seasonality_kind(series, degree);
        let differencing = self.differencing(kind);
        let stat = self.seasonal_differencing(series, differencing)?;

        info!(
            is_seasonal = stat.is_seasonal(),
            primary_seasonal_period = stat.primary_seasonal_period(),
            seasonality_type = ?stat.seasonality_type(),
            d = stat.non_seasonal_differencing_order(),
            seasonal_d = stat.seasonal_differencing_order(),
            "series statistics extracted"
        );

        Ok(stat)
    }

    fn ndiffs_config(&self) -> NdiffsConfig {
        NdiffsConfig::default()
            .with_alpha(self.config.alpha)
            .with_test(self.config.unit_root_test)
    }

    fn positivity(&self, series: &[f64]) -> Positivity {
        let is_strictly_positive = series.iter().all(|&v| v > 0.0);
        debug!(is_strictly_positive, "positivity");
        Positivity {
            is_strictly_positive,
        }
    }

    fn seasonality_degree(
        &self,
        series: &[f64],
        positivity: Positivity,
    ) -> Result<SeasonalityDegree> {
        let stationarizing_order = ndiffs(series, &self.ndiffs_config());
        let (stationary, _) =
            Differencer::default().fit_transform_n(series, stationarizing_order)?;

        let nlags = stationary.len().saturating_sub(1) / 2;
        debug!(
            d = stationarizing_order,
            n = stationary.len(),
            nlags,
            "estimating seasonal periods"
        );

        let fit = SeasonalityAcf::new(nlags)
            .with_alpha(self.config.alpha)
            .fit(&stationary)?;

        let candidate_sps: Vec<usize> = fit
            .sp_significant()
            .iter()
            .copied()
            .filter(|&sp| sp <= self.config.max_sp)
            .collect();

        let mut confirmed: Vec<usize> = if self.config.skip_acf_test {
            candidate_sps.clone()
        } else {
            candidate_sps
                .iter()
                .copied()
                .filter(|&sp| acf_seasonality_test(series, sp))
                .collect()
        };

        if let Some(order) = self.config.remove_harmonics {
            if !confirmed.is_empty() {
                confirmed = remove_harmonics(&confirmed, order)?;
                debug!(?confirmed, %order, "harmonics removed");
            }
        }

        let is_seasonal = !confirmed.is_empty();
        let significant_sps = if is_seasonal { confirmed } else { vec![1] };

        let all_sps_to_use: Vec<usize> = match self.config.no_sp_to_use {
            0 => significant_sps.clone(),
            k => significant_sps.iter().copied().take(k).collect(),
        };
        let primary_sp = all_sps_to_use.first().copied().unwrap_or(1);

        debug!(
            ?candidate_sps,
            ?significant_sps,
            primary_sp,
            is_seasonal,
            "seasonality degree"
        );

        Ok(SeasonalityDegree {
            positivity,
            stationarizing_order,
            candidate_sps,
            significant_sps,
            all_sps_to_use,
            is_seasonal,
            primary_sp,
        })
    }

    fn seasonality_kind(&self, series: &[f64], degree: SeasonalityDegree) -> SeasonalityKind {
        let seasonality_type = classify_seasonality_type(
            series,
            degree.is_seasonal,
            degree.positivity.is_strictly_positive,
            degree.primary_sp,
        );
        debug!(?seasonality_type, "seasonality type");
        SeasonalityKind {
            degree,
            seasonality_type,
        }
    }

    fn differencing(&self, kind: SeasonalityKind) -> Differencing {
        // Same test on the same series as the stationarizing step
        let d = kind.degree.stationarizing_order;
        debug!(d, test = %self.config.unit_root_test, "non-seasonal differencing order");
        Differencing { kind, d }
    }

    fn seasonal_differencing(
        &self,
        series: &[f64],
        differencing: Differencing,
    ) -> Result<SeriesStat> {
        let Differencing { kind, d } = differencing;
        let SeasonalityKind {
            degree,
            seasonality_type,
        } = kind;

        let seasonal_d = if degree.primary_sp <= 1 {
            0
        } else {
            seasonal_order_with_fallback(&SEASONAL_ORDER_ATTEMPTS, |max_seasonal_d| {
                nsdiffs(
                    series,
                    degree.primary_sp,
                    max_seasonal_d,
                    self.config.seasonal_test,
                )
            })
        };
        debug!(
            seasonal_d,
            primary_sp = degree.primary_sp,
            test = %self.config.seasonal_test,
            "seasonal differencing order"
        );

        SeriesStat::from_parts(SeriesStatParts {
            frequency: self.config.frequency.clone(),
            is_strictly_positive: degree.positivity.is_strictly_positive,
            is_seasonal: degree.is_seasonal,
            seasonality_type,
            candidate_sps: degree.candidate_sps,
            significant_sps: degree.significant_sps,
            all_sps_to_use: degree.all_sps_to_use,
            non_seasonal_differencing_order: d,
            seasonal_differencing_order: seasonal_d,
        })
    }
}

/// Reject series no statistic can be computed for.
fn validate_series(series: &[f64]) -> Result<()> {
    if series.is_empty() {
        return Err(StatsError::EmptyData);
    }
    if let Some(pos) = series.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::InvalidInput(format!(
            "non-finite value at position {pos}"
        )));
    }
    if is_constant(series) {
        return Err(StatsError::InvalidInput(
            "series is constant, no structure to extract".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::HarmonicOrder;
    use crate::extract::DetectionMode;
    use crate::validation::SeasonalTest;
    use std::f64::consts::PI;

    fn monthly_sine(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (2.0 * PI * i as f64 / 12.0).sin())
            .collect()
    }

    fn extract(config: ExtractConfig, series: &[f64]) -> SeriesStat {
        ExtractStats::new(config)
            .unwrap()
            .extract_statistics(series)
            .unwrap()
    }

    // ==================== input validation ====================

    #[test]
    fn empty_series_fails() {
        let err = ExtractStats::default().extract_statistics(&[]).unwrap_err();
        assert_eq!(err, StatsError::EmptyData);
    }

    #[test]
    fn non_finite_series_fails() {
        let series = vec![1.0, 2.0, f64::NAN, 4.0];
        assert!(matches!(
            ExtractStats::default().extract_statistics(&series),
            Err(StatsError::InvalidInput(_))
        ));
        let series = vec![1.0, f64::INFINITY, 3.0];
        assert!(matches!(
            ExtractStats::default().extract_statistics(&series),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn constant_series_fails() {
        assert!(matches!(
            ExtractStats::default().extract_statistics(&[3.0; 40]),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn too_short_for_estimator_fails() {
        assert!(matches!(
            ExtractStats::default().extract_statistics(&[1.0, 2.0]),
            Err(StatsError::InsufficientData { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn index_mode_is_rejected_at_construction() {
        let config = ExtractConfig::default().with_detection_mode(DetectionMode::Index);
        assert!(matches!(
            ExtractStats::new(config),
            Err(StatsError::Configuration(_))
        ));
    }

    // ==================== stages ====================

    #[test]
    fn linear_trend_is_not_seasonal() {
        let series: Vec<f64> = (0..200).map(|i| 10.0 + 0.5 * i as f64).collect();
        let stats = extract(ExtractConfig::default(), &series);

        assert!(!stats.is_seasonal());
        assert_eq!(stats.seasonality_type(), None);
        assert_eq!(stats.primary_seasonal_period(), 1);
        assert_eq!(stats.significant_sps(), &[1]);
        assert!(stats.candidate_sps().is_empty());
        assert_eq!(stats.non_seasonal_differencing_order(), 1);
        assert_eq!(stats.seasonal_differencing_order(), 0);
        assert!(stats.is_strictly_positive());
    }

    #[test]
    fn monthly_sine_is_seasonal() {
        let stats = extract(ExtractConfig::default().with_frequency("M"), &monthly_sine(240));

        assert!(stats.is_seasonal());
        assert_eq!(stats.primary_seasonal_period(), 12);
        assert_eq!(stats.all_sps_to_use(), &[12]);
        assert_eq!(stats.significant_sps()[0], 12);
        assert!(stats.seasonality_type().is_some());
        assert_eq!(stats.frequency(), "M");
        assert!(!stats.is_white_noise());
        assert!(stats.seasonal_differencing_order() <= 2);
    }

    #[test]
    fn max_sp_bounds_candidates() {
        let stats = extract(ExtractConfig::default().with_max_sp(10), &monthly_sine(240));

        assert!(stats.candidate_sps().iter().all(|&sp| sp <= 10));
        assert!(stats.significant_sps().iter().all(|&sp| sp <= 10));
    }

    #[test]
    fn zero_sp_to_use_keeps_all_significant() {
        let stats = extract(ExtractConfig::default().with_no_sp_to_use(0), &monthly_sine(240));

        assert_eq!(stats.all_sps_to_use(), stats.significant_sps());
        assert!(stats.all_sps_to_use().len() > 1);
    }

    #[test]
    fn sp_to_use_is_capped() {
        let stats = extract(ExtractConfig::default().with_no_sp_to_use(3), &monthly_sine(240));

        assert_eq!(stats.all_sps_to_use().len(), 3);
        assert_eq!(stats.all_sps_to_use(), &stats.significant_sps()[..3]);
    }

    #[test]
    fn harmonic_filter_drops_divisors() {
        let config = ExtractConfig::default()
            .with_no_sp_to_use(0)
            .with_remove_harmonics(HarmonicOrder::RawStrength);
        let stats = extract(config, &monthly_sine(240));

        let sps = stats.significant_sps();
        assert!(!sps.contains(&12));
        for &a in sps {
            for &b in sps {
                assert!(a == b || b % a != 0, "{a} divides {b}");
            }
        }
    }

    #[test]
    fn acf_retest_keeps_true_period() {
        let config = ExtractConfig::default().with_skip_acf_test(false);
        let stats = extract(config, &monthly_sine(240));

        assert!(stats.is_seasonal());
        assert_eq!(stats.primary_seasonal_period(), 12);
    }

    #[test]
    fn non_positive_seasonal_is_additive() {
        let series: Vec<f64> = (0..120)
            .map(|i| (2.0 * PI * i as f64 / 12.0).sin())
            .collect();
        let stats = extract(ExtractConfig::default(), &series);

        assert!(!stats.is_strictly_positive());
        assert_eq!(stats.primary_seasonal_period(), 12);
        assert_eq!(stats.seasonality_type(), Some(SeasonalityType::Additive));
    }

    #[test]
    fn strength_test_is_selectable() {
        let config = ExtractConfig::default().with_seasonal_test(SeasonalTest::Strength);
        let stats = extract(config, &monthly_sine(240));

        assert_eq!(stats.primary_seasonal_period(), 12);
        assert!(stats.seasonal_differencing_order() >= 1);
    }

    #[test]
    fn extractor_is_reusable() {
        let extractor = ExtractStats::default();
        let first = extractor.extract_statistics(&monthly_sine(240)).unwrap();
        let second = extractor.extract_statistics(&monthly_sine(240)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn extractor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractStats>();
    }
}
