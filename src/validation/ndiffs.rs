//! Estimation of differencing orders.
//!
//! [`ndiffs`] repeats a unit-root test, differencing once per rejection of
//! stationarity. [`nsdiffs`] does the same with a seasonal test and seasonal
//! differences. [`seasonal_order_with_fallback`] runs a seasonal estimate
//! over a list of decreasing maximum orders and settles on 0 when every
//! attempt fails.

use crate::error::{Result, StatsError};
use crate::seasonality::{decompose, DecompositionModel};
use crate::transform::{difference, seasonal_difference};
use crate::utils::stats::is_constant;
use crate::validation::ocsb::{ocsb_test, OcsbConfig};
use crate::validation::stationarity::{adf_test, kpss_test};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Maximum seasonal orders tried, in order, before falling back to 0.
pub const SEASONAL_ORDER_ATTEMPTS: [usize; 2] = [2, 1];

/// Seasonal strength above which [`SeasonalTest::Strength`] differences.
const SEASONAL_STRENGTH_THRESHOLD: f64 = 0.64;

/// Unit-root test used by [`ndiffs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitRootTest {
    /// KPSS level-stationarity test; difference when stationarity is rejected.
    #[default]
    Kpss,
    /// Augmented Dickey-Fuller test; difference when the unit root is not rejected.
    Adf,
}

impl UnitRootTest {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kpss => "kpss",
            Self::Adf => "adf",
        }
    }
}

impl fmt::Display for UnitRootTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitRootTest {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "kpss" => Ok(Self::Kpss),
            "adf" => Ok(Self::Adf),
            other => Err(StatsError::Configuration(format!(
                "unknown unit root test '{other}', expected one of: kpss, adf"
            ))),
        }
    }
}

/// Seasonal test used by [`nsdiffs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalTest {
    /// Osborn-Chui-Smith-Birchenhall seasonal unit-root test.
    #[default]
    Ocsb,
    /// Seasonal strength of a classical additive decomposition.
    Strength,
}

impl SeasonalTest {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ocsb => "ocsb",
            Self::Strength => "strength",
        }
    }
}

impl fmt::Display for SeasonalTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeasonalTest {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ocsb" => Ok(Self::Ocsb),
            "strength" => Ok(Self::Strength),
            other => Err(StatsError::Configuration(format!(
                "unknown seasonal test '{other}', expected one of: ocsb, strength"
            ))),
        }
    }
}

/// Configuration for [`ndiffs`].
#[derive(Debug, Clone, PartialEq)]
pub struct NdiffsConfig {
    /// Significance level of the unit-root test.
    pub alpha: f64,
    /// Maximum differencing order.
    pub max_d: usize,
    /// Unit-root test to apply.
    pub test: UnitRootTest,
}

impl Default for NdiffsConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            max_d: 2,
            test: UnitRootTest::Kpss,
        }
    }
}

impl NdiffsConfig {
    /// Set the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the maximum differencing order.
    pub fn with_max_d(mut self, max_d: usize) -> Self {
        self.max_d = max_d;
        self
    }

    /// Set the unit-root test.
    pub fn with_test(mut self, test: UnitRootTest) -> Self {
        self.test = test;
        self
    }
}

/// Run the unit-root test and return `(p_value, should_difference)`.
fn unit_root_decision(series: &[f64], config: &NdiffsConfig) -> (f64, bool) {
    match config.test {
        UnitRootTest::Kpss => {
            let p = kpss_test(series, None).p_value;
            (p, p < config.alpha)
        }
        UnitRootTest::Adf => {
            let p = adf_test(series, None).p_value;
            (p, p >= config.alpha)
        }
    }
}

/// Number of first differences needed to make `series` stationary.
///
/// A constant series needs no differencing. When the test cannot produce a
/// p-value the last order that could be tested is returned.
///
/// # Example
/// ```
/// use tsstat::validation::{ndiffs, NdiffsConfig};
///
/// let trend: Vec<f64> = (0..200).map(|i| 10.0 + 0.5 * i as f64).collect();
/// assert!(ndiffs(&trend, &NdiffsConfig::default()) >= 1);
/// ```
pub fn ndiffs(series: &[f64], config: &NdiffsConfig) -> usize {
    let mut d = 0;
    if is_constant(series) {
        return d;
    }

    let (p_value, mut should_difference) = unit_root_decision(series, config);
    if p_value.is_nan() {
        return 0;
    }

    let mut current = series.to_vec();
    while should_difference && d < config.max_d {
        d += 1;
        current = difference(&current, 1);
        if is_constant(&current) {
            return d;
        }

        let (p_value, next) = unit_root_decision(&current, config);
        if p_value.is_nan() {
            return d - 1;
        }
        should_difference = next;
    }

    debug!(d, test = %config.test, "non-seasonal differencing order");
    d
}

/// Whether `test` indicates a seasonal difference at period `m`.
fn seasonal_decision(series: &[f64], m: usize, test: SeasonalTest) -> Result<bool> {
    match test {
        SeasonalTest::Ocsb => Ok(ocsb_test(series, m, &OcsbConfig::default())?.should_difference),
        SeasonalTest::Strength => {
            let strength = decompose(series, m, DecompositionModel::Additive)?.seasonal_strength();
            debug!(m, strength, "seasonal strength test");
            Ok(strength > SEASONAL_STRENGTH_THRESHOLD)
        }
    }
}

/// Number of seasonal differences at period `m` needed for stationarity.
///
/// The test is not repeated once `max_seasonal_d` differences are taken.
///
/// # Errors
/// * `Configuration` if `max_seasonal_d == 0` or `m < 2`
/// * `InsufficientData` / `SeasonalDifferencingTest` when the seasonal test
///   cannot be evaluated on the (possibly already differenced) series
pub fn nsdiffs(
    series: &[f64],
    m: usize,
    max_seasonal_d: usize,
    test: SeasonalTest,
) -> Result<usize> {
    if max_seasonal_d == 0 {
        return Err(StatsError::Configuration(
            "maximum seasonal differencing order must be positive".into(),
        ));
    }
    if m < 2 {
        return Err(StatsError::Configuration(format!(
            "seasonal period must be at least 2, got {m}"
        )));
    }

    let mut seasonal_d = 0;
    if is_constant(series) {
        return Ok(seasonal_d);
    }

    let mut should_difference = seasonal_decision(series, m, test)?;
    let mut current = series.to_vec();
    while should_difference && seasonal_d < max_seasonal_d {
        seasonal_d += 1;
        current = seasonal_difference(&current, 1, m);
        if is_constant(&current) || seasonal_d == max_seasonal_d {
            return Ok(seasonal_d);
        }
        should_difference = seasonal_decision(&current, m, test)?;
    }

    Ok(seasonal_d)
}

/// Try `estimate` with each maximum order in `attempts`; the first success wins.
///
/// Every failed attempt is logged. Returns 0 when all attempts fail.
pub fn seasonal_order_with_fallback<F>(attempts: &[usize], mut estimate: F) -> usize
where
    F: FnMut(usize) -> Result<usize>,
{
    for &max_seasonal_d in attempts {
        match estimate(max_seasonal_d) {
            Ok(order) => return order,
            Err(e) => {
                warn!(max_seasonal_d, error = %e, "seasonal differencing test failed");
            }
        }
    }
    warn!("seasonal differencing order could not be estimated, using 0");
    0
}
