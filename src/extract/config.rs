//! Configuration of the statistics extractor.

use crate::detection::HarmonicOrder;
use crate::error::{Result, StatsError};
use crate::validation::{SeasonalTest, UnitRootTest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How candidate periods are confirmed as significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Every candidate reported by the estimator is significant, unless
    /// the autocorrelation re-test is switched on.
    #[default]
    Auto,
    /// Index-based detection. Reserved; rejected when the extractor is built.
    Index,
}

impl DetectionMode {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMode {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "index" => Ok(Self::Index),
            other => Err(StatsError::Configuration(format!(
                "unknown detection mode '{other}', expected one of: auto, index"
            ))),
        }
    }
}

/// Configuration for [`ExtractStats`](super::ExtractStats).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Frequency label copied into the result.
    pub frequency: String,
    /// Largest seasonal period considered.
    pub max_sp: usize,
    /// Number of significant periods kept for use (0 keeps all).
    pub no_sp_to_use: usize,
    /// Significance confirmation mode.
    pub detection_mode: DetectionMode,
    /// Skip the per-period autocorrelation re-test of candidates.
    pub skip_acf_test: bool,
    /// Harmonic filter applied to the significant periods.
    pub remove_harmonics: Option<HarmonicOrder>,
    /// Unit-root test for the non-seasonal differencing order.
    pub unit_root_test: UnitRootTest,
    /// Seasonal test for the seasonal differencing order.
    pub seasonal_test: SeasonalTest,
    /// Significance level of the unit-root test and the ACF bounds.
    pub alpha: f64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            frequency: String::new(),
            max_sp: 60,
            no_sp_to_use: 1,
            detection_mode: DetectionMode::Auto,
            skip_acf_test: true,
            remove_harmonics: None,
            unit_root_test: UnitRootTest::Kpss,
            seasonal_test: SeasonalTest::Ocsb,
            alpha: 0.05,
        }
    }
}

impl ExtractConfig {
    /// Set the frequency label.
    pub fn with_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = frequency.into();
        self
    }

    /// Set the largest seasonal period considered.
    pub fn with_max_sp(mut self, max_sp: usize) -> Self {
        self.max_sp = max_sp;
        self
    }

    /// Set how many significant periods are kept.
    pub fn with_no_sp_to_use(mut self, no_sp_to_use: usize) -> Self {
        self.no_sp_to_use = no_sp_to_use;
        self
    }

    /// Set the detection mode.
    pub fn with_detection_mode(mut self, mode: DetectionMode) -> Self {
        self.detection_mode = mode;
        self
    }

    /// Enable or skip the autocorrelation re-test.
    pub fn with_skip_acf_test(mut self, skip: bool) -> Self {
        self.skip_acf_test = skip;
        self
    }

    /// Filter harmonics out of the significant periods.
    pub fn with_remove_harmonics(mut self, order: HarmonicOrder) -> Self {
        self.remove_harmonics = Some(order);
        self
    }

    /// Set the unit-root test.
    pub fn with_unit_root_test(mut self, test: UnitRootTest) -> Self {
        self.unit_root_test = test;
        self
    }

    /// Set the seasonal test.
    pub fn with_seasonal_test(mut self, test: SeasonalTest) -> Self {
        self.seasonal_test = test;
        self
    }

    /// Set the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Check every option.
    pub fn validate(&self) -> Result<()> {
        if self.max_sp == 0 {
            return Err(StatsError::Configuration(
                "max_sp must be positive".into(),
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(StatsError::Configuration(format!(
                "alpha must lie in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.detection_mode == DetectionMode::Index {
            return Err(StatsError::Configuration(
                "index detection mode is not supported".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.max_sp, 60);
        assert_eq!(config.no_sp_to_use, 1);
        assert_eq!(config.detection_mode, DetectionMode::Auto);
        assert!(config.skip_acf_test);
        assert_eq!(config.remove_harmonics, None);
        assert_eq!(config.unit_root_test, UnitRootTest::Kpss);
        assert_eq!(config.seasonal_test, SeasonalTest::Ocsb);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_chain() {
        let config = ExtractConfig::default()
            .with_frequency("M")
            .with_max_sp(24)
            .with_no_sp_to_use(0)
            .with_remove_harmonics(HarmonicOrder::HarmonicMax)
            .with_seasonal_test(SeasonalTest::Strength);

        assert_eq!(config.frequency, "M");
        assert_eq!(config.max_sp, 24);
        assert_eq!(config.no_sp_to_use, 0);
        assert_eq!(config.remove_harmonics, Some(HarmonicOrder::HarmonicMax));
        assert_eq!(config.seasonal_test, SeasonalTest::Strength);
    }

    #[test]
    fn invalid_options_are_rejected() {
        assert!(ExtractConfig::default().with_max_sp(0).validate().is_err());
        assert!(ExtractConfig::default().with_alpha(0.0).validate().is_err());
        assert!(ExtractConfig::default().with_alpha(1.5).validate().is_err());
        assert!(matches!(
            ExtractConfig::default()
                .with_detection_mode(DetectionMode::Index)
                .validate(),
            Err(StatsError::Configuration(_))
        ));
    }

    #[test]
    fn detection_mode_parses() {
        assert_eq!("AUTO".parse::<DetectionMode>().unwrap(), DetectionMode::Auto);
        assert_eq!("index".parse::<DetectionMode>().unwrap(), DetectionMode::Index);
        assert!(matches!(
            "fourier".parse::<DetectionMode>(),
            Err(StatsError::Configuration(_))
        ));
    }

    #[test]
    fn config_from_json() {
        let config: ExtractConfig = serde_json::from_str(
            r#"{"frequency": "H", "max_sp": 48, "remove_harmonics": "raw_strength"}"#,
        )
        .unwrap();

        assert_eq!(config.frequency, "H");
        assert_eq!(config.max_sp, 48);
        assert_eq!(config.remove_harmonics, Some(HarmonicOrder::RawStrength));
        assert_eq!(config.no_sp_to_use, 1);
    }
}
