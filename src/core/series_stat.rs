//! Statistics record produced by the extraction pipeline.

use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of seasonality present in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonalityType {
    /// Seasonal swings of constant size.
    Additive,
    /// Seasonal swings proportional to the level.
    Multiplicative,
}

impl SeasonalityType {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Additive => "Additive",
            Self::Multiplicative => "Multiplicative",
        }
    }
}

impl fmt::Display for SeasonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeasonalityType {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "additive" => Ok(Self::Additive),
            "multiplicative" => Ok(Self::Multiplicative),
            other => Err(StatsError::Configuration(format!(
                "unknown seasonality type '{other}'"
            ))),
        }
    }
}

/// Structural statistics of one series.
///
/// Built once at the end of [`ExtractStats::extract_statistics`] and never
/// modified afterwards. Downstream model constructors read
/// [`primary_seasonal_period`](Self::primary_seasonal_period) to size their
/// seasonal window and [`is_strictly_positive`](Self::is_strictly_positive)
/// to decide whether multiplicative deseasonalizing is an option.
///
/// [`ExtractStats::extract_statistics`]: crate::extract::ExtractStats::extract_statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStat {
    frequency: String,
    is_strictly_positive: bool,
    is_white_noise: bool,
    is_seasonal: bool,
    seasonality_type: Option<SeasonalityType>,
    primary_seasonal_period: usize,
    candidate_sps: Vec<usize>,
    significant_sps: Vec<usize>,
    all_sps_to_use: Vec<usize>,
    non_seasonal_differencing_order: usize,
    seasonal_differencing_order: usize,
}

/// Field values of a [`SeriesStat`] gathered by the pipeline.
#[derive(Debug, Clone)]
pub(crate) struct SeriesStatParts {
    pub frequency: String,
    pub is_strictly_positive: bool,
    pub is_seasonal: bool,
    pub seasonality_type: Option<SeasonalityType>,
    pub candidate_sps: Vec<usize>,
    pub significant_sps: Vec<usize>,
    pub all_sps_to_use: Vec<usize>,
    pub non_seasonal_differencing_order: usize,
    pub seasonal_differencing_order: usize,
}

impl SeriesStat {
    /// Assemble the record, checking the relations between its fields.
    pub(crate) fn from_parts(parts: SeriesStatParts) -> Result<Self> {
        let primary = *parts.all_sps_to_use.first().ok_or_else(|| {
            StatsError::Computation("no seasonal period selected for use".into())
        })?;

        if parts.significant_sps.is_empty()
            || !parts.significant_sps.starts_with(&parts.all_sps_to_use)
        {
            return Err(StatsError::Computation(
                "seasonal periods to use must be a prefix of the significant periods".into(),
            ));
        }
        if !parts.is_seasonal && parts.seasonality_type.is_some() {
            return Err(StatsError::Computation(
                "non-seasonal series cannot have a seasonality type".into(),
            ));
        }
        if primary <= 1 && parts.seasonal_differencing_order != 0 {
            return Err(StatsError::Computation(
                "seasonal differencing requires a seasonal period above 1".into(),
            ));
        }

        Ok(Self {
            frequency: parts.frequency,
            is_strictly_positive: parts.is_strictly_positive,
            is_white_noise: false,
            is_seasonal: parts.is_seasonal,
            seasonality_type: parts.seasonality_type,
            primary_seasonal_period: primary,
            candidate_sps: parts.candidate_sps,
            significant_sps: parts.significant_sps,
            all_sps_to_use: parts.all_sps_to_use,
            non_seasonal_differencing_order: parts.non_seasonal_differencing_order,
            seasonal_differencing_order: parts.seasonal_differencing_order,
        })
    }

    /// Frequency label supplied by the caller.
    pub fn frequency(&self) -> &str {
        &self.frequency
    }

    /// Whether every value is strictly greater than zero.
    pub fn is_strictly_positive(&self) -> bool {
        self.is_strictly_positive
    }

    /// Always `false`: no white-noise test is run.
    pub fn is_white_noise(&self) -> bool {
        self.is_white_noise
    }

    /// Whether at least one seasonal period is significant.
    pub fn is_seasonal(&self) -> bool {
        self.is_seasonal
    }

    /// Additive or multiplicative seasonality, `None` for non-seasonal series.
    pub fn seasonality_type(&self) -> Option<SeasonalityType> {
        self.seasonality_type
    }

    /// Seasonal period used by downstream models; 1 when not seasonal.
    pub fn primary_seasonal_period(&self) -> usize {
        self.primary_seasonal_period
    }

    /// Periods reported by the estimator that do not exceed the maximum period.
    pub fn candidate_sps(&self) -> &[usize] {
        &self.candidate_sps
    }

    /// Candidates that passed significance testing, `[1]` if none did.
    pub fn significant_sps(&self) -> &[usize] {
        &self.significant_sps
    }

    /// Leading significant periods selected for downstream use.
    pub fn all_sps_to_use(&self) -> &[usize] {
        &self.all_sps_to_use
    }

    /// Non-seasonal differencing order `d`.
    pub fn non_seasonal_differencing_order(&self) -> usize {
        self.non_seasonal_differencing_order
    }

    /// Seasonal differencing order `D`.
    pub fn seasonal_differencing_order(&self) -> usize {
        self.seasonal_differencing_order
    }

    /// Ordered `(field, value)` listing, one row per field.
    pub fn to_map(&self) -> Vec<(&'static str, String)> {
        vec![
            ("frequency", self.frequency.clone()),
            ("is_strictly_positive", self.is_strictly_positive.to_string()),
            ("is_white_noise", self.is_white_noise.to_string()),
            ("is_seasonal", self.is_seasonal.to_string()),
            (
                "seasonality_type",
                self.seasonality_type
                    .map_or_else(|| "None".to_string(), |t| t.to_string()),
            ),
            (
                "primary_seasonal_period",
                self.primary_seasonal_period.to_string(),
            ),
            ("candidate_sps", format!("{:?}", self.candidate_sps)),
            ("significant_sps", format!("{:?}", self.significant_sps)),
            ("all_sps_to_use", format!("{:?}", self.all_sps_to_use)),
            (
                "non_seasonal_differencing_order",
                self.non_seasonal_differencing_order.to_string(),
            ),
            (
                "seasonal_differencing_order",
                self.seasonal_differencing_order.to_string(),
            ),
        ]
    }

    /// Serialize to a JSON object.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StatsError::Computation(format!("failed to serialize statistics: {e}")))
    }
}

impl fmt::Display for SeriesStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SeriesStat[")?;
        for (name, value) in self.to_map() {
            writeln!(f, "\t{name} = {value}")?;
        }
        write!(f, "]")
    }
}
