//! Harmonic filtering of seasonal periods.
//!
//! A period whose frequency is an integer multiple of a lower frequency in the
//! same list carries no independent signal: a 6-step cycle is already implied
//! by a 12-step one. [`remove_harmonics`] drops such periods, or replaces them
//! by a multiple, depending on the [`HarmonicOrder`].

use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolerance on the fractional part of a frequency ratio.
const HARMONIC_TOLERANCE: f64 = 0.001;

/// How dropped harmonics are reflected in the output order.
///
/// For periods `[2, 3, 4, 50]` in significance order:
/// - `RawStrength` gives `[3, 4, 50]`
/// - `HarmonicMax` gives `[50, 3, 4]`
/// - `HarmonicStrength` gives `[4, 3, 50]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonicOrder {
    /// Drop harmonics; survivors keep their own rank.
    #[default]
    RawStrength,
    /// Replace a harmonic by its largest multiple in the list, at the harmonic's rank.
    HarmonicMax,
    /// Replace a harmonic by its most significant other multiple, at the harmonic's rank.
    HarmonicStrength,
}

impl HarmonicOrder {
    /// Name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RawStrength => "raw_strength",
            Self::HarmonicMax => "harmonic_max",
            Self::HarmonicStrength => "harmonic_strength",
        }
    }
}

impl fmt::Display for HarmonicOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HarmonicOrder {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raw_strength" => Ok(Self::RawStrength),
            "harmonic_max" => Ok(Self::HarmonicMax),
            "harmonic_strength" => Ok(Self::HarmonicStrength),
            other => Err(StatsError::Configuration(format!(
                "unknown harmonic order method '{other}', expected one of \
                 raw_strength, harmonic_max, harmonic_strength"
            ))),
        }
    }
}

/// Remove harmonics from a list of seasonal periods ordered by significance.
///
/// # Errors
/// `InvalidInput` if any period is zero.
///
/// # Example
/// ```
/// use tsstat::detection::{remove_harmonics, HarmonicOrder};
///
/// let periods = [2, 3, 4, 50];
/// assert_eq!(remove_harmonics(&periods, HarmonicOrder::RawStrength).unwrap(), vec![3, 4, 50]);
/// assert_eq!(remove_harmonics(&periods, HarmonicOrder::HarmonicMax).unwrap(), vec![50, 3, 4]);
/// ```
pub fn remove_harmonics(periods: &[usize], order: HarmonicOrder) -> Result<Vec<usize>> {
    if periods.contains(&0) {
        return Err(StatsError::InvalidInput(
            "seasonal periods must be positive".into(),
        ));
    }
    if periods.len() <= 1 {
        return Ok(periods.to_vec());
    }

    let retained = retained_periods(periods);
    let is_retained = |sp: usize| retained.iter().any(|r| (r - sp as f64).abs() < 1e-6);

    let filtered: Vec<usize> = match order {
        HarmonicOrder::RawStrength => periods
            .iter()
            .copied()
            .filter(|&sp| is_retained(sp))
            .collect(),
        HarmonicOrder::HarmonicMax | HarmonicOrder::HarmonicStrength => periods
            .iter()
            .map(|&sp| {
                if is_retained(sp) {
                    sp
                } else {
                    replacement(periods, sp, order)
                }
            })
            .collect(),
    };

    Ok(dedup_preserving_order(filtered))
}

/// Periods left after dropping every frequency that is an integer multiple
/// of a lower one, rounded to 4 decimals.
fn retained_periods(periods: &[usize]) -> Vec<f64> {
    let mut freqs: Vec<f64> = periods.iter().map(|&sp| 1.0 / sp as f64).collect();
    freqs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Every lower frequency takes part in the comparison, including ones that
    // are themselves harmonics.
    let harmonic: Vec<bool> = (0..freqs.len())
        .map(|i| {
            (0..i).rev().any(|j| {
                let fraction = (freqs[i] / freqs[j]) % 1.0;
                fraction < HARMONIC_TOLERANCE || fraction > 1.0 - HARMONIC_TOLERANCE
            })
        })
        .collect();

    freqs
        .iter()
        .zip(harmonic.iter())
        .filter(|(_, &h)| !h)
        .map(|(f, _)| round_to(1.0 / f, 4))
        .collect()
}

/// Substitute for a dropped period: one of its integer multiples in the list.
fn replacement(periods: &[usize], sp: usize, order: HarmonicOrder) -> usize {
    let multiples: Vec<usize> = periods
        .iter()
        .copied()
        .filter(|&candidate| candidate % sp == 0)
        .collect();

    match order {
        HarmonicOrder::HarmonicMax => multiples.iter().copied().max().unwrap_or(sp),
        _ => multiples
            .iter()
            .copied()
            .find(|&candidate| candidate != sp)
            .unwrap_or(sp),
    }
}

fn dedup_preserving_order(values: Vec<usize>) -> Vec<usize> {
    let mut seen = Vec::with_capacity(values.len());
    for v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
