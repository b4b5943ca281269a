//! Natural seasonal periods of calendar frequency codes.
//!
//! Frequency codes follow the pandas offset alias convention: an optional
//! integer multiplier, a unit suffix and an optional anchor after a dash
//! (`"D"`, `"15min"`, `"W-SUN"`, `"30W"`).

use crate::error::{Result, StatsError};
use crate::utils::stats::gcd;

/// Seasonal period of each supported unit suffix.
const SEASONAL_PERIODS: &[(&str, usize)] = &[
    ("B", 5),
    ("C", 5),
    ("D", 7),
    ("W", 52),
    ("M", 12),
    ("SM", 24),
    ("BM", 12),
    ("CBM", 12),
    ("MS", 12),
    ("SMS", 24),
    ("BMS", 12),
    ("CBMS", 12),
    ("Q", 4),
    ("BQ", 4),
    ("QS", 4),
    ("BQS", 4),
    ("A", 1),
    ("Y", 1),
    ("BA", 1),
    ("BY", 1),
    ("AS", 1),
    ("YS", 1),
    ("BAS", 1),
    ("BYS", 1),
    ("H", 24),
    ("T", 60),
    ("min", 60),
    ("S", 60),
];

fn lookup(suffix: &str) -> Option<usize> {
    SEASONAL_PERIODS
        .iter()
        .find(|(name, _)| *name == suffix)
        .map(|(_, sp)| *sp)
}

fn unsupported(freq: &str) -> StatsError {
    let valid: Vec<&str> = SEASONAL_PERIODS.iter().map(|(name, _)| *name).collect();
    StatsError::Configuration(format!(
        "unsupported period frequency: {freq}, valid period frequency suffixes are: {}",
        valid.join(", ")
    ))
}

/// Seasonal period implied by a frequency code.
///
/// With a multiplier `k` and unit period `m` the result is `lcm(m, k) / k`,
/// i.e. the number of `k`-unit steps after which the unit cycle repeats.
///
/// # Example
/// ```
/// use tsstat::core::seasonal_period;
///
/// assert_eq!(seasonal_period("M").unwrap(), 12);
/// assert_eq!(seasonal_period("W-SUN").unwrap(), 52);
/// assert_eq!(seasonal_period("30W").unwrap(), 26);
/// ```
pub fn seasonal_period(freq: &str) -> Result<usize> {
    let base = match freq.split('-').next() {
        Some(head) if !head.is_empty() => head,
        _ => freq,
    };

    let digits_end = base
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(base.len(), |(i, _)| i);

    if digits_end == 0 {
        return lookup(base).ok_or_else(|| unsupported(freq));
    }

    let (prefix, rest) = base.split_at(digits_end);
    let suffix_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map_or(rest.len(), |(i, _)| i);
    let suffix = &rest[..suffix_end];

    let multiplier: usize = prefix.parse().map_err(|_| unsupported(freq))?;
    if multiplier == 0 || suffix.is_empty() {
        return Err(unsupported(freq));
    }
    let unit = lookup(suffix).ok_or_else(|| unsupported(freq))?;

    let lcm = unit * multiplier / gcd(unit, multiplier);
    Ok(lcm / multiplier)
}
