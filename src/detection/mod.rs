//! Seasonal period detection and classification.
//!
//! This module provides tools for:
//! - Estimating seasonal periods from the autocorrelation function
//! - Filtering harmonics out of a list of periods
//! - Classifying seasonality as additive or multiplicative

mod acf;
mod harmonics;
mod seasonality_type;

pub use acf::{acf, acf_seasonality_test, bartlett_std_errors, AcfFit, SeasonalityAcf};
pub use harmonics::{remove_harmonics, HarmonicOrder};
pub use seasonality_type::{classify_seasonality_type, seasonal_strengths};
