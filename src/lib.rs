//! # tsstat
//!
//! Structural statistics of univariate time series for automated forecasting.
//!
//! [`extract::ExtractStats`] inspects a series once and reports what a model
//! selector needs to know about it: whether it is strictly positive, whether
//! it is seasonal and at which periods, whether that seasonality is additive
//! or multiplicative, and how many plain and seasonal differences make it
//! stationary.
//!
//! ```
//! use tsstat::prelude::*;
//!
//! let series: Vec<f64> = (0..200).map(|i| 10.0 + 0.5 * i as f64).collect();
//! let stats = ExtractStats::default().extract_statistics(&series).unwrap();
//!
//! assert!(!stats.is_seasonal());
//! assert_eq!(stats.primary_seasonal_period(), 1);
//! assert_eq!(stats.non_seasonal_differencing_order(), 1);
//! ```

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod detection;
pub mod error;
pub mod extract;
pub mod seasonality;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{Result, StatsError};

pub mod prelude {
    pub use crate::core::{seasonal_period, SeasonalityType, SeriesStat};
    pub use crate::detection::HarmonicOrder;
    pub use crate::error::{Result, StatsError};
    pub use crate::extract::{DetectionMode, ExtractConfig, ExtractStats};
    pub use crate::validation::{SeasonalTest, UnitRootTest};
}
