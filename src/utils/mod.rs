//! Utility functions for the statistical tests.

pub mod ols;
pub mod stats;

pub use ols::{ols_fit, OLSResult};
pub use stats::quantile_normal;
