//! Series transforms.

mod diff;

pub use diff::{difference, seasonal_difference, Differencer, DifferencerState};
