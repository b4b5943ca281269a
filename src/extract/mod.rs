//! Statistics extraction for automated model configuration.
//!
//! [`ExtractStats`] runs the full pipeline on one series and returns a
//! [`SeriesStat`](crate::core::SeriesStat).

mod config;
mod pipeline;

pub use config::{DetectionMode, ExtractConfig};
pub use pipeline::ExtractStats;
