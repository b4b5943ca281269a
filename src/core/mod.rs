//! Core data structures for series statistics.

mod frequency;
mod series_stat;

pub use frequency::seasonal_period;
pub(crate) use series_stat::SeriesStatParts;
pub use series_stat::{SeasonalityType, SeriesStat};
