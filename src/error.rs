//! Error types for the tsstat library.

use thiserror::Error;

/// Result type alias for statistics extraction.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors that can occur while extracting series statistics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Input data cannot produce meaningful statistics.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The seasonal period estimator could not be fitted.
    #[error("estimator fitting failed: {0}")]
    EstimatorFitting(String),

    /// A seasonal differencing test could not be evaluated.
    #[error("seasonal differencing test failed: {0}")]
    SeasonalDifferencingTest(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    Computation(String),
}
