//! Unit-root tests and differencing order estimation.
//!
//! # Example
//!
//! ```
//! use tsstat::validation::{kpss_test, ndiffs, NdiffsConfig};
//!
//! let series: Vec<f64> = (0..120).map(|i| 2.0 * i as f64).collect();
//! let kpss = kpss_test(&series, None);
//! assert!(!kpss.is_stationary);
//! assert_eq!(ndiffs(&series, &NdiffsConfig::default()), 1);
//! ```

pub mod ndiffs;
pub mod ocsb;
pub mod stationarity;

pub use ndiffs::{
    ndiffs, nsdiffs, seasonal_order_with_fallback, NdiffsConfig, SeasonalTest, UnitRootTest,
    SEASONAL_ORDER_ATTEMPTS,
};
pub use ocsb::{ocsb_critical_value, ocsb_test, OcsbConfig, OcsbResult};
pub use stationarity::{adf_test, kpss_test, CriticalValues, StationarityResult};
