//! Rainfall-loss and runoff accounting for catchments.
//!
//! [`BucketRunoffModel`] implements a parallel-bucket loss model: rain and
//! evapotranspiration are shared across surface buckets, and bucket
//! overflow drains through surface and baseflow recession stores.
//! [`Catchment`] scales the per-area runoff depth by its contributing area.
//!
//! # Quick start
//!
//! ```rust
//! use tributary_runoff::{BucketParams, Catchment};
//!
//! let mut catchment = Catchment::new(12.6, BucketParams::new()).unwrap();
//! for _ in 0..5 {
//!     catchment.update_runoff(30.0, 0.25).unwrap();
//! }
//! assert!(catchment.outflow() > 0.0);
//! ```

pub mod bucket;
pub mod catchment;
pub mod error;
pub mod params;

pub use bucket::{BucketRunoffModel, check_forcing};
pub use catchment::Catchment;
pub use error::RunoffError;
pub use params::{BucketParams, FRACTION_SUM_TOL};
