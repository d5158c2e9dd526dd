//! Bounded mass-balance accumulators.
//!
//! A [`Store`] tracks a quantity between zero and a capacity. Each update
//! applies an inflow and an outflow request, and reports what spilled over
//! the top (`overflow`) and what was actually released (`outflow`).
//! [`StoreArray`] groups independent stores for batched updates.
//!
//! # Quick start
//!
//! ```rust
//! use tributary_store::Store;
//!
//! let mut store = Store::new(10.0, 15.0).unwrap();
//! let flux = store.update(7.43, 0.03).unwrap();
//!
//! assert_eq!(store.quantity(), 15.0);
//! assert!((flux.overflow - 2.4).abs() < 1e-9);
//! assert_eq!(flux.outflow, 0.03);
//! ```

pub mod array;
pub mod error;
pub mod store;

pub use array::StoreArray;
pub use error::StoreError;
pub use store::{Store, StoreFlux};
