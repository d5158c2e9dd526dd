//! Parallel-bucket rainfall-loss and runoff model.
//!
//! Rainfall and evapotranspiration are spread across a set of surface
//! buckets in proportion to the area each represents. Whatever overflows
//! the buckets is split between a surface store and a baseflow store, and
//! each of those drains exponentially through its recession constant.
//!
//! ```text
//!  precip, et
//!      │
//!  ┌───┴───┬───────┐
//!  │ B1    │ B2    │ B3      buckets (capacity = fraction × depth)
//!  └───┬───┴───┬───┘
//!      │ overflow
//!   ┌──┴────────────┐
//!   │ × (1 - BFI)   │ × BFI
//!  surface        base       recession stores
//!   └──────┬────────┘
//!        runoff
//! ```

use tracing::trace;
use tributary_store::{Store, StoreArray, StoreError};

use crate::error::RunoffError;
use crate::params::{BucketParams, check_depths, check_fractions};

/// Bucket runoff model state for one catchment.
///
/// Output is a depth per step on a per-area basis; multiply by the
/// catchment area for volume.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketRunoffModel {
    params: BucketParams,
    buckets: StoreArray,
    surface: Store,
    base: Store,
}

impl BucketRunoffModel {
    /// Builds a model with empty stores.
    ///
    /// # Errors
    ///
    /// Returns any error from [`BucketParams::validate`].
    pub fn new(params: BucketParams) -> Result<Self, RunoffError> {
        params.validate()?;
        let mut buckets = StoreArray::new(params.bucket_count());
        buckets.set_capacity(&params.bucket_capacities())?;
        Ok(Self {
            params,
            buckets,
            surface: Store::default(),
            base: Store::default(),
        })
    }

    /// Advances the model one step and returns the runoff depth.
    ///
    /// # Errors
    ///
    /// Returns [`RunoffError::Store`] if `precip` or `et` is negative or not
    /// finite. No store is modified in that case.
    pub fn runoff(&mut self, precip: f64, et: f64) -> Result<f64, RunoffError> {
        check_forcing("precip", precip)?;
        check_forcing("et", et)?;

        let fractions = self.params.partial_area_fraction();
        let precip_dist: Vec<f64> = fractions.iter().map(|a| a * precip).collect();
        let et_dist: Vec<f64> = fractions.iter().map(|a| a * et).collect();
        let overflow = self.buckets.update(&precip_dist, &et_dist)?;

        let bfi = self.params.baseflow_index();
        let to_baseflow = overflow * bfi;
        let to_surface = overflow * (1.0 - bfi);

        let surface = recede(&mut self.surface, to_surface, self.params.surface_recession())?;
        let base = recede(&mut self.base, to_baseflow, self.params.baseflow_recession())?;

        trace!(overflow, surface, base, "bucket model step");
        Ok(surface + base)
    }

    /// Replaces the partial area fractions and recomputes bucket
    /// capacities.
    ///
    /// # Errors
    ///
    /// Returns [`RunoffError::BucketCountMismatch`] or
    /// [`RunoffError::FractionSum`]; the model is unchanged on error.
    pub fn set_partial_area_fraction(&mut self, fractions: &[f64]) -> Result<(), RunoffError> {
        self.check_count(fractions.len())?;
        check_fractions(fractions)?;
        self.params.replace_fractions(fractions.to_vec());
        self.apply_capacities()
    }

    /// Replaces the bucket depth capacities.
    ///
    /// Each bucket capacity becomes `fraction[i] * depths[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`RunoffError::BucketCountMismatch`] or
    /// [`RunoffError::InvalidParameter`]; the model is unchanged on error.
    pub fn set_depth_capacity(&mut self, depths: &[f64]) -> Result<(), RunoffError> {
        self.check_count(depths.len())?;
        check_depths(depths)?;
        self.params.replace_depths(depths.to_vec());
        self.apply_capacities()
    }

    /// Returns the model parameters.
    pub fn params(&self) -> &BucketParams {
        &self.params
    }

    /// Returns the surface buckets.
    pub fn buckets(&self) -> &StoreArray {
        &self.buckets
    }

    /// Mutable access to the buckets, e.g. to set initial quantities.
    pub fn buckets_mut(&mut self) -> &mut StoreArray {
        &mut self.buckets
    }

    /// Returns the surface recession store.
    pub fn surface_store(&self) -> &Store {
        &self.surface
    }

    /// Mutable access to the surface recession store.
    pub fn surface_store_mut(&mut self) -> &mut Store {
        &mut self.surface
    }

    /// Returns the baseflow recession store.
    pub fn base_store(&self) -> &Store {
        &self.base
    }

    /// Mutable access to the baseflow recession store.
    pub fn base_store_mut(&mut self) -> &mut Store {
        &mut self.base
    }

    /// Total water held across buckets and both recession stores.
    pub fn total_storage(&self) -> f64 {
        self.buckets.total_quantity() + self.surface.quantity() + self.base.quantity()
    }

    fn check_count(&self, got: usize) -> Result<(), RunoffError> {
        let expected = self.buckets.len();
        if got != expected {
            return Err(RunoffError::BucketCountMismatch { expected, got });
        }
        Ok(())
    }

    fn apply_capacities(&mut self) -> Result<(), RunoffError> {
        self.buckets.set_capacity(&self.params.bucket_capacities())?;
        Ok(())
    }
}

/// Routes `inflow` through a recession store and returns its outflow.
///
/// The request is `(1 - k) * quantity`, taken before the inflow lands.
fn recede(store: &mut Store, inflow: f64, k: f64) -> Result<f64, StoreError> {
    let request = (1.0 - k) * store.quantity();
    Ok(store.update(inflow, request)?.outflow)
}

/// Checks a precipitation or ET depth before it reaches any store.
///
/// # Errors
///
/// Returns [`RunoffError::Store`] if `value` is negative or not finite.
pub fn check_forcing(name: &'static str, value: f64) -> Result<(), RunoffError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StoreError::InvariantViolation { name, value }.into());
    }
    Ok(())
}
