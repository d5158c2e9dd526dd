//! Area-scaled wrapper around a bucket runoff model.

use crate::bucket::BucketRunoffModel;
use crate::error::RunoffError;
use crate::params::BucketParams;

/// A contributing area that turns rainfall (less ET) into outflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Catchment {
    area: f64,
    model: BucketRunoffModel,
    outflow: f64,
}

impl Catchment {
    /// Creates a catchment of the given area with a fresh runoff model.
    ///
    /// # Errors
    ///
    /// Returns [`RunoffError::InvalidArea`] if `area` is not finite and
    /// positive, or any parameter validation error.
    pub fn new(area: f64, params: BucketParams) -> Result<Self, RunoffError> {
        if !area.is_finite() || area <= 0.0 {
            return Err(RunoffError::InvalidArea { value: area });
        }
        Ok(Self {
            area,
            model: BucketRunoffModel::new(params)?,
            outflow: 0.0,
        })
    }

    /// Runs one model step and stores `runoff depth * area` as the outflow.
    ///
    /// # Errors
    ///
    /// Propagates forcing validation errors from the runoff model; the
    /// previous outflow is kept in that case.
    pub fn update_runoff(&mut self, precip: f64, et: f64) -> Result<f64, RunoffError> {
        self.outflow = self.model.runoff(precip, et)? * self.area;
        Ok(self.outflow)
    }

    /// Contributing area.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Outflow computed by the latest [`update_runoff`](Self::update_runoff).
    pub fn outflow(&self) -> f64 {
        self.outflow
    }

    /// The underlying runoff model.
    pub fn runoff_model(&self) -> &BucketRunoffModel {
        &self.model
    }

    /// Mutable access to the runoff model, for parameter or state changes.
    pub fn runoff_model_mut(&mut self) -> &mut BucketRunoffModel {
        &mut self.model
    }
}
