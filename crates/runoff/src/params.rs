//! Parameters of the bucket runoff model.

use crate::error::RunoffError;

/// Tolerance on the sum of partial area fractions.
pub const FRACTION_SUM_TOL: f64 = 1e-9;

/// Parameter set for a [`BucketRunoffModel`](crate::BucketRunoffModel).
///
/// Defaults are the reference values of the three-bucket Australian Water
/// Balance Model.
///
/// # Example
///
/// ```
/// use tributary_runoff::BucketParams;
///
/// let params = BucketParams::new()
///     .with_baseflow_index(0.5)
///     .with_depth_capacity(vec![50.0, 200.0, 400.0]);
///
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BucketParams {
    partial_area_fraction: Vec<f64>,
    depth_capacity: Vec<f64>,
    baseflow_index: f64,
    surface_recession: f64,
    baseflow_recession: f64,
}

impl BucketParams {
    /// Creates the default parameter set.
    ///
    /// Defaults: fractions `[0.134, 0.433, 0.433]`, depths
    /// `[37.44, 324.4, 146.6]`, `baseflow_index = 0.658`,
    /// `surface_recession = 0.869`, `baseflow_recession = 0.309`.
    pub fn new() -> Self {
        Self {
            partial_area_fraction: vec![0.134, 0.433, 0.433],
            depth_capacity: vec![37.44, 324.4, 146.6],
            baseflow_index: 0.658,
            surface_recession: 0.869,
            baseflow_recession: 0.309,
        }
    }

    /// Sets the fraction of catchment area represented by each bucket.
    pub fn with_partial_area_fraction(mut self, fractions: Vec<f64>) -> Self {
        self.partial_area_fraction = fractions;
        self
    }

    /// Sets the storage depth of each bucket.
    pub fn with_depth_capacity(mut self, depths: Vec<f64>) -> Self {
        self.depth_capacity = depths;
        self
    }

    /// Sets the fraction of bucket overflow routed to baseflow.
    pub fn with_baseflow_index(mut self, bfi: f64) -> Self {
        self.baseflow_index = bfi;
        self
    }

    /// Sets the surface store recession constant.
    pub fn with_surface_recession(mut self, k: f64) -> Self {
        self.surface_recession = k;
        self
    }

    /// Sets the baseflow store recession constant.
    pub fn with_baseflow_recession(mut self, k: f64) -> Self {
        self.baseflow_recession = k;
        self
    }

    // --- Accessors ---

    /// Returns the partial area fractions.
    pub fn partial_area_fraction(&self) -> &[f64] {
        &self.partial_area_fraction
    }

    /// Returns the bucket depth capacities.
    pub fn depth_capacity(&self) -> &[f64] {
        &self.depth_capacity
    }

    /// Returns the baseflow index.
    pub fn baseflow_index(&self) -> f64 {
        self.baseflow_index
    }

    /// Returns the surface recession constant.
    pub fn surface_recession(&self) -> f64 {
        self.surface_recession
    }

    /// Returns the baseflow recession constant.
    pub fn baseflow_recession(&self) -> f64 {
        self.baseflow_recession
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.partial_area_fraction.len()
    }

    /// Per-bucket capacity: `fraction[i] * depth[i]`.
    pub fn bucket_capacities(&self) -> Vec<f64> {
        self.partial_area_fraction
            .iter()
            .zip(&self.depth_capacity)
            .map(|(f, d)| f * d)
            .collect()
    }

    /// Validates this parameter set.
    ///
    /// Checks that there is at least one bucket, that fractions and depths
    /// have equal length, that fractions lie in `[0, 1]` and sum to one,
    /// that depths are non-negative, and that the index and both recession
    /// constants lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), RunoffError> {
        if self.partial_area_fraction.is_empty() {
            return Err(RunoffError::InvalidParameter {
                name: "partial_area_fraction",
                reason: "at least one bucket is required".to_string(),
            });
        }
        if self.depth_capacity.len() != self.partial_area_fraction.len() {
            return Err(RunoffError::BucketCountMismatch {
                expected: self.partial_area_fraction.len(),
                got: self.depth_capacity.len(),
            });
        }
        check_fractions(&self.partial_area_fraction)?;
        check_depths(&self.depth_capacity)?;

        check_unit_interval("baseflow_index", self.baseflow_index)?;
        check_unit_interval("surface_recession", self.surface_recession)?;
        check_unit_interval("baseflow_recession", self.baseflow_recession)?;
        Ok(())
    }

    pub(crate) fn replace_fractions(&mut self, fractions: Vec<f64>) {
        self.partial_area_fraction = fractions;
    }

    pub(crate) fn replace_depths(&mut self, depths: Vec<f64>) {
        self.depth_capacity = depths;
    }
}

impl Default for BucketParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks each fraction lies in `[0, 1]` and that they sum to one.
pub(crate) fn check_fractions(fractions: &[f64]) -> Result<(), RunoffError> {
    for &f in fractions {
        check_unit_interval("partial_area_fraction", f)?;
    }
    let sum: f64 = fractions.iter().sum();
    if (sum - 1.0).abs() > FRACTION_SUM_TOL {
        return Err(RunoffError::FractionSum { sum });
    }
    Ok(())
}

pub(crate) fn check_depths(depths: &[f64]) -> Result<(), RunoffError> {
    for &d in depths {
        if d.is_nan() || d < 0.0 {
            return Err(RunoffError::InvalidParameter {
                name: "depth_capacity",
                reason: format!("must be non-negative, got {d}"),
            });
        }
    }
    Ok(())
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<(), RunoffError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(RunoffError::InvalidParameter {
            name,
            reason: format!("must be in [0, 1], got {value}"),
        });
    }
    Ok(())
}
