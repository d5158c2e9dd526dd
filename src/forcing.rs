//! Cyclic precipitation and ET series.

/// Validated forcing series. Each series repeats independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Forcing {
    precip: Vec<f64>,
    et: Vec<f64>,
}

impl Forcing {
    /// Wraps already validated, non-empty series.
    pub(crate) fn new(precip: Vec<f64>, et: Vec<f64>) -> Self {
        Self { precip, et }
    }

    /// `(precip, et)` for a zero-based step.
    pub fn at(&self, step: usize) -> (f64, f64) {
        (cyclic(&self.precip, step), cyclic(&self.et, step))
    }
}

fn cyclic(series: &[f64], step: usize) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series[step % series.len()]
}
