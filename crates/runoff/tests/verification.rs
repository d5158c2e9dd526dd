//! Multi-step runs of the bucket model from prescribed initial states.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use tributary_runoff::{BucketParams, BucketRunoffModel, Catchment, RunoffError};

/// Model with depths expressed in metres, as used by the reference runs.
fn metre_model() -> BucketRunoffModel {
    let params = BucketParams::new().with_depth_capacity(vec![0.03744, 0.3244, 0.1466]);
    BucketRunoffModel::new(params).unwrap()
}

#[test]
fn ten_steps_from_wet_start() {
    let mut m = metre_model();
    m.buckets_mut().set_quantities(&[0.0042, 0.05, 0.0429]).unwrap();
    m.base_store_mut().set_quantity(0.01).unwrap();
    m.surface_store_mut().set_quantity(0.01).unwrap();

    for _ in 0..10 {
        m.runoff(0.01, 0.001).unwrap();
    }

    assert_abs_diff_eq!(m.buckets().total_quantity(), 0.15746476, epsilon = 1e-8);
    assert_abs_diff_eq!(m.buckets().total_overflow(), 0.005103, epsilon = 1e-8);
    assert_abs_diff_eq!(m.surface_store().quantity(), 0.0096710759, epsilon = 1e-9);
    assert_abs_diff_eq!(m.base_store().quantity(), 0.0048423440, epsilon = 1e-9);
}

#[test]
fn cumulative_runoff_from_partly_full_buckets() {
    let mut m = metre_model();
    m.buckets_mut().set_quantities(&[0.00502, 0.140, 0.063]).unwrap();

    let total: f64 = (0..10).map(|_| m.runoff(0.00654, 0.00025).unwrap()).sum();
    // The first bucket starts slightly above capacity and is clamped.
    assert_abs_diff_eq!(total, 0.0436701421, epsilon = 1e-9);
}

#[test]
fn depth_change_applies_to_capacity() {
    let mut m = metre_model();
    let new_depths = [0.05743, 0.14333, 0.29849];
    m.set_depth_capacity(&new_depths).unwrap();
    let fractions = m.params().partial_area_fraction().to_vec();
    for (i, store) in m.buckets().iter().enumerate() {
        assert_eq!(store.capacity(), new_depths[i] * fractions[i]);
    }
}

#[test]
fn invalid_fraction_replacement_is_rejected() {
    let mut m = metre_model();
    m.runoff(0.2, 0.0).unwrap();
    let before = m.clone();

    let err = m.set_partial_area_fraction(&[0.5, 0.5, 0.1]).unwrap_err();
    assert!(matches!(err, RunoffError::FractionSum { sum } if (sum - 1.1).abs() < 1e-12));
    assert_eq!(m, before);

    let sum: f64 = m.params().partial_area_fraction().iter().sum();
    assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
}

#[test]
fn catchment_sequence_matches_model_times_area() {
    let mut c = Catchment::new(10.0, BucketParams::new()).unwrap();
    let expected = [
        0.0,
        1.5460903920000009,
        27.160204993176006,
        36.4011648088111,
        67.22716796480685,
    ];
    for &e in &expected {
        assert_relative_eq!(c.update_runoff(40.0, 0.25).unwrap(), e, epsilon = 1e-9);
    }
}

#[test]
fn storage_stays_within_bounds_over_long_run() {
    let mut m = BucketRunoffModel::new(BucketParams::new()).unwrap();
    for step in 0..365 {
        let precip = match step % 7 {
            0 => 45.0,
            3 => 12.5,
            _ => 0.0,
        };
        let q = m.runoff(precip, 3.0).unwrap();
        assert!(q >= 0.0);
        for store in m.buckets() {
            assert!(store.quantity() >= 0.0 && store.quantity() <= store.capacity());
        }
    }
}
