//! Property tests for both smoothers
//!
//! Tests cover:
//! - Output shape always matches input shape
//! - Empty frames leave state untouched
//! - EWMA convergence rate and convex-combination bounds
//! - Kalman monotonic convergence
//! - State reset when the entity count changes

use landmark_smoother::{
    EwmaOptions, EwmaSmoother, Frame, FrameShape, KalmanParams, KalmanSmoother, Point3,
    ScalarKalmanFilter, ShapePolicy,
};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Point3> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0, -1000.0f64..1000.0)
        .prop_map(|(x, y, z)| Point3::new(x, y, z))
}

/// Frames whose entities all carry `points` landmarks, like a single detector model.
fn uniform_frame(points: usize) -> impl Strategy<Value = Frame> {
    prop::collection::vec(prop::collection::vec(point(), points), 0..4)
}

fn ragged_frame() -> impl Strategy<Value = Frame> {
    prop::collection::vec(prop::collection::vec(point(), 0..6), 0..4)
}

/// Two frames with the same (non-empty) shape.
fn frame_pair() -> impl Strategy<Value = (Frame, Frame)> {
    (1usize..4, 1usize..6).prop_flat_map(|(entities, points)| {
        let frame = move || prop::collection::vec(prop::collection::vec(point(), points), entities);
        (frame(), frame())
    })
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
}

fn kalman() -> KalmanSmoother {
    KalmanSmoother::new(KalmanParams::default()).unwrap()
}

proptest! {
    #[test]
    fn prop_ewma_preserves_shape(
        strength in 0.0f64..0.99,
        frames in prop::collection::vec(uniform_frame(5), 1..10)
    ) {
        let mut smoother = EwmaSmoother::new(EwmaOptions { strength }).unwrap();
        for frame in &frames {
            let out = smoother.update(frame);
            prop_assert_eq!(FrameShape::of(&out), FrameShape::of(frame));
        }
    }

    #[test]
    fn prop_kalman_preserves_shape(frames in prop::collection::vec(uniform_frame(5), 1..10)) {
        let mut smoother = kalman();
        for frame in &frames {
            let out = smoother.update(frame);
            prop_assert_eq!(FrameShape::of(&out), FrameShape::of(frame));
        }
    }

    #[test]
    fn prop_strict_policy_preserves_ragged_shapes(frames in prop::collection::vec(ragged_frame(), 1..10)) {
        let mut ewma = EwmaSmoother::new(EwmaOptions::default()).unwrap().with_policy(ShapePolicy::Strict);
        let mut kf = kalman().with_policy(ShapePolicy::Strict);
        for frame in &frames {
            prop_assert_eq!(FrameShape::of(&ewma.update(frame)), FrameShape::of(frame));
            prop_assert_eq!(FrameShape::of(&kf.update(frame)), FrameShape::of(frame));
        }
    }

    #[test]
    fn prop_empty_frame_is_a_no_op((a, b) in frame_pair(), strength in 0.0f64..0.99) {
        let options = EwmaOptions { strength };

        let mut with_gap = EwmaSmoother::new(options).unwrap();
        let mut without_gap = EwmaSmoother::new(options).unwrap();
        with_gap.update(&a);
        prop_assert!(with_gap.update(&Vec::new()).is_empty());
        without_gap.update(&a);
        prop_assert_eq!(with_gap.update(&b), without_gap.update(&b));

        let mut with_gap = kalman();
        let mut without_gap = kalman();
        with_gap.update(&a);
        prop_assert!(with_gap.update(&Vec::new()).is_empty());
        without_gap.update(&a);
        prop_assert_eq!(with_gap.update(&b), without_gap.update(&b));
    }

    #[test]
    fn prop_ewma_converges_geometrically(
        strength in 0.0f64..0.99,
        initial in point(),
        target in point(),
        n in 1usize..40
    ) {
        let mut smoother = EwmaSmoother::new(EwmaOptions { strength }).unwrap();
        smoother.update(&vec![vec![initial]]);

        let frame = vec![vec![target]];
        let mut out = Vec::new();
        for _ in 0..n {
            out = smoother.update(&frame);
        }

        let bound = strength.powi(n as i32);
        for axis in 0..3 {
            let err = (out[0][0][axis] - target[axis]).abs();
            let allowed = bound * (initial[axis] - target[axis]).abs();
            prop_assert!(err <= allowed + 1e-9 * (1.0 + target[axis].abs() + initial[axis].abs()));
        }
    }

    #[test]
    fn prop_ewma_output_lies_between_average_and_input(
        strength in 0.0f64..0.99,
        prior in point(),
        raw in point()
    ) {
        let mut smoother = EwmaSmoother::new(EwmaOptions { strength }).unwrap();
        smoother.update(&vec![vec![prior]]);
        let out = smoother.update(&vec![vec![raw]]);

        for axis in 0..3 {
            let lo = prior[axis].min(raw[axis]);
            let hi = prior[axis].max(raw[axis]);
            let v = out[0][0][axis];
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }

    #[test]
    fn prop_kalman_moves_monotonically_toward_constant(measurement in -1000.0f64..1000.0) {
        let mut filter = ScalarKalmanFilter::new(&KalmanParams::default(), 0.0);
        let mut last_err = measurement.abs();
        let mut last_p = f64::INFINITY;

        for _ in 0..30 {
            let x = filter.update(measurement);
            let err = (x - measurement).abs();
            prop_assert!(err <= last_err + 1e-9);
            prop_assert!(filter.error_covariance() <= last_p);
            last_err = err;
            last_p = filter.error_covariance();
        }
    }

    #[test]
    fn prop_entity_count_change_resets_ewma(
        strength in 0.0f64..0.99,
        stale in point(),
        two in prop::collection::vec(prop::collection::vec(point(), 3), 2)
    ) {
        let mut smoother = EwmaSmoother::new(EwmaOptions { strength }).unwrap();
        smoother.update(&vec![vec![stale; 3]]);
        smoother.update(&vec![vec![stale; 3]]);

        prop_assert_eq!(smoother.update(&two), two);
    }
}

#[test]
fn ewma_half_strength_scenario() {
    let mut smoother = EwmaSmoother::new(EwmaOptions { strength: 0.5 }).unwrap();
    smoother.update(&vec![vec![Point3::new(0.0, 0.0, 0.0)]]);

    let out = smoother.update(&vec![vec![Point3::new(10.0, 0.0, 0.0)]]);
    assert_eq!(out, vec![vec![Point3::new(5.0, 0.0, 0.0)]]);
}

#[test]
fn kalman_first_two_updates_scenario() {
    let params = KalmanParams {
        process_noise: 0.01,
        measurement_noise: 0.1,
        estimated_error: 1.0,
    };
    let mut filter = ScalarKalmanFilter::new(&params, 0.0);

    let first = filter.update(10.0);
    assert!(close(filter.gain(), 0.909, 1e-3));
    assert!(close(first, 9.099, 1e-3));
    assert!((filter.error_covariance() - 0.0910).abs() < 1e-3);

    let second = filter.update(10.0);
    assert!((10.0 - second) < (10.0 - first));
}

#[test]
fn kalman_resets_to_zero_seed_on_new_entity() {
    let mut smoother = kalman();
    let pose = vec![Point3::new(0.5, 0.5, 0.5); 33];
    for _ in 0..30 {
        smoother.update(&vec![pose.clone()]);
    }
    let settled = smoother.update(&vec![pose.clone()]);
    assert!(close(settled[0][0].x, 0.5, 1e-3));

    let out = smoother.update(&vec![pose.clone(), pose.clone()]);
    let mut fresh = ScalarKalmanFilter::new(&KalmanParams::default(), 0.0);
    let expected = fresh.update(0.5);
    for set in &out {
        for point in set {
            assert!((point.x - expected).abs() < 1e-12);
            assert!(point.x < settled[0][0].x);
        }
    }
}
