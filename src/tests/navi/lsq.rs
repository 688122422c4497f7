use crate::{
    navigation::{predicted_pseudorange, sagnac_rotation, LeastSquares},
    prelude::{Config, Error, MeasurementFlags, ReceiverState, Vector3},
    tests::{
        gps_epoch, init_logger, navi::candidates, static_receiver, FOUR_SATS_AZ_EL,
        RX_CLOCK_BIAS_M, SIX_SATS_AZ_EL,
    },
};

#[test]
fn sagnac_rotation_geometry() {
    let v = Vector3::new(2.0E7, -1.0E7, 5.0E6);

    assert_eq!(sagnac_rotation(&v, 0.0), v);

    let rotated = sagnac_rotation(&v, 0.07);
    assert_eq!(rotated[2], v[2]);
    assert!((rotated - v).norm() > 100.0);
    assert!((rotated - v).norm() < 200.0);
}

#[test]
fn predicted_range_includes_clock() {
    let truth = static_receiver();
    let epoch = gps_epoch(&truth, &FOUR_SATS_AZ_EL);

    for meas in epoch.iter() {
        let (range, los) = predicted_pseudorange(&truth, meas);
        assert!((range - meas.pseudorange).abs() < 1.0E-6);
        assert!((los.norm() - 1.0).abs() < 1.0E-12);

        let (no_clock, _) = predicted_pseudorange(
            &ReceiverState::from_position(truth.pos, 0.0),
            meas,
        );
        assert!((range - no_clock - RX_CLOCK_BIAS_M).abs() < 1.0E-6);
    }
}

#[test]
fn fixed_point() {
    init_logger();
    let truth = static_receiver();
    let epoch = gps_epoch(&truth, &SIX_SATS_AZ_EL);
    let candidates = candidates(&epoch);

    let lsq = LeastSquares::new(&Config::default());
    let ctx = lsq.solve_from(&candidates, truth).unwrap();

    assert_eq!(ctx.iterations, 1);
    assert!((ctx.state.pos - truth.pos).norm() < 1.0E-6);
    assert!((ctx.state.clock_bias_m - RX_CLOCK_BIAS_M).abs() < 1.0E-6);
}

#[test]
fn cold_start() {
    init_logger();
    let truth = ReceiverState {
        vel: Vector3::new(12.0, -4.0, 1.5),
        clock_drift_m_s: 35.0,
        ..static_receiver()
    };
    let epoch = gps_epoch(&truth, &SIX_SATS_AZ_EL);
    let candidates = candidates(&epoch);

    let lsq = LeastSquares::new(&Config::default());
    let ctx = lsq.solve(&candidates).unwrap();

    assert!(ctx.iterations > 1);
    assert!(ctx.iterations <= 10);

    let err = (ctx.state.pos - truth.pos).norm();
    assert!(err < 1.0E-6, "position error {} m", err);
    assert!((ctx.state.clock_bias_m - RX_CLOCK_BIAS_M).abs() < 1.0E-6);

    assert!(ctx.velocity_solved);
    let vel_err = (ctx.state.vel - truth.vel).norm();
    assert!(vel_err < 1.0E-4, "velocity error {} m/s", vel_err);
    assert!((ctx.state.clock_drift_m_s - 35.0).abs() < 1.0E-4);

    for i in 0..candidates.len() {
        assert!(ctx.omp_range[i].abs() < 1.0E-2);
        assert!(ctx.omp_doppler[i].abs() < 1.0E-4);
    }

    // position covariance is symmetric and positive
    for i in 0..4 {
        assert!(ctx.v[(i, i)] > 0.0);
        assert!(ctx.h[(i, i)] > 0.0);
        for j in 0..4 {
            assert!((ctx.v[(i, j)] - ctx.v[(j, i)]).abs() < 1.0E-9);
        }
    }
}

#[test]
fn velocity_disabled() {
    let truth = ReceiverState {
        vel: Vector3::new(12.0, -4.0, 1.5),
        ..static_receiver()
    };
    let epoch = gps_epoch(&truth, &SIX_SATS_AZ_EL);
    let candidates = candidates(&epoch);

    let lsq = LeastSquares::new(&Config::default().without_velocity());
    let ctx = lsq.solve(&candidates).unwrap();

    assert!(!ctx.velocity_solved);
    assert_eq!(ctx.state.vel, Vector3::zeros());
    assert_eq!(ctx.state.clock_drift_m_s, 0.0);
    assert!((ctx.state.pos - truth.pos).norm() < 1.0E-6);
}

#[test]
fn missing_doppler_skips_velocity() {
    let truth = static_receiver();
    let mut epoch = gps_epoch(&truth, &SIX_SATS_AZ_EL);
    epoch[3] = epoch[3].with_flags(MeasurementFlags::CODE_VALID | MeasurementFlags::PHASE_VALID);

    let candidates = candidates(&epoch);

    let lsq = LeastSquares::new(&Config::default());
    let ctx = lsq.solve(&candidates).unwrap();

    assert!(!ctx.velocity_solved);
    assert!((ctx.state.pos - truth.pos).norm() < 1.0E-6);
}

#[test]
fn under_determined() {
    let truth = static_receiver();
    let epoch = gps_epoch(&truth, &FOUR_SATS_AZ_EL[..3]);
    let candidates = candidates(&epoch);

    let lsq = LeastSquares::new(&Config::default());
    assert_eq!(lsq.solve(&candidates).err(), Some(Error::UnderDetermined));
}

#[test]
fn iteration_limit() {
    let truth = static_receiver();
    let epoch = gps_epoch(&truth, &FOUR_SATS_AZ_EL);
    let candidates = candidates(&epoch);

    let cfg = Config {
        max_iterations: 1,
        ..Default::default()
    };

    let lsq = LeastSquares::new(&cfg);
    assert_eq!(lsq.solve(&candidates).err(), Some(Error::Timeout));
}
