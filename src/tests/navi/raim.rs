use crate::{
    navigation::{LeastSquares, PVTStatus, Raim},
    prelude::{Code, Config, Error, Measurement, ReceiverState, SignalId},
    tests::{
        gps_epoch, init_logger, measurement, navi::candidates, static_receiver,
        with_range_fault, EIGHT_SATS_AZ_EL, SIX_SATS_AZ_EL,
    },
};

use rand::{rngs::SmallRng, Rng, SeedableRng};
use rstest::*;

/// GPS L1 C/A signals on the first `num_gps` positions,
/// BeiDou B1I signals with the given pseudo range biases on the following ones.
fn mixed_epoch(truth: &ReceiverState, num_gps: usize, bds_biases_m: &[f64]) -> Vec<Measurement> {
    let mut epoch = gps_epoch(truth, &EIGHT_SATS_AZ_EL[..num_gps]);

    for (i, bias_m) in bds_biases_m.iter().enumerate() {
        let (az, el) = EIGHT_SATS_AZ_EL[num_gps + i];
        let bds = measurement(truth, i as u8 + 1, Code::Bds2B1I, az, el);
        epoch.extend(with_range_fault(&[bds], 0, *bias_m));
    }

    epoch
}

#[test]
fn consistent_residuals() {
    init_logger();
    let cfg = Config::default();
    let truth = static_receiver();
    let epoch = gps_epoch(&truth, &SIX_SATS_AZ_EL);
    let candidates = candidates(&epoch);

    let raim = Raim::new(&cfg);
    let ctx = LeastSquares::new(&cfg).solve(&candidates).unwrap();

    let (passed, metric) = raim.residual_test(&ctx, &candidates);
    assert!(passed);
    assert!(metric < 1.0E-2);

    let solution = raim.solve_with_raim(&candidates).unwrap();
    assert_eq!(solution.status, PVTStatus::ConvergedRaimOk);
    assert!(solution.removed.is_empty());
}

#[rstest]
#[case(0)]
#[case(2)]
#[case(5)]
fn residual_test_detects_fault(#[case] index: usize) {
    let cfg = Config::default().without_velocity();
    let truth = static_receiver();
    let epoch = with_range_fault(&gps_epoch(&truth, &SIX_SATS_AZ_EL), index, 50.0);
    let candidates = candidates(&epoch);

    let raim = Raim::new(&cfg);
    let ctx = LeastSquares::new(&cfg).solve(&candidates).unwrap();

    let (passed, metric) = raim.residual_test(&ctx, &candidates);
    assert!(!passed);
    assert!(metric.is_finite());
}

#[test]
fn single_fault_exclusion() {
    init_logger();
    let cfg = Config::default().without_velocity();
    let truth = static_receiver();
    let clean = gps_epoch(&truth, &SIX_SATS_AZ_EL);

    let mut rng = SmallRng::seed_from_u64(0x5eed);

    for _ in 0..8 {
        let index = rng.random_range(0..clean.len());
        let bias_m = rng.random_range(50.0..150.0);

        let epoch = with_range_fault(&clean, index, bias_m);
        let candidates = candidates(&epoch);

        let solution = Raim::new(&cfg).solve_with_raim(&candidates).unwrap();

        assert_eq!(solution.status, PVTStatus::Repaired);
        assert_eq!(solution.removed, vec![epoch[index].sid]);

        let err = (solution.ctx.state.pos - truth.pos).norm();
        assert!(err < 1.0E-3, "position error {} m", err);
    }
}

#[test]
fn raim_disabled() {
    let cfg = Config::default().without_raim();
    let truth = static_receiver();
    let epoch = with_range_fault(&gps_epoch(&truth, &SIX_SATS_AZ_EL), 1, 50.0);
    let candidates = candidates(&epoch);

    let solution = Raim::new(&cfg).solve_with_raim(&candidates).unwrap();
    assert_eq!(solution.status, PVTStatus::ConvergedNoRaim);
    assert!(solution.removed.is_empty());
}

#[test]
fn no_redundancy() {
    let cfg = Config::default();
    let truth = static_receiver();
    let epoch = with_range_fault(&gps_epoch(&truth, &SIX_SATS_AZ_EL[..4]), 1, 50.0);
    let candidates = candidates(&epoch);

    let solution = Raim::new(&cfg).solve_with_raim(&candidates).unwrap();
    assert_eq!(solution.status, PVTStatus::ConvergedNoRaim);
}

#[test]
fn single_spare_measurement() {
    // the fault is detected, but no exclusion leaves a verifiable set
    let cfg = Config::default().without_velocity();
    let truth = static_receiver();
    let epoch = with_range_fault(&gps_epoch(&truth, &SIX_SATS_AZ_EL[..5]), 0, 500.0);
    let candidates = candidates(&epoch);

    let result = Raim::new(&cfg).solve_with_raim(&candidates);
    assert_eq!(result.err(), Some(Error::RepairFailed));
}

#[test]
fn outlier_flagging() {
    let cfg = Config::default();
    let truth = static_receiver();
    let epoch = gps_epoch(&truth, &SIX_SATS_AZ_EL);
    let candidates = candidates(&epoch);

    let raim = Raim::new(&cfg);
    let solution = raim.solve_with_raim(&candidates).unwrap();

    let used = epoch.iter().map(|meas| meas.sid).collect::<Vec<_>>();

    // consistent signals, not part of the solution
    let (az, el) = SIX_SATS_AZ_EL[2];
    let consistent = measurement(&truth, 3, Code::GpsL2CM, az, el);

    let (az, el) = SIX_SATS_AZ_EL[4];
    let faulty = measurement(&truth, 5, Code::GpsL2CM, az, el);
    let faulty = with_range_fault(&[faulty], 0, 30.0).remove(0);

    let (az, el) = SIX_SATS_AZ_EL[5];
    let mut fast = measurement(&truth, 6, Code::GpsL2CM, az, el);
    fast.measured_doppler += 100.0;

    let pool = epoch
        .iter()
        .chain([&consistent, &faulty, &fast])
        .collect::<Vec<_>>();

    let mut removed = Vec::<SignalId>::new();
    let flagged = raim.flag_outliers(&pool, &solution.ctx.state, &used, &mut removed);

    assert!(flagged);
    assert_eq!(removed, vec![faulty.sid, fast.sid]);

    // doppler residuals are ignored without velocity
    let cfg = Config::default().without_velocity();
    let mut removed = Vec::<SignalId>::new();
    let flagged = Raim::new(&cfg).flag_outliers(&pool, &solution.ctx.state, &used, &mut removed);

    assert!(flagged);
    assert_eq!(removed, vec![faulty.sid]);
}

#[test]
fn two_faults_two_rounds() {
    init_logger();
    let cfg = Config::default().without_velocity();
    let truth = static_receiver();

    let epoch = gps_epoch(&truth, &EIGHT_SATS_AZ_EL);
    let epoch = with_range_fault(&epoch, 2, 80.0);
    let epoch = with_range_fault(&epoch, 6, 200.0);
    let candidates = candidates(&epoch);

    let solution = Raim::new(&cfg).solve_with_raim(&candidates).unwrap();

    assert_eq!(solution.status, PVTStatus::Repaired);
    assert_eq!(solution.removed.len(), 2);
    assert!(solution.removed.contains(&epoch[2].sid));
    assert!(solution.removed.contains(&epoch[6].sid));

    let err = (solution.ctx.state.pos - truth.pos).norm();
    assert!(err < 1.0E-3, "position error {} m", err);
}

#[test]
fn gps_only_fallback() {
    init_logger();
    let cfg = Config::default().without_velocity();
    let truth = static_receiver();

    // more faults than exclusion rounds
    let epoch = mixed_epoch(&truth, 5, &[80.0, -120.0, 150.0]);
    let candidates = candidates(&epoch);

    let solution = Raim::new(&cfg).solve_with_raim(&candidates).unwrap();

    assert_eq!(solution.status, PVTStatus::Repaired);

    let bds = epoch[5..].iter().map(|meas| meas.sid).collect::<Vec<_>>();
    assert_eq!(solution.removed, bds);

    let err = (solution.ctx.state.pos - truth.pos).norm();
    assert!(err < 1.0E-3, "position error {} m", err);
}

#[test]
fn gps_only_fallback_impossible() {
    let cfg = Config::default().without_velocity();
    let truth = static_receiver();

    let epoch = mixed_epoch(&truth, 4, &[80.0, -120.0, 150.0]);
    let candidates = candidates(&epoch);

    let result = Raim::new(&cfg).solve_with_raim(&candidates);
    assert_eq!(result.err(), Some(Error::RepairImpossible));
}
