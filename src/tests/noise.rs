use crate::{
    prelude::{
        Code, Error, Measurement, MeasurementFlags, NoiseModel, NoiseVariances, SignalId, Vector3,
    },
    tests::t0,
};

use rstest::*;

fn tracked(code: Code, cn0: f64) -> Measurement {
    Measurement::new(
        SignalId::from_prn(12, code),
        t0(),
        2.2E7,
        cn0,
        Vector3::new(2.0E7, 1.0E7, 1.0E7),
        Vector3::zeros(),
    )
    .with_elevation_deg(90.0)
    .with_tracking(10.0, 10.0)
    .with_carrier_phase(0.0, true)
}

fn variances(meas: &Measurement) -> NoiseVariances {
    NoiseModel::variances(meas).unwrap()
}

#[test]
fn nominal_variances() {
    let nominal = variances(&tracked(Code::GpsL1CA, 35.0));
    let cn0_term = 10.0_f64.powf(-3.5);

    assert!((nominal.pseudorange - 25000.0 * cn0_term).abs() < 1.0E-9);
    assert!((nominal.measured_doppler - 10000.0 * cn0_term).abs() < 1.0E-9);
    assert!((nominal.carrier_phase - 0.9 * cn0_term).abs() < 1.0E-12);
    assert_eq!(nominal.computed_doppler, 0.0);
}

#[test]
fn pseudorange_floor() {
    // elevation term dominates at high CN0 and low elevation
    let strong = variances(&tracked(Code::GpsL1CA, 50.0).with_elevation_deg(30.0));
    assert!((strong.pseudorange - (2.25 + 1.0)).abs() < 1.0E-9);

    let horizon = variances(&tracked(Code::GpsL1CA, 50.0).with_elevation_deg(0.0));
    assert!(horizon.pseudorange.is_finite());
    assert!(horizon.pseudorange > 1.0E4);
}

#[test]
fn cn0_monotonicity() {
    let mut previous = f64::INFINITY;
    for cn0 in [20.0, 25.0, 30.0, 35.0] {
        let var = variances(&tracked(Code::GpsL1CA, cn0));
        assert!(var.pseudorange < previous);
        previous = var.pseudorange;
    }
}

#[rstest]
#[case(Code::GpsL1CA, NoiseModel::GPS)]
#[case(Code::GpsL2CM, NoiseModel::GPS)]
#[case(Code::GloL1OF, NoiseModel::GLONASS)]
#[case(Code::GloL2OF, NoiseModel::GLONASS)]
#[case(Code::Bds2B1I, NoiseModel::BDS2)]
fn constellation_models(#[case] code: Code, #[case] model: NoiseModel) {
    assert_eq!(NoiseModel::for_code(code), Ok(model));
}

#[test]
fn unsupported_constellation() {
    let meas = tracked(Code::SbasL1CA, 40.0);
    assert_eq!(
        NoiseModel::variances(&meas),
        Err(Error::UnsupportedSignal(Code::SbasL1CA))
    );
}

#[test]
fn no_phase_lock_penalty() {
    let nominal = variances(&tracked(Code::GpsL1CA, 30.0));

    let meas = tracked(Code::GpsL1CA, 30.0).with_flags(MeasurementFlags::CODE_VALID);
    let unlocked = variances(&meas);

    assert!((unlocked.pseudorange - 16.0 * nominal.pseudorange).abs() < 1.0E-9);
    assert!((unlocked.measured_doppler - 16.0 * nominal.measured_doppler).abs() < 1.0E-9);
    assert_eq!(unlocked.carrier_phase, 0.0);
}

#[rstest]
#[case(0.0, 4.0)]
#[case(2.0, 2.5)]
#[case(4.0, 1.0)]
#[case(30.0, 1.0)]
fn short_tracking_penalty(#[case] time_in_track: f64, #[case] penalty: f64) {
    let nominal = variances(&tracked(Code::GpsL1CA, 30.0));
    let meas = tracked(Code::GpsL1CA, 30.0).with_tracking(10.0, time_in_track);
    let var = variances(&meas);

    assert!((var.pseudorange - penalty * nominal.pseudorange).abs() < 1.0E-9);
    assert!((var.measured_doppler - penalty * nominal.measured_doppler).abs() < 1.0E-9);
    assert_eq!(var.carrier_phase, nominal.carrier_phase);
}

#[rstest]
#[case(0.0, 4.0)]
#[case(0.25, 2.5)]
#[case(0.5, 1.0)]
fn short_lock_penalty(#[case] lock_time: f64, #[case] penalty: f64) {
    let nominal = variances(&tracked(Code::GpsL1CA, 30.0));
    let meas = tracked(Code::GpsL1CA, 30.0).with_tracking(lock_time, 10.0);
    let var = variances(&meas);

    assert!((var.carrier_phase - penalty * nominal.carrier_phase).abs() < 1.0E-12);
    assert_eq!(var.pseudorange, nominal.pseudorange);
}

#[test]
fn half_cycle_penalty() {
    let nominal = variances(&tracked(Code::GpsL1CA, 30.0));
    let meas = tracked(Code::GpsL1CA, 30.0).with_carrier_phase(0.0, false);
    let var = variances(&meas);
    assert!((var.carrier_phase - 9.0 * nominal.carrier_phase).abs() < 1.0E-12);
}

#[test]
fn computed_doppler_variance() {
    let nominal = variances(&tracked(Code::GpsL1CA, 40.0));

    let meas = tracked(Code::GpsL1CA, 40.0).with_computed_doppler(-1200.0, 0.5);
    let var = variances(&meas);

    let expected = 2.0 * nominal.carrier_phase / 0.25 + 0.25 * 0.002;
    assert!((var.computed_doppler - expected).abs() < 1.0E-12);

    // longer spans: less carrier noise, more clock noise
    let meas = tracked(Code::GpsL1CA, 40.0).with_computed_doppler(-1200.0, 10.0);
    assert!(variances(&meas).computed_doppler > var.computed_doppler);
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
fn invalid_computed_doppler(#[case] dt: f64) {
    let meas = tracked(Code::GpsL1CA, 40.0).with_computed_doppler(-1200.0, dt);
    assert_eq!(
        NoiseModel::variances(&meas),
        Err(Error::InvalidComputedDoppler(meas.sid))
    );
}
