use crate::{
    navigation::{DilutionOfPrecision, LeastSquares},
    position::Position,
    prelude::Config,
    tests::{gps_epoch, navi::candidates, static_receiver, FOUR_SATS_AZ_EL, SIX_SATS_AZ_EL},
};

use nalgebra::Matrix4;

#[test]
fn four_satellites_dop() {
    let truth = static_receiver();
    let epoch = gps_epoch(&truth, &FOUR_SATS_AZ_EL);
    let candidates = candidates(&epoch);

    let ctx = LeastSquares::new(&Config::default())
        .solve(&candidates)
        .unwrap();

    let dop = DilutionOfPrecision::new(&ctx.h, &Position::from_ecef(ctx.state.pos));

    assert!((dop.gdop - 3.28).abs() < 0.01, "gdop={}", dop.gdop);
    assert!((dop.gdop.powi(2) - dop.pdop.powi(2) - dop.tdop.powi(2)).abs() < 1.0E-9);
    assert!((dop.pdop.powi(2) - dop.hdop.powi(2) - dop.vdop.powi(2)).abs() < 1.0E-9);
    assert!(dop.hdop > 0.0);
    assert!(dop.vdop > 0.0);
}

#[test]
fn more_satellites_better_dop() {
    let truth = static_receiver();
    let lsq = LeastSquares::new(&Config::default());

    let four = gps_epoch(&truth, &FOUR_SATS_AZ_EL);
    let six = gps_epoch(&truth, &SIX_SATS_AZ_EL);

    let ctx_four = lsq.solve(&candidates(&four)).unwrap();
    let ctx_six = lsq.solve(&candidates(&six)).unwrap();

    let position = Position::from_ecef(truth.pos);
    let dop_four = DilutionOfPrecision::new(&ctx_four.h, &position);
    let dop_six = DilutionOfPrecision::new(&ctx_six.h, &position);

    assert!(dop_six.gdop < dop_four.gdop);
}

#[test]
fn vertical_projection() {
    // uncertainty along the local vertical only
    let position = Position::from_ecef(static_receiver().pos);
    let down = position.down();

    let mut h = Matrix4::<f64>::zeros();
    for i in 0..3 {
        for j in 0..3 {
            h[(i, j)] = 4.0 * down[i] * down[j];
        }
    }
    h[(3, 3)] = 1.0;

    let dop = DilutionOfPrecision::new(&h, &position);
    assert!((dop.vdop - 2.0).abs() < 1.0E-9);
    assert!(dop.hdop < 1.0E-6);
    assert!((dop.tdop - 1.0).abs() < 1.0E-12);
    assert!((dop.gdop - 5.0_f64.sqrt()).abs() < 1.0E-9);
}
