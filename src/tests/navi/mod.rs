use crate::{
    navigation::Candidate,
    noise::NoiseModel,
    prelude::Measurement,
};

mod dop;
mod lsq;
mod raim;

pub fn candidates(measurements: &[Measurement]) -> Vec<Candidate<'_>> {
    measurements
        .iter()
        .map(|meas| Candidate::new(meas, NoiseModel::variances(meas).unwrap()))
        .collect()
}
