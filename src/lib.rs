#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod cfg;
mod constants;
mod ephemeris;
mod error;
mod measurement;
mod navigation;
mod noise;
mod position;
mod signal;
mod solver;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, ProcessingStrategy};
    pub use crate::ephemeris::{
        decode_fit_interval, decode_ura_index, encode_ura, Ephemeris, EphemerisTerms,
        GlonassTerms, GpsSignalHealth, KeplerTerms, SatelliteState, SbasTerms,
        GPS_NAV_DATA_SUMMARY_BIT, MAX_ALLOWED_GPS_URA_IDX,
    };
    pub use crate::error::Error;
    pub use crate::measurement::{Measurement, MeasurementFlags};
    pub use crate::navigation::{
        DilutionOfPrecision, InvalidationCause, PVTOutput, PVTSolution, PVTStatus,
        ReceiverState,
    };
    pub use crate::noise::{NoiseModel, NoiseVariances};
    pub use crate::position::Position;
    pub use crate::signal::{Code, SignalId};
    pub use crate::solver::Solver;
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
