use crate::{ephemeris::SatelliteState, prelude::Vector3};

/// SBAS (geostationary) orbit and clock terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SbasTerms {
    /// Position at reference time (ECEF m)
    pub pos: Vector3<f64>,
    /// Velocity at reference time (ECEF m.s⁻¹)
    pub vel: Vector3<f64>,
    /// Acceleration (ECEF m.s⁻²)
    pub acc: Vector3<f64>,
    /// Clock bias (s)
    pub a_gf0: f64,
    /// Clock drift (s.s⁻¹)
    pub a_gf1: f64,
}

impl SbasTerms {
    pub(crate) fn state(&self, dt: f64) -> SatelliteState {
        SatelliteState {
            pos: self.pos + self.vel * dt + self.acc * (0.5 * dt * dt),
            vel: self.vel + self.acc * dt,
            acc: self.acc,
            clock_err: self.a_gf0,
            clock_rate_err: self.a_gf1,
            iodc: 0,
            iode: 0,
        }
    }
}
