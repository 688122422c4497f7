//! Broadcast ephemerides and satellite state propagation
use log::error;

use crate::{
    constants::{BDS2_B1I_HZ, GPS_L1_HZ, SPEED_OF_LIGHT_M_S},
    position::Position,
    prelude::{Code, Constellation, Epoch, Error, SignalId, TimeScale, Vector3},
};

mod glonass;
mod health;
mod kepler;
mod sbas;
mod ura;

pub use glonass::GlonassTerms;
pub use health::{GpsSignalHealth, GPS_NAV_DATA_SUMMARY_BIT};
pub use kepler::KeplerTerms;
pub use sbas::SbasTerms;
pub use ura::{decode_fit_interval, decode_ura_index, encode_ura, MAX_ALLOWED_GPS_URA_IDX};

/// Orbit and clock model carried by one [Ephemeris]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EphemerisTerms {
    /// Keplerian elements (GPS, BeiDou)
    Kepler(KeplerTerms),
    /// GLONASS ECEF state vector
    Glonass(GlonassTerms),
    /// SBAS ECEF state vector
    Sbas(SbasTerms),
}

/// Broadcast [Ephemeris] of one satellite signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ephemeris {
    /// [SignalId] this [Ephemeris] was decoded from
    pub sid: SignalId,
    /// Reference time (expressed in GPST)
    pub toe: Epoch,
    /// Valid flag, set by the navigation message decoder
    pub valid: bool,
    /// Fit interval (s)
    pub fit_interval: u32,
    /// User Range Accuracy (m)
    pub ura: f64,
    /// Satellite health bits, as broadcast
    pub health_bits: u8,
    /// Orbit and clock [EphemerisTerms]
    pub terms: EphemerisTerms,
}

/// Satellite kinematic and clock state, at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteState {
    /// Position (ECEF m)
    pub pos: Vector3<f64>,
    /// Velocity (ECEF m.s⁻¹)
    pub vel: Vector3<f64>,
    /// Acceleration (ECEF m.s⁻²)
    pub acc: Vector3<f64>,
    /// Clock error (s)
    pub clock_err: f64,
    /// Clock error rate (s.s⁻¹)
    pub clock_rate_err: f64,
    /// Issue of data, clock
    pub iodc: u16,
    /// Issue of data, ephemeris
    pub iode: u8,
}

/// Returns (GPST week, seconds of week) for this [Epoch].
pub(crate) fn gpst_week_tow(t: Epoch) -> (u32, f64) {
    let (week, nanos) = t.to_time_scale(TimeScale::GPST).to_time_of_week();
    (week, nanos as f64 * 1.0E-9)
}

/// Group delay correction (s) to apply to the satellite clock, for this signal [Code].
/// `tgd` is the broadcast delay (TGD for GPS, TGD1 for BeiDou, d_tau for GLONASS).
pub(crate) fn group_delay(code: Code, fcn: i8, tgd: f64) -> Result<f64, Error> {
    match code {
        Code::GpsL1CA | Code::GpsL1P | Code::GpsL2CM | Code::GpsL2CL | Code::GpsL2P => {
            let ratio = GPS_L1_HZ / code.carrier_frequency(fcn);
            Ok(tgd * ratio * ratio)
        },
        Code::Bds2B1I | Code::Bds2B2 => {
            let ratio = BDS2_B1I_HZ / code.carrier_frequency(fcn);
            Ok(tgd * ratio * ratio)
        },
        Code::GloL1OF => Ok(0.0),
        Code::GloL2OF => Ok(tgd),
        Code::SbasL1CA => Err(Error::UnsupportedSignal(code)),
    }
}

impl Ephemeris {
    /// Builds a new valid [Ephemeris]
    pub fn new(sid: SignalId, toe: Epoch, fit_interval: u32, terms: EphemerisTerms) -> Self {
        Self {
            sid,
            toe,
            terms,
            fit_interval,
            valid: true,
            ura: 2.0,
            health_bits: 0,
        }
    }

    /// Copies and returns [Ephemeris] with updated URA (m)
    pub fn with_ura(&self, ura: f64) -> Self {
        let mut s = *self;
        s.ura = ura;
        s
    }

    /// Copies and returns [Ephemeris] with updated health bits
    pub fn with_health_bits(&self, health_bits: u8) -> Self {
        let mut s = *self;
        s.health_bits = health_bits;
        s
    }

    /// Copies and returns [Ephemeris] with updated valid flag
    pub fn with_valid(&self, valid: bool) -> Self {
        let mut s = *self;
        s.valid = valid;
        s
    }

    /// [Constellation] of this [Ephemeris]
    pub fn constellation(&self) -> Constellation {
        self.sid.code.constellation()
    }

    /// Returns true if this [Ephemeris] may be used at `t`:
    /// flagged valid, with a non zero fit interval, a set reference week
    /// and `t` within half the fit interval of the reference epochs.
    pub fn is_valid(&self, t: Epoch) -> bool {
        if !self.valid || self.fit_interval == 0 {
            return false;
        }

        let half_fit = self.fit_interval as f64 / 2.0;

        if !Self::is_within(self.toe, t, half_fit) {
            return false;
        }

        match &self.terms {
            EphemerisTerms::Kepler(kepler) => Self::is_within(kepler.toc, t, half_fit),
            _ => true,
        }
    }

    fn is_within(reference: Epoch, t: Epoch, half_fit: f64) -> bool {
        let (week, _) = gpst_week_tow(reference);
        if week == 0 {
            return false;
        }
        (t - reference).to_seconds().abs() <= half_fit
    }

    /// Evaluates the [SatelliteState] at `t`, which must lie within the validity period.
    pub fn state_at(&self, t: Epoch) -> Result<SatelliteState, Error> {
        if !self.is_valid(t) {
            error!("{} - {}: invalid ephemeris (toe={})", t, self.sid, self.toe);
            return Err(Error::EphemerisInvalid(self.sid));
        }
        self.state_at_unchecked(t)
    }

    /// Evaluates the [SatelliteState] at `t`, without verifying this [Ephemeris] validity.
    pub fn state_at_unchecked(&self, t: Epoch) -> Result<SatelliteState, Error> {
        let dt = (t - self.toe).to_seconds();
        match &self.terms {
            EphemerisTerms::Kepler(kepler) => kepler.state(self.sid.code, self.toe, t),
            EphemerisTerms::Glonass(glonass) => glonass.state(self.sid.code, dt),
            EphemerisTerms::Sbas(sbas) => Ok(sbas.state(dt)),
        }
    }

    /// Group delay correction (s) for this [Ephemeris] signal.
    pub fn group_delay(&self) -> Result<f64, Error> {
        match &self.terms {
            EphemerisTerms::Kepler(kepler) => group_delay(self.sid.code, 0, kepler.tgd),
            EphemerisTerms::Glonass(glonass) => {
                group_delay(self.sid.code, glonass.fcn, glonass.d_tau)
            },
            EphemerisTerms::Sbas(_) => Err(Error::UnsupportedSignal(self.sid.code)),
        }
    }

    /// Issue of data (IODE for Keplerian ephemerides, IOD for GLONASS).
    pub fn iod(&self) -> Result<u8, Error> {
        match &self.terms {
            EphemerisTerms::Kepler(kepler) => Ok(kepler.iode),
            EphemerisTerms::Glonass(glonass) => Ok(glonass.iod),
            EphemerisTerms::Sbas(_) => Err(Error::NoIssueOfData),
        }
    }

    /// Azimuth and elevation (radians) of this satellite, seen from `rx_ecef` (m) at `t`.
    pub fn azimuth_elevation(&self, t: Epoch, rx_ecef: Vector3<f64>) -> Result<(f64, f64), Error> {
        let state = self.state_at(t)?;
        Ok(Position::from_ecef(rx_ecef).azimuth_elevation(&state.pos))
    }

    /// Doppler shift (Hz) this satellite signal would exhibit for a receiver
    /// at `rx_pos` (ECEF m) moving at `rx_vel` (ECEF m.s⁻¹), at `t`.
    /// Positive when the satellite approaches.
    pub fn doppler(&self, t: Epoch, rx_pos: Vector3<f64>, rx_vel: Vector3<f64>) -> Result<f64, Error> {
        let state = self.state_at(t)?;
        let los = state.pos - rx_pos;
        let radial_vel = los.dot(&(state.vel - rx_vel)) / los.norm();
        let fcn = match &self.terms {
            EphemerisTerms::Glonass(glonass) => glonass.fcn,
            _ => 0,
        };
        Ok(-self.sid.code.carrier_frequency(fcn) * radial_vel / SPEED_OF_LIGHT_M_S)
    }
}
