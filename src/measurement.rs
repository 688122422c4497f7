use bitflags::bitflags;

use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    prelude::{Code, Epoch, SignalId, Vector3},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Tracking state of one [Measurement]
    #[derive(Debug, Default, Copy, Clone)]
    #[derive(PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct MeasurementFlags: u8 {
        /// Pseudo range is valid
        const CODE_VALID = 0x01;
        /// Carrier phase is valid (phase lock)
        const PHASE_VALID = 0x02;
        /// Half cycle ambiguity is resolved
        const HALF_CYCLE_KNOWN = 0x04;
        /// Measured (tracking loop) doppler is valid
        const MEAS_DOPPLER_VALID = 0x08;
        /// Doppler computed from carrier phase differences is valid
        const COMP_DOPPLER_VALID = 0x10;
    }
}

/// [Measurement] of one signal, at one epoch, with the
/// satellite state already resolved at time of transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// [SignalId] of this observation
    pub sid: SignalId,
    /// GLONASS frequency channel number (FDMA codes only)
    pub glo_fcn: i8,
    /// Fully corrected pseudo range (m)
    pub pseudorange: f64,
    /// Raw pseudo range (m)
    pub raw_pseudorange: f64,
    /// Carrier phase (cycles)
    pub carrier_phase: f64,
    /// Doppler shift measured by the tracking loop (Hz)
    pub measured_doppler: f64,
    /// Doppler shift derived from carrier phase differences (Hz)
    pub computed_doppler: f64,
    /// Time span the computed doppler was formed over (s)
    pub computed_doppler_dt: f64,
    /// Carrier to noise density ratio (dB-Hz)
    pub cn0: f64,
    /// Time since last loss of phase lock (s)
    pub lock_time: f64,
    /// Time since beginning of tracking (s)
    pub time_in_track: f64,
    /// Satellite elevation (degrees)
    pub elevation_deg: f64,
    /// Satellite position (ECEF m) at time of transmission
    pub sat_pos: Vector3<f64>,
    /// Satellite velocity (ECEF m.s⁻¹) at time of transmission
    pub sat_vel: Vector3<f64>,
    /// Satellite acceleration (ECEF m.s⁻²) at time of transmission
    pub sat_acc: Vector3<f64>,
    /// Satellite clock error (s)
    pub sat_clock_err: f64,
    /// Satellite clock error rate (s.s⁻¹)
    pub sat_clock_err_rate: f64,
    /// Time of transmission
    pub tot: Epoch,
    /// [MeasurementFlags]
    pub flags: MeasurementFlags,
}

impl Measurement {
    /// Builds a new [Measurement] from the satellite state at time of transmission,
    /// the (corrected) pseudo range and its CN0.
    /// The measurement is flagged [MeasurementFlags::CODE_VALID], every other
    /// observable is unset.
    pub fn new(
        sid: SignalId,
        tot: Epoch,
        pseudorange: f64,
        cn0: f64,
        sat_pos: Vector3<f64>,
        sat_vel: Vector3<f64>,
    ) -> Self {
        Self {
            sid,
            tot,
            cn0,
            sat_pos,
            sat_vel,
            pseudorange,
            raw_pseudorange: pseudorange,
            glo_fcn: 0,
            carrier_phase: 0.0,
            measured_doppler: 0.0,
            computed_doppler: 0.0,
            computed_doppler_dt: 0.0,
            lock_time: 0.0,
            time_in_track: 0.0,
            elevation_deg: 90.0,
            sat_acc: Vector3::zeros(),
            sat_clock_err: 0.0,
            sat_clock_err_rate: 0.0,
            flags: MeasurementFlags::CODE_VALID,
        }
    }

    /// Copies and returns [Measurement] with updated raw pseudo range.
    pub fn with_raw_pseudorange(&self, raw_pseudorange: f64) -> Self {
        let mut s = self.clone();
        s.raw_pseudorange = raw_pseudorange;
        s
    }

    /// Copies and returns [Measurement] with measured doppler (Hz),
    /// flagged valid.
    pub fn with_measured_doppler(&self, doppler_hz: f64) -> Self {
        let mut s = self.clone();
        s.measured_doppler = doppler_hz;
        s.flags |= MeasurementFlags::MEAS_DOPPLER_VALID;
        s
    }

    /// Copies and returns [Measurement] with computed doppler (Hz)
    /// formed over `dt_s`, flagged valid.
    pub fn with_computed_doppler(&self, doppler_hz: f64, dt_s: f64) -> Self {
        let mut s = self.clone();
        s.computed_doppler = doppler_hz;
        s.computed_doppler_dt = dt_s;
        s.flags |= MeasurementFlags::COMP_DOPPLER_VALID;
        s
    }

    /// Copies and returns [Measurement] with carrier phase (cycles),
    /// flagged valid.
    pub fn with_carrier_phase(&self, cycles: f64, half_cycle_known: bool) -> Self {
        let mut s = self.clone();
        s.carrier_phase = cycles;
        s.flags |= MeasurementFlags::PHASE_VALID;
        s.flags.set(MeasurementFlags::HALF_CYCLE_KNOWN, half_cycle_known);
        s
    }

    /// Copies and returns [Measurement] with updated tracking durations (s).
    pub fn with_tracking(&self, lock_time: f64, time_in_track: f64) -> Self {
        let mut s = self.clone();
        s.lock_time = lock_time;
        s.time_in_track = time_in_track;
        s
    }

    /// Copies and returns [Measurement] with updated elevation (degrees).
    pub fn with_elevation_deg(&self, elevation_deg: f64) -> Self {
        let mut s = self.clone();
        s.elevation_deg = elevation_deg;
        s
    }

    /// Copies and returns [Measurement] with satellite clock state.
    pub fn with_sat_clock(&self, clock_err_s: f64, clock_err_rate: f64) -> Self {
        let mut s = self.clone();
        s.sat_clock_err = clock_err_s;
        s.sat_clock_err_rate = clock_err_rate;
        s
    }

    /// Copies and returns [Measurement] with satellite acceleration.
    pub fn with_sat_acc(&self, sat_acc: Vector3<f64>) -> Self {
        let mut s = self.clone();
        s.sat_acc = sat_acc;
        s
    }

    /// Copies and returns [Measurement] with GLONASS frequency channel number.
    pub fn with_glo_fcn(&self, fcn: i8) -> Self {
        let mut s = self.clone();
        s.glo_fcn = fcn;
        s
    }

    /// Copies and returns [Measurement] with new [MeasurementFlags].
    pub fn with_flags(&self, flags: MeasurementFlags) -> Self {
        let mut s = self.clone();
        s.flags = flags;
        s
    }

    /// [Code] of this observation
    pub fn code(&self) -> Code {
        self.sid.code
    }

    /// Carrier wavelength of this signal (m)
    pub fn wavelength(&self) -> f64 {
        self.sid.code.wavelength(self.glo_fcn)
    }

    /// Time of flight (s) derived from the raw pseudo range.
    pub(crate) fn raw_time_of_flight(&self) -> f64 {
        self.raw_pseudorange / SPEED_OF_LIGHT_M_S
    }

    pub(crate) fn has(&self, flags: MeasurementFlags) -> bool {
        self.flags.contains(flags)
    }
}
