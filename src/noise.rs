//! Measurement noise model
use crate::{
    constants::NOMINAL_CLOCK_VARIANCE,
    measurement::{Measurement, MeasurementFlags},
    prelude::{Code, Constellation, Error},
};

/// Elevation term coefficient
const ELEVATION_NOISE_COEF: f64 = 0.5;

/// Sine of elevation floor (avoids the singularity at the horizon)
const MIN_SIN_ELEVATION: f64 = 1.0E-3;

/// Penalty applied to code and doppler without phase lock
const NO_PLL_PENALTY: f64 = 16.0;

/// Penalty applied to the carrier when the half cycle ambiguity is unknown
const NO_HALF_CYCLE_PENALTY: f64 = 9.0;

/// Lock time below which the carrier is penalized (s)
const LOCK_TIME_THRESHOLD_S: f64 = 0.5;

/// Time in track below which code and doppler are penalized (s)
const TRACK_TIME_THRESHOLD_S: f64 = 4.0;

/// Maximal penalty for short lock / short tracking
const SHORT_TRACKING_PENALTY: f64 = 4.0;

/// Per constellation [NoiseModel] coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseModel {
    /// Pseudo range coefficient (m²)
    pub code_coef: f64,
    /// Measured doppler coefficient (Hz²)
    pub doppler_coef: f64,
    /// Carrier phase coefficient (cycles²)
    pub carrier_coef: f64,
    /// Pseudo range variance floor (m²)
    pub code_floor: f64,
}

/// Variances of each observable of one [Measurement]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoiseVariances {
    /// Pseudo range (m²)
    pub pseudorange: f64,
    /// Carrier phase (cycles²)
    pub carrier_phase: f64,
    /// Measured doppler (Hz²)
    pub measured_doppler: f64,
    /// Computed doppler (Hz²). Null when the computed doppler is not available.
    pub computed_doppler: f64,
}

/// Linear penalty ramp, from [SHORT_TRACKING_PENALTY] at zero down to 1 at `threshold`.
fn short_tracking_penalty(time: f64, threshold: f64) -> f64 {
    SHORT_TRACKING_PENALTY - (SHORT_TRACKING_PENALTY - 1.0) * time / threshold
}

impl NoiseModel {
    /// GPS coefficients
    pub const GPS: Self = Self {
        code_coef: 25000.0,
        doppler_coef: 10000.0,
        carrier_coef: 0.9,
        code_floor: 2.25,
    };

    /// GLONASS coefficients
    pub const GLONASS: Self = Self {
        code_coef: 100000.0,
        doppler_coef: 40000.0,
        carrier_coef: 3.0,
        code_floor: 25.0,
    };

    /// BeiDou coefficients
    pub const BDS2: Self = Self {
        code_coef: 25000.0,
        doppler_coef: 10000.0,
        carrier_coef: 0.9,
        code_floor: 2.25,
    };

    /// Returns the [NoiseModel] applying to this signal [Code].
    pub fn for_code(code: Code) -> Result<Self, Error> {
        match code.constellation() {
            Constellation::GPS => Ok(Self::GPS),
            Constellation::Glonass => Ok(Self::GLONASS),
            Constellation::BeiDou => Ok(Self::BDS2),
            _ => Err(Error::UnsupportedSignal(code)),
        }
    }

    /// Evaluates the [NoiseVariances] of this [Measurement].
    pub fn variances(measurement: &Measurement) -> Result<NoiseVariances, Error> {
        let model = Self::for_code(measurement.code())?;

        let cn0_term = 10.0_f64.powf(-measurement.cn0 / 10.0);

        let sin_el = measurement.elevation_deg.to_radians().sin();
        let el_term = ELEVATION_NOISE_COEF / sin_el.max(MIN_SIN_ELEVATION);

        let mut pseudorange =
            (model.code_coef * cn0_term).max(model.code_floor + el_term * el_term);
        let mut measured_doppler = model.doppler_coef * cn0_term;
        let mut carrier_phase = model.carrier_coef * cn0_term;

        if !measurement.has(MeasurementFlags::PHASE_VALID) {
            pseudorange *= NO_PLL_PENALTY;
            measured_doppler *= NO_PLL_PENALTY;
            carrier_phase = 0.0;
        }

        if measurement.time_in_track < TRACK_TIME_THRESHOLD_S {
            let penalty = short_tracking_penalty(measurement.time_in_track, TRACK_TIME_THRESHOLD_S);
            pseudorange *= penalty;
            measured_doppler *= penalty;
        }

        if measurement.lock_time < LOCK_TIME_THRESHOLD_S {
            carrier_phase *= short_tracking_penalty(measurement.lock_time, LOCK_TIME_THRESHOLD_S);
        }

        if !measurement.has(MeasurementFlags::HALF_CYCLE_KNOWN) {
            carrier_phase *= NO_HALF_CYCLE_PENALTY;
        }

        let computed_doppler = if measurement.has(MeasurementFlags::COMP_DOPPLER_VALID) {
            let dt = measurement.computed_doppler_dt;
            if dt <= 0.0 {
                return Err(Error::InvalidComputedDoppler(measurement.sid));
            }
            2.0 * carrier_phase / (dt * dt) + dt * dt * NOMINAL_CLOCK_VARIANCE
        } else {
            0.0
        };

        Ok(NoiseVariances {
            pseudorange,
            carrier_phase,
            measured_doppler,
            computed_doppler,
        })
    }
}
