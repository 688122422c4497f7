//! PVT Solution
use crate::{
    navigation::DilutionOfPrecision,
    prelude::{Epoch, SignalId},
};

#[cfg(feature = "serde")]
use serde::Serialize;

mod validator;

pub use validator::InvalidationCause;
pub(crate) use validator::Validator;

/// [PVTStatus] of one resolution attempt.
/// Non negative codes describe a valid solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PVTStatus {
    /// Converged and verified by RAIM
    ConvergedRaimOk,
    /// Converged after RAIM repair, using fewer measurements
    Repaired,
    /// Converged, RAIM unavailable or disabled
    ConvergedNoRaim,
    /// GDOP too high to yield a good solution
    GdopTooHigh,
    /// Unreasonable altitude
    BadAltitude,
    /// Velocity limit exceeded
    VelocityLimit,
    /// RAIM check failed and repair was unsuccessful
    RepairFailed,
    /// RAIM check failed and repair was impossible
    RepairImpossible,
    /// Solver did not converge
    Unconverged,
    /// Fewer than 4 satellites
    InsufficientMeasurements,
}

impl PVTStatus {
    /// Numerical status code
    pub fn code(&self) -> i8 {
        match self {
            Self::ConvergedRaimOk => 0,
            Self::Repaired => 1,
            Self::ConvergedNoRaim => 2,
            Self::GdopTooHigh => -1,
            Self::BadAltitude => -2,
            Self::VelocityLimit => -3,
            Self::RepairFailed => -4,
            Self::RepairImpossible => -5,
            Self::Unconverged => -6,
            Self::InsufficientMeasurements => -7,
        }
    }

    /// True when this status describes a valid solution
    pub fn is_valid(&self) -> bool {
        self.code() >= 0
    }
}

impl std::fmt::Display for PVTStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ConvergedRaimOk => write!(f, "Converged, RAIM ok"),
            Self::Repaired => write!(f, "Converged, RAIM repaired"),
            Self::ConvergedNoRaim => write!(f, "Converged, no RAIM"),
            Self::GdopTooHigh => write!(f, "PDOP too high"),
            Self::BadAltitude => write!(f, "Altitude unreasonable"),
            Self::VelocityLimit => write!(f, "Velocity >= 1000 kts"),
            Self::RepairFailed => write!(f, "RAIM repair attempted, failed"),
            Self::RepairImpossible => {
                write!(f, "RAIM repair impossible (not enough measurements)")
            },
            Self::Unconverged => write!(f, "Took too long to converge"),
            Self::InsufficientMeasurements => {
                write!(f, "Not enough measurements for solution (< 4)")
            },
        }
    }
}

/// [PVTSolution] of one epoch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PVTSolution {
    /// Position in meters ECEF.
    pub pos_ecef_m: (f64, f64, f64),
    /// Latitude, longitude (radians) and height above ellipsoid (meters).
    pub pos_llh_rad_rad_m: (f64, f64, f64),
    /// Velocity in m.s⁻¹ ECEF
    pub vel_ecef_m_s: (f64, f64, f64),
    /// Velocity in m.s⁻¹, local North East Down frame
    pub vel_ned_m_s: (f64, f64, f64),
    /// Receiver clock offset (s)
    pub clock_offset_s: f64,
    /// Receiver clock drift (s.s⁻¹)
    pub clock_drift_s_s: f64,
    /// Clock offset variance (s²)
    pub clock_offset_var: f64,
    /// Clock drift variance (s².s⁻²)
    pub clock_drift_var: f64,
    /// Position covariance upper triangle (xx, xy, xz, yy, yz, zz), then GDOP
    pub err_cov: [f64; 7],
    /// Velocity covariance upper triangle (xx, xy, xz, yy, yz, zz), then GDOP
    pub vel_cov: [f64; 7],
    /// Number of satellites used
    pub n_sats_used: usize,
    /// Number of signals used
    pub n_sigs_used: usize,
    /// Position is valid
    pub valid: bool,
    /// Velocity was estimated
    pub velocity_valid: bool,
    /// Time of fix, at the receiver
    pub time: Epoch,
}

impl PVTSolution {
    /// Horizontal speed (m.s⁻¹)
    pub fn ground_speed_m_s(&self) -> f64 {
        let (vn, ve, _) = self.vel_ned_m_s;
        (vn * vn + ve * ve).sqrt()
    }

    /// 3D speed (m.s⁻¹)
    pub fn speed_m_s(&self) -> f64 {
        let (vx, vy, vz) = self.vel_ecef_m_s;
        (vx * vx + vy * vy + vz * vz).sqrt()
    }
}

/// [PVTOutput] of a successful resolution attempt.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PVTOutput {
    /// [PVTStatus], always valid
    pub status: PVTStatus,
    /// [PVTSolution]
    pub solution: PVTSolution,
    /// [DilutionOfPrecision]
    pub dops: DilutionOfPrecision,
    /// Signals excluded by RAIM, only populated when the solution was repaired
    pub excluded: Vec<SignalId>,
}
