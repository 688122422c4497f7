use log::debug;
use thiserror::Error;

use crate::{
    constants::MAX_VELOCITY_M_S,
    navigation::{DilutionOfPrecision, PVTSolution, PVTStatus},
    prelude::Config,
};

#[derive(Clone, Debug, PartialEq, Error)]
/// Reason why this solution has been invalidated
pub enum InvalidationCause {
    #[error("gdop {0}: limit exceeded")]
    GDOPOutlier(f64),
    #[error("altitude {0} m: unreasonable")]
    AltitudeOutlier(f64),
    #[error("velocity {0} m/s: limit exceeded")]
    VelocityOutlier(f64),
}

impl InvalidationCause {
    /// [PVTStatus] of a solution invalidated for this reason
    pub fn pvt_status(&self) -> PVTStatus {
        match self {
            Self::GDOPOutlier(_) => PVTStatus::GdopTooHigh,
            Self::AltitudeOutlier(_) => PVTStatus::BadAltitude,
            Self::VelocityOutlier(_) => PVTStatus::VelocityLimit,
        }
    }
}

pub(crate) struct Validator {
    gdop: f64,
    altitude_m: f64,
    speed_m_s: f64,
}

impl Validator {
    pub fn new(solution: &PVTSolution, dops: &DilutionOfPrecision) -> Self {
        let validator = Self {
            gdop: dops.gdop,
            altitude_m: solution.pos_llh_rad_rad_m.2,
            speed_m_s: solution.speed_m_s(),
        };
        debug!(
            "gdop={:.3} alt={:.3}m speed={:.3}m/s",
            validator.gdop, validator.altitude_m, validator.speed_m_s
        );
        validator
    }

    /*
     * Solution validation process
     */
    pub fn validate(&self, cfg: &Config) -> Result<(), InvalidationCause> {
        if self.gdop > cfg.max_gdop {
            return Err(InvalidationCause::GDOPOutlier(self.gdop));
        }
        if self.altitude_m < cfg.min_altitude_m || self.altitude_m > cfg.max_altitude_m {
            return Err(InvalidationCause::AltitudeOutlier(self.altitude_m));
        }
        if self.speed_m_s >= MAX_VELOCITY_M_S {
            return Err(InvalidationCause::VelocityOutlier(self.speed_m_s));
        }
        Ok(())
    }
}
