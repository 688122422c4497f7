use thiserror::Error;

use crate::{
    navigation::{InvalidationCause, PVTStatus},
    prelude::{Code, SignalId},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// [Ephemeris] used outside of its validity: not flagged valid,
    /// unset reference week, zero fit interval or evaluated outside
    /// of the fit interval.
    #[error("{0}: invalid ephemeris")]
    EphemerisInvalid(SignalId),

    /// This operation does not apply to this signal [Code]
    /// (for example a group delay requested for another constellation).
    #[error("unsupported signal: {0}")]
    UnsupportedSignal(Code),

    /// The computed doppler was flagged valid, but it was formed
    /// over a null or negative time span.
    #[error("{0}: computed doppler over invalid time span")]
    InvalidComputedDoppler(SignalId),

    /// Failed to parse processing strategy
    #[error("non supported/invalid strategy")]
    InvalidStrategy,

    /// SBAS [Ephemeris] do not carry an issue of data.
    #[error("no issue of data for this ephemeris")]
    NoIssueOfData,

    /// Geometry matrix could not be inverted.
    #[error("under determined (singular geometry)")]
    UnderDetermined,

    /// Iterative solver did not converge in the maximal number of iterations.
    #[error("took too long to converge")]
    Timeout,

    /// Fewer than 4 distinct satellites were proposed.
    #[error("not enough measurements for solution (< 4)")]
    InsufficientMeasurements,

    /// The epoch contains more measurements than a receiver tracks.
    #[error("too many measurements ({0})")]
    TooManyMeasurements(usize),

    /// RAIM detected a fault, but there are not enough measurements left to isolate it.
    #[error("RAIM repair impossible (not enough measurements)")]
    RepairImpossible,

    /// RAIM detected a fault and no exclusion could restore a consistent solution.
    #[error("RAIM repair attempted, failed")]
    RepairFailed,

    /// Solution was formed, but rejected by the sanity filter.
    #[error("rejected solution: {0}")]
    SolutionRejected(InvalidationCause),
}

impl Error {
    /// Returns the [PVTStatus] this [Error] corresponds to,
    /// when it terminates a [Solver] attempt.
    pub fn pvt_status(&self) -> Option<PVTStatus> {
        match self {
            Self::Timeout | Self::UnderDetermined => Some(PVTStatus::Unconverged),
            Self::InsufficientMeasurements => Some(PVTStatus::InsufficientMeasurements),
            Self::RepairImpossible => Some(PVTStatus::RepairImpossible),
            Self::RepairFailed => Some(PVTStatus::RepairFailed),
            Self::SolutionRejected(cause) => Some(cause.pvt_status()),
            _ => None,
        }
    }
}
