use crate::prelude::{Code, Error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Selects which measurements contribute to the solution.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProcessingStrategy {
    /// Every usable measurement contributes.
    #[default]
    AllConstellations,

    /// Only GPS signals contribute.
    GpsOnly,

    /// Only GPS L1 C/A signals contribute, as long as enough of them
    /// are tracked to allow fault detection and exclusion.
    /// Otherwise, every usable measurement contributes.
    GpsL1caWhenPossible,
}

impl ProcessingStrategy {
    /// True if signals of this [Code] contribute under this strategy.
    pub(crate) fn accepts(&self, code: Code) -> bool {
        match self {
            Self::AllConstellations => true,
            Self::GpsOnly => code.is_gps(),
            Self::GpsL1caWhenPossible => code == Code::GpsL1CA,
        }
    }
}

impl std::fmt::Display for ProcessingStrategy {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::AllConstellations => write!(fmt, "all-constellations"),
            Self::GpsOnly => write!(fmt, "gps-only"),
            Self::GpsL1caWhenPossible => write!(fmt, "gps-l1ca-when-possible"),
        }
    }
}

impl std::str::FromStr for ProcessingStrategy {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "all-constellations" => Ok(Self::AllConstellations),
            "gps" | "gps-only" => Ok(Self::GpsOnly),
            "gps-l1ca" | "gps-l1ca-when-possible" => Ok(Self::GpsL1caWhenPossible),
            _ => Err(Error::InvalidStrategy),
        }
    }
}
