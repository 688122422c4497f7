use crate::{
    constants::{
        BDS2_B1I_HZ, BDS2_B2_HZ, GLO_L1_DELTA_HZ, GLO_L1_HZ, GLO_L2_DELTA_HZ, GLO_L2_HZ,
        GPS_L1_HZ, GPS_L2_HZ, SPEED_OF_LIGHT_M_S,
    },
    prelude::{Constellation, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ranging [Code] of one tracked signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Code {
    /// GPS L1 C/A
    #[default]
    GpsL1CA,
    /// GPS L1 P(Y)
    GpsL1P,
    /// GPS L2C medium length code
    GpsL2CM,
    /// GPS L2C long code
    GpsL2CL,
    /// GPS L2 P(Y)
    GpsL2P,
    /// SBAS L1 C/A
    SbasL1CA,
    /// GLONASS L1 open service (FDMA)
    GloL1OF,
    /// GLONASS L2 open service (FDMA)
    GloL2OF,
    /// BeiDou (phase 2) B1I
    Bds2B1I,
    /// BeiDou (phase 2) B2
    Bds2B2,
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::GpsL1CA => write!(f, "GPS L1CA"),
            Self::GpsL1P => write!(f, "GPS L1P"),
            Self::GpsL2CM => write!(f, "GPS L2CM"),
            Self::GpsL2CL => write!(f, "GPS L2CL"),
            Self::GpsL2P => write!(f, "GPS L2P"),
            Self::SbasL1CA => write!(f, "SBAS L1"),
            Self::GloL1OF => write!(f, "GLO L1OF"),
            Self::GloL2OF => write!(f, "GLO L2OF"),
            Self::Bds2B1I => write!(f, "BDS2 B1I"),
            Self::Bds2B2 => write!(f, "BDS2 B2"),
        }
    }
}

impl Code {
    /// [Constellation] this [Code] belongs to.
    pub fn constellation(&self) -> Constellation {
        match self {
            Self::GpsL1CA | Self::GpsL1P | Self::GpsL2CM | Self::GpsL2CL | Self::GpsL2P => {
                Constellation::GPS
            },
            Self::SbasL1CA => Constellation::SBAS,
            Self::GloL1OF | Self::GloL2OF => Constellation::Glonass,
            Self::Bds2B1I | Self::Bds2B2 => Constellation::BeiDou,
        }
    }

    /// True for GPS codes.
    pub fn is_gps(&self) -> bool {
        self.constellation() == Constellation::GPS
    }

    /// Carrier frequency in Hz. The frequency channel number `fcn`
    /// is only meaningful for GLONASS FDMA codes.
    pub fn carrier_frequency(&self, fcn: i8) -> f64 {
        match self {
            Self::GpsL1CA | Self::GpsL1P | Self::SbasL1CA => GPS_L1_HZ,
            Self::GpsL2CM | Self::GpsL2CL | Self::GpsL2P => GPS_L2_HZ,
            Self::GloL1OF => GLO_L1_HZ + fcn as f64 * GLO_L1_DELTA_HZ,
            Self::GloL2OF => GLO_L2_HZ + fcn as f64 * GLO_L2_DELTA_HZ,
            Self::Bds2B1I => BDS2_B1I_HZ,
            Self::Bds2B2 => BDS2_B2_HZ,
        }
    }

    /// Carrier wavelength in meters.
    pub fn wavelength(&self, fcn: i8) -> f64 {
        SPEED_OF_LIGHT_M_S / self.carrier_frequency(fcn)
    }
}

/// [SignalId] uniquely identifies one tracked signal:
/// a satellite and the [Code] it is tracked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignalId {
    /// [SV] broadcasting this signal
    pub sv: SV,
    /// [Code] being tracked
    pub code: Code,
}

impl SignalId {
    /// Builds a new [SignalId]
    pub fn new(sv: SV, code: Code) -> Self {
        Self { sv, code }
    }

    /// Builds a new [SignalId] from the PRN (or slot) number,
    /// the [Constellation] being deduced from the [Code].
    pub fn from_prn(prn: u8, code: Code) -> Self {
        Self {
            sv: SV::new(code.constellation(), prn),
            code,
        }
    }
}

impl std::fmt::Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{}({})", self.sv, self.code)
    }
}
