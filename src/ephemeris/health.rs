use crate::{
    ephemeris::{encode_ura, Ephemeris, MAX_ALLOWED_GPS_URA_IDX},
    prelude::{Code, Constellation},
};

/// NAV data health summary bit, within the 6 bit GPS health word
pub const GPS_NAV_DATA_SUMMARY_BIT: u8 = 0x20;

/// Mask of the 5 bit signal component code, within the 6 bit GPS health word
const GPS_SIGNAL_HEALTH_MASK: u8 = 0x1f;

/// GPS signal component health, as encoded in the
/// 5 LSB of the 6 bit health word (IS-GPS-200 20.3.3.5.1.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsSignalHealth {
    AllSignalsOk,
    AllSignalsWeak,
    AllSignalsDead,
    AllSignalsNoData,
    L1PWeak,
    L1PDead,
    L1PNoData,
    L2PWeak,
    L2PDead,
    L2PNoData,
    L1CWeak,
    L1CDead,
    L1CNoData,
    L2CWeak,
    L2CDead,
    L2CNoData,
    L1L2PWeak,
    L1L2PDead,
    L1L2PNoData,
    L1L2CWeak,
    L1L2CDead,
    L1L2CNoData,
    L1Weak,
    L1Dead,
    L1NoData,
    L2Weak,
    L2Dead,
    L2NoData,
    SvTemporarilyOut,
    SvWillBeTemporarilyOut,
    OnlyUraValid,
    MultipleProblems,
}

impl From<u8> for GpsSignalHealth {
    fn from(health_bits: u8) -> Self {
        match health_bits & GPS_SIGNAL_HEALTH_MASK {
            0 => Self::AllSignalsOk,
            1 => Self::AllSignalsWeak,
            2 => Self::AllSignalsDead,
            3 => Self::AllSignalsNoData,
            4 => Self::L1PWeak,
            5 => Self::L1PDead,
            6 => Self::L1PNoData,
            7 => Self::L2PWeak,
            8 => Self::L2PDead,
            9 => Self::L2PNoData,
            10 => Self::L1CWeak,
            11 => Self::L1CDead,
            12 => Self::L1CNoData,
            13 => Self::L2CWeak,
            14 => Self::L2CDead,
            15 => Self::L2CNoData,
            16 => Self::L1L2PWeak,
            17 => Self::L1L2PDead,
            18 => Self::L1L2PNoData,
            19 => Self::L1L2CWeak,
            20 => Self::L1L2CDead,
            21 => Self::L1L2CNoData,
            22 => Self::L1Weak,
            23 => Self::L1Dead,
            24 => Self::L1NoData,
            25 => Self::L2Weak,
            26 => Self::L2Dead,
            27 => Self::L2NoData,
            28 => Self::SvTemporarilyOut,
            29 => Self::SvWillBeTemporarilyOut,
            30 => Self::OnlyUraValid,
            _ => Self::MultipleProblems,
        }
    }
}

impl GpsSignalHealth {
    /// True when every signal of this satellite is affected.
    fn affects_all_signals(&self) -> bool {
        matches!(
            self,
            Self::AllSignalsWeak
                | Self::AllSignalsDead
                | Self::AllSignalsNoData
                | Self::SvTemporarilyOut
                | Self::SvWillBeTemporarilyOut
                | Self::OnlyUraValid
                | Self::MultipleProblems
        )
    }

    /// True when this state affects the given signal [Code].
    /// Codes not described by the health word are always affected.
    fn affects(&self, code: Code) -> bool {
        match code {
            Code::GpsL1CA => matches!(
                self,
                Self::L1CWeak
                    | Self::L1CDead
                    | Self::L1CNoData
                    | Self::L1L2CWeak
                    | Self::L1L2CDead
                    | Self::L1L2CNoData
                    | Self::L1Weak
                    | Self::L1Dead
                    | Self::L1NoData
            ),
            Code::GpsL2CM => matches!(
                self,
                Self::L2CWeak
                    | Self::L2CDead
                    | Self::L2CNoData
                    | Self::L1L2CWeak
                    | Self::L1L2CDead
                    | Self::L1L2CNoData
                    | Self::L2Weak
                    | Self::L2Dead
                    | Self::L2NoData
            ),
            Code::GpsL1P => matches!(
                self,
                Self::L1PWeak
                    | Self::L1PDead
                    | Self::L1PNoData
                    | Self::L1L2PWeak
                    | Self::L1L2PDead
                    | Self::L1L2PNoData
                    | Self::L1Weak
                    | Self::L1Dead
                    | Self::L1NoData
            ),
            Code::GpsL2P => matches!(
                self,
                Self::L2PWeak
                    | Self::L2PDead
                    | Self::L2PNoData
                    | Self::L1L2PWeak
                    | Self::L1L2PDead
                    | Self::L1L2PNoData
                    | Self::L2Weak
                    | Self::L2Dead
                    | Self::L2NoData
            ),
            _ => true,
        }
    }
}

/// Decodes the GPS 6 bit health word for this signal [Code].
pub(crate) fn check_6bit_health_word(health_bits: u8, code: Code) -> bool {
    if health_bits & GPS_NAV_DATA_SUMMARY_BIT != 0
        && matches!(code, Code::GpsL1CA | Code::GpsL1P)
    {
        return false;
    }

    let signal = GpsSignalHealth::from(health_bits);
    if signal.affects_all_signals() {
        return false;
    }

    !signal.affects(code)
}

impl Ephemeris {
    /// Returns true if the satellite is declared healthy for this signal [Code].
    /// The [Code] may differ from this [Ephemeris] own signal: GPS L2CM is
    /// for example tracked using the L1CA ephemeris.
    /// An [Ephemeris] not (yet) flagged valid is considered healthy.
    pub fn is_healthy(&self, code: Code) -> bool {
        if !self.valid {
            return true;
        }
        match code.constellation() {
            Constellation::GPS => {
                if encode_ura(self.ura) > MAX_ALLOWED_GPS_URA_IDX {
                    return false;
                }
                check_6bit_health_word(self.health_bits, code)
            },
            _ => self.health_bits == 0,
        }
    }
}
