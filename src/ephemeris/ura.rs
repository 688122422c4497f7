/// GPS URA values (m), indexed by the broadcast URA index
const GPS_URA_VALUES: [f64; 16] = [
    2.0, 2.8, 4.0, 5.7, 8.0, 11.3, 16.0, 32.0, 64.0, 128.0, 256.0, 512.0, 1024.0, 2048.0,
    4096.0, 6144.0,
];

/// URA value returned for an invalid index
pub const INVALID_GPS_URA_VALUE: f64 = -1.0;

/// URA index returned for an invalid (negative or too large) URA
pub const INVALID_GPS_URA_INDEX: u8 = 0xff;

/// Largest URA index a GPS satellite may broadcast and still be used
pub const MAX_ALLOWED_GPS_URA_IDX: u8 = 8;

/// Converts a GPS URA index into a URA value (m).
/// Returns [INVALID_GPS_URA_VALUE] for indices out of the table.
pub fn decode_ura_index(index: u8) -> f64 {
    GPS_URA_VALUES
        .get(index as usize)
        .copied()
        .unwrap_or(INVALID_GPS_URA_VALUE)
}

/// Converts a URA value (m) into the smallest URA index covering it.
/// Returns [INVALID_GPS_URA_INDEX] for negative values or values beyond the table.
pub fn encode_ura(ura: f64) -> u8 {
    if ura < 0.0 {
        return INVALID_GPS_URA_INDEX;
    }
    GPS_URA_VALUES
        .iter()
        .position(|value| *value >= ura)
        .map(|index| index as u8)
        .unwrap_or(INVALID_GPS_URA_INDEX)
}

/// Decodes the GPS fit interval (s) from the fit interval flag and the IODC.
pub fn decode_fit_interval(fit_interval_flag: bool, iodc: u16) -> u32 {
    let hours = if !fit_interval_flag {
        4
    } else {
        match iodc {
            240..=247 => 8,
            248..=255 | 496 => 14,
            497..=503 | 1021..=1023 => 26,
            504..=510 => 50,
            511 | 752..=756 => 74,
            757 => 98,
            _ => 6,
        }
    };
    hours * 3600
}
