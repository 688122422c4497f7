/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD: f64 = 7.2921151467E-5;

/// Earth gravitational constant as broadcast in GPS (m^3 s-2)
pub const GPS_GRAVITATION_MU_M3_S2: f64 = 3.986005E14;

/// Earth gravitational constant, PZ-90 frame (m^3 s-2)
pub const GLONASS_GRAVITATION_MU_M3_S2: f64 = 398600.4418E9;

/// Second zonal harmonic of the geopotential, PZ-90 frame
pub const GLONASS_J02: f64 = 1082625.75E-9;

/// Earth equatorial radius, PZ-90 frame (meters)
pub const GLONASS_EARTH_EQUATORIAL_RADIUS_M: f64 = 6378136.0;

/// Earth angular velocity, PZ-90 frame rad/s
pub const GLONASS_EARTH_ANGULAR_VEL_RAD: f64 = 7.292115E-5;

/// Maximal GLONASS orbit integration step (seconds)
pub const GLONASS_MAX_STEP_S: f64 = 30.0;

/// Maximal number of GLONASS orbit integration steps
pub const GLONASS_MAX_STEPS: usize = 30;

/// GPS L1 carrier frequency (Hz)
pub const GPS_L1_HZ: f64 = 1575.42E6;

/// GPS L2 carrier frequency (Hz)
pub const GPS_L2_HZ: f64 = 1227.60E6;

/// BeiDou B1I carrier frequency (Hz)
pub const BDS2_B1I_HZ: f64 = 1561.098E6;

/// BeiDou B2 carrier frequency (Hz)
pub const BDS2_B2_HZ: f64 = 1207.14E6;

/// GLONASS L1 FDMA center frequency (Hz)
pub const GLO_L1_HZ: f64 = 1602.0E6;

/// GLONASS L1 FDMA channel spacing (Hz)
pub const GLO_L1_DELTA_HZ: f64 = 0.5625E6;

/// GLONASS L2 FDMA center frequency (Hz)
pub const GLO_L2_HZ: f64 = 1246.0E6;

/// GLONASS L2 FDMA channel spacing (Hz)
pub const GLO_L2_DELTA_HZ: f64 = 0.4375E6;

/// Maximal number of measurements a single epoch may contain
pub const MAX_CHANNELS: usize = 63;

/// Minimal number of distinct satellites required to solve
pub const MIN_SATS: usize = 4;

/// Dimension of the receiver state (position, clock bias)
pub const STATE_DIM: usize = 4;

/// Velocity limit (1000 knots) above which solutions are rejected, in m.s⁻¹
pub const MAX_VELOCITY_M_S: f64 = 0.514444444 * 1000.0;

/// Nominal receiver clock (frequency) variance
pub const NOMINAL_CLOCK_VARIANCE: f64 = 0.002;
