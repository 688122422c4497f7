use nalgebra::{Vector3, Vector4};

use crate::constants::SPEED_OF_LIGHT_M_S;

/// Receiver [ReceiverState]: position, clock bias,
/// velocity and clock drift, clock terms expressed in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiverState {
    /// Position (ECEF m)
    pub pos: Vector3<f64>,
    /// Clock bias (m)
    pub clock_bias_m: f64,
    /// Velocity (ECEF m.s⁻¹)
    pub vel: Vector3<f64>,
    /// Clock drift (m.s⁻¹)
    pub clock_drift_m_s: f64,
}

impl Default for ReceiverState {
    fn default() -> Self {
        Self {
            pos: Vector3::zeros(),
            clock_bias_m: 0.0,
            vel: Vector3::zeros(),
            clock_drift_m_s: 0.0,
        }
    }
}

impl std::fmt::Display for ReceiverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "x={:.3} y={:.3} z={:.3} dt={:.11E}s drift={:.11E}s/s",
            self.pos[0],
            self.pos[1],
            self.pos[2],
            self.clock_offset_s(),
            self.clock_drift_s_s(),
        )
    }
}

impl ReceiverState {
    /// Builds a [ReceiverState] at rest from a position (ECEF m) and clock bias (m).
    pub fn from_position(pos: Vector3<f64>, clock_bias_m: f64) -> Self {
        Self {
            pos,
            clock_bias_m,
            ..Default::default()
        }
    }

    /// Applies the (position, clock bias) correction
    pub(crate) fn update(&mut self, dx: &Vector4<f64>) {
        self.pos[0] += dx[0];
        self.pos[1] += dx[1];
        self.pos[2] += dx[2];
        self.clock_bias_m += dx[3];
    }

    /// Overwrites velocity and clock drift
    pub(crate) fn set_velocity(&mut self, x: &Vector4<f64>) {
        self.vel = Vector3::new(x[0], x[1], x[2]);
        self.clock_drift_m_s = x[3];
    }

    /// Resets velocity and clock drift
    pub(crate) fn clear_velocity(&mut self) {
        self.vel = Vector3::zeros();
        self.clock_drift_m_s = 0.0;
    }

    /// True while the position was never estimated
    pub(crate) fn is_null_position(&self) -> bool {
        self.pos[0] == 0.0 && self.pos[1] == 0.0 && self.pos[2] == 0.0
    }

    /// Clock offset (s)
    pub fn clock_offset_s(&self) -> f64 {
        self.clock_bias_m / SPEED_OF_LIGHT_M_S
    }

    /// Clock drift (s.s⁻¹)
    pub fn clock_drift_s_s(&self) -> f64 {
        self.clock_drift_m_s / SPEED_OF_LIGHT_M_S
    }
}
