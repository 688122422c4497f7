use crate::{
    constants::{
        GLONASS_EARTH_ANGULAR_VEL_RAD, GLONASS_EARTH_EQUATORIAL_RADIUS_M,
        GLONASS_GRAVITATION_MU_M3_S2, GLONASS_J02, GLONASS_MAX_STEPS, GLONASS_MAX_STEP_S,
    },
    ephemeris::{group_delay, SatelliteState},
    prelude::{Code, Error, Vector3},
};

/// GLONASS orbit and clock terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlonassTerms {
    /// Position at reference time (ECEF m)
    pub pos: Vector3<f64>,
    /// Velocity at reference time (ECEF m.s⁻¹)
    pub vel: Vector3<f64>,
    /// Luni-solar acceleration (m.s⁻²)
    pub acc: Vector3<f64>,
    /// Clock bias (s)
    pub tau: f64,
    /// Relative frequency offset
    pub gamma: f64,
    /// L1/L2 inter frequency bias (s)
    pub d_tau: f64,
    /// Issue of data
    pub iod: u8,
    /// Frequency channel number
    pub fcn: i8,
}

impl GlonassTerms {
    /// ECEF acceleration (m.s⁻²) at this position and velocity:
    /// central gravity, J2 zonal term, centrifugal and Coriolis terms,
    /// plus the broadcast luni-solar acceleration.
    pub(crate) fn acceleration(&self, pos: &Vector3<f64>, vel: &Vector3<f64>) -> Vector3<f64> {
        let omega = GLONASS_EARTH_ANGULAR_VEL_RAD;
        let r = pos.norm();
        let r2 = r * r;
        let mu_r3 = GLONASS_GRAVITATION_MU_M3_S2 / (r2 * r);
        let g = 1.5
            * GLONASS_J02
            * GLONASS_GRAVITATION_MU_M3_S2
            * GLONASS_EARTH_EQUATORIAL_RADIUS_M.powi(2)
            / r.powi(5);
        let z2_r2 = pos[2] * pos[2] / r2;

        Vector3::new(
            -mu_r3 * pos[0] - g * pos[0] * (1.0 - 5.0 * z2_r2)
                + omega * omega * pos[0]
                + 2.0 * omega * vel[1]
                + self.acc[0],
            -mu_r3 * pos[1] - g * pos[1] * (1.0 - 5.0 * z2_r2) + omega * omega * pos[1]
                - 2.0 * omega * vel[0]
                + self.acc[1],
            -mu_r3 * pos[2] - g * pos[2] * (3.0 - 5.0 * z2_r2) + self.acc[2],
        )
    }

    /// Number of integration steps for a propagation over `dt` seconds.
    pub(crate) fn num_steps(dt: f64) -> usize {
        ((dt.abs() / GLONASS_MAX_STEP_S).ceil() as usize).min(GLONASS_MAX_STEPS)
    }

    /// Propagates the reference state over `dt` seconds, in `steps` RK4 steps.
    pub(crate) fn integrate(&self, dt: f64, steps: usize) -> (Vector3<f64>, Vector3<f64>) {
        if steps == 0 || dt == 0.0 {
            return (self.pos, self.vel);
        }

        let h = dt / steps as f64;
        let (mut pos, mut vel) = (self.pos, self.vel);

        for _ in 0..steps {
            let k1_p = vel;
            let k1_v = self.acceleration(&pos, &vel);

            let k2_p = vel + k1_v * (h / 2.0);
            let k2_v = self.acceleration(&(pos + k1_p * (h / 2.0)), &k2_p);

            let k3_p = vel + k2_v * (h / 2.0);
            let k3_v = self.acceleration(&(pos + k2_p * (h / 2.0)), &k3_p);

            let k4_p = vel + k3_v * h;
            let k4_v = self.acceleration(&(pos + k3_p * h), &k4_p);

            pos += (k1_p + k2_p * 2.0 + k3_p * 2.0 + k4_p) * (h / 6.0);
            vel += (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * (h / 6.0);
        }

        (pos, vel)
    }

    pub(crate) fn state(&self, code: Code, dt: f64) -> Result<SatelliteState, Error> {
        let (pos, vel) = self.integrate(dt, Self::num_steps(dt));
        let acc = self.acceleration(&pos, &vel);

        let tgd = group_delay(code, self.fcn, self.d_tau)?;

        Ok(SatelliteState {
            pos,
            vel,
            acc,
            clock_err: -self.tau + self.gamma * dt - tgd,
            clock_rate_err: self.gamma,
            iodc: self.iod as u16,
            iode: self.iod,
        })
    }
}
