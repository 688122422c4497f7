use log::debug;
use nalgebra::{Matrix3, Rotation3};

use crate::{
    constants::{EARTH_ANGULAR_VEL_RAD, GPS_GRAVITATION_MU_M3_S2, SPEED_OF_LIGHT_M_S},
    ephemeris::{gpst_week_tow, group_delay, SatelliteState},
    prelude::{Code, Epoch, Error, Vector3},
};

/// Maximal number of eccentric anomaly iterations
const MAX_KEPLER_ITER: usize = 5;

/// Eccentric anomaly convergence criterion (rad)
const KEPLER_CONVERGENCE_RAD: f64 = 1.0E-14;

/// Keplerian orbit and clock terms (GPS, BeiDou)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerTerms {
    /// Square root of the semi major axis (m^1/2)
    pub sqrta: f64,
    /// Eccentricity
    pub ecc: f64,
    /// Mean anomaly at reference time (rad)
    pub m0: f64,
    /// Mean motion difference (rad/s)
    pub dn: f64,
    /// Argument of perigee (rad)
    pub w: f64,
    /// Inclination at reference time (rad)
    pub inc: f64,
    /// Inclination rate (rad/s)
    pub inc_dot: f64,
    /// Longitude of ascending node at weekly epoch (rad)
    pub omega0: f64,
    /// Rate of right ascension (rad/s)
    pub omegadot: f64,
    /// Orbit radius sine harmonic correction (m)
    pub crs: f64,
    /// Orbit radius cosine harmonic correction (m)
    pub crc: f64,
    /// Argument of latitude cosine harmonic correction (rad)
    pub cuc: f64,
    /// Argument of latitude sine harmonic correction (rad)
    pub cus: f64,
    /// Inclination cosine harmonic correction (rad)
    pub cic: f64,
    /// Inclination sine harmonic correction (rad)
    pub cis: f64,
    /// Clock bias (s)
    pub af0: f64,
    /// Clock drift (s.s⁻¹)
    pub af1: f64,
    /// Clock drift rate (s.s⁻²)
    pub af2: f64,
    /// Clock reference time
    pub toc: Epoch,
    /// Group delay (s)
    pub tgd: f64,
    /// Issue of data, clock
    pub iodc: u16,
    /// Issue of data, ephemeris
    pub iode: u8,
}

/// Second harmonic correction and its first two time derivatives,
/// for an argument `phi` of rates `phi_dot` and `phi_ddot`.
fn harmonic(c_sin: f64, c_cos: f64, phi: f64, phi_dot: f64, phi_ddot: f64) -> (f64, f64, f64) {
    let (sin_2phi, cos_2phi) = (2.0 * phi).sin_cos();
    let value = c_sin * sin_2phi + c_cos * cos_2phi;
    let slope = c_sin * cos_2phi - c_cos * sin_2phi;
    (
        value,
        2.0 * phi_dot * slope,
        2.0 * phi_ddot * slope - 4.0 * phi_dot * phi_dot * value,
    )
}

impl KeplerTerms {
    /// Semi major axis (m)
    pub fn semi_major_axis(&self) -> f64 {
        self.sqrta * self.sqrta
    }

    /// Solves Kepler's equation for the eccentric anomaly (rad).
    pub(crate) fn eccentric_anomaly(&self, mean_anomaly: f64) -> f64 {
        let e = self.ecc;
        let mut ecc_anomaly = mean_anomaly;
        for _ in 0..MAX_KEPLER_ITER {
            let (sin_e, cos_e) = ecc_anomaly.sin_cos();
            let delta = (mean_anomaly - ecc_anomaly + e * sin_e) / (1.0 - e * cos_e);
            ecc_anomaly += delta;
            if delta.abs() <= KEPLER_CONVERGENCE_RAD {
                break;
            }
        }
        ecc_anomaly
    }

    pub(crate) fn state(&self, code: Code, toe: Epoch, t: Epoch) -> Result<SatelliteState, Error> {
        let dt = (t - toe).to_seconds();
        let (_, toe_tow) = gpst_week_tow(toe);

        let e = self.ecc;
        let a = self.semi_major_axis();

        // mean motion, then eccentric anomaly and its rates
        let n = (GPS_GRAVITATION_MU_M3_S2 / a.powi(3)).sqrt() + self.dn;
        let m = self.m0 + n * dt;

        let ea = self.eccentric_anomaly(m);
        let (sin_ea, cos_ea) = ea.sin_cos();
        let one_minus_ecos = 1.0 - e * cos_ea;

        let ea_dot = n / one_minus_ecos;
        let ea_ddot = -ea_dot * ea_dot * e * sin_ea / one_minus_ecos;

        // true anomaly
        let sqrt_1_e2 = (1.0 - e * e).sqrt();
        let nu = (sqrt_1_e2 * sin_ea).atan2(cos_ea - e);
        let nu_dot = sqrt_1_e2 * ea_dot / one_minus_ecos;
        let nu_ddot = sqrt_1_e2
            * (ea_ddot / one_minus_ecos - e * sin_ea * ea_dot * ea_dot / one_minus_ecos.powi(2));

        // argument of latitude
        let phi = nu + self.w;
        let (du, du_dot, du_ddot) = harmonic(self.cus, self.cuc, phi, nu_dot, nu_ddot);
        let (dr, dr_dot, dr_ddot) = harmonic(self.crs, self.crc, phi, nu_dot, nu_ddot);
        let (di, di_dot, di_ddot) = harmonic(self.cis, self.cic, phi, nu_dot, nu_ddot);

        let u = phi + du;
        let u_dot = nu_dot + du_dot;
        let u_ddot = nu_ddot + du_ddot;

        let r = a * one_minus_ecos + dr;
        let r_dot = a * e * sin_ea * ea_dot + dr_dot;
        let r_ddot = a * e * (cos_ea * ea_dot * ea_dot + sin_ea * ea_ddot) + dr_ddot;

        let inc = self.inc + self.inc_dot * dt + di;
        let inc_dot = self.inc_dot + di_dot;
        let inc_ddot = di_ddot;

        // orbital plane
        let (sin_u, cos_u) = u.sin_cos();
        let (xp, yp) = (r * cos_u, r * sin_u);
        let xp_dot = r_dot * cos_u - r * u_dot * sin_u;
        let yp_dot = r_dot * sin_u + r * u_dot * cos_u;
        let xp_ddot =
            r_ddot * cos_u - 2.0 * r_dot * u_dot * sin_u - r * u_ddot * sin_u - r * u_dot * u_dot * cos_u;
        let yp_ddot =
            r_ddot * sin_u + 2.0 * r_dot * u_dot * cos_u + r * u_ddot * cos_u - r * u_dot * u_dot * sin_u;

        // ascending node frame
        let (sin_i, cos_i) = inc.sin_cos();
        let q = Vector3::new(xp, yp * cos_i, yp * sin_i);
        let q_dot = Vector3::new(
            xp_dot,
            yp_dot * cos_i - yp * sin_i * inc_dot,
            yp_dot * sin_i + yp * cos_i * inc_dot,
        );
        let q_ddot = Vector3::new(
            xp_ddot,
            yp_ddot * cos_i - 2.0 * yp_dot * sin_i * inc_dot
                - yp * (cos_i * inc_dot * inc_dot + sin_i * inc_ddot),
            yp_ddot * sin_i + 2.0 * yp_dot * cos_i * inc_dot
                + yp * (cos_i * inc_ddot - sin_i * inc_dot * inc_dot),
        );

        // corrected longitude of ascending node, then ECEF
        let omega_dot = self.omegadot - EARTH_ANGULAR_VEL_RAD;
        let omega = self.omega0 + omega_dot * dt - EARTH_ANGULAR_VEL_RAD * toe_tow;

        let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), omega);
        let j = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0);

        let pos = rot * q;
        let vel = rot * q_dot + omega_dot * (j * pos);
        let acc = rot * q_ddot
            + 2.0 * omega_dot * (j * (rot * q_dot))
            + omega_dot * omega_dot * (j * (j * pos));

        // clock
        let dt_c = (t - self.toc).to_seconds();
        let tgd = group_delay(code, 0, self.tgd)?;
        let relativistic = -2.0 * pos.dot(&vel) / SPEED_OF_LIGHT_M_S.powi(2);

        let clock_err = self.af0 + self.af1 * dt_c + self.af2 * dt_c * dt_c - tgd + relativistic;
        let clock_rate_err = self.af1 + 2.0 * self.af2 * dt_c;

        debug!(
            "{} - kepler state x={:.3} y={:.3} z={:.3} dt={} clk={:.3E}",
            t, pos[0], pos[1], pos[2], dt, clock_err
        );

        Ok(SatelliteState {
            pos,
            vel,
            acc,
            clock_err,
            clock_rate_err,
            iodc: self.iodc,
            iode: self.iode,
        })
    }
}
