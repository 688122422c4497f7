//! Weighted least squares navigation
use log::{debug, warn};
use nalgebra::{DVector, Matrix4, MatrixXx4, Vector3, Vector4};

use crate::{
    constants::{EARTH_ANGULAR_VEL_RAD, SPEED_OF_LIGHT_M_S, STATE_DIM},
    measurement::{Measurement, MeasurementFlags},
    noise::NoiseVariances,
    prelude::{Config, Error},
};

mod dop;
mod raim;
mod solutions;
mod state;

pub use dop::DilutionOfPrecision;
pub use solutions::{InvalidationCause, PVTOutput, PVTSolution, PVTStatus};
pub use state::ReceiverState;

pub(crate) use raim::Raim;
pub(crate) use solutions::Validator;

/// One [Measurement] proposed to the solver, with its noise.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'a> {
    pub meas: &'a Measurement,
    pub noise: NoiseVariances,
}

impl<'a> Candidate<'a> {
    pub fn new(meas: &'a Measurement, noise: NoiseVariances) -> Self {
        Self { meas, noise }
    }

    /// Measured doppler variance, converted to (m.s⁻¹)²
    pub fn doppler_variance_m_s(&self) -> f64 {
        let lambda = self.meas.wavelength();
        self.noise.measured_doppler * lambda * lambda
    }
}

/// Rotates an ECEF vector by the Earth rotation during `tau` seconds
/// (linearised rotation about the Z axis).
pub(crate) fn sagnac_rotation(v: &Vector3<f64>, tau: f64) -> Vector3<f64> {
    let we_tau = EARTH_ANGULAR_VEL_RAD * tau;
    Vector3::new(v[0] + we_tau * v[1], v[1] - we_tau * v[0], v[2])
}

/// Predicted pseudo range (m) and unit line of sight (receiver to satellite),
/// accounting for the Earth rotation during time of flight.
pub(crate) fn predicted_pseudorange(
    state: &ReceiverState,
    meas: &Measurement,
) -> (f64, Vector3<f64>) {
    let tau = (state.pos - meas.sat_pos).norm() / SPEED_OF_LIGHT_M_S;
    let sat_pos = sagnac_rotation(&meas.sat_pos, tau);
    let los = sat_pos - state.pos;
    let range = los.norm();
    (range + state.clock_bias_m, los / range)
}

/// Predicted pseudo range rate (m.s⁻¹), including the receiver clock drift.
pub(crate) fn predicted_doppler(state: &ReceiverState, meas: &Measurement) -> f64 {
    let los = meas.sat_pos - state.pos;
    let tau = los.norm() / SPEED_OF_LIGHT_M_S;
    let sat_vel = sagnac_rotation(&meas.sat_vel, tau);
    los.normalize().dot(&(sat_vel - state.vel)) + state.clock_drift_m_s
}

/// Observed pseudo range rate (m.s⁻¹), from the measured doppler.
pub(crate) fn observed_doppler(meas: &Measurement) -> f64 {
    -meas.measured_doppler * meas.wavelength()
}

/// Inverse variance weight (1 for a null variance).
fn weight(variance: f64) -> f64 {
    if variance != 0.0 {
        1.0 / variance
    } else {
        1.0
    }
}

/// Solves the weighted normal equations.
/// Returns the solution and its covariance `(GᵀWG)⁻¹`.
fn weighted_least_squares(
    g: &MatrixXx4<f64>,
    b: &DVector<f64>,
    w: &DVector<f64>,
) -> Option<(Vector4<f64>, Matrix4<f64>)> {
    let mut wg = g.clone();
    for i in 0..wg.nrows() {
        for j in 0..STATE_DIM {
            wg[(i, j)] *= w[i];
        }
    }
    let gt_w_g: Matrix4<f64> = g.tr_mul(&wg);
    let v = gt_w_g.try_inverse()?;
    let x = v * wg.tr_mul(b);
    Some((x, v))
}

/// Output of one converged [LeastSquares] solve.
#[derive(Debug, Clone)]
pub(crate) struct SolveContext {
    /// Solved [ReceiverState]
    pub state: ReceiverState,
    /// Number of iterations to convergence
    pub iterations: usize,
    /// Position and clock bias covariance
    pub v: Matrix4<f64>,
    /// Velocity and clock drift covariance
    pub v_vel: Matrix4<f64>,
    /// Unweighted geometry matrix `(GᵀG)⁻¹`
    pub h: Matrix4<f64>,
    /// Observed minus predicted pseudo ranges (m)
    pub omp_range: DVector<f64>,
    /// Observed minus predicted pseudo range rates (m.s⁻¹)
    pub omp_doppler: DVector<f64>,
    /// True when velocity and clock drift were estimated
    pub velocity_solved: bool,
}

/// Iterative (Newton-Raphson) weighted least squares solver.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LeastSquares {
    max_iterations: usize,
    convergence_threshold_m: f64,
    disable_velocity: bool,
}

impl LeastSquares {
    pub fn new(cfg: &Config) -> Self {
        Self {
            max_iterations: cfg.max_iterations,
            convergence_threshold_m: cfg.convergence_threshold_m,
            disable_velocity: cfg.disable_velocity,
        }
    }

    /// Solves from the center of the Earth, with null clock state.
    pub fn solve(&self, candidates: &[Candidate]) -> Result<SolveContext, Error> {
        self.solve_from(candidates, ReceiverState::default())
    }

    /// Solves from this initial [ReceiverState].
    pub fn solve_from(
        &self,
        candidates: &[Candidate],
        initial: ReceiverState,
    ) -> Result<SolveContext, Error> {
        let size = candidates.len();

        if size < STATE_DIM {
            warn!("under-determined system, n_used = {}", size);
            return Err(Error::UnderDetermined);
        }

        let mut state = initial;
        let mut g = MatrixXx4::<f64>::zeros(size);
        let mut b = DVector::<f64>::zeros(size);
        let mut w = DVector::<f64>::zeros(size);

        for iter in 0..self.max_iterations {
            for (i, cd) in candidates.iter().enumerate() {
                let (predicted, los) = predicted_pseudorange(&state, cd.meas);
                b[i] = cd.meas.pseudorange - predicted;
                w[i] = weight(cd.noise.pseudorange);
                g[(i, 0)] = -los[0];
                g[(i, 1)] = -los[1];
                g[(i, 2)] = -los[2];
                g[(i, 3)] = 1.0;
            }

            let (dx, v) = weighted_least_squares(&g, &b, &w).ok_or_else(|| {
                warn!("under-determined system, n_used = {}", size);
                Error::UnderDetermined
            })?;

            state.update(&dx);

            let correction_m = Vector3::new(dx[0], dx[1], dx[2]).norm();
            debug!("iter={} |dx|={:.3E} m {}", iter, correction_m, state);

            if correction_m > self.convergence_threshold_m {
                continue;
            }

            let mut ctx = SolveContext {
                state,
                v,
                iterations: iter + 1,
                v_vel: Matrix4::zeros(),
                h: Matrix4::zeros(),
                omp_range: b,
                omp_doppler: DVector::<f64>::zeros(size),
                velocity_solved: false,
            };

            if self.disable_velocity {
                ctx.state.clear_velocity();
            } else {
                Self::solve_velocity(candidates, &g, &mut ctx);
            }

            let ones = DVector::<f64>::from_element(size, 1.0);
            let (_, h) = weighted_least_squares(&g, &DVector::zeros(size), &ones).ok_or_else(|| {
                warn!("under-determined system computing DOP, n_used = {}", size);
                Error::UnderDetermined
            })?;
            ctx.h = h;

            return Ok(ctx);
        }

        debug!("did not converge in {} iterations", self.max_iterations);
        Err(Error::Timeout)
    }

    /// One shot velocity and clock drift solution, on the position geometry.
    /// Skipped when one of the measurements lacks a measured doppler.
    fn solve_velocity(candidates: &[Candidate], g: &MatrixXx4<f64>, ctx: &mut SolveContext) {
        ctx.state.clear_velocity();

        if let Some(cd) = candidates
            .iter()
            .find(|cd| !cd.meas.has(MeasurementFlags::MEAS_DOPPLER_VALID))
        {
            debug!("{}: no doppler, skipping velocity", cd.meas.sid);
            return;
        }

        let size = candidates.len();
        let mut b = DVector::<f64>::zeros(size);
        let mut w = DVector::<f64>::zeros(size);

        for (i, cd) in candidates.iter().enumerate() {
            b[i] = observed_doppler(cd.meas) - predicted_doppler(&ctx.state, cd.meas);
            w[i] = weight(cd.doppler_variance_m_s());
        }

        match weighted_least_squares(g, &b, &w) {
            Some((x, v_vel)) => {
                ctx.state.set_velocity(&x);
                ctx.v_vel = v_vel;
                ctx.velocity_solved = true;
                for (i, cd) in candidates.iter().enumerate() {
                    ctx.omp_doppler[i] =
                        observed_doppler(cd.meas) - predicted_doppler(&ctx.state, cd.meas);
                }
            },
            None => {
                warn!("under-determined system, velocity solution skipped");
            },
        }
    }
}
