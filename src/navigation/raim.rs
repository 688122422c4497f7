//! Receiver Autonomous Integrity Monitoring
use itertools::Itertools;
use log::{debug, info};
use nalgebra::DVector;

use crate::{
    constants::{MIN_SATS, STATE_DIM},
    measurement::{Measurement, MeasurementFlags},
    navigation::{
        observed_doppler, predicted_doppler, predicted_pseudorange, Candidate, LeastSquares,
        PVTStatus, ReceiverState, SolveContext,
    },
    prelude::{Config, Error, SignalId},
};

/// Outcome of a successful [Raim] resolution
#[derive(Debug, Clone)]
pub(crate) struct RaimSolution {
    /// [PVTStatus]: converged (with or without RAIM) or repaired
    pub status: PVTStatus,
    /// Accepted [SolveContext]
    pub ctx: SolveContext,
    /// Signals removed from the accepted solution
    pub removed: Vec<SignalId>,
}

/// Solution attempt on a subset of the measurements
struct MaskedSolve {
    ctx: Option<SolveContext>,
    passed: bool,
    metric: f64,
}

impl MaskedSolve {
    fn failed() -> Self {
        Self {
            ctx: None,
            passed: false,
            metric: f64::INFINITY,
        }
    }
}

/// Best exclusion of one repair round
struct Exclusion {
    index: usize,
    passed: bool,
    metric: f64,
    ctx: Option<SolveContext>,
}

impl Exclusion {
    /// Passing exclusions always win over failing ones,
    /// then the lowest metric wins.
    fn is_better_than(&self, other: &Self) -> bool {
        if self.passed != other.passed {
            self.passed
        } else {
            self.metric < other.metric
        }
    }
}

pub(crate) struct Raim<'a> {
    cfg: &'a Config,
    lsq: LeastSquares,
}

impl<'a> Raim<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self {
            cfg,
            lsq: LeastSquares::new(cfg),
        }
    }

    /// Normalized residual test. Returns the test result and its metric.
    pub fn residual_test(&self, ctx: &SolveContext, candidates: &[Candidate]) -> (bool, f64) {
        if ctx.state.is_null_position() {
            return (false, f64::INFINITY);
        }

        let n_used = candidates.len();

        let (n_meas, n_state) = if self.cfg.disable_velocity {
            (n_used, STATE_DIM)
        } else {
            (2 * n_used, 2 * STATE_DIM)
        };

        if n_meas <= n_state {
            return (false, f64::INFINITY);
        }

        let mut residuals = DVector::<f64>::zeros(n_meas);

        for (i, cd) in candidates.iter().enumerate() {
            residuals[i] = ctx.omp_range[i];
            if cd.noise.pseudorange != 0.0 {
                residuals[i] /= cd.noise.pseudorange.sqrt();
            }
            if !self.cfg.disable_velocity {
                let doppler_var = cd.doppler_variance_m_s();
                residuals[n_used + i] = ctx.omp_doppler[i];
                if doppler_var != 0.0 {
                    residuals[n_used + i] /= doppler_var.sqrt();
                }
            }
        }

        let dof = (n_meas - n_state) as f64;
        let metric = residuals.norm() / dof.sqrt();
        let threshold = self.cfg.raim_metric_threshold * (n_meas as f64 / dof).sqrt();

        (metric < threshold, metric)
    }

    /// Solves, verifies the residuals and attempts a repair when they are inconsistent.
    pub fn solve_with_raim(&self, candidates: &[Candidate]) -> Result<RaimSolution, Error> {
        let n_used = candidates.len();
        let attempt = self.lsq.solve(candidates);

        // no redundancy to verify the solution with
        if self.cfg.disable_raim || n_used <= STATE_DIM {
            return attempt.map(|ctx| RaimSolution {
                ctx,
                status: PVTStatus::ConvergedNoRaim,
                removed: Vec::new(),
            });
        }

        match attempt {
            Err(e) if n_used <= STATE_DIM + 1 => {
                info!("solution failed ({}) and {} measurements can't be repaired", e, n_used);
                Err(Error::RepairImpossible)
            },
            Ok(ctx) => {
                let (passed, metric) = self.residual_test(&ctx, candidates);
                if passed {
                    debug!("RAIM residual test passed, metric {:.3}", metric);
                    Ok(RaimSolution {
                        ctx,
                        status: PVTStatus::ConvergedRaimOk,
                        removed: Vec::new(),
                    })
                } else {
                    info!("RAIM residual test failed, metric {:.3}", metric);
                    self.repair(candidates, metric)
                }
            },
            Err(e) => {
                info!("solution failed ({}), attempting repair", e);
                self.repair(candidates, f64::INFINITY)
            },
        }
    }

    /// Solves with the measurements of `removed` signals masked out,
    /// then runs the residual test.
    fn solve_masked(&self, candidates: &[Candidate], removed: &[SignalId]) -> MaskedSolve {
        let subset = candidates
            .iter()
            .filter(|cd| !removed.contains(&cd.meas.sid))
            .copied()
            .collect::<Vec<_>>();

        let n_sats = subset.iter().map(|cd| cd.meas.sid.sv).unique().count();

        if n_sats < MIN_SATS {
            info!("RAIM failed, not enough satellites remaining");
            return MaskedSolve::failed();
        }

        match self.lsq.solve(&subset) {
            Ok(ctx) => {
                let (passed, metric) = self.residual_test(&ctx, &subset);
                MaskedSolve {
                    ctx: Some(ctx),
                    passed,
                    metric,
                }
            },
            Err(_) => MaskedSolve::failed(),
        }
    }

    /// Greedy single measurement exclusion, falling back to GPS only.
    fn repair(&self, candidates: &[Candidate], original_metric: f64) -> Result<RaimSolution, Error> {
        let n_used = candidates.len();
        let mut removed = Vec::<SignalId>::with_capacity(self.cfg.raim_max_exclusions);

        while removed.len() < self.cfg.raim_max_exclusions
            && n_used - removed.len() - 1 > STATE_DIM
        {
            let mut best: Option<Exclusion> = None;

            for (index, cd) in candidates.iter().enumerate() {
                let sid = cd.meas.sid;
                if removed.contains(&sid) {
                    continue;
                }

                removed.push(sid);
                let attempt = self.solve_masked(candidates, &removed);
                removed.pop();

                if attempt.passed {
                    debug!("{}: RAIM exclusion successful, metric {:.3}", sid, attempt.metric);
                } else {
                    debug!("{}: RAIM failed to exclude measurement, metric {:.3}", sid, attempt.metric);
                }

                if !attempt.metric.is_finite() {
                    continue;
                }

                let exclusion = Exclusion {
                    index,
                    passed: attempt.passed,
                    metric: attempt.metric,
                    ctx: attempt.ctx,
                };

                let is_best = match &best {
                    Some(best) => exclusion.is_better_than(best),
                    None => true,
                };

                if is_best {
                    best = Some(exclusion);
                }
            }

            let Some(best) = best else {
                debug!("RAIM failed: all exclusion candidates failed");
                break;
            };

            let bad = candidates[best.index].meas;
            removed.push(bad.sid);

            if let Some(ctx) = &best.ctx {
                let (predicted, _) = predicted_pseudorange(&ctx.state, bad);
                info!(
                    "{}: RAIM exclusion, residual {:.0} m",
                    bad.sid,
                    bad.pseudorange - predicted
                );
            }

            if best.passed {
                if let Some(ctx) = best.ctx {
                    info!(
                        "RAIM excluded {} measurement(s) out of {}, metric {:.1} -> {:.1}",
                        removed.len(),
                        n_used,
                        original_metric,
                        best.metric
                    );
                    return Ok(RaimSolution {
                        ctx,
                        removed,
                        status: PVTStatus::Repaired,
                    });
                }
            }

            debug!(
                "{}: RAIM no single exclusion found looking for more, metric {:.3}",
                bad.sid, best.metric
            );
        }

        self.solve_gps_only(candidates, original_metric)
    }

    /// Last resort repair: excludes every non GPS measurement.
    fn solve_gps_only(
        &self,
        candidates: &[Candidate],
        original_metric: f64,
    ) -> Result<RaimSolution, Error> {
        let removed = candidates
            .iter()
            .filter(|cd| !cd.meas.sid.code.is_gps())
            .map(|cd| cd.meas.sid)
            .unique()
            .collect::<Vec<_>>();

        let n_used = candidates
            .iter()
            .filter(|cd| !removed.contains(&cd.meas.sid))
            .count();

        if n_used <= STATE_DIM {
            info!(
                "RAIM failed: {} measurements not enough for constellation RAIM, metric {:.1}",
                n_used, original_metric
            );
            return Err(Error::RepairImpossible);
        }

        let attempt = self.solve_masked(candidates, &removed);

        match attempt.ctx {
            Some(ctx) if attempt.passed => {
                info!(
                    "RAIM excluded all non-GPS measurements ({} out of {}), metric {:.1} -> {:.1}",
                    removed.len(),
                    candidates.len(),
                    original_metric,
                    attempt.metric
                );
                Ok(RaimSolution {
                    ctx,
                    removed,
                    status: PVTStatus::Repaired,
                })
            },
            _ => {
                info!(
                    "RAIM failed: tried excluding {} measurement(s) out of {}, metric {:.1} -> {:.1}",
                    removed.len(),
                    candidates.len(),
                    original_metric,
                    attempt.metric
                );
                Err(Error::RepairFailed)
            },
        }
    }

    /// Verifies the measurements that did not contribute to the solution
    /// against it. Outliers are appended to `removed`.
    /// Returns true if any signal was flagged.
    pub fn flag_outliers(
        &self,
        measurements: &[&Measurement],
        state: &ReceiverState,
        used: &[SignalId],
        removed: &mut Vec<SignalId>,
    ) -> bool {
        let mut flagged = false;

        for meas in measurements.iter() {
            if used.contains(&meas.sid) || removed.contains(&meas.sid) {
                continue;
            }

            let (predicted, _) = predicted_pseudorange(state, meas);
            let range_residual = meas.pseudorange - predicted;

            if range_residual.abs() > self.cfg.range_outlier_threshold_m {
                info!(
                    "{}: flagging too large pseudorange residual ({:.1} m)",
                    meas.sid, range_residual
                );
                removed.push(meas.sid);
                flagged = true;
            } else if !self.cfg.disable_velocity && meas.has(MeasurementFlags::MEAS_DOPPLER_VALID) {
                let doppler_residual = observed_doppler(meas) - predicted_doppler(state, meas);
                if doppler_residual.abs() > self.cfg.doppler_outlier_threshold_m_s {
                    info!(
                        "{}: flagging too large doppler residual ({:.1} m/s)",
                        meas.sid, doppler_residual
                    );
                    removed.push(meas.sid);
                    flagged = true;
                }
            }
        }

        flagged
    }
}
