//! PVT solver
use itertools::Itertools;
use log::{debug, error, warn};

use crate::{
    constants::{MAX_CHANNELS, MIN_SATS, SPEED_OF_LIGHT_M_S},
    measurement::{Measurement, MeasurementFlags},
    navigation::{
        Candidate, DilutionOfPrecision, PVTOutput, PVTSolution, PVTStatus, Raim, Validator,
    },
    noise::NoiseModel,
    position::Position,
    prelude::{Code, Config, Duration, Error, ProcessingStrategy, SignalId},
};

/// Drops the measurements that can't contribute to any solution
fn signal_condition_filter(pool: &mut Vec<&Measurement>) {
    pool.retain(|meas| {
        if meas.has(MeasurementFlags::CODE_VALID) {
            true
        } else {
            error!("{} ({}) missing pseudo range observation", meas.tot, meas.sid);
            false
        }
    })
}

/// Number of distinct satellites
fn sat_count<'a>(sids: impl Iterator<Item = &'a SignalId>) -> usize {
    sids.map(|sid| sid.sv).unique().count()
}

/// Single epoch [Solver]
#[derive(Debug, Clone)]
pub struct Solver {
    /// Solver [Config]uration
    pub cfg: Config,
}

impl Solver {
    /// Creates a new [Solver]
    pub fn new(cfg: &Config) -> Self {
        Self { cfg: cfg.clone() }
    }

    /// [ProcessingStrategy] that applies to this pool: GPS L1 C/A only
    /// requires enough such signals to allow fault exclusion.
    fn effective_strategy(&self, pool: &[&Measurement]) -> ProcessingStrategy {
        if self.cfg.strategy != ProcessingStrategy::GpsL1caWhenPossible {
            return self.cfg.strategy;
        }

        let num_gps_l1ca = pool
            .iter()
            .filter(|meas| meas.sid.code == Code::GpsL1CA)
            .count();

        if num_gps_l1ca < MIN_SATS + self.cfg.raim_max_exclusions {
            debug!(
                "only {} GPS L1CA signals: using all constellations",
                num_gps_l1ca
            );
            ProcessingStrategy::AllConstellations
        } else {
            ProcessingStrategy::GpsL1caWhenPossible
        }
    }

    /// Resolves the receiver position, velocity and time from
    /// this epoch of [Measurement]s.
    pub fn resolve(&self, measurements: &[Measurement]) -> Result<PVTOutput, Error> {
        if measurements.len() > MAX_CHANNELS {
            error!("too many measurements: {}", measurements.len());
            return Err(Error::TooManyMeasurements(measurements.len()));
        }

        let mut pool = measurements.iter().collect::<Vec<_>>();
        signal_condition_filter(&mut pool);

        let strategy = self.effective_strategy(&pool);

        let candidates = pool
            .iter()
            .filter(|meas| strategy.accepts(meas.sid.code))
            .filter_map(|meas| match NoiseModel::variances(meas) {
                Ok(noise) => Some(Candidate::new(meas, noise)),
                Err(e) => {
                    warn!("{} ({}) {}", meas.tot, meas.sid, e);
                    None
                },
            })
            .collect::<Vec<_>>();

        if sat_count(candidates.iter().map(|cd| &cd.meas.sid)) < MIN_SATS {
            error!("not enough satellites ({} signals)", candidates.len());
            return Err(Error::InsufficientMeasurements);
        }

        let raim = Raim::new(&self.cfg);

        let raim_solution = raim.solve_with_raim(&candidates).map_err(|e| {
            error!("failed to resolve: {}", e);
            e
        })?;

        let mut status = raim_solution.status;
        let mut removed = raim_solution.removed;
        let ctx = raim_solution.ctx;

        let used = candidates
            .iter()
            .map(|cd| cd.meas.sid)
            .filter(|sid| status != PVTStatus::Repaired || !removed.contains(sid))
            .collect::<Vec<_>>();

        let n_sigs_used = used.len();
        let n_sats_used = sat_count(used.iter());

        if strategy != ProcessingStrategy::AllConstellations
            && !self.cfg.disable_raim
            && raim.flag_outliers(&pool, &ctx.state, &used, &mut removed)
        {
            status = PVTStatus::Repaired;
        }

        let excluded = if status == PVTStatus::Repaired {
            removed
        } else {
            Vec::new()
        };

        let position = Position::from_ecef(ctx.state.pos);
        let dops = DilutionOfPrecision::new(&ctx.h, &position);

        let err_cov = [
            ctx.v[(0, 0)],
            ctx.v[(0, 1)],
            ctx.v[(0, 2)],
            ctx.v[(1, 1)],
            ctx.v[(1, 2)],
            ctx.v[(2, 2)],
            dops.gdop,
        ];

        // velocity shares the position geometry, hence its GDOP
        let vel_cov = if ctx.velocity_solved {
            [
                ctx.v_vel[(0, 0)],
                ctx.v_vel[(0, 1)],
                ctx.v_vel[(0, 2)],
                ctx.v_vel[(1, 1)],
                ctx.v_vel[(1, 2)],
                ctx.v_vel[(2, 2)],
                dops.gdop,
            ]
        } else {
            [0.0; 7]
        };

        // time of fix: time of transmission plus time of flight,
        // from the first signal that contributed
        let reference = candidates
            .iter()
            .map(|cd| cd.meas)
            .find(|meas| used.contains(&meas.sid))
            .ok_or(Error::InsufficientMeasurements)?;

        let time = reference.tot
            + Duration::from_seconds(
                reference.raw_time_of_flight() + reference.sat_clock_err
                    - ctx.state.clock_offset_s(),
            );

        let geodetic = position.geodetic();
        let vel_ned = position.to_ned(&ctx.state.vel);

        let solution = PVTSolution {
            time,
            err_cov,
            vel_cov,
            n_sats_used,
            n_sigs_used,
            valid: true,
            velocity_valid: ctx.velocity_solved,
            pos_ecef_m: (ctx.state.pos[0], ctx.state.pos[1], ctx.state.pos[2]),
            pos_llh_rad_rad_m: (geodetic[0], geodetic[1], geodetic[2]),
            vel_ecef_m_s: (ctx.state.vel[0], ctx.state.vel[1], ctx.state.vel[2]),
            vel_ned_m_s: (vel_ned[0], vel_ned[1], vel_ned[2]),
            clock_offset_s: ctx.state.clock_offset_s(),
            clock_drift_s_s: ctx.state.clock_drift_s_s(),
            clock_offset_var: ctx.v[(3, 3)] / SPEED_OF_LIGHT_M_S / SPEED_OF_LIGHT_M_S,
            clock_drift_var: ctx.v_vel[(3, 3)] / SPEED_OF_LIGHT_M_S / SPEED_OF_LIGHT_M_S,
        };

        let validator = Validator::new(&solution, &dops);

        if let Err(cause) = validator.validate(&self.cfg) {
            error!("solution invalidated - {}", cause);
            return Err(Error::SolutionRejected(cause));
        }

        debug!(
            "{} ({}): {} sats, {} signals, {} iterations",
            time,
            status,
            n_sats_used,
            n_sigs_used,
            ctx.iterations
        );

        Ok(PVTOutput {
            status,
            solution,
            dops,
            excluded,
        })
    }
}
