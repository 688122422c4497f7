#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod strategy;
pub use strategy::ProcessingStrategy;

fn default_max_iterations() -> usize {
    10
}

fn default_convergence_threshold() -> f64 {
    1.0E-3
}

fn default_raim_metric_threshold() -> f64 {
    2.5
}

fn default_raim_max_exclusions() -> usize {
    2
}

fn default_max_gdop() -> f64 {
    20.0
}

fn default_min_altitude() -> f64 {
    -1.0E3
}

fn default_max_altitude() -> f64 {
    1.0E6
}

fn default_range_outlier_threshold() -> f64 {
    20.0
}

fn default_doppler_outlier_threshold() -> f64 {
    5.0
}

/// [Solver] configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// [ProcessingStrategy] selecting the contributing measurements
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: ProcessingStrategy,
    /// Disables Receiver Autonomous Integrity Monitoring:
    /// no residual test and no fault exclusion.
    #[cfg_attr(feature = "serde", serde(default))]
    pub disable_raim: bool,
    /// Disables the velocity and clock drift estimation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub disable_velocity: bool,
    /// Maximal number of iterations of the least squares solver
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
    /// Position correction (m) below which the solver has converged
    #[cfg_attr(feature = "serde", serde(default = "default_convergence_threshold"))]
    pub convergence_threshold_m: f64,
    /// RAIM residual test threshold (normalized residuals)
    #[cfg_attr(feature = "serde", serde(default = "default_raim_metric_threshold"))]
    pub raim_metric_threshold: f64,
    /// Maximal number of measurements RAIM may exclude
    #[cfg_attr(feature = "serde", serde(default = "default_raim_max_exclusions"))]
    pub raim_max_exclusions: usize,
    /// GDOP above which solutions are rejected
    #[cfg_attr(feature = "serde", serde(default = "default_max_gdop"))]
    pub max_gdop: f64,
    /// Altitude (m) below which solutions are rejected
    #[cfg_attr(feature = "serde", serde(default = "default_min_altitude"))]
    pub min_altitude_m: f64,
    /// Altitude (m) above which solutions are rejected
    #[cfg_attr(feature = "serde", serde(default = "default_max_altitude"))]
    pub max_altitude_m: f64,
    /// Pseudo range residual (m) above which a measurement
    /// left out of the solution is flagged
    #[cfg_attr(feature = "serde", serde(default = "default_range_outlier_threshold"))]
    pub range_outlier_threshold_m: f64,
    /// Doppler residual (m.s⁻¹) above which a measurement
    /// left out of the solution is flagged
    #[cfg_attr(feature = "serde", serde(default = "default_doppler_outlier_threshold"))]
    pub doppler_outlier_threshold_m_s: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: ProcessingStrategy::default(),
            disable_raim: false,
            disable_velocity: false,
            max_iterations: default_max_iterations(),
            convergence_threshold_m: default_convergence_threshold(),
            raim_metric_threshold: default_raim_metric_threshold(),
            raim_max_exclusions: default_raim_max_exclusions(),
            max_gdop: default_max_gdop(),
            min_altitude_m: default_min_altitude(),
            max_altitude_m: default_max_altitude(),
            range_outlier_threshold_m: default_range_outlier_threshold(),
            doppler_outlier_threshold_m_s: default_doppler_outlier_threshold(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with updated [ProcessingStrategy]
    pub fn with_strategy(&self, strategy: ProcessingStrategy) -> Self {
        let mut s = self.clone();
        s.strategy = strategy;
        s
    }

    /// Copies and returns [Config] with RAIM disabled
    pub fn without_raim(&self) -> Self {
        let mut s = self.clone();
        s.disable_raim = true;
        s
    }

    /// Copies and returns [Config] with velocity estimation disabled
    pub fn without_velocity(&self) -> Self {
        let mut s = self.clone();
        s.disable_velocity = true;
        s
    }

    /// Copies and returns [Config] with updated altitude bounds (m)
    pub fn with_altitude_bounds(&self, min_altitude_m: f64, max_altitude_m: f64) -> Self {
        let mut s = self.clone();
        s.min_altitude_m = min_altitude_m;
        s.max_altitude_m = max_altitude_m;
        s
    }

    /// Copies and returns [Config] with updated GDOP limit
    pub fn with_max_gdop(&self, max_gdop: f64) -> Self {
        let mut s = self.clone();
        s.max_gdop = max_gdop;
        s
    }
}
