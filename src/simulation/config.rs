//! Simulation configuration and validation

use crate::common::{SimResult, SimulationError};
use crate::simulation::landmarks;

/// Standard deviations of the simulated sensor noise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    /// Linear velocity noise [m/s]
    pub linear_std: f64,
    /// Angular velocity noise [rad/s]
    pub angular_std: f64,
    /// Landmark range noise [m]
    pub range_std: f64,
    /// Landmark bearing noise [rad]
    pub bearing_std: f64,
}

impl NoiseParams {
    pub fn new(linear_std: f64, angular_std: f64, range_std: f64, bearing_std: f64) -> Self {
        Self { linear_std, angular_std, range_std, bearing_std }
    }

    /// All standard deviations zero; measurements become exact
    pub fn noiseless() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            linear_std: 0.1,
            angular_std: 0.05,
            range_std: 0.1,
            bearing_std: 0.02,
        }
    }
}

/// Immutable-per-run simulation parameters
///
/// A changed configuration takes effect only at the next `reset()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Simulation time step [s]
    pub dt: f64,
    /// Total simulated time [s]
    pub total_time: f64,
    /// Number of landmarks, within the supported catalog range
    pub landmark_count: usize,
    /// Sensor noise standard deviations
    pub noise: NoiseParams,
}

impl SimulationConfig {
    /// Check the configuration and return it unchanged if valid
    pub fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        if !self.total_time.is_finite() || self.total_time <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "total_time must be positive, got {}",
                self.total_time
            )));
        }
        if self.landmark_count < 1 || self.landmark_count > landmarks::CATALOG_SIZE {
            return Err(SimulationError::InvalidParameter(format!(
                "landmark_count must be in [1, {}], got {}",
                landmarks::CATALOG_SIZE,
                self.landmark_count
            )));
        }
        let n = &self.noise;
        for (name, std) in [
            ("linear_std", n.linear_std),
            ("angular_std", n.angular_std),
            ("range_std", n.range_std),
            ("bearing_std", n.bearing_std),
        ] {
            if !std.is_finite() || std < 0.0 {
                return Err(SimulationError::InvalidParameter(format!(
                    "{} must be non-negative, got {}",
                    name, std
                )));
            }
        }
        Ok(())
    }

    /// Number of trajectory samples in [0, total_time)
    pub fn step_count(&self) -> usize {
        (self.total_time / self.dt).ceil() as usize
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            total_time: 50.0,
            landmark_count: 5,
            noise: NoiseParams::default(),
        }
    }
}
