//! Error types for wheel_odometry_sim

use std::fmt;

/// Main error type for the simulation core
///
/// Only configuration problems are surfaced as errors. Numerical
/// pathologies inside the EKF (ill-conditioned innovation covariance,
/// covariance degeneracy) are recovered in place and never reach the
/// caller through this type.
#[derive(Debug)]
pub enum SimulationError {
    /// Invalid configuration parameter
    InvalidParameter(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidParameter(msg) => {
                write!(f, "Invalid parameter: {}", msg)
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Result type alias for simulation operations
pub type SimResult<T> = Result<T, SimulationError>;
