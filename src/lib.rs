//! wheel_odometry_sim - 2D robot localization simulator
//!
//! Simulates a differential drive robot on a rectangular course, fusing
//! noisy wheel-odometry velocity commands with noisy range-bearing
//! landmark observations through an Extended Kalman Filter, and compares
//! the fused estimate against a dead-reckoning baseline.

// Core modules
pub mod common;
pub mod simulation;

// Re-export common types for convenience
pub use common::{normalize_angle, ErrorRecord, Landmark, Measurement, Pose2D, PoseError};
pub use common::{SimResult, SimulationError, VelocityCommand, VelocityRecord};
pub use simulation::{
    ExtendedKalmanFilter, LandmarkSensorModel, MotionNoiseModel, NoiseParams,
    OdometryIntegrator, RectanglePath, SimulationConfig, Simulator, StepObserver, StepOutcome,
    StepSnapshot, UpdateStatus,
};
