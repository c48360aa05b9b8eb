// Localization simulation module

pub mod config;
pub mod ekf;
pub mod landmarks;
pub mod odometry;
pub mod runner;
pub mod sensor;
pub mod trajectory;

// Re-exports
pub use config::{NoiseParams, SimulationConfig};
pub use ekf::{ExtendedKalmanFilter, UpdateStatus};
pub use odometry::OdometryIntegrator;
pub use runner::{Simulator, StepObserver, StepOutcome, StepSnapshot};
pub use sensor::{LandmarkSensorModel, MotionNoiseModel};
pub use trajectory::RectanglePath;
