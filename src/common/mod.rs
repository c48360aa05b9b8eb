//! Common types and error definitions for wheel_odometry_sim

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
