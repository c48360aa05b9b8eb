//! Common types used throughout wheel_odometry_sim

use nalgebra::{Vector2, Vector3};
use std::f64::consts::PI;

/// Normalize an angle to (-pi, pi]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// 2D robot pose (position + heading)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, theta: 0.0 }
    }

    /// Euclidean distance between the positions of two poses
    pub fn position_distance(&self, other: &Pose2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Wrapped heading difference `self.theta - other.theta`, in (-pi, pi]
    pub fn heading_difference(&self, other: &Pose2D) -> f64 {
        normalize_angle(self.theta - other.theta)
    }
}

impl From<Vector3<f64>> for Pose2D {
    fn from(v: Vector3<f64>) -> Self {
        Self { x: v[0], y: v[1], theta: v[2] }
    }
}

/// Known landmark position; `id` is fixed at creation and doubles as the
/// processing order of EKF updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// Velocity command for a differential drive robot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityCommand {
    pub linear: f64,
    pub angular: f64,
}

impl VelocityCommand {
    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }
}

/// True and measured velocity command for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityRecord {
    pub time: f64,
    pub true_cmd: VelocityCommand,
    pub measured_cmd: VelocityCommand,
}

/// Range-bearing observation of a single landmark; the bearing is relative
/// to the robot heading and wrapped to (-pi, pi]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub landmark_id: usize,
    pub range: f64,
    pub bearing: f64,
}

impl Measurement {
    pub fn new(landmark_id: usize, range: f64, bearing: f64) -> Self {
        Self { landmark_id, range, bearing }
    }
}

/// Per-estimator pose error against ground truth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseError {
    /// Euclidean position error [m]
    pub position: f64,
    /// Wrapped absolute heading error [deg]
    pub heading_deg: f64,
}

impl PoseError {
    pub fn between(estimate: &Pose2D, truth: &Pose2D) -> Self {
        Self {
            position: estimate.position_distance(truth),
            heading_deg: estimate.heading_difference(truth).abs().to_degrees(),
        }
    }
}

/// Per-step error record for both estimators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorRecord {
    pub time: f64,
    pub baseline: PoseError,
    pub ekf: PoseError,
}
