//! Dead-reckoning baseline estimator
//!
//! Integrates measured velocity commands with the unicycle model and no
//! correction of any kind. Its error grows without bound; it exists as the
//! uncorrected comparison baseline for the EKF.

use crate::common::{normalize_angle, Pose2D, VelocityCommand};

#[derive(Debug, Clone, Copy)]
pub struct OdometryIntegrator {
    pose: Pose2D,
}

impl OdometryIntegrator {
    pub fn new(initial_pose: Pose2D) -> Self {
        Self { pose: initial_pose }
    }

    /// Integrate one velocity command from the previous estimate
    pub fn advance(&mut self, cmd: &VelocityCommand, dt: f64) -> Pose2D {
        let Pose2D { x, y, theta } = self.pose;
        self.pose = Pose2D {
            x: x + cmd.linear * dt * theta.cos(),
            y: y + cmd.linear * dt * theta.sin(),
            theta: normalize_angle(theta + cmd.angular * dt),
        };
        self.pose
    }

    pub fn pose(&self) -> Pose2D {
        self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_straight_line() {
        let mut odom = OdometryIntegrator::new(Pose2D::origin());
        for _ in 0..10 {
            odom.advance(&VelocityCommand::new(1.0, 0.0), 0.1);
        }
        let pose = odom.pose();
        assert!((pose.x - 1.0).abs() < 1e-12);
        assert!(pose.y.abs() < 1e-12);
        assert!(pose.theta.abs() < 1e-12);
    }

    #[test]
    fn test_pure_rotation_wraps_heading() {
        let mut odom = OdometryIntegrator::new(Pose2D::origin());
        // 1 rad/s for 8 s passes pi and must wrap negative
        for _ in 0..80 {
            odom.advance(&VelocityCommand::new(0.0, 1.0), 0.1);
        }
        let pose = odom.pose();
        assert!(pose.theta > -PI && pose.theta <= PI);
        assert!((pose.theta - (8.0 - 2.0 * PI)).abs() < 1e-9);
    }

    #[test]
    fn test_motion_follows_heading() {
        let mut odom = OdometryIntegrator::new(Pose2D::new(0.0, 0.0, PI / 2.0));
        odom.advance(&VelocityCommand::new(1.0, 0.0), 0.5);
        let pose = odom.pose();
        assert!(pose.x.abs() < 1e-12);
        assert!((pose.y - 0.5).abs() < 1e-12);
    }
}
