//! Ground-truth trajectory generation
//!
//! The reference robot drives a fixed rectangle at constant speed, with a
//! piecewise-constant heading per edge (no turning dynamics). Corners are
//! instantaneous heading jumps, which is what makes the finite-difference
//! angular velocity spike there.

use crate::common::Pose2D;
use std::f64::consts::PI;

/// Rectangular ground-truth path traversed counter-clockwise from the origin
#[derive(Debug, Clone, Copy)]
pub struct RectanglePath {
    pub width: f64,
    pub height: f64,
    /// Constant traversal speed [m/s]
    pub speed: f64,
}

impl RectanglePath {
    pub fn new(width: f64, height: f64, speed: f64) -> Self {
        Self { width, height, speed }
    }

    /// Time to traverse the full perimeter once [s]
    pub fn perimeter_time(&self) -> f64 {
        2.0 * (self.width + self.height) / self.speed
    }

    /// Ground-truth pose at elapsed time `t`; wraps past one full traversal
    pub fn pose_at(&self, t: f64) -> Pose2D {
        let segment_times = [
            self.width / self.speed,
            self.height / self.speed,
            self.width / self.speed,
            self.height / self.speed,
        ];

        let mut local = t % self.perimeter_time();
        for (i, &seg_time) in segment_times.iter().enumerate() {
            if local < seg_time {
                let progress = local / seg_time;
                return match i {
                    // bottom edge, left to right
                    0 => Pose2D::new(progress * self.width, 0.0, 0.0),
                    // right edge, bottom to top
                    1 => Pose2D::new(self.width, progress * self.height, PI / 2.0),
                    // top edge, right to left
                    2 => Pose2D::new(self.width - progress * self.width, self.height, PI),
                    // left edge, top to bottom
                    _ => Pose2D::new(0.0, self.height - progress * self.height, -PI / 2.0),
                };
            }
            local -= seg_time;
        }
        // unreachable for finite t; fall back to the start corner
        Pose2D::origin()
    }

    /// One pose per `dt` over [0, total_time), excluding any final partial step
    pub fn sample(&self, total_time: f64, dt: f64) -> Vec<Pose2D> {
        let n = (total_time / dt).ceil() as usize;
        (0..n).map(|i| self.pose_at(i as f64 * dt)).collect()
    }
}

impl Default for RectanglePath {
    fn default() -> Self {
        // 10 x 8 m rectangle at 0.5 m/s, 72 s per lap
        Self::new(10.0, 8.0, 0.5)
    }
}
