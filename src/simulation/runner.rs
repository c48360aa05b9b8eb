//! Simulation step runner
//!
//! `Simulator` owns the precomputed ground truth, the two estimators, the
//! noise models, and the per-run histories, and advances everything one
//! discrete tick at a time. The UI layer (or a test) drives it through
//! `step()`/`run_to_completion()` and reads back snapshots; it never
//! mutates the core state directly.

use crate::common::{
    ErrorRecord, Landmark, Pose2D, PoseError, SimResult, VelocityCommand, VelocityRecord,
};
use crate::simulation::config::SimulationConfig;
use crate::simulation::ekf::ExtendedKalmanFilter;
use crate::simulation::landmarks;
use crate::simulation::odometry::OdometryIntegrator;
use crate::simulation::sensor::{LandmarkSensorModel, MotionNoiseModel};
use crate::simulation::trajectory::RectanglePath;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Read-only view of the simulation after one completed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSnapshot {
    /// Index of the ground-truth sample this snapshot refers to
    pub step: usize,
    /// Simulated time of that sample [s]
    pub time: f64,
    pub true_pose: Pose2D,
    pub baseline_pose: Pose2D,
    pub ekf_pose: Pose2D,
    /// Errors recorded this step; `None` for the warm-up step, which has
    /// no previous pose to difference against
    pub last_errors: Option<ErrorRecord>,
}

/// Result of a `step()` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The simulation advanced one tick
    Stepped(StepSnapshot),
    /// The trajectory is exhausted; state was left untouched
    Finished,
}

/// Synchronous per-step callback for external collaborators (plotting,
/// UI). Observers consume snapshots; the step cadence belongs to whoever
/// calls `step()`.
pub trait StepObserver {
    fn on_step(&mut self, snapshot: &StepSnapshot);
}

impl<F: FnMut(&StepSnapshot)> StepObserver for F {
    fn on_step(&mut self, snapshot: &StepSnapshot) {
        self(snapshot)
    }
}

/// Discrete-time localization simulator comparing dead reckoning against
/// an EKF fused with landmark observations
pub struct Simulator {
    config: SimulationConfig,
    seed: u64,
    rng: StdRng,
    path: RectanglePath,
    trajectory: Vec<Pose2D>,
    landmarks: Vec<Landmark>,
    motion_noise: MotionNoiseModel,
    sensor: LandmarkSensorModel,
    ekf: ExtendedKalmanFilter,
    odometry: OdometryIntegrator,
    step_index: usize,
    landmarks_enabled: bool,
    baseline_trajectory: Vec<Pose2D>,
    ekf_trajectory: Vec<Pose2D>,
    velocity_history: Vec<VelocityRecord>,
    error_history: Vec<ErrorRecord>,
    observers: Vec<Box<dyn StepObserver>>,
}

impl Simulator {
    /// Create a simulator with a random seed
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        Self::with_seed(config, rand::random())
    }

    /// Create a simulator whose noise draws are reproducible from `seed`;
    /// `reset()` restores the RNG to the same seed
    pub fn with_seed(config: SimulationConfig, seed: u64) -> SimResult<Self> {
        config.validate()?;
        let mut sim = Self {
            config,
            seed,
            rng: StdRng::seed_from_u64(seed),
            path: RectanglePath::default(),
            trajectory: Vec::new(),
            landmarks: Vec::new(),
            motion_noise: MotionNoiseModel::new(config.noise.linear_std, config.noise.angular_std),
            sensor: LandmarkSensorModel::new(config.noise.range_std, config.noise.bearing_std),
            ekf: ExtendedKalmanFilter::new(&config.noise),
            odometry: OdometryIntegrator::new(Pose2D::origin()),
            step_index: 0,
            landmarks_enabled: true,
            baseline_trajectory: Vec::new(),
            ekf_trajectory: Vec::new(),
            velocity_history: Vec::new(),
            error_history: Vec::new(),
            observers: Vec::new(),
        };
        sim.reset()?;
        Ok(sim)
    }

    /// Validate and store a new configuration. Takes effect at the next
    /// `reset()`; the current run keeps its precomputed state.
    pub fn configure(&mut self, config: SimulationConfig) -> SimResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Recompute trajectory and landmarks from the current configuration
    /// and reinitialize both estimators, the RNG, and all histories
    pub fn reset(&mut self) -> SimResult<()> {
        self.config.validate()?;
        let trajectory = self.path.sample(self.config.total_time, self.config.dt);
        let landmark_set = landmarks::generate(self.config.landmark_count)?;
        let start = trajectory.first().copied().unwrap_or_else(Pose2D::origin);

        // everything rebuilt above; swap it in as one logical operation
        let noise = self.config.noise;
        self.motion_noise = MotionNoiseModel::new(noise.linear_std, noise.angular_std);
        self.sensor = LandmarkSensorModel::new(noise.range_std, noise.bearing_std);
        self.ekf = ExtendedKalmanFilter::new(&noise);
        self.odometry = OdometryIntegrator::new(start);
        self.rng = StdRng::seed_from_u64(self.seed);
        self.trajectory = trajectory;
        self.landmarks = landmark_set;
        self.step_index = 0;
        self.baseline_trajectory = vec![start];
        self.ekf_trajectory.clear();
        self.velocity_history.clear();
        self.error_history.clear();
        Ok(())
    }

    /// Advance one simulation tick
    ///
    /// The first call after a reset is a warm-up: it only moves the index
    /// past sample zero, since the finite-difference velocity needs a
    /// previous pose. Once the trajectory is exhausted the call is a
    /// no-op returning `Finished`.
    pub fn step(&mut self) -> StepOutcome {
        if self.step_index + 1 >= self.trajectory.len() {
            return StepOutcome::Finished;
        }

        let snapshot = if self.step_index == 0 {
            self.step_index = 1;
            StepSnapshot {
                step: 0,
                time: 0.0,
                true_pose: self.trajectory[0],
                baseline_pose: self.odometry.pose(),
                ekf_pose: self.ekf.pose(),
                last_errors: None,
            }
        } else {
            self.run_single_step()
        };

        for observer in &mut self.observers {
            observer.on_step(&snapshot);
        }
        StepOutcome::Stepped(snapshot)
    }

    fn run_single_step(&mut self) -> StepSnapshot {
        let dt = self.config.dt;
        let index = self.step_index;
        let truth = self.trajectory[index];
        let prev = self.trajectory[index - 1];
        let time = index as f64 * dt;

        // true velocities by finite difference of the ground truth
        let dx = truth.x - prev.x;
        let dy = truth.y - prev.y;
        let true_cmd = VelocityCommand::new(
            (dx * dx + dy * dy).sqrt() / dt,
            (truth.theta - prev.theta) / dt,
        );
        let measured_cmd = self.motion_noise.perturb(true_cmd, &mut self.rng);
        self.velocity_history.push(VelocityRecord { time, true_cmd, measured_cmd });

        self.ekf.predict(&measured_cmd, dt);
        if self.landmarks_enabled {
            // observe from the TRUE pose; observing the estimate would
            // feed the filter its own error back
            let measurements = self.sensor.observe(&truth, &self.landmarks, &mut self.rng);
            self.ekf.update(&measurements, &self.landmarks);
        }

        let baseline_pose = self.odometry.advance(&measured_cmd, dt);
        let ekf_pose = self.ekf.pose();
        self.baseline_trajectory.push(baseline_pose);
        self.ekf_trajectory.push(ekf_pose);

        let errors = ErrorRecord {
            time,
            baseline: PoseError::between(&baseline_pose, &truth),
            ekf: PoseError::between(&ekf_pose, &truth),
        };
        self.error_history.push(errors);
        self.step_index += 1;

        StepSnapshot {
            step: index,
            time,
            true_pose: truth,
            baseline_pose,
            ekf_pose,
            last_errors: Some(errors),
        }
    }

    /// Repeated `step()` until the trajectory is exhausted
    pub fn run_to_completion(&mut self) {
        while let StepOutcome::Stepped(_) = self.step() {}
    }

    /// Toggle landmark corrections; does not reset the run
    pub fn set_landmarks_enabled(&mut self, enabled: bool) {
        self.landmarks_enabled = enabled;
    }

    /// Register a callback invoked synchronously after every completed step
    pub fn add_observer(&mut self, observer: Box<dyn StepObserver>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn landmarks_enabled(&self) -> bool {
        self.landmarks_enabled
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn true_trajectory(&self) -> &[Pose2D] {
        &self.trajectory
    }

    pub fn baseline_trajectory(&self) -> &[Pose2D] {
        &self.baseline_trajectory
    }

    pub fn ekf_trajectory(&self) -> &[Pose2D] {
        &self.ekf_trajectory
    }

    pub fn error_history(&self) -> &[ErrorRecord] {
        &self.error_history
    }

    pub fn velocity_history(&self) -> &[VelocityRecord] {
        &self.velocity_history
    }

    /// Current EKF covariance, for uncertainty display
    pub fn ekf_covariance(&self) -> &nalgebra::Matrix3<f64> {
        self.ekf.covariance()
    }
}
