//! # Trajectory executor
//!
//! Drives the joint controllers through a received trajectory goal. The
//! setpoint of each joint is interpolated linearly between waypoints, the
//! active control law turns it into an effort once per servo tick, and the
//! effort is applied to a simulated joint. After the final waypoint (plus
//! the goal time tolerance) every joint must be inside its goal tolerance.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, warn};
use std::thread;
use std::time::{Duration, Instant};

use comms_if::traj::{
    error_code, JointTrajectory, TrajValidationError, TrajectoryResult, JOINT_NAMES, NUM_JOINTS,
};

// Internal
use crate::joint_ctrl::{InputData, JointCtrl};
use crate::params::ArmExecParams;
use util::module::State;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A simulated joint: a unit-inertia double integrator with a gravity-like
/// torque, standing in for the real actuator dynamics.
#[derive(Debug, Clone, Copy, Default)]
struct JointModel {
    /// Absolute position of the joint.
    ///
    /// Units: radians
    pos_rad: f64,

    /// Angular velocity of the joint.
    ///
    /// Units: radians/second
    vel_rads: f64,
}

/// Executes trajectory goals against the simulated arm.
pub struct Executor {
    joint_ctrl: JointCtrl,

    params: ArmExecParams,

    models: [JointModel; NUM_JOINTS],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl JointModel {
    /// Advance the model by one tick under the given effort.
    fn apply(&mut self, effort: f64, gravity_gain: f64, dt_s: f64) {
        let accel = effort + gravity_gain * self.pos_rad.sin();

        self.vel_rads += accel * dt_s;
        self.pos_rad += self.vel_rads * dt_s;
    }
}

impl Executor {
    /// Create a new executor with the arm at rest in its zero pose.
    pub fn new(joint_ctrl: JointCtrl, params: ArmExecParams) -> Self {
        Self {
            joint_ctrl,
            params,
            models: [JointModel::default(); NUM_JOINTS],
        }
    }

    /// The current position of every joint.
    ///
    /// Units: radians
    pub fn positions_rad(&self) -> [f64; NUM_JOINTS] {
        let mut pos = [0.0; NUM_JOINTS];
        for (p, model) in pos.iter_mut().zip(self.models.iter()) {
            *p = model.pos_rad;
        }
        pos
    }

    /// Execute a trajectory goal to completion and report the result.
    ///
    /// Invalid goals are rejected before any motion. The arm keeps whatever
    /// pose it reached, so the next goal starts from there.
    pub fn execute(&mut self, goal: &JointTrajectory) -> TrajectoryResult {
        // Reject structurally invalid goals before any motion
        if let Err(e) = goal.validate() {
            let code = match e {
                TrajValidationError::WrongJointCount(_) => error_code::INVALID_JOINTS,
                _ => error_code::INVALID_GOAL,
            };
            return TrajectoryResult::failure(code, e.to_string());
        }

        // The goal must name the arm's joints in actuation order
        for (name, expected) in goal.joint_names.iter().zip(JOINT_NAMES.iter()) {
            if name != expected {
                return TrajectoryResult::failure(
                    error_code::INVALID_JOINTS,
                    format!("Unknown joint \"{}\" (expected \"{}\")", name, expected),
                );
            }
        }

        // New goal, new controller transients
        self.joint_ctrl.reset();

        let start_pos = self.positions_rad();
        let end_time_s = goal.duration_s() + goal.goal_time_tolerance_s;
        let dt_s = self.params.tick_period_s;

        debug!(
            "Executing {} point goal over {:.2} s from {:?}",
            goal.points.len(),
            end_time_s,
            start_pos
        );

        let mut time_s = 0.0;

        while time_s < end_time_s {
            let cycle_start = Instant::now();

            let input = InputData {
                desired_rad: setpoint(goal, &start_pos, time_s),
                current_rad: self.positions_rad(),
                velocity_rads: self.velocities_rads(),
                dt_s,
            };

            let (output, _report) = match self.joint_ctrl.proc(&input) {
                Ok(o) => o,
                Err(e) => {
                    return TrajectoryResult::failure(
                        error_code::INVALID_GOAL,
                        format!("Joint control failed: {}", e),
                    )
                }
            };

            for (model, effort) in self.models.iter_mut().zip(output.effort.iter()) {
                model.apply(*effort, self.params.model_gravity_gain, dt_s);
            }

            time_s += dt_s;

            // Keep the servo ticks on their fixed period
            let cycle_dur = Instant::now() - cycle_start;
            match Duration::from_secs_f64(dt_s).checked_sub(cycle_dur) {
                Some(d) => thread::sleep(d),
                None => warn!(
                    "Servo tick overran by {:.6} s",
                    cycle_dur.as_secs_f64() - dt_s
                ),
            }
        }

        self.check_goal_tolerances(goal)
    }

    /// The current velocity of every joint.
    ///
    /// Units: radians/second
    fn velocities_rads(&self) -> [f64; NUM_JOINTS] {
        let mut vel = [0.0; NUM_JOINTS];
        for (v, model) in vel.iter_mut().zip(self.models.iter()) {
            *v = model.vel_rads;
        }
        vel
    }

    /// Check every joint against its goal tolerance at the end of execution.
    ///
    /// A missing or zero tolerance disables the check for that joint.
    fn check_goal_tolerances(&self, goal: &JointTrajectory) -> TrajectoryResult {
        let last = match goal.points.last() {
            Some(p) => p,
            None => return TrajectoryResult::success(),
        };

        for (i, name) in JOINT_NAMES.iter().enumerate() {
            let tolerance_rad = goal
                .goal_tolerances
                .iter()
                .find(|t| t.joint_name == *name)
                .map(|t| t.position_rad)
                .unwrap_or(0.0);

            if tolerance_rad <= 0.0 {
                continue;
            }

            let error_rad = (self.models[i].pos_rad - last.positions_rad[i]).abs();
            if error_rad > tolerance_rad {
                return TrajectoryResult::failure(
                    error_code::GOAL_TOLERANCE_VIOLATED,
                    format!(
                        "{} finished {:.4} rad from its target (tolerance {:.4})",
                        name, error_rad, tolerance_rad
                    ),
                );
            }
        }

        TrajectoryResult::success()
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Get the desired joint positions at `time_s`.
///
/// Setpoints are interpolated linearly between waypoints. Before the first
/// waypoint the interpolation runs from the pose the arm started the goal in,
/// after the last waypoint the final pose is held.
fn setpoint(
    goal: &JointTrajectory,
    start_pos: &[f64; NUM_JOINTS],
    time_s: f64,
) -> [f64; NUM_JOINTS] {
    let first = &goal.points[0];

    if time_s <= first.time_from_start_s {
        if first.time_from_start_s <= 0.0 {
            return first.positions_rad;
        }
        return lerp(
            start_pos,
            &first.positions_rad,
            time_s / first.time_from_start_s,
        );
    }

    for pair in goal.points.windows(2) {
        if time_s <= pair[1].time_from_start_s {
            let span_s = pair[1].time_from_start_s - pair[0].time_from_start_s;
            let alpha = (time_s - pair[0].time_from_start_s) / span_s;
            return lerp(&pair[0].positions_rad, &pair[1].positions_rad, alpha);
        }
    }

    goal.points
        .last()
        .map(|p| p.positions_rad)
        .unwrap_or(*start_pos)
}

/// Linear interpolation between two joint poses.
fn lerp(
    from: &[f64; NUM_JOINTS],
    to: &[f64; NUM_JOINTS],
    alpha: f64,
) -> [f64; NUM_JOINTS] {
    let mut out = [0.0; NUM_JOINTS];
    for i in 0..NUM_JOINTS {
        out[i] = from[i] + (to[i] - from[i]) * alpha;
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::joint_ctrl;
    use comms_if::traj::{JointTolerance, TrajectoryPoint};

    fn test_executor() -> Executor {
        // A coarser tick keeps the paced tests quick
        Executor::new(
            JointCtrl::with_params(joint_ctrl::Params::default()),
            ArmExecParams {
                tick_period_s: 0.02,
                model_gravity_gain: 5.0,
            },
        )
    }

    fn goal(points: Vec<TrajectoryPoint>, tolerance_rad: f64) -> JointTrajectory {
        JointTrajectory {
            joint_names: JOINT_NAMES.iter().map(|n| n.to_string()).collect(),
            points,
            goal_tolerances: JOINT_NAMES
                .iter()
                .map(|n| JointTolerance {
                    joint_name: n.to_string(),
                    position_rad: tolerance_rad,
                    velocity_rads: 0.0,
                    acceleration_radss: 0.0,
                })
                .collect(),
            goal_time_tolerance_s: 0.5,
        }
    }

    #[test]
    fn test_small_goal_converges() {
        let mut executor = test_executor();

        let result = executor.execute(&goal(
            vec![TrajectoryPoint {
                positions_rad: [0.2, -0.1, 0.3],
                time_from_start_s: 0.6,
            }],
            0.1,
        ));

        assert!(result.is_success(), "{:?}", result);
        let pos = executor.positions_rad();
        assert!((pos[0] - 0.2).abs() < 0.1);
        assert!((pos[2] - 0.3).abs() < 0.1);
    }

    #[test]
    fn test_unreasonable_tolerance_violated() {
        let mut executor = test_executor();

        // A large jump with almost no time and a microscopic tolerance
        let mut unreachable = goal(
            vec![TrajectoryPoint {
                positions_rad: [2.0, 2.0, 2.0],
                time_from_start_s: 0.05,
            }],
            1e-6,
        );
        unreachable.goal_time_tolerance_s = 0.0;

        let result = executor.execute(&unreachable);

        assert_eq!(result.error_code, error_code::GOAL_TOLERANCE_VIOLATED);
        assert!(!result.error_string.is_empty());
    }

    #[test]
    fn test_invalid_joint_names_rejected() {
        let mut executor = test_executor();

        let mut bad = goal(
            vec![TrajectoryPoint {
                positions_rad: [0.0; NUM_JOINTS],
                time_from_start_s: 0.1,
            }],
            0.1,
        );
        bad.joint_names[1] = "joint_7".to_string();

        let result = executor.execute(&bad);

        assert_eq!(result.error_code, error_code::INVALID_JOINTS);
    }

    #[test]
    fn test_non_increasing_goal_rejected_without_motion() {
        let mut executor = test_executor();

        let bad = goal(
            vec![
                TrajectoryPoint {
                    positions_rad: [1.0; NUM_JOINTS],
                    time_from_start_s: 0.2,
                },
                TrajectoryPoint {
                    positions_rad: [2.0; NUM_JOINTS],
                    time_from_start_s: 0.2,
                },
            ],
            0.1,
        );

        let result = executor.execute(&bad);

        assert_eq!(result.error_code, error_code::INVALID_GOAL);
        // The arm must not have moved
        assert_eq!(executor.positions_rad(), [0.0; NUM_JOINTS]);
    }

    #[test]
    fn test_setpoint_interpolation() {
        let traj = goal(
            vec![
                TrajectoryPoint {
                    positions_rad: [1.0, 0.0, 0.0],
                    time_from_start_s: 1.0,
                },
                TrajectoryPoint {
                    positions_rad: [2.0, 0.0, 0.0],
                    time_from_start_s: 3.0,
                },
            ],
            0.1,
        );
        let start = [0.0; NUM_JOINTS];

        // Halfway to the first point
        assert!((setpoint(&traj, &start, 0.5)[0] - 0.5).abs() < 1e-12);
        // Halfway between the two points
        assert!((setpoint(&traj, &start, 2.0)[0] - 1.5).abs() < 1e-12);
        // Held after the final point
        assert!((setpoint(&traj, &start, 10.0)[0] - 2.0).abs() < 1e-12);
    }
}
