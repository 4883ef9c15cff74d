//! # Joint trajectory goal and result definitions
//!
//! The planner sends a [`JointTrajectory`] goal to the arm executable, which
//! executes it and replies with a [`TrajectoryResult`]. Both are serialized
//! as JSON over the trajectory socket.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// The number of actuated joints on the arm.
pub const NUM_JOINTS: usize = 3;

/// The names of the actuated joints, in actuation order.
pub const JOINT_NAMES: [&str; NUM_JOINTS] = ["joint_1", "joint_2", "joint_3"];

/// Error codes which can be returned in a [`TrajectoryResult`].
///
/// These follow the joint trajectory action convention: zero is success,
/// negative values identify the failure class.
pub mod error_code {
    pub const SUCCESSFUL: i32 = 0;
    pub const INVALID_GOAL: i32 = -1;
    pub const INVALID_JOINTS: i32 = -2;
    pub const GOAL_TOLERANCE_VIOLATED: i32 = -5;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single time-stamped joint-space waypoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    /// Demanded position of each joint.
    ///
    /// Units: radians
    pub positions_rad: [f64; NUM_JOINTS],

    /// Time offset of this point from the start of the trajectory.
    ///
    /// Units: seconds
    pub time_from_start_s: f64,
}

/// How much a joint may deviate from its target at the end of the trajectory
/// while the goal still counts as reached.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JointTolerance {
    /// Name of the joint this tolerance applies to
    pub joint_name: String,

    /// Maximum allowed position deviation.
    ///
    /// Units: radians
    pub position_rad: f64,

    /// Maximum allowed velocity deviation. Unused by the current arm, zero.
    ///
    /// Units: radians/second
    pub velocity_rads: f64,

    /// Maximum allowed acceleration deviation. Unused by the current arm, zero.
    ///
    /// Units: radians/second^2
    pub acceleration_radss: f64,
}

/// A complete joint trajectory goal.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JointTrajectory {
    /// Names describing which joint is actuated by which element of the
    /// position arrays in `points`.
    pub joint_names: Vec<String>,

    /// The time-stamped waypoints, in execution order.
    pub points: Vec<TrajectoryPoint>,

    /// Goal tolerance for each joint.
    pub goal_tolerances: Vec<JointTolerance>,

    /// How many seconds the execution may overrun the last point's time
    /// offset before the goal is considered failed.
    pub goal_time_tolerance_s: f64,
}

/// Result returned by the arm executable once a trajectory goal has finished.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrajectoryResult {
    /// One of the [`error_code`] constants, zero on success
    pub error_code: i32,

    /// Human readable description of the failure, empty on success
    pub error_string: String,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Structural problems which make a [`JointTrajectory`] unexecutable.
#[derive(Debug, Error)]
pub enum TrajValidationError {
    #[error("Expected {expected} joint names, found {0}", expected = NUM_JOINTS)]
    WrongJointCount(usize),

    #[error("Trajectory contains no points")]
    NoPoints,

    #[error("Point {0} contains a non-finite position or time offset")]
    NonFiniteValue(usize),

    #[error("Point {index} time offset is negative ({time_s} s)")]
    NegativeTime { index: usize, time_s: f64 },

    #[error(
        "Time offsets are not strictly increasing at point {index} ({prev_s} s -> {next_s} s)"
    )]
    NonIncreasingTime {
        index: usize,
        prev_s: f64,
        next_s: f64,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl JointTrajectory {
    /// Check the structural invariants of the trajectory.
    ///
    /// A valid trajectory has the expected number of joint names, at least one
    /// point, finite values throughout, and strictly increasing non-negative
    /// time offsets.
    pub fn validate(&self) -> Result<(), TrajValidationError> {
        if self.joint_names.len() != NUM_JOINTS {
            return Err(TrajValidationError::WrongJointCount(
                self.joint_names.len(),
            ));
        }

        if self.points.is_empty() {
            return Err(TrajValidationError::NoPoints);
        }

        for (i, point) in self.points.iter().enumerate() {
            let finite = point.time_from_start_s.is_finite()
                && point.positions_rad.iter().all(|p| p.is_finite());
            if !finite {
                return Err(TrajValidationError::NonFiniteValue(i));
            }

            if point.time_from_start_s < 0.0 {
                return Err(TrajValidationError::NegativeTime {
                    index: i,
                    time_s: point.time_from_start_s,
                });
            }
        }

        for (i, pair) in self.points.windows(2).enumerate() {
            if pair[1].time_from_start_s <= pair[0].time_from_start_s {
                return Err(TrajValidationError::NonIncreasingTime {
                    index: i + 1,
                    prev_s: pair[0].time_from_start_s,
                    next_s: pair[1].time_from_start_s,
                });
            }
        }

        Ok(())
    }

    /// Get the time offset of the final point.
    ///
    /// # Panics
    /// - Panics if the trajectory is empty, validate first.
    pub fn duration_s(&self) -> f64 {
        self.points
            .last()
            .expect("Cannot get the duration of an empty trajectory")
            .time_from_start_s
    }
}

impl TrajectoryResult {
    /// Build a success result.
    pub fn success() -> Self {
        Self {
            error_code: error_code::SUCCESSFUL,
            error_string: String::new(),
        }
    }

    /// Build a failure result from a code and description.
    pub fn failure<S: Into<String>>(code: i32, description: S) -> Self {
        Self {
            error_code: code,
            error_string: description.into(),
        }
    }

    /// True if the result indicates success.
    pub fn is_success(&self) -> bool {
        self.error_code == error_code::SUCCESSFUL
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_trajectory() -> JointTrajectory {
        JointTrajectory {
            joint_names: JOINT_NAMES.iter().map(|n| n.to_string()).collect(),
            points: vec![
                TrajectoryPoint {
                    positions_rad: [0.0, 0.0, std::f64::consts::FRAC_PI_2],
                    time_from_start_s: 4.0,
                },
                TrajectoryPoint {
                    positions_rad: [0.1, 0.2, 0.3],
                    time_from_start_s: 8.0,
                },
            ],
            goal_tolerances: JOINT_NAMES
                .iter()
                .map(|n| JointTolerance {
                    joint_name: n.to_string(),
                    position_rad: 0.1,
                    velocity_rads: 0.0,
                    acceleration_radss: 0.0,
                })
                .collect(),
            goal_time_tolerance_s: 0.5,
        }
    }

    #[test]
    fn test_valid_trajectory_passes() {
        assert!(test_trajectory().validate().is_ok());
    }

    #[test]
    fn test_wrong_joint_count_rejected() {
        let mut traj = test_trajectory();
        traj.joint_names.pop();

        match traj.validate() {
            Err(TrajValidationError::WrongJointCount(2)) => (),
            other => panic!("Expected WrongJointCount, got {:?}", other),
        }
    }

    #[test]
    fn test_non_increasing_time_rejected() {
        let mut traj = test_trajectory();
        traj.points[1].time_from_start_s = 4.0;

        match traj.validate() {
            Err(TrajValidationError::NonIncreasingTime { index: 1, .. }) => (),
            other => panic!("Expected NonIncreasingTime, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let mut traj = test_trajectory();
        traj.points[0].positions_rad[2] = f64::NAN;

        match traj.validate() {
            Err(TrajValidationError::NonFiniteValue(0)) => (),
            other => panic!("Expected NonFiniteValue, got {:?}", other),
        }
    }

    #[test]
    fn test_goal_serde_round_trip() {
        let traj = test_trajectory();

        let json = serde_json::to_string(&traj).unwrap();
        let parsed: JointTrajectory = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.joint_names, traj.joint_names);
        assert_eq!(parsed.points, traj.points);
        assert_eq!(parsed.goal_time_tolerance_s, traj.goal_time_tolerance_s);
    }
}
