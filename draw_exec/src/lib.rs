//! # Drawing library.
//!
//! This library allows other crates in the workspace (and the tests) to access
//! items defined inside the drawing executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Request validation - checks a drawing request against the arm's limits before planning
pub mod request;

/// Path generation - builds the closed circular path in a rotated, translated plane
pub mod path_gen;

/// Arm inverse kinematics - maps Cartesian points to joint angles
pub mod arm_ik;

/// Trajectory generation - converts a Cartesian path into a time-stamped joint trajectory
pub mod traj_gen;

/// Trajectory client - submits trajectory goals to the arm server
pub mod traj_client;
