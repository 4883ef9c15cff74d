//! # Arm inverse kinematics module
//!
//! Closed-form inverse kinematics for the Crustcrawler's three actuated
//! joints. The solver is single-branch: of the two mathematically valid
//! elbow solutions only the elbow-down branch is ever produced, so the
//! mapping from position to joint angles is deterministic.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod solver;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// Internal
pub use params::*;
pub use solver::*;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Possible errors that can occur while solving the inverse kinematics.
#[derive(Debug, thiserror::Error)]
pub enum IkError {
    #[error(
        "Position ({x:.2}, {y:.2}, {z:.2}) cm is outside the arm's reach \
         (elbow parameter {d:.4} not in [-1, 1])"
    )]
    Unreachable { x: f64, y: f64, z: f64, d: f64 },
}
