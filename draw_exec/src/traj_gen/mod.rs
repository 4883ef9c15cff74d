//! # Trajectory generation module
//!
//! Converts a Cartesian drawing path into a time-stamped joint trajectory:
//! the arm settles in its home pose, moves to the start of the drawing,
//! traces the path at a pace proportional to its length, then returns home.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod builder;
mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// Internal
pub use builder::*;
pub use params::*;

use crate::arm_ik::IkError;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Possible errors that can occur during trajectory generation.
///
/// Any error discards the whole trajectory, a partial trajectory is never
/// produced.
#[derive(Debug, thiserror::Error)]
pub enum TrajGenError {
    #[error("Cannot build a trajectory from an empty path")]
    EmptyPath,

    #[error("Path point {index} cannot be reached: {source}")]
    UnreachablePoint {
        index: usize,
        #[source]
        source: IkError,
    },
}
