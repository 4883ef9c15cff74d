//! # Joint control module
//!
//! Per-joint feedback control for the arm's low-level servoing. Each joint
//! runs the same control law, selected explicitly through the parameters
//! rather than being fixed in code, so the simpler laws stay available for
//! comparison and tuning.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The control law used to turn a position error into a joint effort.
///
/// Exactly one law is active for actuation at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLaw {
    /// Proportional control only.
    Proportional,

    /// Proportional control with velocity damping.
    ProportionalDerivative,

    /// Proportional, integral and velocity damping terms.
    Pid,

    /// The full law: PID with a gravity-like compensation term proportional
    /// to the sine of the current joint angle.
    NonlinearPid,
}

/// Possible errors that can occur during JointCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum JointCtrlError {
    #[error("JointCtrl has not been initialised")]
    NotInitialised,

    #[error("Joint {index} received a non-finite input (desired {desired_rad}, current {current_rad}, velocity {velocity_rads})")]
    NonFiniteInput {
        index: usize,
        desired_rad: f64,
        current_rad: f64,
        velocity_rads: f64,
    },
}
