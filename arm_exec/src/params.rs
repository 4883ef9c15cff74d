//! # Arm Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the arm executable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArmExecParams {
    /// Period of one servo tick while executing a trajectory.
    ///
    /// Units: seconds
    pub tick_period_s: f64,

    /// Gravity-like torque gain of the simulated joints. The torque applied
    /// to each joint model is this gain times the sine of the joint angle,
    /// which is what the nonlinear compensation term of the controller is
    /// sized to cancel.
    pub model_gravity_gain: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ArmExecParams {
    fn default() -> Self {
        Self {
            tick_period_s: 0.01,
            model_gravity_gain: 5.0,
        }
    }
}
