//! Parameters structure for JointCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::ControlLaw;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for joint control.
///
/// The same gains are applied to every joint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Params {
    /// The control law to actuate with.
    pub law: ControlLaw,

    // ---- GAINS ----
    /// Proportional gain.
    pub p: f64,

    /// Integral gain.
    pub i: f64,

    /// Derivative gain, applied to the measured joint velocity.
    pub d: f64,

    /// Non-linear compensation gain, applied to the sine of the current
    /// joint angle.
    pub c: f64,

    /// Initial value of the integral accumulator.
    ///
    /// The shipped control laws read the accumulator but do not update it,
    /// see the module documentation.
    pub integral_seed: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            law: ControlLaw::NonlinearPid,
            p: 15.0,
            i: 7.0,
            d: 5.0,
            c: 5.0,
            integral_seed: 1.0,
        }
    }
}
