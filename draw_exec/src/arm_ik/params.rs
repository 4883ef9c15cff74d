//! Parameters structure for the arm inverse kinematics

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the arm inverse kinematics.
///
/// The defaults are the link lengths of the Crustcrawler platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Length of the base link, from the mounting plane to the shoulder
    /// joint.
    ///
    /// Units: centimeters
    pub l1_cm: f64,

    /// Length of the upper arm link, shoulder to elbow.
    ///
    /// Units: centimeters
    pub l2_cm: f64,

    /// Length of the forearm link, elbow to wrist.
    ///
    /// Units: centimeters
    pub l3_cm: f64,

    /// Length of the head link, wrist to pen tip.
    ///
    /// Units: centimeters
    pub l4_cm: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            l1_cm: 11.0,
            l2_cm: 22.3,
            l3_cm: 17.1,
            l4_cm: 8.0,
        }
    }
}
