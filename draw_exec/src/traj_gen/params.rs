//! Parameters structure for trajectory generation

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::traj::NUM_JOINTS;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for trajectory generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- POSES ----
    /// Joint positions of the arm's home pose. The trajectory starts and
    /// ends here.
    ///
    /// Units: radians
    pub home_pose_rad: [f64; NUM_JOINTS],

    // ---- TIMING ----
    /// Time allowed for the arm to settle into the home pose at the start,
    /// and to return to it at the end.
    ///
    /// Units: seconds
    pub home_dwell_s: f64,

    /// Additional time allowed for the move from home to the first drawing
    /// point. A large value here avoids a jerk at the start of the drawing.
    ///
    /// Units: seconds
    pub start_dwell_s: f64,

    /// Scale applied to the path length to obtain the total drawing time
    /// budget, which is then divided evenly across the path points.
    ///
    /// Units: seconds/centimeter
    pub drawing_pace_s_per_cm: f64,

    // ---- TOLERANCES ----
    /// Goal position tolerance applied to every joint.
    ///
    /// Units: radians
    pub goal_position_tolerance_rad: f64,

    /// How many seconds the execution may take beyond the trajectory's last
    /// time offset.
    ///
    /// Units: seconds
    pub goal_time_tolerance_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            home_pose_rad: [0.0, 0.0, std::f64::consts::FRAC_PI_2],
            home_dwell_s: 4.0,
            start_dwell_s: 4.0,
            drawing_pace_s_per_cm: 0.5,
            goal_position_tolerance_rad: 0.1,
            goal_time_tolerance_s: 0.5,
        }
    }
}
