//! Closed-form inverse kinematics solver

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector3;

use comms_if::traj::NUM_JOINTS;

// Internal
use super::{IkError, Params};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Inverse kinematics solver for the arm.
///
/// The derived quantities are computed once at construction and reused for
/// every solve.
pub struct IkSolver {
    params: Params,

    /// Effective forearm length, combining the forearm and head links which
    /// are joined at a fixed 135 degree wrist.
    ///
    /// Units: centimeters
    l3_eff_cm: f64,

    /// Fixed angle between the forearm link and the effective forearm.
    ///
    /// Characterises the mechanical wrist offset only, the joint angle
    /// formulas do not use it.
    wrist_offset_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl IkSolver {
    /// Create a new solver for the given arm geometry.
    pub fn new(params: Params) -> Self {
        let (l3, l4) = (params.l3_cm, params.l4_cm);

        // Law of cosines across the fixed wrist angle
        let l3_eff_cm =
            (l4.powi(2) + l3.powi(2) + 2.0_f64.sqrt() / 2.0 * l4 * l3).sqrt();
        let wrist_offset_rad =
            ((l3.powi(2) + l3_eff_cm.powi(2) - l4.powi(2)) / (2.0 * l3 * l3_eff_cm)).acos();

        debug!(
            "IkSolver geometry: effective forearm {:.3} cm, wrist offset {:.4} rad",
            l3_eff_cm, wrist_offset_rad
        );

        Self {
            params,
            l3_eff_cm,
            wrist_offset_rad,
        }
    }

    /// Effective forearm length.
    ///
    /// Units: centimeters
    pub fn effective_forearm_cm(&self) -> f64 {
        self.l3_eff_cm
    }

    /// Fixed angle between the forearm link and the effective forearm.
    ///
    /// Units: radians
    pub fn wrist_offset_rad(&self) -> f64 {
        self.wrist_offset_rad
    }

    /// Calculate the joint angles which place the arm's head at `position_cm`.
    ///
    /// The returned angles are ordered (joint_1, joint_2, joint_3) and follow
    /// the physical joints' zero references. For any reachable position the
    /// mapping is deterministic and single-valued, the elbow-down branch is
    /// always chosen.
    pub fn solve(&self, position_cm: &Vector3<f64>) -> Result<[f64; NUM_JOINTS], IkError> {
        let (x, y, z) = (position_cm[0], position_cm[1], position_cm[2]);
        let (l1, l2) = (self.params.l1_cm, self.params.l2_cm);
        let l3_eff = self.l3_eff_cm;

        // Height above the shoulder and horizontal distance from the base axis
        let s = z - l1;
        let r = (x.powi(2) + y.powi(2)).sqrt();

        // Law of cosines elbow parameter. Outside [-1, 1] the triangle formed
        // by the two links and the target cannot close and the position is
        // unreachable.
        let d = (x.powi(2) + y.powi(2) + s.powi(2) - l2.powi(2) - l3_eff.powi(2))
            / (2.0 * l2 * l3_eff);

        if d < -1.0 || d > 1.0 {
            return Err(IkError::Unreachable { x, y, z, d });
        }

        let theta_1 = y.atan2(x);

        // Negative root selects the elbow-down branch
        let theta_3 = (-(1.0 - d.powi(2)).sqrt()).atan2(d);

        let theta_2 =
            s.atan2(r) - (l3_eff * theta_3.sin()).atan2(l2 + l3_eff * theta_3.cos());

        // Map onto the joints' zero references
        Ok([
            theta_1,
            -theta_2 + std::f64::consts::FRAC_PI_2,
            -theta_3,
        ])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    /// Forward kinematics of the shoulder-elbow chain, used to check the
    /// solver against known joint angles.
    fn forward(solver: &IkSolver, joints: &[f64; NUM_JOINTS]) -> Vector3<f64> {
        let params = Params::default();

        // Undo the joint zero reference mapping
        let theta_1 = joints[0];
        let theta_2 = FRAC_PI_2 - joints[1];
        let theta_3 = -joints[2];

        let r = params.l2_cm * theta_2.cos()
            + solver.effective_forearm_cm() * (theta_2 + theta_3).cos();
        let s = params.l2_cm * theta_2.sin()
            + solver.effective_forearm_cm() * (theta_2 + theta_3).sin();

        Vector3::new(
            r * theta_1.cos(),
            r * theta_1.sin(),
            s + params.l1_cm,
        )
    }

    #[test]
    fn test_solver_is_deterministic() {
        let solver = IkSolver::new(Params::default());
        let position = Vector3::new(5.0, 3.0, 40.0);

        let first = solver.solve(&position).unwrap();
        let second = solver.solve(&position).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_through_forward_kinematics() {
        let solver = IkSolver::new(Params::default());

        // A selection of joint configurations on the elbow-down branch
        // (negative raw elbow angle maps to positive joint_3)
        let configs: [[f64; NUM_JOINTS]; 3] = [
            [0.3, FRAC_PI_2 - 0.4, 0.8],
            [-1.0, FRAC_PI_2 - 0.9, 1.2],
            [0.0, FRAC_PI_2 - 0.2, 0.5],
        ];

        for joints in &configs {
            let position = forward(&solver, joints);
            let solved = solver.solve(&position).unwrap();

            for (got, expected) in solved.iter().zip(joints.iter()) {
                assert!(
                    (got - expected).abs() < 1e-9,
                    "{:?} -> {:?} != {:?}",
                    position,
                    solved,
                    joints
                );
            }
        }
    }

    #[test]
    fn test_far_position_unreachable() {
        let solver = IkSolver::new(Params::default());

        match solver.solve(&Vector3::new(100.0, 0.0, 50.0)) {
            Err(IkError::Unreachable { d, .. }) => assert!(d > 1.0),
            other => panic!("Expected Unreachable, got {:?}", other),
        }
    }

    #[test]
    fn test_inner_dead_zone_unreachable() {
        let solver = IkSolver::new(Params::default());

        // A point almost on the shoulder is inside the annular workspace
        match solver.solve(&Vector3::new(0.1, 0.0, 11.0)) {
            Err(IkError::Unreachable { d, .. }) => assert!(d < -1.0),
            other => panic!("Expected Unreachable, got {:?}", other),
        }
    }

    #[test]
    fn test_nominal_drawing_points_reachable() {
        let solver = IkSolver::new(Params::default());

        // The nominal board: circle of radius 5 at 40 cm above the base
        for i in 0..8 {
            let theta = i as f64 * std::f64::consts::PI / 4.0;
            let position =
                Vector3::new(5.0 * theta.cos(), 5.0 * theta.sin(), 40.0);

            assert!(solver.solve(&position).is_ok(), "{} unreachable", position);
        }
    }
}
