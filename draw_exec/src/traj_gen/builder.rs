//! Trajectory builder implementation

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::debug;

use comms_if::traj::{
    JointTolerance, JointTrajectory, TrajectoryPoint, JOINT_NAMES, NUM_JOINTS,
};

// Internal
use super::{Params, TrajGenError};
use crate::arm_ik::IkSolver;
use crate::path_gen::Path;
use util::maths;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Builds time-stamped joint trajectories from Cartesian drawing paths.
pub struct TrajBuilder {
    params: Params,

    solver: IkSolver,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajBuilder {
    /// Create a new builder from the timing parameters and an IK solver.
    pub fn new(params: Params, solver: IkSolver) -> Self {
        Self { params, solver }
    }

    /// Build the joint trajectory which draws the given path.
    ///
    /// The trajectory holds `path.len() + 3` points: the home pose, the IK
    /// solution of every path point (the first with an extra dwell to avoid
    /// jerking from home to the board) and the home pose again. Time offsets
    /// are strictly increasing.
    ///
    /// Fails without producing anything if any path point is unreachable.
    pub fn build(&self, path: &Path) -> Result<JointTrajectory, TrajGenError> {
        if path.is_empty() {
            return Err(TrajGenError::EmptyPath);
        }

        let mut points = Vec::with_capacity(path.len() + 3);

        // Cumulative time since start. The arm gets a large dwell to settle
        // into home before the motion starts.
        let mut time_s = self.params.home_dwell_s;
        points.push(TrajectoryPoint {
            positions_rad: self.params.home_pose_rad,
            time_from_start_s: time_s,
        });

        // Initial drawing point, also with a large time fraction to avoid
        // jerking
        time_s += self.params.start_dwell_s;
        points.push(TrajectoryPoint {
            positions_rad: self.solve_point(path, 0)?,
            time_from_start_s: time_s,
        });

        // Divide the drawing time budget evenly across the sample points.
        // The budget is proportional to the circle length, assuming a
        // constant nominal pen speed.
        let length_cm = maths::path_length(path);
        let time_delta_s = length_cm * self.params.drawing_pace_s_per_cm / path.len() as f64;

        debug!(
            "Drawing {:.2} cm path over {:.2} s ({:.3} s per point)",
            length_cm,
            length_cm * self.params.drawing_pace_s_per_cm,
            time_delta_s
        );

        for index in 1..path.len() {
            time_s += time_delta_s;
            points.push(TrajectoryPoint {
                positions_rad: self.solve_point(path, index)?,
                time_from_start_s: time_s,
            });
        }

        // Once drawing is done return to the home pose
        time_s += self.params.home_dwell_s;
        points.push(TrajectoryPoint {
            positions_rad: self.params.home_pose_rad,
            time_from_start_s: time_s,
        });

        Ok(JointTrajectory {
            joint_names: JOINT_NAMES.iter().map(|n| n.to_string()).collect(),
            points,
            goal_tolerances: self.goal_tolerances(),
            goal_time_tolerance_s: self.params.goal_time_tolerance_s,
        })
    }

    /// Solve the IK for one path point, tagging failures with the point's
    /// index.
    fn solve_point(
        &self,
        path: &Path,
        index: usize,
    ) -> Result<[f64; NUM_JOINTS], TrajGenError> {
        self.solver
            .solve(&path[index])
            .map_err(|source| TrajGenError::UnreachablePoint { index, source })
    }

    /// The per-joint goal tolerances from the parameters.
    ///
    /// Velocity and acceleration tolerances are unused by the arm and zero.
    fn goal_tolerances(&self) -> Vec<JointTolerance> {
        JOINT_NAMES
            .iter()
            .map(|name| JointTolerance {
                joint_name: name.to_string(),
                position_rad: self.params.goal_position_tolerance_rad,
                velocity_rads: 0.0,
                acceleration_radss: 0.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{arm_ik, path_gen};
    use nalgebra::Vector3;

    fn test_builder() -> TrajBuilder {
        TrajBuilder::new(
            Params::default(),
            IkSolver::new(arm_ik::Params::default()),
        )
    }

    fn nominal_path() -> Path {
        path_gen::generate(
            &Vector3::new(0.0, 0.0, 40.0),
            5.0,
            4,
            0.0,
            &Vector3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_point_count_is_path_plus_three() {
        // A 4 point circle closes with 5 path points, giving 8 trajectory
        // points with the home start, dwelled first point and home end
        let path = nominal_path();
        let traj = test_builder().build(&path).unwrap();

        assert_eq!(traj.points.len(), path.len() + 3);
        assert_eq!(traj.points.len(), 8);
    }

    #[test]
    fn test_timestamps_strictly_increasing() {
        let traj = test_builder().build(&nominal_path()).unwrap();

        assert!(traj.validate().is_ok());
        for pair in traj.points.windows(2) {
            assert!(pair[1].time_from_start_s > pair[0].time_from_start_s);
        }
    }

    #[test]
    fn test_starts_and_ends_at_home() {
        let params = Params::default();
        let traj = test_builder().build(&nominal_path()).unwrap();

        let first = traj.points.first().unwrap();
        let last = traj.points.last().unwrap();

        assert_eq!(first.positions_rad, params.home_pose_rad);
        assert_eq!(last.positions_rad, params.home_pose_rad);
        assert_eq!(first.time_from_start_s, 4.0);
    }

    #[test]
    fn test_dwell_times_and_pacing() {
        let path = nominal_path();
        let traj = test_builder().build(&path).unwrap();

        // Home at 4 s, first drawing point at 8 s
        assert_eq!(traj.points[0].time_from_start_s, 4.0);
        assert_eq!(traj.points[1].time_from_start_s, 8.0);

        // Each remaining path point advances by length / 2 / len(path)
        let delta_s = util::maths::path_length(&path) * 0.5 / path.len() as f64;
        assert!(
            (traj.points[2].time_from_start_s - (8.0 + delta_s)).abs() < 1e-9
        );

        // Return to home 4 s after the last drawing point
        let n = traj.points.len();
        assert!(
            (traj.points[n - 1].time_from_start_s
                - traj.points[n - 2].time_from_start_s
                - 4.0)
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_unreachable_point_discards_whole_trajectory() {
        // A path whose third point is far outside the arm's reach
        let mut path = nominal_path();
        path[2] = Vector3::new(200.0, 0.0, 40.0);

        match test_builder().build(&path) {
            Err(TrajGenError::UnreachablePoint { index: 2, .. }) => (),
            other => panic!("Expected UnreachablePoint, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            test_builder().build(&Vec::new()),
            Err(TrajGenError::EmptyPath)
        ));
    }
}
