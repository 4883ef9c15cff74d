//! # Path generation module
//!
//! Builds the closed circular path the arm's head follows: points are placed
//! on a circle in the z=0 plane, rotated into the board's orientation, then
//! translated to the board's origin.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::Vector3;

// Internal
use util::maths;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// An ordered list of Cartesian points, in drawing order.
///
/// Units: centimeters
pub type Path = Vec<Vector3<f64>>;

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Generate the path in 3D space of where to draw the circle.
///
/// The circle is approximated by `num_points` segments, so the returned path
/// holds `num_points + 1` points with the last equal to the first to close
/// the loop.
///
/// # Arguments
/// - `origin_cm`: origin of the circle relative to the arm's base
/// - `radius_cm`: radius of the circle, must be positive
/// - `num_points`: number of segments to approximate the circle with, at least 3
/// - `angle_rad`: angle to rotate the drawing plane by
/// - `axis`: unit vector to rotate the drawing plane around
pub fn generate(
    origin_cm: &Vector3<f64>,
    radius_cm: f64,
    num_points: usize,
    angle_rad: f64,
    axis: &Vector3<f64>,
) -> Path {
    debug_assert!(radius_cm > 0.0);
    debug_assert!(num_points >= 3);

    // Place num_points + 1 points on the circle in the z=0 plane, starting at
    // angle zero. The final point closes the loop.
    let angle_between_rad = 2.0 * std::f64::consts::PI / num_points as f64;

    let mut path: Path = (0..=num_points)
        .map(|i| {
            let theta = i as f64 * angle_between_rad;
            radius_cm * Vector3::new(theta.cos(), theta.sin(), 0.0)
        })
        .collect();

    // Rotate the plane of the circle into the board's orientation
    path = maths::rotate_path(&path, angle_rad, axis);

    // Translate the circle onto the board
    path.iter().map(|p| p + origin_cm).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_path_is_closed_with_num_plus_one_points() {
        let origin = Vector3::new(0.0, 0.0, 0.0);
        let axis = Vector3::new(0.0, 1.0, 0.0);

        for num in &[3usize, 4, 10, 101] {
            let path = generate(&origin, 5.0, *num, 0.0, &axis);

            assert_eq!(path.len(), num + 1);
            assert!((path[0] - path[*num]).norm() < 1e-9);
        }
    }

    #[test]
    fn test_square_path_before_rotation() {
        // Four segments of radius 5 form a square-ish closed loop in the z=0
        // plane, starting on the +x axis
        let origin = Vector3::new(0.0, 0.0, 40.0);
        let axis = Vector3::new(0.0, 1.0, 0.0);

        let path = generate(&origin, 5.0, 4, 0.0, &axis);

        assert_eq!(path.len(), 5);
        let expected = [
            Vector3::new(5.0, 0.0, 40.0),
            Vector3::new(0.0, 5.0, 40.0),
            Vector3::new(-5.0, 0.0, 40.0),
            Vector3::new(0.0, -5.0, 40.0),
            Vector3::new(5.0, 0.0, 40.0),
        ];
        for (point, exp) in path.iter().zip(expected.iter()) {
            assert!((point - exp).norm() < 1e-9, "{} != {}", point, exp);
        }
    }

    #[test]
    fn test_every_point_is_radius_from_origin() {
        let origin = Vector3::new(3.0, -2.0, 35.0);
        let axis = Vector3::new(0.0, 1.0, 0.0);

        let path = generate(&origin, 7.5, 16, 0.3, &axis);

        for point in &path {
            assert!(((point - origin).norm() - 7.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_quarter_turn_about_y_maps_circle_into_vertical_plane() {
        // After a 90 degree rotation about y the circle lies in the x=0 plane
        // (before translation): x components map onto -z
        let origin = Vector3::new(0.0, 0.0, 0.0);
        let axis = Vector3::new(0.0, 1.0, 0.0);

        let path = generate(&origin, 5.0, 8, FRAC_PI_2, &axis);

        for point in &path {
            assert!(point[0].abs() < 1e-9);
        }
    }
}
