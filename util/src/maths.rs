//! Utility maths functions
//!
//! Geometry primitives shared by the planning modules: axis-angle rotation
//! and polyline length.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Matrix3, Vector3};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the Rodrigues rotation matrix for a rotation of `angle_rad` about
/// `axis`.
///
/// `axis` must be a unit vector. It is the caller's responsibility to
/// normalise it, no renormalisation is performed here.
pub fn rodrigues(angle_rad: f64, axis: &Vector3<f64>) -> Matrix3<f64> {
    let (x, y, z) = (axis[0], axis[1], axis[2]);
    let s = angle_rad.sin();
    let c = angle_rad.cos();
    let v = 1.0 - c;

    Matrix3::new(
        x * x * v + c,      x * y * v - z * s,  x * z * v + y * s,
        x * y * v + z * s,  y * y * v + c,      y * z * v - x * s,
        x * z * v - y * s,  y * z * v + x * s,  z * z * v + c,
    )
}

/// Rotate all points of a path by an angle-axis rotation.
///
/// Returns a new path of the same length and ordering. A zero angle is the
/// identity and returns the input unchanged.
pub fn rotate_path(
    path: &[Vector3<f64>],
    angle_rad: f64,
    axis: &Vector3<f64>
) -> Vec<Vector3<f64>> {
    if angle_rad == 0.0 {
        return path.to_vec();
    }

    let mat = rodrigues(angle_rad, axis);

    path.iter().map(|p| mat * p).collect()
}

/// Calculate the length of a path as the sum of the euclidian distances
/// between consecutive points.
///
/// An empty or single-point path has zero length.
pub fn path_length(path: &[Vector3<f64>]) -> f64 {
    path.windows(2).map(|pair| (pair[1] - pair[0]).norm()).sum()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rodrigues_principal_axes() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        let z = Vector3::new(0.0, 0.0, 1.0);

        // Quarter turn about y maps +x onto -z
        let about_y = rodrigues(FRAC_PI_2, &y) * x;
        assert!((about_y - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);

        // Quarter turn about z maps +x onto +y
        let about_z = rodrigues(FRAC_PI_2, &z) * x;
        assert!((about_z - y).norm() < 1e-12);

        // Quarter turn about x maps +y onto +z
        let about_x = rodrigues(FRAC_PI_2, &x) * y;
        assert!((about_x - z).norm() < 1e-12);
    }

    #[test]
    fn test_rotate_path_zero_angle_is_identity() {
        let path = vec![
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-4.0, 5.0, -6.0),
        ];

        let rotated = rotate_path(&path, 0.0, &Vector3::new(0.0, 1.0, 0.0));

        assert_eq!(path, rotated);
    }

    #[test]
    fn test_path_length_invariant_under_rotation_and_translation() {
        let path = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 2.0),
        ];
        let length = path_length(&path);

        let axis = Vector3::new(0.0, 1.0, 0.0);
        let rotated = rotate_path(&path, PI / 3.0, &axis);
        let offset = Vector3::new(10.0, -4.0, 2.5);
        let translated: Vec<_> = rotated.iter().map(|p| p + offset).collect();

        assert!((path_length(&rotated) - length).abs() < 1e-12);
        assert!((path_length(&translated) - length).abs() < 1e-12);
    }

    #[test]
    fn test_path_length_degenerate_paths() {
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&[Vector3::new(1.0, 1.0, 1.0)]), 0.0);
    }
}
