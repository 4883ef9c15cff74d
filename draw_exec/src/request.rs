//! # Drawing request validation
//!
//! A drawing request is checked against the arm's limits before any planning
//! work happens. Invalid requests are rejected immediately with the offending
//! field and its bounds, and never produce partial state.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::Vector3;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Minimum number of points the circle may be drawn with.
pub const MIN_NUM_POINTS: usize = 3;

/// Maximum number of points the circle may be drawn with.
pub const MAX_NUM_POINTS: usize = 101;

/// Minimum orientation of the drawing board.
///
/// Units: degrees
pub const MIN_ORIENTATION_DEG: f64 = 0.0;

/// Maximum orientation of the drawing board.
///
/// Units: degrees
pub const MAX_ORIENTATION_DEG: f64 = 90.0;

/// Minimum distance between the arm's base and the nearest point of the
/// circle.
///
/// Units: centimeters
pub const MIN_REACH_MARGIN_CM: f64 = 20.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A request to draw a circle on the board.
#[derive(Debug, Clone)]
pub struct DrawRequest {
    /// Origin of the circle relative to the arm's base.
    ///
    /// Units: centimeters
    pub origin_cm: Vector3<f64>,

    /// Radius of the circle.
    ///
    /// Units: centimeters
    pub radius_cm: f64,

    /// Number of points to approximate the circle with.
    pub num_points: usize,

    /// Orientation of the board about the y axis.
    ///
    /// Units: degrees
    pub orientation_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Reasons a drawing request can be rejected.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("The radius must be positive, was {0:.2} cm")]
    NonPositiveRadius(f64),

    #[error(
        "Number of points must be in range [{min}, {max}], was {0}",
        min = MIN_NUM_POINTS,
        max = MAX_NUM_POINTS
    )]
    NumPointsOutOfRange(usize),

    #[error(
        "Orientation must be in range [{min:.1}, {max:.1}] degrees, was {0:.1}",
        min = MIN_ORIENTATION_DEG,
        max = MAX_ORIENTATION_DEG
    )]
    OrientationOutOfRange(f64),

    #[error(
        "Circle too close to the robot, the nearest point must be at least {margin:.0} cm from \
         the base, was {0:.2} cm",
        margin = MIN_REACH_MARGIN_CM
    )]
    CircleTooClose(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DrawRequest {
    /// Check that the request is within the arm's limits.
    ///
    /// The first violated rule is returned, no planning state is produced.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.radius_cm <= 0.0 {
            return Err(RequestError::NonPositiveRadius(self.radius_cm));
        }

        if self.num_points < MIN_NUM_POINTS || self.num_points > MAX_NUM_POINTS {
            return Err(RequestError::NumPointsOutOfRange(self.num_points));
        }

        if self.orientation_deg < MIN_ORIENTATION_DEG
            || self.orientation_deg > MAX_ORIENTATION_DEG
        {
            return Err(RequestError::OrientationOutOfRange(self.orientation_deg));
        }

        // The nearest point of the circle can be no closer to the base than
        // the origin distance minus the radius
        let nearest_cm = self.origin_cm.norm() - self.radius_cm;
        if nearest_cm < MIN_REACH_MARGIN_CM {
            return Err(RequestError::CircleTooClose(nearest_cm));
        }

        Ok(())
    }
}

/// The fixed axis the board is oriented about.
pub fn orientation_axis() -> Vector3<f64> {
    Vector3::new(0.0, 1.0, 0.0)
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_request() -> DrawRequest {
        DrawRequest {
            origin_cm: Vector3::new(0.0, 0.0, 40.0),
            radius_cm: 5.0,
            num_points: 4,
            orientation_deg: 0.0,
        }
    }

    #[test]
    fn test_valid_request_accepted() {
        // 40 cm origin with 5 cm radius leaves a 35 cm margin
        assert!(test_request().validate().is_ok());
    }

    #[test]
    fn test_circle_too_close_rejected() {
        let mut request = test_request();
        request.origin_cm = Vector3::new(0.0, 0.0, 15.0);

        match request.validate() {
            Err(RequestError::CircleTooClose(margin)) => {
                assert!((margin - 10.0).abs() < 1e-12)
            }
            other => panic!("Expected CircleTooClose, got {:?}", other),
        }
    }

    #[test]
    fn test_num_points_range_inclusive() {
        let mut request = test_request();

        request.num_points = 3;
        assert!(request.validate().is_ok());
        request.num_points = 101;
        assert!(request.validate().is_ok());

        request.num_points = 2;
        assert!(matches!(
            request.validate(),
            Err(RequestError::NumPointsOutOfRange(2))
        ));
        request.num_points = 102;
        assert!(matches!(
            request.validate(),
            Err(RequestError::NumPointsOutOfRange(102))
        ));
    }

    #[test]
    fn test_orientation_range() {
        let mut request = test_request();

        request.orientation_deg = 90.0;
        assert!(request.validate().is_ok());

        request.orientation_deg = -0.1;
        assert!(matches!(
            request.validate(),
            Err(RequestError::OrientationOutOfRange(_))
        ));
        request.orientation_deg = 90.1;
        assert!(matches!(
            request.validate(),
            Err(RequestError::OrientationOutOfRange(_))
        ));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let mut request = test_request();
        request.radius_cm = 0.0;

        assert!(matches!(
            request.validate(),
            Err(RequestError::NonPositiveRadius(_))
        ));
    }
}
