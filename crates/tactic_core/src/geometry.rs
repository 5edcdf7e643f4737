//! Continuous 2D math for spatial reasoning.
//!
//! Closed-form routines consumed by placement and movement logic:
//! point-onto-line projection, circle-circle intersections, centroids
//! and pairwise distance matrices. All of it is plain `f32` math; the
//! discrete grid side lives in [`crate::raster`].

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Integer grid-cell coordinate.
///
/// Identity is value-based, so cells can be used as hash/set keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridPoint {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl GridPoint {
    /// Create a new grid point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for GridPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Neg for GridPoint {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Continuous 2D position or direction vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanePoint {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl PlanePoint {
    /// Create a new plane point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Round half-up to the containing grid cell.
    #[must_use]
    pub fn rounded(self) -> GridPoint {
        GridPoint::new(
            (self.x + 0.5).floor() as i32,
            (self.y + 0.5).floor() as i32,
        )
    }
}

impl From<GridPoint> for PlanePoint {
    fn from(p: GridPoint) -> Self {
        Self::new(p.x as f32, p.y as f32)
    }
}

impl std::ops::Add for PlanePoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for PlanePoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f32> for PlanePoint {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Orthogonally project `position` onto the infinite line through
/// `origin` with direction vector `direction`.
///
/// Uses the orthogonal-complement formula: subtract from `position` its
/// component along the perpendicular of `direction`.
///
/// # Errors
///
/// Returns [`CoreError::ZeroDirection`] if `direction` is the zero vector,
/// since the line is undefined in that case.
pub fn project_point_onto_line(
    origin: PlanePoint,
    direction: PlanePoint,
    position: PlanePoint,
) -> Result<PlanePoint> {
    let orthogonal = PlanePoint::new(direction.y, -direction.x);
    let denominator = orthogonal.dot(orthogonal);
    if denominator == 0.0 {
        return Err(CoreError::ZeroDirection);
    }
    let scale = (position - origin).dot(orthogonal) / denominator;
    Ok(position - orthogonal * scale)
}

/// Intersection points of two circles.
///
/// Yields exactly two points when the circles properly intersect
/// (`|r1 - r2| <= d <= r1 + r2` with `d > 0`), computed via the radical
/// line: `middle` is the foot of the radical line on the center-to-center
/// axis, and the intersections sit at `middle ± orthogonal`. Concentric,
/// disjoint and contained circles yield nothing; callers treat an empty
/// result as a valid outcome, not an error. Exact tangency yields the
/// tangency point twice.
pub fn circle_intersections(
    center1: PlanePoint,
    radius1: f32,
    center2: PlanePoint,
    radius2: f32,
) -> impl Iterator<Item = PlanePoint> {
    let p01 = center2 - center1;
    let distance = p01.length();
    let points = if distance > 0.0
        && (radius1 - radius2).abs() <= distance
        && distance <= radius1 + radius2
    {
        let disc = (radius1 * radius1 - radius2 * radius2 + distance * distance) / (2.0 * distance);
        // Clamp guards against a tiny negative under the sqrt at tangency.
        let height = (radius1 * radius1 - disc * disc).max(0.0).sqrt();
        let middle = center1 + p01 * (disc / distance);
        let orthogonal = PlanePoint::new(p01.y, -p01.x) * (height / distance);
        Some([middle + orthogonal, middle - orthogonal])
    } else {
        None
    };
    points.into_iter().flatten()
}

/// Arithmetic mean of a point collection.
///
/// # Errors
///
/// Returns [`CoreError::EmptyPointSet`] for an empty input.
pub fn centroid(points: &[PlanePoint]) -> Result<PlanePoint> {
    if points.is_empty() {
        return Err(CoreError::EmptyPointSet);
    }
    let mut sum = PlanePoint::ZERO;
    for point in points {
        sum = sum + *point;
    }
    Ok(sum * (1.0 / points.len() as f32))
}

/// Euclidean pairwise distance matrix between two point sets.
///
/// The result has `a.len()` rows and `b.len()` columns. If either input
/// is empty the matrix is empty. Non-finite coordinates are passed
/// through the arithmetic unchecked.
#[must_use]
pub fn pairwise_distances(a: &[PlanePoint], b: &[PlanePoint]) -> Vec<Vec<f32>> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    a.iter()
        .map(|p| b.iter().map(|q| p.distance_to(*q)).collect())
        .collect()
}

/// Logistic squash mapping a logit to a probability in `(0, 1)`.
#[must_use]
pub fn logit_to_probability(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_projection_onto_axis() {
        let projected = project_point_onto_line(
            PlanePoint::ZERO,
            PlanePoint::new(1.0, 0.0),
            PlanePoint::new(3.0, 7.0),
        )
        .unwrap();
        assert!((projected.x - 3.0).abs() < EPSILON);
        assert!(projected.y.abs() < EPSILON);
    }

    #[test]
    fn test_projection_onto_diagonal() {
        // Projecting (0, 2) onto the line y = x lands at (1, 1).
        let projected = project_point_onto_line(
            PlanePoint::ZERO,
            PlanePoint::new(1.0, 1.0),
            PlanePoint::new(0.0, 2.0),
        )
        .unwrap();
        assert!((projected.x - 1.0).abs() < EPSILON);
        assert!((projected.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_projection_zero_direction_is_an_error() {
        let result =
            project_point_onto_line(PlanePoint::ZERO, PlanePoint::ZERO, PlanePoint::new(1.0, 1.0));
        assert_eq!(result, Err(CoreError::ZeroDirection));
    }

    #[test]
    fn test_circle_intersections_two_points() {
        let c1 = PlanePoint::ZERO;
        let c2 = PlanePoint::new(8.0, 0.0);
        let points: Vec<_> = circle_intersections(c1, 5.0, c2, 5.0).collect();
        assert_eq!(points.len(), 2);
        for p in &points {
            assert!((p.distance_to(c1) - 5.0).abs() < 1e-4);
            assert!((p.distance_to(c2) - 5.0).abs() < 1e-4);
        }
        // Symmetric about the center-to-center axis y = 0.
        assert!((points[0].y + points[1].y).abs() < 1e-4);
        assert!((points[0].x - points[1].x).abs() < 1e-4);
    }

    #[test]
    fn test_circle_intersections_concentric_is_empty() {
        let c = PlanePoint::new(2.0, 3.0);
        assert_eq!(circle_intersections(c, 4.0, c, 4.0).count(), 0);
    }

    #[test]
    fn test_circle_intersections_disjoint_is_empty() {
        let c1 = PlanePoint::ZERO;
        let c2 = PlanePoint::new(100.0, 0.0);
        assert_eq!(circle_intersections(c1, 1.0, c2, 1.0).count(), 0);
    }

    #[test]
    fn test_circle_intersections_tangent_yields_doubled_point() {
        let points: Vec<_> =
            circle_intersections(PlanePoint::ZERO, 1.0, PlanePoint::new(2.0, 0.0), 1.0).collect();
        assert_eq!(points.len(), 2);
        assert!((points[0].x - 1.0).abs() < EPSILON);
        assert!(points[0].y.abs() < EPSILON);
        assert_eq!(points[0], points[1]);
    }

    #[test]
    fn test_centroid() {
        let points = [
            PlanePoint::new(0.0, 0.0),
            PlanePoint::new(4.0, 0.0),
            PlanePoint::new(2.0, 6.0),
        ];
        let c = centroid(&points).unwrap();
        assert!((c.x - 2.0).abs() < EPSILON);
        assert!((c.y - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_centroid_empty_is_an_error() {
        assert_eq!(centroid(&[]), Err(CoreError::EmptyPointSet));
    }

    #[test]
    fn test_pairwise_distances_shape_and_values() {
        let a = [PlanePoint::ZERO, PlanePoint::new(3.0, 4.0)];
        let b = [PlanePoint::ZERO];
        let matrix = pairwise_distances(&a, &b);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0].len(), 1);
        assert!(matrix[0][0].abs() < EPSILON);
        assert!((matrix[1][0] - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_pairwise_distances_empty_input() {
        let a = [PlanePoint::ZERO];
        assert!(pairwise_distances(&a, &[]).is_empty());
        assert!(pairwise_distances(&[], &a).is_empty());
    }

    #[test]
    fn test_rounded_half_up() {
        assert_eq!(PlanePoint::new(1.5, -0.5).rounded(), GridPoint::new(2, 0));
        assert_eq!(PlanePoint::new(1.49, 2.51).rounded(), GridPoint::new(1, 3));
    }

    #[test]
    fn test_logit_to_probability() {
        assert!((logit_to_probability(0.0) - 0.5).abs() < EPSILON);
        assert!(logit_to_probability(10.0) > 0.99);
        assert!(logit_to_probability(-10.0) < 0.01);
    }
}
