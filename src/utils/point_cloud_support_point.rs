use crate::math::{Point, Real, Vector};

/// Computes the index of the support point of a cloud of points.
///
/// Ties are resolved in favor of the first point. `points` must not be empty.
#[inline]
pub fn point_cloud_support_point_id(dir: &Vector<Real>, points: &[Point<Real>]) -> usize {
    let mut best = (0, Real::MIN);

    for (i, p) in points.iter().enumerate() {
        let dot = p.coords.dot(dir);

        if i == 0 || dot > best.1 {
            best = (i, dot);
        }
    }

    best.0
}

/// Computes the support point of a cloud of points.
#[inline]
pub fn point_cloud_support_point(dir: &Vector<Real>, points: &[Point<Real>]) -> Point<Real> {
    points[point_cloud_support_point_id(dir, points)]
}
