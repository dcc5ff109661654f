use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Vector, DIM};
use crate::shape::ConvexShape;

/// Computes the world-space AABB of a convex shape, margin included.
///
/// Each bound is obtained from the support point of the shape along one of the
/// six signed coordinate axes.
pub fn support_map_aabb<G>(m: &Isometry<Real>, shape: &G) -> Aabb
where
    G: ?Sized + ConvexShape,
{
    let mut mins = Vector::zeros();
    let mut maxs = Vector::zeros();
    let mut basis = Vector::zeros();

    for d in 0..DIM {
        basis[d] = 1.0;
        maxs[d] = shape.support_point_with_margin(m, &basis)[d];

        basis[d] = -1.0;
        mins[d] = shape.support_point_with_margin(m, &basis)[d];

        basis[d] = 0.0;
    }

    Aabb::new(Point::from(mins), Point::from(maxs))
}

/// Computes the AABB of a set of points.
///
/// Returns an invalid AABB (see [`Aabb::new_invalid`]) if the iterator is empty.
pub fn local_point_cloud_aabb<I>(pts: I) -> Aabb
where
    I: IntoIterator<Item = Point<Real>>,
{
    let mut result = Aabb::new_invalid();

    for pt in pts {
        result.take_point(pt);
    }

    result
}
