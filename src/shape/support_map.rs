//! Traits for support mapping based shapes.

use crate::bounding_volume::{support_map_aabb, Aabb};
use crate::math::{Isometry, Point, Real, Vector, DEFAULT_EPSILON};
use na::Unit;

/// Traits of convex shapes representable by a support mapping function.
///
/// For a [`ConvexShape`] this is the support mapping of the *core* shape,
/// i.e., the shape shrunk by its collision margin.
pub trait SupportMap {
    /// Evaluates the support function of this shape.
    ///
    /// A support function is a function associating a vector to the shape point which
    /// maximizes their dot product. `dir` does not need to be normalized.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real>;

    /// Same as `self.local_support_point` except that `dir` is normalized.
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        self.local_support_point(dir.as_ref())
    }

    /// Evaluates the support function of this shape transformed by `transform`.
    fn support_point(&self, transform: &Isometry<Real>, dir: &Vector<Real>) -> Point<Real> {
        let local_dir = transform.inverse_transform_vector(dir);
        transform * self.local_support_point(&local_dir)
    }
}

/// A convex shape with a collision margin.
///
/// The full shape is the Minkowski sum of the core described by
/// [`SupportMap::local_support_point`] and a ball of radius [`ConvexShape::margin`].
/// GJK runs on the cores and adds the margins back afterwards, which makes the
/// closest points of rounded shapes exact.
pub trait ConvexShape: SupportMap {
    /// The collision margin of this shape.
    fn margin(&self) -> Real;

    /// The support point of the full shape, margin included.
    ///
    /// A direction shorter than machine epsilon is replaced by `(-1, -1, -1)`.
    fn local_support_point_with_margin(&self, dir: &Vector<Real>) -> Point<Real> {
        let core = self.local_support_point(dir);
        let margin = self.margin();

        if margin == 0.0 {
            return core;
        }

        let dir = if dir.norm_squared() < DEFAULT_EPSILON * DEFAULT_EPSILON {
            Vector::repeat(-1.0)
        } else {
            *dir
        };

        core + Unit::new_normalize(dir).into_inner() * margin
    }

    /// The world-space support point of the full shape, margin included.
    fn support_point_with_margin(
        &self,
        transform: &Isometry<Real>,
        dir: &Vector<Real>,
    ) -> Point<Real> {
        let local_dir = transform.inverse_transform_vector(dir);
        transform * self.local_support_point_with_margin(&local_dir)
    }

    /// The world-space AABB of this shape, margin included.
    fn compute_aabb(&self, position: &Isometry<Real>) -> Aabb {
        support_map_aabb(position, self)
    }
}
