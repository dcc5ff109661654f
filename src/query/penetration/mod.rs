//! Penetration depth solvers used by the GJK pair detector once the shape cores overlap.

pub use self::gjk_epa_penetration::GjkEpaPenetrationDepthSolver;
pub use self::minkowski_penetration::{
    MinkowskiPenetrationDepthSolver, MINKOWSKI_EXTRA_SEPARATION, NUM_UNIT_SPHERE_POINTS,
};

use crate::math::{Isometry, Point, Real};
use crate::query::gjk::VoronoiSimplexSolver;
use crate::shape::ConvexShape;

mod gjk_epa_penetration;
mod minkowski_penetration;

/// A solver computing the penetration depth of two overlapping convex shapes.
pub trait ConvexPenetrationDepthSolver {
    /// Computes the deepest points of `shape_a` and `shape_b` inside each other.
    ///
    /// Returns the world-space witness points `(on_a, on_b)`, margins included, such that
    /// `on_b - on_a` points from the second shape toward the first one and has the length
    /// of the penetration depth. Returns `None` if the shapes do not overlap or if the
    /// solver failed.
    fn calc_pen_depth(
        &mut self,
        simplex: &mut VoronoiSimplexSolver,
        shape_a: &dyn ConvexShape,
        pos_a: &Isometry<Real>,
        shape_b: &dyn ConvexShape,
        pos_b: &Isometry<Real>,
    ) -> Option<(Point<Real>, Point<Real>)>;
}
