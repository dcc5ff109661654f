use crate::math::{Isometry, Point, Real};
use crate::query::epa::GjkEpaSolver;
use crate::query::gjk::VoronoiSimplexSolver;
use crate::query::penetration::ConvexPenetrationDepthSolver;
use crate::shape::ConvexShape;

/// Penetration depth computed by the hashed GJK and EPA of [`GjkEpaSolver`].
#[derive(Clone, Debug, Default)]
pub struct GjkEpaPenetrationDepthSolver {
    solver: GjkEpaSolver,
}

impl GjkEpaPenetrationDepthSolver {
    /// Creates a new penetration depth solver.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConvexPenetrationDepthSolver for GjkEpaPenetrationDepthSolver {
    fn calc_pen_depth(
        &mut self,
        _simplex: &mut VoronoiSimplexSolver,
        shape_a: &dyn ConvexShape,
        pos_a: &Isometry<Real>,
        shape_b: &dyn ConvexShape,
        pos_b: &Isometry<Real>,
    ) -> Option<(Point<Real>, Point<Real>)> {
        let results = self.solver.collide(shape_a, pos_a, shape_b, pos_b, 0.0);

        if results.is_penetrating() {
            Some((results.witnesses[0], results.witnesses[1]))
        } else {
            None
        }
    }
}
