use crate::math::{Isometry, Real, Vector};
use crate::query::convex_cast::{
    CastResult, ConvexCast, ConvexCastMethod, GjkConvexCast, SubSimplexConvexCast,
};
use crate::query::gjk::VoronoiSimplexSolver;
use crate::shape::ConvexShape;

/// Computes the first time two convex shapes under translational movement touch.
///
/// The shapes move with the velocities `vel1` and `vel2` during `max_toi` time units. The
/// returned `fraction` is relative to `max_toi`: the time of impact is
/// `fraction * max_toi`. Returns `None` if the shapes do not touch during that interval.
pub fn time_of_impact(
    pos1: &Isometry<Real>,
    vel1: &Vector<Real>,
    g1: &dyn ConvexShape,
    pos2: &Isometry<Real>,
    vel2: &Vector<Real>,
    g2: &dyn ConvexShape,
    max_toi: Real,
) -> Option<CastResult> {
    time_of_impact_with_method(
        pos1,
        vel1,
        g1,
        pos2,
        vel2,
        g2,
        max_toi,
        ConvexCastMethod::default(),
    )
}

/// Same as [`time_of_impact`], with an explicit cast algorithm.
pub fn time_of_impact_with_method(
    pos1: &Isometry<Real>,
    vel1: &Vector<Real>,
    g1: &dyn ConvexShape,
    pos2: &Isometry<Real>,
    vel2: &Vector<Real>,
    g2: &dyn ConvexShape,
    max_toi: Real,
    method: ConvexCastMethod,
) -> Option<CastResult> {
    let mut to1 = *pos1;
    to1.translation.vector += vel1 * max_toi;
    let mut to2 = *pos2;
    to2.translation.vector += vel2 * max_toi;

    let mut simplex = VoronoiSimplexSolver::new();
    let mut result = CastResult::default();

    let hit = match method {
        ConvexCastMethod::SubSimplex => SubSimplexConvexCast::new(g1, g2, &mut simplex)
            .calc_time_of_impact(pos1, &to1, pos2, &to2, &mut result),
        ConvexCastMethod::Gjk => GjkConvexCast::new(g1, g2, &mut simplex)
            .calc_time_of_impact(pos1, &to1, pos2, &to2, &mut result),
    };

    if hit {
        Some(result)
    } else {
        log::trace!("No time of impact found within {max_toi}.");
        None
    }
}
