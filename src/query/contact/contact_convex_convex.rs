use crate::math::{Isometry, Real, DEFAULT_EPSILON};
use crate::query::gjk::{ClosestPointInput, GjkPairDetector, PointCollector, VoronoiSimplexSolver};
use crate::query::penetration::{ConvexPenetrationDepthSolver, GjkEpaPenetrationDepthSolver};
use crate::query::Contact;
use crate::shape::ConvexShape;
use na::Unit;

/// Computes one pair of contact points between two convex shapes.
///
/// Penetrations are resolved with GJK/EPA. Returns `None` if the shapes are separated by
/// a distance greater than `prediction`.
pub fn contact(
    pos1: &Isometry<Real>,
    g1: &dyn ConvexShape,
    pos2: &Isometry<Real>,
    g2: &dyn ConvexShape,
    prediction: Real,
) -> Option<Contact> {
    let mut solver = GjkEpaPenetrationDepthSolver::new();
    contact_with_solver(pos1, g1, pos2, g2, prediction, &mut solver)
}

/// Same as [`contact`], with a custom penetration depth solver.
pub fn contact_with_solver(
    pos1: &Isometry<Real>,
    g1: &dyn ConvexShape,
    pos2: &Isometry<Real>,
    g2: &dyn ConvexShape,
    prediction: Real,
    penetration_solver: &mut dyn ConvexPenetrationDepthSolver,
) -> Option<Contact> {
    let max_dist = prediction.max(0.0) + g1.margin() + g2.margin();
    let input = ClosestPointInput {
        maximum_distance_squared: max_dist * max_dist,
        ..ClosestPointInput::new(*pos1, *pos2)
    };

    let mut simplex = VoronoiSimplexSolver::new();
    let mut collector = PointCollector::new();
    let mut detector = GjkPairDetector::new(
        g1,
        g2,
        &mut simplex,
        Some(penetration_solver as &mut dyn ConvexPenetrationDepthSolver),
    );
    detector.get_closest_points(&input, &mut collector);

    if !collector.has_result || collector.distance > prediction {
        return None;
    }

    let normal2 = Unit::try_new(collector.normal_on_b_in_world, DEFAULT_EPSILON)?;

    Some(Contact::new(
        collector.point_on_a(),
        collector.point_in_world,
        -normal2,
        normal2,
        collector.distance,
    ))
}
