use crate::math::{Isometry, Real};
use crate::query::convex_cast::{interpolate_translation, CastResult, ConvexCast};
use crate::query::gjk::{ClosestPointInput, GjkPairDetector, PointCollector, VoronoiSimplexSolver};
use crate::shape::ConvexShape;

/// The shapes are considered touching once closer than this distance.
pub const GJK_CAST_RADIUS: Real = 0.001;

/// The maximum number of advancement steps of a [`GjkConvexCast`].
pub const GJK_CAST_MAX_ITERATIONS: usize = 32;

/// Conservative advancement driven by full GJK distance queries.
///
/// Each step runs the GJK pair detector at the current interpolated positions and moves
/// both shapes forward by the time needed to close the distance along the contact normal.
pub struct GjkConvexCast<'a> {
    convex_a: &'a dyn ConvexShape,
    convex_b: &'a dyn ConvexShape,
    simplex: &'a mut VoronoiSimplexSolver,
}

impl<'a> GjkConvexCast<'a> {
    /// Creates a cast between `convex_a` and `convex_b`.
    pub fn new(
        convex_a: &'a dyn ConvexShape,
        convex_b: &'a dyn ConvexShape,
        simplex: &'a mut VoronoiSimplexSolver,
    ) -> Self {
        Self {
            convex_a,
            convex_b,
            simplex,
        }
    }
}

impl ConvexCast for GjkConvexCast<'_> {
    fn calc_time_of_impact(
        &mut self,
        from_a: &Isometry<Real>,
        to_a: &Isometry<Real>,
        from_b: &Isometry<Real>,
        to_b: &Isometry<Real>,
        result: &mut CastResult,
    ) -> bool {
        self.simplex.reset();

        let lin_vel_a = to_a.translation.vector - from_a.translation.vector;
        let lin_vel_b = to_b.translation.vector - from_b.translation.vector;
        let r = lin_vel_a - lin_vel_b;

        let mut lambda = 0.0;
        let mut last_lambda = lambda;
        let mut num_iter = 0;

        let mut input = ClosestPointInput::new(*from_a, *from_b);
        let mut gjk = GjkPairDetector::new(self.convex_a, self.convex_b, self.simplex, None);
        let mut collector = PointCollector::new();
        gjk.get_closest_points(&input, &mut collector);

        if !collector.has_result {
            return false;
        }

        let mut dist = collector.distance;
        let mut n = collector.normal_on_b_in_world;
        let mut c = collector.point_in_world;

        while dist > GJK_CAST_RADIUS {
            num_iter += 1;
            if num_iter > GJK_CAST_MAX_ITERATIONS {
                log::trace!("GJK cast: no impact found after {} steps.", num_iter - 1);
                return false;
            }

            let projected_linear_velocity = r.dot(&n);
            lambda -= dist / projected_linear_velocity;

            // Separating motion, or the impact happens after the end of the sweep.
            if lambda > 1.0 || lambda < 0.0 || lambda <= last_lambda {
                return false;
            }

            last_lambda = lambda;

            input.transform_a = interpolate_translation(from_a, to_a, lambda);
            input.transform_b = interpolate_translation(from_b, to_b, lambda);

            collector = PointCollector::new();
            gjk.get_closest_points(&input, &mut collector);

            if !collector.has_result {
                return false;
            }

            if collector.distance < 0.0 {
                result.fraction = last_lambda;
                result.normal = collector.normal_on_b_in_world;
                result.hit_point = collector.point_in_world;
                result.hit_transform_a = input.transform_a;
                result.hit_transform_b = input.transform_b;
                return true;
            }

            c = collector.point_in_world;
            n = collector.normal_on_b_in_world;
            dist = collector.distance;
        }

        // Motions away from the contact normal are not impacts.
        if n.dot(&r) >= -result.allowed_penetration {
            return false;
        }

        result.fraction = lambda;
        result.normal = n;
        result.hit_point = c;
        result.hit_transform_a = input.transform_a;
        result.hit_transform_b = input.transform_b;
        true
    }
}
