use crate::math::{Isometry, Real, Vector, DEFAULT_EPSILON};
use crate::query::convex_cast::{interpolate_translation, CastResult, ConvexCast};
use crate::query::gjk::VoronoiSimplexSolver;
use crate::shape::ConvexShape;

/// The sweep stops once the squared distance estimate falls below this value.
pub const SUB_SIMPLEX_CAST_EPSILON: Real = 1.0e-4;

/// The maximum number of iterations of a [`SubSimplexConvexCast`].
pub const SUB_SIMPLEX_CAST_MAX_ITERATIONS: usize = 32;

/// Conservative advancement interleaved with a single GJK run.
///
/// Instead of a full distance query per step, every GJK iteration samples the supports at
/// the current interpolated positions and advances the time as soon as the current axis
/// separates the shapes.
pub struct SubSimplexConvexCast<'a> {
    convex_a: &'a dyn ConvexShape,
    convex_b: &'a dyn ConvexShape,
    simplex: &'a mut VoronoiSimplexSolver,
}

impl<'a> SubSimplexConvexCast<'a> {
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

impl ConvexCast for SubSimplexConvexCast<'_> {
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
        let mut interpolated_a = *from_a;
        let mut interpolated_b = *from_b;

        let mut sup_a = self.convex_a.support_point_with_margin(from_a, &-r);
        let mut sup_b = self.convex_b.support_point_with_margin(from_b, &r);
        let mut v = sup_a - sup_b;
        let mut n = Vector::zeros();
        let mut dist2 = v.norm_squared();
        let mut max_iter = SUB_SIMPLEX_CAST_MAX_ITERATIONS;

        while dist2 > SUB_SIMPLEX_CAST_EPSILON && max_iter > 0 {
            max_iter -= 1;

            sup_a = self
                .convex_a
                .support_point_with_margin(&interpolated_a, &-v);
            sup_b = self.convex_b.support_point_with_margin(&interpolated_b, &v);
            let w = sup_a - sup_b;
            let v_dot_w = v.dot(&w);

            if lambda > 1.0 {
                return false;
            }

            if v_dot_w > 0.0 {
                let v_dot_r = v.dot(&r);

                // Separating motion.
                if v_dot_r >= -(DEFAULT_EPSILON * DEFAULT_EPSILON) {
                    return false;
                }

                lambda -= v_dot_w / v_dot_r;
                interpolated_a = interpolate_translation(from_a, to_a, lambda);
                interpolated_b = interpolate_translation(from_b, to_b, lambda);
                n = v;
            }

            if !self.simplex.in_simplex(&w) {
                self.simplex.add_vertex(&w, &sup_a, &sup_b);
            }

            dist2 = match self.simplex.closest() {
                Some(closest) => {
                    v = closest;
                    v.norm_squared()
                }
                None => 0.0,
            };
        }

        result.fraction = lambda;
        result.normal = if n.norm_squared() >= DEFAULT_EPSILON * DEFAULT_EPSILON {
            n.normalize()
        } else {
            Vector::zeros()
        };

        // Motions away from the contact normal are not impacts.
        if result.normal.dot(&r) >= -result.allowed_penetration {
            return false;
        }

        let (_, hit_b) = self.simplex.compute_points();
        result.hit_point = hit_b;
        result.hit_transform_a = interpolated_a;
        result.hit_transform_b = interpolated_b;
        true
    }
}
