use crate::math::{Isometry, Point, Real, Vector, DEFAULT_EPSILON};
use crate::query::gjk::{
    CSOPoint, ClosestPointInput, DiscreteCollisionResult, VoronoiSimplexSolver, LARGE_DISTANCE,
};
use crate::query::penetration::ConvexPenetrationDepthSolver;
use crate::shape::ConvexShape;

/// Relative progress below which GJK stops iterating.
pub const GJK_REL_ERROR2: Real = 1.0e-6;

/// The maximum number of GJK iterations before giving up.
pub const GJK_MAX_ITERATIONS: usize = 1000;

/// Below this separation (margins included), a degenerate GJK result is double-checked
/// with the penetration depth solver.
pub const GJK_DEGENERATE_PENETRATION_DISTANCE: Real = 0.01;

/// The reason why GJK stopped on a degenerate simplex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DegenerateSimplex {
    /// The new support point was already part of the simplex.
    NewPointInSimplex = 1,
    /// The new support point did not bring the simplex closer to the origin.
    NoProgress = 2,
    /// The simplex solver failed to compute a closest point.
    InvalidClosest = 3,
    /// The final separating axis was too short to give a reliable normal.
    SmallNormal = 5,
    /// The separating axis vanished: the origin lies on the simplex.
    OriginEnclosed = 6,
}

/// The way the last result of a [`GjkPairDetector`] was obtained.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClosestPointsMethod {
    /// GJK converged to a valid separation.
    Gjk,
    /// GJK converged but the separating axis was too short to be normalized.
    GjkZeroNormal,
    /// The penetration depth solver provided the result.
    Penetration,
    /// The penetration depth solver returned coincident witness points.
    PenetrationZeroNormal,
    /// The penetration depth solver failed.
    PenetrationFailed,
}

/// Closest points between two convex shapes, using GJK on their cores.
///
/// The margins of both shapes are added back once GJK converged. If the cores overlap,
/// or if GJK ends on a degenerate simplex very close to contact, the optional
/// penetration depth solver computes the penetration depth instead.
pub struct GjkPairDetector<'a> {
    shape_a: &'a dyn ConvexShape,
    shape_b: &'a dyn ConvexShape,
    simplex: &'a mut VoronoiSimplexSolver,
    penetration_solver: Option<&'a mut dyn ConvexPenetrationDepthSolver>,
    cached_separating_axis: Vector<Real>,
    ignore_margin: bool,
    catch_degeneracies: bool,
    last_used_method: Option<ClosestPointsMethod>,
    degenerate_simplex: Option<DegenerateSimplex>,
    cur_iter: usize,
}

impl<'a> GjkPairDetector<'a> {
    /// Creates a detector for the pair of shapes `shape_a` and `shape_b`.
    pub fn new(
        shape_a: &'a dyn ConvexShape,
        shape_b: &'a dyn ConvexShape,
        simplex: &'a mut VoronoiSimplexSolver,
        penetration_solver: Option<&'a mut dyn ConvexPenetrationDepthSolver>,
    ) -> Self {
        Self {
            shape_a,
            shape_b,
            simplex,
            penetration_solver,
            cached_separating_axis: Vector::y(),
            ignore_margin: false,
            catch_degeneracies: true,
            last_used_method: None,
            degenerate_simplex: None,
            cur_iter: 0,
        }
    }

    /// Replaces the first shape.
    pub fn set_shape_a(&mut self, shape: &'a dyn ConvexShape) {
        self.shape_a = shape;
    }

    /// Replaces the second shape.
    pub fn set_shape_b(&mut self, shape: &'a dyn ConvexShape) {
        self.shape_b = shape;
    }

    /// Replaces the penetration depth solver.
    pub fn set_penetration_depth_solver(
        &mut self,
        solver: Option<&'a mut dyn ConvexPenetrationDepthSolver>,
    ) {
        self.penetration_solver = solver;
    }

    /// If set, the margins of both shapes are ignored.
    pub fn set_ignore_margin(&mut self, ignore_margin: bool) {
        self.ignore_margin = ignore_margin;
    }

    /// If set (the default), degenerate results close to contact are re-checked by the
    /// penetration depth solver.
    pub fn set_catch_degeneracies(&mut self, catch_degeneracies: bool) {
        self.catch_degeneracies = catch_degeneracies;
    }

    /// Sets the axis GJK starts from.
    pub fn set_cached_separating_axis(&mut self, axis: Vector<Real>) {
        self.cached_separating_axis = axis;
    }

    /// The last separating axis found by GJK.
    pub fn cached_separating_axis(&self) -> &Vector<Real> {
        &self.cached_separating_axis
    }

    /// How the last result was obtained, if any.
    pub fn last_used_method(&self) -> Option<ClosestPointsMethod> {
        self.last_used_method
    }

    /// The degeneracy GJK stopped on during the last query, if any.
    pub fn degenerate_simplex(&self) -> Option<DegenerateSimplex> {
        self.degenerate_simplex
    }

    /// The number of GJK iterations of the last query.
    pub fn iterations(&self) -> usize {
        self.cur_iter
    }

    /// Computes the closest points between the two shapes and reports them to `output`.
    ///
    /// Nothing is reported if the shapes are farther apart than allowed by
    /// `input.maximum_distance_squared`, or if no valid result could be computed.
    pub fn get_closest_points(
        &mut self,
        input: &ClosestPointInput,
        output: &mut dyn DiscreteCollisionResult,
    ) {
        let mut distance = 0.0;
        let mut normal_in_b = Vector::zeros();
        let mut point_on_a = Point::origin();
        let mut point_on_b = Point::origin();

        // Work relative to the midpoint of the two origins for better accuracy.
        let position_offset =
            (input.transform_a.translation.vector + input.transform_b.translation.vector) * 0.5;
        let mut local_trans_a = input.transform_a;
        let mut local_trans_b = input.transform_b;
        local_trans_a.translation.vector -= position_offset;
        local_trans_b.translation.vector -= position_offset;

        let (margin_a, margin_b) = if self.ignore_margin {
            (0.0, 0.0)
        } else {
            (self.shape_a.margin(), self.shape_b.margin())
        };
        let margin = margin_a + margin_b;

        self.cur_iter = 0;
        self.cached_separating_axis = Vector::y();
        self.last_used_method = None;
        self.degenerate_simplex = None;

        let mut is_valid = false;
        let mut check_simplex = false;
        let mut check_penetration = true;
        let mut squared_distance = LARGE_DISTANCE;

        self.simplex.reset();

        loop {
            let support = CSOPoint::from_shapes(
                &local_trans_a,
                self.shape_a,
                &local_trans_b,
                self.shape_b,
                &self.cached_separating_axis,
            );
            let w = support.w();
            let delta = self.cached_separating_axis.dot(&w);

            // The shapes are farther apart than the maximum distance.
            if delta > 0.0 && delta * delta > squared_distance * input.maximum_distance_squared {
                check_penetration = false;
                break;
            }

            if self.simplex.in_simplex(&w) {
                self.degenerate_simplex = Some(DegenerateSimplex::NewPointInSimplex);
                check_simplex = true;
                break;
            }

            let f0 = squared_distance - delta;
            let f1 = squared_distance * GJK_REL_ERROR2;

            if f0 <= f1 {
                if f0 <= 0.0 {
                    self.degenerate_simplex = Some(DegenerateSimplex::NoProgress);
                }

                check_simplex = true;
                break;
            }

            self.simplex.add_vertex(&w, &support.orig1, &support.orig2);

            if let Some(v) = self.simplex.closest() {
                self.cached_separating_axis = v;
            } else {
                self.cached_separating_axis = self.simplex.backup_closest();
                self.degenerate_simplex = Some(DegenerateSimplex::InvalidClosest);
                check_simplex = true;
                break;
            }

            if self.cached_separating_axis.norm_squared() < GJK_REL_ERROR2 {
                self.degenerate_simplex = Some(DegenerateSimplex::OriginEnclosed);
                check_simplex = true;
                break;
            }

            let previous_squared_distance = squared_distance;
            squared_distance = self.cached_separating_axis.norm_squared();

            if previous_squared_distance - squared_distance
                <= DEFAULT_EPSILON * previous_squared_distance
            {
                self.cached_separating_axis = self.simplex.backup_closest();
                check_simplex = true;
                break;
            }

            self.cur_iter += 1;
            if self.cur_iter > GJK_MAX_ITERATIONS {
                log::debug!(
                    "GJK did not converge after {} iterations (squared distance: {}).",
                    GJK_MAX_ITERATIONS,
                    squared_distance
                );
                break;
            }

            if self.simplex.full_simplex() {
                self.cached_separating_axis = self.simplex.backup_closest();
                break;
            }
        }

        if check_simplex {
            (point_on_a, point_on_b) = self.simplex.compute_points();
            normal_in_b = point_on_a - point_on_b;
            let len_sqr = self.cached_separating_axis.norm_squared();

            if len_sqr < 1.0e-4 {
                self.degenerate_simplex = Some(DegenerateSimplex::SmallNormal);
            }

            if len_sqr > DEFAULT_EPSILON * DEFAULT_EPSILON {
                let rlen = 1.0 / len_sqr.sqrt();
                normal_in_b *= rlen;
                let s = squared_distance.sqrt();
                point_on_a -= self.cached_separating_axis * (margin_a / s);
                point_on_b += self.cached_separating_axis * (margin_b / s);
                distance = (1.0 / rlen) - margin;
                is_valid = true;
                self.last_used_method = Some(ClosestPointsMethod::Gjk);
            } else {
                self.last_used_method = Some(ClosestPointsMethod::GjkZeroNormal);
            }
        }

        let catch_degenerate_penetration = self.catch_degeneracies
            && self.penetration_solver.is_some()
            && self.degenerate_simplex.is_some()
            && (distance + margin) < GJK_DEGENERATE_PENETRATION_DISTANCE;

        if check_penetration && (!is_valid || catch_degenerate_penetration) {
            if let Some(solver) = self.penetration_solver.as_deref_mut() {
                log::trace!(
                    "GJK falls back to penetration depth (degeneracy: {:?}).",
                    self.degenerate_simplex
                );

                match solver.calc_pen_depth(
                    self.simplex,
                    self.shape_a,
                    &local_trans_a,
                    self.shape_b,
                    &local_trans_b,
                ) {
                    Some((pen_a, pen_b)) => {
                        let pen_normal = pen_b - pen_a;
                        let len_sqr = pen_normal.norm_squared();

                        if len_sqr > DEFAULT_EPSILON * DEFAULT_EPSILON {
                            let pen_distance = -len_sqr.sqrt();

                            // Only replace the GJK result by a deeper penetration.
                            if !is_valid || pen_distance < distance {
                                distance = pen_distance;
                                point_on_b = pen_b;
                                normal_in_b = pen_normal / len_sqr.sqrt();
                                is_valid = true;
                                self.last_used_method = Some(ClosestPointsMethod::Penetration);
                            }
                        } else {
                            self.last_used_method =
                                Some(ClosestPointsMethod::PenetrationZeroNormal);
                        }
                    }
                    None => {
                        self.last_used_method = Some(ClosestPointsMethod::PenetrationFailed);
                    }
                }
            }
        }

        if is_valid {
            output.add_contact_point(
                &normal_in_b,
                &(point_on_b + position_offset),
                distance,
            );
        }
    }
}

/// Convenience wrapper running a [`GjkPairDetector`] between two shapes at the given positions.
pub fn closest_points_with_simplex(
    pos_a: &Isometry<Real>,
    shape_a: &dyn ConvexShape,
    pos_b: &Isometry<Real>,
    shape_b: &dyn ConvexShape,
    simplex: &mut VoronoiSimplexSolver,
    penetration_solver: Option<&mut dyn ConvexPenetrationDepthSolver>,
    output: &mut dyn DiscreteCollisionResult,
) {
    let input = ClosestPointInput::new(*pos_a, *pos_b);
    let penetration_solver =
        penetration_solver.map(|solver| solver as &mut dyn ConvexPenetrationDepthSolver);
    let mut detector = GjkPairDetector::new(shape_a, shape_b, simplex, penetration_solver);
    detector.get_closest_points(&input, output);
}
