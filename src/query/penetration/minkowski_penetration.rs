use crate::math::{Isometry, Point, Real, Vector};
use crate::query::gjk::{ClosestPointInput, GjkPairDetector, PointCollector, VoronoiSimplexSolver};
use crate::query::penetration::ConvexPenetrationDepthSolver;
use crate::shape::ConvexShape;

/// The number of directions sampled by [`MinkowskiPenetrationDepthSolver`].
pub const NUM_UNIT_SPHERE_POINTS: usize = 42;

/// Extra distance the first shape is pushed away by before the exact GJK pass.
pub const MINKOWSKI_EXTRA_SEPARATION: Real = 0.5;

/// Penetration depth approximated by sampling the support function of the Minkowski
/// difference along a fixed set of directions.
///
/// The best sampled direction is refined by pushing the first shape out of the second
/// one along it and measuring the remaining distance with GJK.
#[derive(Clone, Debug)]
pub struct MinkowskiPenetrationDepthSolver {
    directions: Vec<Vector<Real>>,
}

impl Default for MinkowskiPenetrationDepthSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MinkowskiPenetrationDepthSolver {
    /// Creates a solver sampling the vertices and edge midpoints of an icosahedron.
    pub fn new() -> Self {
        Self {
            directions: unit_sphere_directions(),
        }
    }

    /// The directions sampled by this solver.
    pub fn directions(&self) -> &[Vector<Real>] {
        &self.directions
    }
}

/// The 12 vertices of an icosahedron followed by the midpoints of its 30 edges, all
/// normalized.
fn unit_sphere_directions() -> Vec<Vector<Real>> {
    let phi = (1.0 + (5.0 as Real).sqrt()) / 2.0;
    let mut vertices = Vec::with_capacity(12);

    for s1 in [-1.0, 1.0] {
        for s2 in [-1.0, 1.0] {
            vertices.push(Vector::new(0.0, s1, s2 * phi));
            vertices.push(Vector::new(s1, s2 * phi, 0.0));
            vertices.push(Vector::new(s1 * phi, 0.0, s2));
        }
    }

    let mut directions: Vec<_> = vertices.iter().map(|v| v.normalize()).collect();

    // Adjacent vertices are exactly 2 apart, the next closest ones are 2 * phi apart.
    for i in 0..vertices.len() {
        for j in i + 1..vertices.len() {
            if (vertices[i] - vertices[j]).norm_squared() < 5.0 {
                directions.push((vertices[i] + vertices[j]).normalize());
            }
        }
    }

    debug_assert_eq!(directions.len(), NUM_UNIT_SPHERE_POINTS);
    directions
}

impl ConvexPenetrationDepthSolver for MinkowskiPenetrationDepthSolver {
    fn calc_pen_depth(
        &mut self,
        simplex: &mut VoronoiSimplexSolver,
        shape_a: &dyn ConvexShape,
        pos_a: &Isometry<Real>,
        shape_b: &dyn ConvexShape,
        pos_b: &Isometry<Real>,
    ) -> Option<(Point<Real>, Point<Real>)> {
        let mut min_proj = Real::MAX;
        let mut min_norm = Vector::zeros();
        let mut min_a = Point::origin();
        let mut min_b = Point::origin();

        for norm in &self.directions {
            let p_world = shape_a.support_point(pos_a, &-*norm);
            let q_world = shape_b.support_point(pos_b, norm);
            let delta = norm.dot(&(q_world - p_world));

            if delta < min_proj {
                min_proj = delta;
                min_norm = *norm;
                min_a = p_world;
                min_b = q_world;
            }
        }

        let margin_a = shape_a.margin();
        let margin_b = shape_b.margin();
        min_a += min_norm * margin_a;
        min_b -= min_norm * margin_b;

        // The cores are already separated along one of the sampled directions.
        if min_proj < 0.0 {
            log::trace!(
                "Minkowski sampling found a separating direction: {:?} (between {:?} and {:?}).",
                min_norm,
                min_a,
                min_b
            );
            return None;
        }

        min_proj += MINKOWSKI_EXTRA_SEPARATION + margin_a + margin_b;

        let mut displaced_a = *pos_a;
        displaced_a.translation.vector += min_norm * min_proj;

        let input = ClosestPointInput::new(displaced_a, *pos_b);
        let mut res = PointCollector::new();
        let mut detector = GjkPairDetector::new(shape_a, shape_b, simplex, None);
        detector.get_closest_points(&input, &mut res);

        if res.has_result {
            let corrected = min_proj - res.distance;
            let pa = res.point_in_world - min_norm * corrected;
            let pb = res.point_in_world;
            Some((pa, pb))
        } else {
            None
        }
    }
}
