use crate::math::Real;
use crate::query::gjk::{ClosestPointInput, GjkPairDetector, VoronoiSimplexSolver};
use crate::query::penetration::ConvexPenetrationDepthSolver;
use crate::query::{ContactBody, ContactCallbacks, ManifoldResult, PersistentManifold};
use crate::shape::ConvexShape;

/// Contact generation between two convex bodies, maintaining their persistent manifold.
///
/// Every call to [`Self::process_collision`] adds the current closest points (or the
/// penetration computed by the penetration depth solver) to the manifold, then refreshes
/// the cached points for the new body positions.
#[derive(Clone, Debug)]
pub struct ConvexConvexAlgorithm<Data, P> {
    simplex: VoronoiSimplexSolver,
    penetration_solver: P,
    manifold: PersistentManifold<Data>,
}

impl<Data, P: ConvexPenetrationDepthSolver> ConvexConvexAlgorithm<Data, P> {
    /// Creates the collision algorithm between two bodies.
    pub fn new(manifold: PersistentManifold<Data>, penetration_solver: P) -> Self {
        Self {
            simplex: VoronoiSimplexSolver::new(),
            penetration_solver,
            manifold,
        }
    }

    /// The contact manifold of this pair.
    pub fn manifold(&self) -> &PersistentManifold<Data> {
        &self.manifold
    }

    /// The contact manifold of this pair.
    pub fn manifold_mut(&mut self) -> &mut PersistentManifold<Data> {
        &mut self.manifold
    }

    /// Updates the contact manifold for the current positions of both bodies.
    pub fn process_collision(
        &mut self,
        shape0: &dyn ConvexShape,
        body0: &ContactBody,
        shape1: &dyn ConvexShape,
        body1: &ContactBody,
        callbacks: &mut dyn ContactCallbacks<Data>,
    ) {
        let max_distance: Real =
            shape0.margin() + shape1.margin() + self.manifold.contact_breaking_threshold;
        let input = ClosestPointInput {
            transform_a: body0.position,
            transform_b: body1.position,
            maximum_distance_squared: max_distance * max_distance,
        };

        let mut result = ManifoldResult::new(&mut self.manifold, *body0, *body1, callbacks);
        let mut detector = GjkPairDetector::new(
            shape0,
            shape1,
            &mut self.simplex,
            Some(&mut self.penetration_solver as &mut dyn ConvexPenetrationDepthSolver),
        );
        detector.get_closest_points(&input, &mut result);
        result.refresh_contact_points();
    }

    /// Removes every cached contact point.
    pub fn clear(&mut self, callbacks: &mut dyn ContactCallbacks<Data>) {
        self.manifold.clear_manifold(callbacks);
    }
}
