//! The GJK algorithm for distance computation.

pub use self::cso_point::CSOPoint;
pub use self::discrete_result::{
    ClosestPointInput, DiscreteCollisionResult, PointCollector, LARGE_DISTANCE,
};
pub use self::gjk_pair_detector::{
    closest_points_with_simplex, ClosestPointsMethod, DegenerateSimplex, GjkPairDetector,
    GJK_DEGENERATE_PENETRATION_DISTANCE, GJK_MAX_ITERATIONS, GJK_REL_ERROR2,
};
pub use self::voronoi_simplex::{
    closest_point_on_tetrahedron, closest_point_on_triangle, point_outside_of_plane,
    SubSimplexClosestResult, UsedVertices, VoronoiSimplexSolver,
    VORONOI_DEFAULT_EQUAL_VERTEX_THRESHOLD, VORONOI_SIMPLEX_MAX_VERTICES,
};

mod cso_point;
mod discrete_result;
mod gjk_pair_detector;
mod voronoi_simplex;
