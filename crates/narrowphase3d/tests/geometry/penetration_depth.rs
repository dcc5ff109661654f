use approx::assert_relative_eq;
use narrowphase3d::math::{Isometry, Vector};
use narrowphase3d::query::gjk::{
    closest_points_with_simplex, ClosestPointInput, ClosestPointsMethod, GjkPairDetector,
    PointCollector, VoronoiSimplexSolver,
};
use narrowphase3d::query::penetration::{
    ConvexPenetrationDepthSolver, GjkEpaPenetrationDepthSolver, MinkowskiPenetrationDepthSolver,
};
use narrowphase3d::shape::Cuboid;

#[test]
fn minkowski_sampling_finds_the_shallowest_axis() {
    let cuboid = Cuboid::new(Vector::repeat(1.0));
    let mut solver = MinkowskiPenetrationDepthSolver::new();
    let mut simplex = VoronoiSimplexSolver::new();
    let mut collector = PointCollector::new();

    let mut detector = GjkPairDetector::new(&cuboid, &cuboid, &mut simplex, Some(&mut solver));
    detector.get_closest_points(
        &ClosestPointInput::new(Isometry::identity(), Isometry::translation(1.5, 0.0, 0.0)),
        &mut collector,
    );

    assert_eq!(
        detector.last_used_method(),
        Some(ClosestPointsMethod::Penetration)
    );
    assert!(collector.has_result);
    assert_relative_eq!(collector.distance, -0.5, epsilon = 1.0e-2);
    assert!(collector.normal_on_b_in_world.x < -0.99);
    assert_relative_eq!(collector.point_in_world.x, 0.5, epsilon = 1.0e-2);
}

#[test]
fn both_solvers_agree_on_penetrating_cuboids() {
    let a = Cuboid::new(Vector::new(1.0, 2.0, 1.0));
    let b = Cuboid::new(Vector::repeat(0.5));
    let pos_a = Isometry::identity();
    let pos_b = Isometry::translation(0.0, 2.2, 0.3);

    let mut epa = GjkEpaPenetrationDepthSolver::new();
    let mut minkowski = MinkowskiPenetrationDepthSolver::new();
    let solvers: [&mut dyn ConvexPenetrationDepthSolver; 2] = [&mut epa, &mut minkowski];

    for solver in solvers {
        let mut simplex = VoronoiSimplexSolver::new();
        let mut collector = PointCollector::new();
        closest_points_with_simplex(
            &pos_a,
            &a,
            &pos_b,
            &b,
            &mut simplex,
            Some(solver),
            &mut collector,
        );

        // The small box sinks 0.3 into the top of the tall one.
        assert!(collector.has_result);
        assert_relative_eq!(collector.distance, -0.3, epsilon = 1.0e-2);
        assert!(collector.normal_on_b_in_world.y < -0.99);
    }
}

#[test]
fn gjk_epa_solver_witnesses() {
    let cuboid = Cuboid::new(Vector::repeat(1.0));
    let mut solver = GjkEpaPenetrationDepthSolver::new();
    let mut simplex = VoronoiSimplexSolver::new();

    let (pa, pb) = solver
        .calc_pen_depth(
            &mut simplex,
            &cuboid,
            &Isometry::identity(),
            &cuboid,
            &Isometry::translation(1.5, 0.0, 0.0),
        )
        .unwrap();

    assert_relative_eq!(pb - pa, Vector::new(-0.5, 0.0, 0.0), epsilon = 1.0e-2);
}
