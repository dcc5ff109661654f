use approx::assert_relative_eq;
use narrowphase3d::math::{Isometry, Point, Real, Vector};
use narrowphase3d::query::gjk::{
    ClosestPointInput, ClosestPointsMethod, GjkPairDetector, PointCollector, VoronoiSimplexSolver,
};
use narrowphase3d::query::penetration::{
    ConvexPenetrationDepthSolver, GjkEpaPenetrationDepthSolver,
};
use narrowphase3d::shape::{Ball, ConvexShape, Cuboid, Segment};

fn closest_points(
    pos_a: Isometry<Real>,
    shape_a: &dyn ConvexShape,
    pos_b: Isometry<Real>,
    shape_b: &dyn ConvexShape,
    penetration_solver: Option<&mut dyn ConvexPenetrationDepthSolver>,
) -> (PointCollector, Option<ClosestPointsMethod>) {
    let mut simplex = VoronoiSimplexSolver::new();
    let mut collector = PointCollector::new();
    let penetration_solver =
        penetration_solver.map(|solver| solver as &mut dyn ConvexPenetrationDepthSolver);
    let mut detector = GjkPairDetector::new(shape_a, shape_b, &mut simplex, penetration_solver);
    detector.get_closest_points(&ClosestPointInput::new(pos_a, pos_b), &mut collector);
    (collector, detector.last_used_method())
}

#[test]
fn separated_balls() {
    let ball = Ball::new(1.0);
    let (res, method) = closest_points(
        Isometry::identity(),
        &ball,
        Isometry::translation(5.0, 0.0, 0.0),
        &ball,
        None,
    );

    assert!(res.has_result);
    assert_eq!(method, Some(ClosestPointsMethod::Gjk));
    assert_relative_eq!(res.distance, 3.0, epsilon = 1.0e-4);
    // From B toward A.
    assert_relative_eq!(res.normal_on_b_in_world, -Vector::x(), epsilon = 1.0e-4);
    assert_relative_eq!(res.point_in_world, Point::new(4.0, 0.0, 0.0), epsilon = 1.0e-4);
    assert_relative_eq!(res.point_on_a(), Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-4);
}

#[test]
fn overlapping_margins_with_separated_cores() {
    let ball = Ball::new(1.0);
    let (res, method) = closest_points(
        Isometry::identity(),
        &ball,
        Isometry::translation(1.0, 0.0, 0.0),
        &ball,
        None,
    );

    assert!(res.has_result);
    assert_eq!(method, Some(ClosestPointsMethod::Gjk));
    assert_relative_eq!(res.distance, -1.0, epsilon = 1.0e-4);
    assert_relative_eq!(res.point_in_world, Point::origin(), epsilon = 1.0e-4);
}

#[test]
fn separated_rotated_cuboids() {
    let cuboid = Cuboid::new(Vector::repeat(1.0));
    let rot = Vector::z() * std::f32::consts::FRAC_PI_4 as Real;
    let pos_b = Isometry::new(Vector::new(3.0, 0.2, 0.0), rot);

    let (res, _) = closest_points(Isometry::identity(), &cuboid, pos_b, &cuboid, None);

    // The edge of the rotated core, pushed out by the margin, faces the side of the first box.
    let expected = 3.0 - 0.96 * (2.0 as Real).sqrt() - 0.04 - 1.0;
    assert!(res.has_result);
    assert_relative_eq!(res.distance, expected, epsilon = 1.0e-3);
    assert_relative_eq!(res.normal_on_b_in_world, -Vector::x(), epsilon = 1.0e-3);
}

#[test]
fn penetrating_cuboids_use_the_penetration_solver() {
    let cuboid = Cuboid::new(Vector::repeat(1.0));
    let mut solver = GjkEpaPenetrationDepthSolver::new();

    let (res, method) = closest_points(
        Isometry::identity(),
        &cuboid,
        Isometry::translation(1.5, 0.0, 0.0),
        &cuboid,
        Some(&mut solver),
    );

    assert!(res.has_result);
    assert_eq!(method, Some(ClosestPointsMethod::Penetration));
    assert_relative_eq!(res.distance, -0.5, epsilon = 1.0e-2);
    assert!(res.normal_on_b_in_world.x < -0.99);
}

#[test]
fn maximum_distance_culls_far_shapes() {
    let ball = Ball::new(1.0);
    let mut simplex = VoronoiSimplexSolver::new();
    let mut collector = PointCollector::new();
    let input = ClosestPointInput {
        maximum_distance_squared: 1.0,
        ..ClosestPointInput::new(Isometry::identity(), Isometry::translation(5.0, 0.0, 0.0))
    };

    let mut detector = GjkPairDetector::new(&ball, &ball, &mut simplex, None);
    detector.get_closest_points(&input, &mut collector);
    assert!(!collector.has_result);
}

#[test]
fn small_segment_distance_does_not_depend_on_scale() {
    for scale in [1.0, 100.0] {
        let segment = Segment::new(Point::new(0.009 * scale, 0.0, 0.0), Point::origin());
        let point = Ball::new(0.0);
        let (res, _) = closest_points(
            Isometry::identity(),
            &segment,
            Isometry::translation(scale, 0.0, 0.0),
            &point,
            None,
        );

        assert!(res.has_result);
        assert_relative_eq!(res.distance, 0.991 * scale, epsilon = 1.0e-4 * scale);
    }
}
