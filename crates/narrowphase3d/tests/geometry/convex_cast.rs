use approx::assert_relative_eq;
use narrowphase3d::math::{Isometry, Point, Real, Vector};
use narrowphase3d::query::convex_cast::{
    CastResult, ConvexCast, GjkConvexCast, SubSimplexConvexCast,
};
use narrowphase3d::query::gjk::VoronoiSimplexSolver;
use narrowphase3d::query::time_of_impact;
use narrowphase3d::shape::{Ball, ConvexShape, Cuboid};

fn cast_both(
    a: &dyn ConvexShape,
    from_a: &Isometry<Real>,
    to_a: &Isometry<Real>,
    b: &dyn ConvexShape,
    from_b: &Isometry<Real>,
    to_b: &Isometry<Real>,
) -> [Option<CastResult>; 2] {
    let mut simplex = VoronoiSimplexSolver::new();
    let mut gjk_result = CastResult::default();
    let gjk_hit = GjkConvexCast::new(a, b, &mut simplex)
        .calc_time_of_impact(from_a, to_a, from_b, to_b, &mut gjk_result);

    let mut sub_result = CastResult::default();
    let sub_hit = SubSimplexConvexCast::new(a, b, &mut simplex)
        .calc_time_of_impact(from_a, to_a, from_b, to_b, &mut sub_result);

    [gjk_hit.then_some(gjk_result), sub_hit.then_some(sub_result)]
}

#[test]
fn ball_hits_ball() {
    let ball = Ball::new(1.0);
    let still = Isometry::translation(5.0, 0.0, 0.0);

    for res in cast_both(
        &ball,
        &Isometry::identity(),
        &Isometry::translation(10.0, 0.0, 0.0),
        &ball,
        &still,
        &still,
    ) {
        let res = res.unwrap();
        assert!(res.has_hit());
        assert_relative_eq!(res.fraction, 0.3, epsilon = 1.0e-2);
        assert_relative_eq!(res.normal.normalize(), -Vector::x(), epsilon = 1.0e-2);
        assert_relative_eq!(res.hit_point, Point::new(4.0, 0.0, 0.0), epsilon = 5.0e-2);
    }
}

#[test]
fn zero_length_sweep_never_hits() {
    let ball = Ball::new(1.0);
    let cuboid = Cuboid::new(Vector::repeat(1.0));
    let pos_a = Isometry::translation(0.0, 3.0, 0.0);
    let pos_b = Isometry::identity();

    for res in cast_both(&ball, &pos_a, &pos_a, &cuboid, &pos_b, &pos_b) {
        assert!(res.is_none());
    }
}

#[test]
fn diverging_motion_never_hits() {
    let ball = Ball::new(1.0);

    for res in cast_both(
        &ball,
        &Isometry::identity(),
        &Isometry::translation(-10.0, 0.0, 0.0),
        &ball,
        &Isometry::translation(5.0, 0.0, 0.0),
        &Isometry::translation(5.0, 0.0, 0.0),
    ) {
        assert!(res.is_none());
    }
}

#[test]
fn both_shapes_moving() {
    let ball = Ball::new(0.5);
    let cuboid = Cuboid::new(Vector::repeat(1.0));

    // Relative motion of 8 along x with an initial gap of 4 - 1 - 0.5.
    let res = time_of_impact(
        &Isometry::identity(),
        &Vector::new(4.0, 0.0, 0.0),
        &ball,
        &Isometry::translation(4.0, 0.0, 0.0),
        &Vector::new(-4.0, 0.0, 0.0),
        &cuboid,
        1.0,
    )
    .unwrap();

    assert_relative_eq!(res.fraction, 2.5 / 8.0, epsilon = 1.0e-2);
    assert!(res.normal.normalize().x < -0.99);
}
