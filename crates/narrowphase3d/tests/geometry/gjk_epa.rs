use approx::assert_relative_eq;
use narrowphase3d::math::{Isometry, Point, Real, Vector};
use narrowphase3d::query::epa::{GjkEpaSolver, GjkEpaStatus};
use narrowphase3d::shape::{Ball, Capsule, Cuboid};

#[test]
fn overlapping_balls_witnesses_on_center_line() {
    let ball = Ball::new(1.0);
    let mut solver = GjkEpaSolver::new();
    let res = solver.collide(
        &ball,
        &Isometry::identity(),
        &ball,
        &Isometry::translation(1.0, 0.0, 0.0),
        0.0,
    );

    assert!(res.is_penetrating());
    assert_relative_eq!(res.depth, 1.0, epsilon = 1.0e-2);
    assert_relative_eq!(res.witnesses[0], Point::new(1.0, 0.0, 0.0), epsilon = 5.0e-2);
    assert_relative_eq!(res.witnesses[1], Point::origin(), epsilon = 5.0e-2);

    for w in &res.witnesses {
        assert!(w.y.abs() < 5.0e-2 && w.z.abs() < 5.0e-2);
    }
}

#[test]
fn cuboid_cuboid_epa() {
    let c = Cuboid::new(Vector::new(2.0, 1.0, 1.0));
    let mut solver = GjkEpaSolver::new();

    let res = solver.collide(
        &c,
        &Isometry::translation(3.5, 0.0, 0.0),
        &c,
        &Isometry::identity(),
        0.0,
    );
    assert_eq!(res.status, GjkEpaStatus::Penetrating);
    assert_relative_eq!(res.depth, 0.5, epsilon = 1.0e-2);
    assert_relative_eq!(res.normal, Vector::x(), epsilon = 1.0e-2);

    let res = solver.collide(
        &c,
        &Isometry::translation(0.0, 0.2, 0.0),
        &c,
        &Isometry::identity(),
        0.0,
    );
    assert_eq!(res.status, GjkEpaStatus::Penetrating);
    assert_relative_eq!(res.depth, 1.8, epsilon = 1.0e-2);
    assert_relative_eq!(res.normal, Vector::y(), epsilon = 1.0e-2);
}

#[test]
fn capsule_resting_in_ball() {
    let capsule = Capsule::new_y(1.0, 0.5);
    let ball = Ball::new(1.0);
    let mut solver = GjkEpaSolver::new();

    // The bottom of the capsule sinks 0.25 into the top of the ball.
    let res = solver.collide(
        &capsule,
        &Isometry::translation(0.0, 2.25, 0.0),
        &ball,
        &Isometry::identity(),
        0.0,
    );
    assert!(res.is_penetrating());
    assert_relative_eq!(res.depth, 0.25, epsilon = 1.0e-2);
    assert!(res.normal.y > 0.99);
}

#[test]
fn random_overlapping_balls() {
    let mut rng = oorandom::Rand32::new(1234);
    let mut solver = GjkEpaSolver::new();

    for _ in 0..50 {
        let r1 = 0.5 + rng.rand_float() as Real;
        let r2 = 0.5 + rng.rand_float() as Real;
        let dir = loop {
            let v = Vector::new(
                rng.rand_float() as Real * 2.0 - 1.0,
                rng.rand_float() as Real * 2.0 - 1.0,
                rng.rand_float() as Real * 2.0 - 1.0,
            );

            if v.norm() > 0.1 {
                break v.normalize();
            }
        };
        let dist = 0.2 + rng.rand_float() as Real * (r1 + r2 - 0.4);

        let pos_a = Isometry::translation(1.0, -2.0, 0.5);
        let pos_b = Isometry::from_parts((pos_a.translation.vector + dir * dist).into(), pos_a.rotation);
        let res = solver.collide(&Ball::new(r1), &pos_a, &Ball::new(r2), &pos_b, 0.0);

        assert!(res.is_penetrating());
        assert_relative_eq!(res.depth, r1 + r2 - dist, epsilon = 2.0e-2);
        assert!(res.normal.dot(&-dir) > 0.99);
    }
}

#[test]
fn separated_shapes_report_separation() {
    let c = Cuboid::new(Vector::repeat(1.0));
    let ball = Ball::new(0.5);
    let mut solver = GjkEpaSolver::new();

    let res = solver.collide(
        &c,
        &Isometry::identity(),
        &ball,
        &Isometry::translation(0.0, 0.0, 3.0),
        0.0,
    );
    assert_eq!(res.status, GjkEpaStatus::Separated);
    assert!(!res.is_penetrating());
}
