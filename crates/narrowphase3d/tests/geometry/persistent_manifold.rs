use approx::assert_relative_eq;
use narrowphase3d::math::{Isometry, Point, Real, Vector};
use narrowphase3d::query::penetration::GjkEpaPenetrationDepthSolver;
use narrowphase3d::query::{
    BodyHandle, ContactBody, ContactCallbacks, ConvexConvexAlgorithm, ManifoldPoint,
    PersistentManifold, DEFAULT_CONTACT_BREAKING_THRESHOLD, MANIFOLD_CACHE_SIZE,
};
use narrowphase3d::shape::{Ball, Cuboid};

#[derive(Default)]
struct Recorder {
    destroyed: Vec<usize>,
    processed: usize,
}

impl ContactCallbacks<usize> for Recorder {
    fn contact_destroyed(&mut self, data: usize) {
        self.destroyed.push(data);
    }

    fn contact_processed(
        &mut self,
        _: &mut ManifoldPoint<usize>,
        _: BodyHandle,
        _: BodyHandle,
    ) {
        self.processed += 1;
    }
}

fn point(x: Real, z: Real, distance: Real, id: usize) -> ManifoldPoint<usize> {
    let p = Point::new(x, 0.0, z);
    let mut pt = ManifoldPoint::new(p, p, Vector::y(), distance);
    pt.user_persistent_data = Some(id);
    pt
}

fn full_manifold(cb: &mut Recorder, deepest: usize) -> PersistentManifold<usize> {
    let mut manifold = PersistentManifold::new(BodyHandle(0), BodyHandle(1));
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    for (id, (x, z)) in corners.into_iter().enumerate() {
        let distance = if id == deepest { -0.05 } else { -0.01 };
        let _ = manifold.add_manifold_point(point(x, z, distance, id), cb);
    }

    assert_eq!(manifold.num_contacts(), MANIFOLD_CACHE_SIZE);
    manifold
}

#[test]
fn fifth_point_keeps_the_deepest() {
    for deepest in 0..MANIFOLD_CACHE_SIZE {
        let mut cb = Recorder::default();
        let mut manifold = full_manifold(&mut cb, deepest);

        let slot = manifold.add_manifold_point(point(0.3, 0.2, -0.02, 4), &mut cb);

        assert_ne!(slot, deepest);
        assert_eq!(manifold.num_contacts(), MANIFOLD_CACHE_SIZE);
        assert_eq!(cb.destroyed.len(), 1);

        let ids: Vec<_> = manifold
            .points()
            .iter()
            .filter_map(|pt| pt.user_persistent_data)
            .collect();
        assert!(ids.contains(&deepest));
        assert!(ids.contains(&4));
        assert!(!ids.contains(&cb.destroyed[0]));
    }
}

#[test]
fn new_deepest_point_is_kept() {
    let mut cb = Recorder::default();
    let mut manifold = full_manifold(&mut cb, 0);

    let slot = manifold.add_manifold_point(point(0.0, 0.0, -0.1, 4), &mut cb);
    assert_eq!(manifold.contact_point(slot).distance, -0.1);
    assert_eq!(manifold.num_contacts(), MANIFOLD_CACHE_SIZE);
    assert_eq!(cb.destroyed.len(), 1);
}

#[test]
fn point_beyond_breaking_threshold_lasts_until_refresh() {
    let mut cb = Recorder::default();
    let mut manifold = PersistentManifold::new(BodyHandle(0), BodyHandle(1));

    let mut far = ManifoldPoint::new(Point::new(0.0, 0.5, 0.0), Point::origin(), Vector::y(), 0.5);
    far.user_persistent_data = Some(7);
    let slot = manifold.add_manifold_point(far, &mut cb);
    assert_eq!(slot, 0);
    assert_eq!(manifold.num_contacts(), 1);

    manifold.refresh_contact_points(&Isometry::identity(), &Isometry::identity(), &mut cb);
    assert_eq!(manifold.num_contacts(), 0);
    assert_eq!(cb.destroyed, vec![7]);
}

#[test]
fn refresh_drops_separated_points() {
    let mut cb = Recorder::default();
    let mut manifold = PersistentManifold::new(BodyHandle(0), BodyHandle(1));

    let mut touching = ManifoldPoint::new(Point::origin(), Point::origin(), Vector::y(), 0.0);
    touching.user_persistent_data = Some(0);
    let mut penetrating = ManifoldPoint::new(
        Point::new(1.0, 0.0, 0.0),
        Point::new(1.0, 0.04, 0.0),
        Vector::y(),
        -0.04,
    );
    penetrating.user_persistent_data = Some(1);
    let _ = manifold.add_manifold_point(touching, &mut cb);
    let _ = manifold.add_manifold_point(penetrating, &mut cb);

    // Below the breaking threshold: both points survive.
    manifold.refresh_contact_points(
        &Isometry::translation(0.0, 0.01, 0.0),
        &Isometry::identity(),
        &mut cb,
    );
    assert_eq!(manifold.num_contacts(), 2);
    assert_eq!(cb.processed, 2);
    assert_relative_eq!(manifold.contact_point(0).distance, 0.01, epsilon = 1.0e-6);
    assert_relative_eq!(manifold.contact_point(1).distance, -0.03, epsilon = 1.0e-6);

    // The touching point separates beyond the threshold.
    assert_eq!(manifold.contact_breaking_threshold, DEFAULT_CONTACT_BREAKING_THRESHOLD);
    manifold.refresh_contact_points(
        &Isometry::translation(0.0, 0.05, 0.0),
        &Isometry::identity(),
        &mut cb,
    );
    assert_eq!(manifold.num_contacts(), 1);
    assert_eq!(cb.destroyed, vec![0]);
    assert_eq!(manifold.contact_point(0).user_persistent_data, Some(1));
    assert_eq!(manifold.contact_point(0).life_time, 2);

    // Sliding across the normal also breaks the contact.
    manifold.refresh_contact_points(
        &Isometry::translation(0.5, 0.0, 0.0),
        &Isometry::identity(),
        &mut cb,
    );
    assert_eq!(manifold.num_contacts(), 0);
    assert_eq!(cb.destroyed, vec![0, 1]);
}

#[test]
fn ball_resting_on_cuboid() {
    let ball = Ball::new(0.5);
    let ground = Cuboid::new(Vector::new(5.0, 1.0, 5.0));
    let ball_body = ContactBody::new(BodyHandle(0), Isometry::translation(0.0, 1.45, 0.0));
    let ground_body = ContactBody::new(BodyHandle(1), Isometry::identity());

    let manifold = PersistentManifold::<()>::new(BodyHandle(0), BodyHandle(1));
    let mut algorithm =
        ConvexConvexAlgorithm::new(manifold, GjkEpaPenetrationDepthSolver::new());
    let mut callbacks = ();

    algorithm.process_collision(&ball, &ball_body, &ground, &ground_body, &mut callbacks);
    assert_eq!(algorithm.manifold().num_contacts(), 1);

    let pt = algorithm.manifold().contact_point(0);
    assert_relative_eq!(pt.distance, -0.05, epsilon = 1.0e-3);
    assert_relative_eq!(pt.normal_world_on_b, Vector::y(), epsilon = 1.0e-3);
    assert_relative_eq!(pt.position_world_on_b, Point::new(0.0, 1.0, 0.0), epsilon = 1.0e-3);
    assert_relative_eq!(pt.local_point_a, Point::new(0.0, -0.5, 0.0), epsilon = 1.0e-3);
    assert_relative_eq!(pt.combined_friction, 0.5, epsilon = 1.0e-6);

    // Running again at the same place merges with the cached point.
    algorithm.process_collision(&ball, &ball_body, &ground, &ground_body, &mut callbacks);
    assert_eq!(algorithm.manifold().num_contacts(), 1);
    assert_eq!(algorithm.manifold().contact_point(0).life_time, 2);

    // Lifting the ball breaks the contact.
    let lifted = ContactBody::new(BodyHandle(0), Isometry::translation(0.0, 1.6, 0.0));
    algorithm.process_collision(&ball, &lifted, &ground, &ground_body, &mut callbacks);
    assert_eq!(algorithm.manifold().num_contacts(), 0);
}
