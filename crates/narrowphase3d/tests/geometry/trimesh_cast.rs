use approx::assert_relative_eq;
use narrowphase3d::math::{Isometry, Point, Real};
use narrowphase3d::query::convex_cast::{cast_convex_against_trimesh, ConvexCastMethod};
use narrowphase3d::shape::{Ball, TriMesh};

fn quad() -> TriMesh {
    TriMesh::try_new(
        vec![
            Point::new(-5.0, 0.0, -5.0),
            Point::new(5.0, 0.0, -5.0),
            Point::new(5.0, 0.0, 5.0),
            Point::new(-5.0, 0.0, 5.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
    .unwrap()
}

// Two horizontal quads, the lower one (y = -1) listed first.
fn stacked_quads() -> TriMesh {
    let mut vertices = Vec::new();

    for y in [-1.0, 1.0] {
        vertices.extend_from_slice(&[
            Point::new(-5.0, y, -5.0),
            Point::new(5.0, y, -5.0),
            Point::new(5.0, y, 5.0),
            Point::new(-5.0, y, 5.0),
        ]);
    }

    TriMesh::try_new(vertices, vec![[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]]).unwrap()
}

#[test]
fn ball_falling_on_quad() {
    let mesh = quad();
    let ball = Ball::new(0.5);
    let from = Isometry::translation(1.0, 2.0, -2.0);
    let to = Isometry::translation(1.0, -2.0, -2.0);

    for method in [ConvexCastMethod::SubSimplex, ConvexCastMethod::Gjk] {
        let hit =
            cast_convex_against_trimesh(&ball, &from, &to, &mesh, &Isometry::identity(), method)
                .unwrap();

        assert_eq!(hit.triangle_index, 0);
        assert_eq!(hit.part_id, 0);
        assert_relative_eq!(hit.hit_fraction, 0.375, epsilon = 1.0e-2);
        assert!(hit.normal.y > 0.99);
        assert_relative_eq!(hit.normal.norm(), 1.0, epsilon = 1.0e-4);
    }
}

#[test]
fn earliest_triangle_wins_regardless_of_index_order() {
    let mesh = stacked_quads();
    let ball = Ball::new(0.5);
    let from = Isometry::translation(1.0, 2.0, -2.0);
    let to = Isometry::translation(1.0, -3.0, -2.0);

    for method in [ConvexCastMethod::SubSimplex, ConvexCastMethod::Gjk] {
        let hit =
            cast_convex_against_trimesh(&ball, &from, &to, &mesh, &Isometry::identity(), method)
                .unwrap();

        // The upper quad is reached when the center is at y = 1.5.
        assert_eq!(hit.triangle_index, 2);
        assert_relative_eq!(hit.hit_fraction, 0.1, epsilon = 1.0e-2);
        assert_relative_eq!(hit.hit_point.y, 1.0, epsilon = 5.0e-2);
    }
}

#[test]
fn transformed_mesh() {
    let mesh = quad();
    let ball = Ball::new(0.5);
    let mesh_pos = Isometry::translation(0.0, -1.0, 0.0);
    let from = Isometry::translation(-2.0, 2.0, 2.0);
    let to = Isometry::translation(-2.0, -2.0, 2.0);

    let hit = cast_convex_against_trimesh(
        &ball,
        &from,
        &to,
        &mesh,
        &mesh_pos,
        ConvexCastMethod::default(),
    )
    .unwrap();

    // Above the second triangle, the plane is one unit lower.
    assert_eq!(hit.triangle_index, 1);
    let expected: Real = 2.5 / 4.0;
    assert_relative_eq!(hit.hit_fraction, expected, epsilon = 1.0e-2);
    assert_relative_eq!(hit.hit_point.y, -1.0, epsilon = 5.0e-2);
}

#[test]
fn sweep_missing_the_mesh() {
    let mesh = quad();
    let ball = Ball::new(0.5);
    let from = Isometry::translation(10.0, 2.0, 0.0);
    let to = Isometry::translation(10.0, -2.0, 0.0);

    assert!(cast_convex_against_trimesh(
        &ball,
        &from,
        &to,
        &mesh,
        &Isometry::identity(),
        ConvexCastMethod::Gjk
    )
    .is_none());
}
