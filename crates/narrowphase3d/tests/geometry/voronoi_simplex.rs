use approx::assert_relative_eq;
use narrowphase3d::math::{Point, Real, Vector};
use narrowphase3d::query::gjk::{
    closest_point_on_tetrahedron, closest_point_on_triangle, point_outside_of_plane,
    SubSimplexClosestResult, VoronoiSimplexSolver,
};

#[test]
fn triangle_reproduces_barycentric_combination() {
    let w = [
        Vector::new(-1.2, -1.0, 1.0),
        Vector::new(2.0, 0.0, 1.0),
        Vector::new(0.0, 2.5, 1.0),
    ];
    // The witnesses on the first shape are the unit axes, so the closest point on the
    // first shape is the barycentric coordinates themselves.
    let p = [Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0), Point::new(0.0, 0.0, 1.0)];

    let mut simplex = VoronoiSimplexSolver::new();
    for i in 0..3 {
        simplex.add_vertex(&w[i], &p[i], &(p[i] - w[i]));
    }

    let v = simplex.closest().unwrap();
    assert_relative_eq!(v, Vector::new(0.0, 0.0, 1.0), epsilon = 1.0e-5);
    assert_eq!(simplex.num_vertices(), 3);

    let (p1, p2) = simplex.compute_points();
    assert_relative_eq!(p1, Point::new(0.5, 0.3, 0.2), epsilon = 1.0e-5);
    assert_relative_eq!(p1 - p2, v, epsilon = 1.0e-5);
}

#[test]
fn triangle_through_origin_has_zero_closest_vector() {
    let a = Point::new(-1.0, -1.0, 0.0);
    let b = Point::new(2.0, -1.0, 0.0);
    let c = Point::new(-1.0, 2.0, 0.0);
    let mut res = SubSimplexClosestResult::default();

    let _ = closest_point_on_triangle(&Point::origin(), &a, &b, &c, &mut res);
    assert_relative_eq!(res.closest_point_on_simplex, Point::origin(), epsilon = 1.0e-6);
    assert!(res.is_valid());
}

fn random_point(rng: &mut oorandom::Rand32) -> Point<Real> {
    Point::new(
        rng.rand_float() as Real * 2.0 - 1.0,
        rng.rand_float() as Real * 2.0 - 1.0,
        rng.rand_float() as Real * 2.0 - 1.0,
    )
}

#[test]
fn random_tetrahedra_enclosing_the_origin() {
    let mut rng = oorandom::Rand32::new(42);
    let mut tested = 0;

    while tested < 200 {
        let mut pts = [
            random_point(&mut rng),
            random_point(&mut rng),
            random_point(&mut rng),
            random_point(&mut rng),
        ];

        let volume = (pts[1] - pts[0])
            .cross(&(pts[2] - pts[0]))
            .dot(&(pts[3] - pts[0]))
            .abs()
            / 6.0;

        if volume < 0.05 {
            continue;
        }

        // Move a point strictly inside the tetrahedron to the origin.
        let weights = [
            rng.rand_float() as Real + 0.1,
            rng.rand_float() as Real + 0.1,
            rng.rand_float() as Real + 0.1,
            rng.rand_float() as Real + 0.1,
        ];
        let total: Real = weights.iter().sum();
        let inner = pts
            .iter()
            .zip(weights.iter())
            .fold(Vector::zeros(), |acc, (p, w)| acc + p.coords * (*w / total));

        for p in &mut pts {
            *p -= inner;
        }

        let [a, b, c, d] = pts;
        let origin = Point::origin();
        assert_eq!(point_outside_of_plane(&origin, &a, &b, &c, &d), Some(false));
        assert_eq!(point_outside_of_plane(&origin, &a, &c, &d, &b), Some(false));
        assert_eq!(point_outside_of_plane(&origin, &a, &d, &b, &c), Some(false));
        assert_eq!(point_outside_of_plane(&origin, &b, &d, &c, &a), Some(false));

        let mut res = SubSimplexClosestResult::default();
        assert!(!closest_point_on_tetrahedron(&origin, &a, &b, &c, &d, &mut res));
        assert!(!res.degenerate);

        let mut simplex = VoronoiSimplexSolver::new();
        for p in &pts {
            simplex.add_vertex(&p.coords, p, &origin);
        }

        assert_eq!(simplex.closest(), Some(Vector::zeros()));
        assert_eq!(simplex.num_vertices(), 4);

        tested += 1;
    }
}
