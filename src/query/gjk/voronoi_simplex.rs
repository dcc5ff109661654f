use crate::math::{Point, Real, Vector};
use crate::query::gjk::CSOPoint;

/// The maximum number of vertices a [`VoronoiSimplexSolver`] can hold.
pub const VORONOI_SIMPLEX_MAX_VERTICES: usize = 5;

/// Default squared distance below which a new point is considered already part of the simplex.
///
/// Zero means only exact copies of a vertex are detected.
pub const VORONOI_DEFAULT_EQUAL_VERTEX_THRESHOLD: Real = 0.0;

/// Below this (squared) separation, a tetrahedron vertex is considered coplanar with the
/// opposite face.
const DEGENERATE_TETRAHEDRON_EPSILON: Real = 1.0e-4;

#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// The vertices of a simplex that contribute to its point closest to the origin.
pub struct UsedVertices(u8);

bitflags::bitflags! {
    impl UsedVertices: u8 {
        /// The first vertex.
        const A = 1 << 0;
        /// The second vertex.
        const B = 1 << 1;
        /// The third vertex.
        const C = 1 << 2;
        /// The fourth vertex.
        const D = 1 << 3;
    }
}

/// The closest point of a sub-simplex (segment, triangle or tetrahedron) to a query point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubSimplexClosestResult {
    /// The closest point found on the sub-simplex.
    pub closest_point_on_simplex: Point<Real>,
    /// The vertices with a non-zero contribution to `closest_point_on_simplex`.
    pub used_vertices: UsedVertices,
    /// The barycentric coordinates of `closest_point_on_simplex`.
    pub barycentric_coords: [Real; 4],
    /// Set if the sub-simplex was too flat to classify the query point.
    pub degenerate: bool,
}

impl Default for SubSimplexClosestResult {
    fn default() -> Self {
        Self {
            closest_point_on_simplex: Point::origin(),
            used_vertices: UsedVertices::empty(),
            barycentric_coords: [0.0; 4],
            degenerate: false,
        }
    }
}

impl SubSimplexClosestResult {
    /// Resets the degeneracy flag, the barycentric coordinates and the used vertices.
    pub fn reset(&mut self) {
        self.degenerate = false;
        self.barycentric_coords = [0.0; 4];
        self.used_vertices = UsedVertices::empty();
    }

    /// Are all the barycentric coordinates non-negative?
    pub fn is_valid(&self) -> bool {
        self.barycentric_coords.iter().all(|c| *c >= 0.0)
    }

    /// Sets the four barycentric coordinates at once.
    pub fn set_barycentric_coordinates(&mut self, a: Real, b: Real, c: Real, d: Real) {
        self.barycentric_coords = [a, b, c, d];
    }
}

/// Incremental simplex solver based on the Voronoi regions of its features.
///
/// Holds up to four points of the Minkowski difference `A - B` together with their
/// originating points on `A` and `B`, and computes the point of their convex hull closest
/// to the origin. Vertices that do not contribute to that point are discarded.
#[derive(Clone, Debug)]
pub struct VoronoiSimplexSolver {
    vertices: [CSOPoint; VORONOI_SIMPLEX_MAX_VERTICES],
    num_vertices: usize,
    cached_p1: Point<Real>,
    cached_p2: Point<Real>,
    cached_v: Vector<Real>,
    last_w: Vector<Real>,
    cached_valid_closest: bool,
    cached_bc: SubSimplexClosestResult,
    needs_update: bool,
    /// Squared distance below which [`Self::in_simplex`] treats two distinct points as equal.
    pub equal_vertex_threshold: Real,
}

impl Default for VoronoiSimplexSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl VoronoiSimplexSolver {
    /// Creates an empty simplex solver.
    pub fn new() -> Self {
        Self {
            vertices: [CSOPoint::origin(); VORONOI_SIMPLEX_MAX_VERTICES],
            num_vertices: 0,
            cached_p1: Point::origin(),
            cached_p2: Point::origin(),
            cached_v: Vector::zeros(),
            last_w: Vector::repeat(Real::MAX),
            cached_valid_closest: false,
            cached_bc: SubSimplexClosestResult::default(),
            needs_update: true,
            equal_vertex_threshold: VORONOI_DEFAULT_EQUAL_VERTEX_THRESHOLD,
        }
    }

    /// Clears the simplex.
    pub fn reset(&mut self) {
        self.cached_valid_closest = false;
        self.num_vertices = 0;
        self.needs_update = true;
        self.last_w = Vector::repeat(Real::MAX);
        self.cached_bc.reset();
    }

    /// Adds the point `w = p - q` to the simplex, `p` and `q` being its originating points.
    pub fn add_vertex(&mut self, w: &Vector<Real>, p: &Point<Real>, q: &Point<Real>) {
        debug_assert!(
            self.num_vertices < VORONOI_SIMPLEX_MAX_VERTICES,
            "Too many vertices added to the simplex."
        );

        self.last_w = *w;
        self.needs_update = true;
        self.vertices[self.num_vertices] = CSOPoint::new_with_point(Point::from(*w), *p, *q);
        self.num_vertices += 1;
    }

    /// Removes the `index`-th vertex, replacing it with the last one.
    pub fn remove_vertex(&mut self, index: usize) {
        debug_assert!(self.num_vertices > 0);
        self.num_vertices -= 1;
        self.vertices[index] = self.vertices[self.num_vertices];
    }

    /// Removes the vertices not flagged by `used`.
    ///
    /// Removal goes from the last vertex to the first so that swaps never move a vertex
    /// that still has to be checked.
    pub fn reduce_vertices(&mut self, used: UsedVertices) {
        if self.num_vertices >= 4 && !used.contains(UsedVertices::D) {
            self.remove_vertex(3);
        }

        if self.num_vertices >= 3 && !used.contains(UsedVertices::C) {
            self.remove_vertex(2);
        }

        if self.num_vertices >= 2 && !used.contains(UsedVertices::B) {
            self.remove_vertex(1);
        }

        if self.num_vertices >= 1 && !used.contains(UsedVertices::A) {
            self.remove_vertex(0);
        }
    }

    /// The number of vertices of the simplex.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// The vertices of the simplex.
    #[inline]
    pub fn vertices(&self) -> &[CSOPoint] {
        &self.vertices[..self.num_vertices]
    }

    /// Does the simplex have four vertices?
    #[inline]
    pub fn full_simplex(&self) -> bool {
        self.num_vertices == 4
    }

    /// Does the simplex have no vertex?
    #[inline]
    pub fn empty_simplex(&self) -> bool {
        self.num_vertices == 0
    }

    /// The largest squared norm among the simplex vertices.
    pub fn max_vertex(&self) -> Real {
        self.vertices()
            .iter()
            .map(|v| v.point.coords.norm_squared())
            .fold(0.0, Real::max)
    }

    /// Is `w` already part of this simplex?
    ///
    /// Also returns `true` if `w` is the last point added, even if it has been
    /// removed since. Vertices closer to `w` than `self.equal_vertex_threshold`
    /// (squared) count as equal.
    pub fn in_simplex(&self, w: &Vector<Real>) -> bool {
        let found = self.vertices().iter().any(|v| {
            v.point.coords == *w
                || (v.point.coords - w).norm_squared() < self.equal_vertex_threshold
        });

        found || *w == self.last_w
    }

    /// Computes the vector from the origin to the closest point of the simplex.
    ///
    /// Returns `None` if that point could not be computed reliably. The last
    /// computed vector is then still available through [`Self::backup_closest`].
    pub fn closest(&mut self) -> Option<Vector<Real>> {
        if self.update_closest_vector_and_points() {
            Some(self.cached_v)
        } else {
            None
        }
    }

    /// The last computed closest vector, without updating it.
    pub fn backup_closest(&self) -> Vector<Real> {
        self.cached_v
    }

    /// Computes the closest points on the two original shapes.
    pub fn compute_points(&mut self) -> (Point<Real>, Point<Real>) {
        let _ = self.update_closest_vector_and_points();
        (self.cached_p1, self.cached_p2)
    }

    fn update_closest_vector_and_points(&mut self) -> bool {
        if !self.needs_update {
            return self.cached_valid_closest;
        }

        self.cached_bc.reset();
        self.needs_update = false;
        let origin = Point::origin();

        match self.num_vertices {
            0 => self.cached_valid_closest = false,
            1 => {
                self.cached_p1 = self.vertices[0].orig1;
                self.cached_p2 = self.vertices[0].orig2;
                self.cached_v = self.cached_p1 - self.cached_p2;
                self.cached_bc.set_barycentric_coordinates(1.0, 0.0, 0.0, 0.0);
                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            2 => {
                let from = self.vertices[0].point;
                let to = self.vertices[1].point;
                let v = to - from;
                let mut t = v.dot(&(origin - from));

                if t > 0.0 {
                    let dot_vv = v.norm_squared();

                    if t < dot_vv {
                        t /= dot_vv;
                        self.cached_bc.used_vertices |= UsedVertices::A | UsedVertices::B;
                    } else {
                        t = 1.0;
                        self.cached_bc.used_vertices |= UsedVertices::B;
                    }
                } else {
                    t = 0.0;
                    self.cached_bc.used_vertices |= UsedVertices::A;
                }

                self.cached_bc.set_barycentric_coordinates(1.0 - t, t, 0.0, 0.0);
                self.cached_bc.closest_point_on_simplex = from + v * t;

                let [a, b, ..] = self.vertices;
                self.cached_p1 = a.orig1 + (b.orig1 - a.orig1) * t;
                self.cached_p2 = a.orig2 + (b.orig2 - a.orig2) * t;
                self.cached_v = self.cached_p1 - self.cached_p2;

                self.reduce_vertices(self.cached_bc.used_vertices);
                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            3 => {
                let [a, b, c, ..] = self.vertices;
                let _ = closest_point_on_triangle(
                    &origin,
                    &a.point,
                    &b.point,
                    &c.point,
                    &mut self.cached_bc,
                );
                self.set_cached_points(3);
                self.reduce_vertices(self.cached_bc.used_vertices);
                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            4 => {
                let [a, b, c, d, ..] = self.vertices;
                let has_separation = closest_point_on_tetrahedron(
                    &origin,
                    &a.point,
                    &b.point,
                    &c.point,
                    &d.point,
                    &mut self.cached_bc,
                );

                if has_separation {
                    self.set_cached_points(4);
                    self.reduce_vertices(self.cached_bc.used_vertices);
                    self.cached_valid_closest = self.cached_bc.is_valid();
                } else if self.cached_bc.degenerate {
                    self.cached_valid_closest = false;
                } else {
                    // The origin is inside the tetrahedron.
                    self.cached_valid_closest = true;
                    self.cached_v = Vector::zeros();
                }
            }
            _ => {
                log::debug!(
                    "Voronoi simplex solver: unexpected vertex count {}.",
                    self.num_vertices
                );
                self.cached_valid_closest = false;
            }
        }

        self.cached_valid_closest
    }

    fn set_cached_points(&mut self, n: usize) {
        let bc = &self.cached_bc.barycentric_coords;
        let mut p1 = Vector::zeros();
        let mut p2 = Vector::zeros();

        for (vtx, coord) in self.vertices[..n].iter().zip(bc.iter()) {
            p1 += vtx.orig1.coords * *coord;
            p2 += vtx.orig2.coords * *coord;
        }

        self.cached_p1 = Point::from(p1);
        self.cached_p2 = Point::from(p2);
        self.cached_v = p1 - p2;
    }
}

/// Computes the point of the triangle `abc` closest to `p`.
///
/// Classifies `p` against the seven Voronoi regions of the triangle (three vertices,
/// three edges, the face). Always succeeds.
pub fn closest_point_on_triangle(
    p: &Point<Real>,
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    result: &mut SubSimplexClosestResult,
) -> bool {
    result.used_vertices = UsedVertices::empty();

    // Vertex region A.
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);

    if d1 <= 0.0 && d2 <= 0.0 {
        result.closest_point_on_simplex = *a;
        result.used_vertices = UsedVertices::A;
        result.set_barycentric_coordinates(1.0, 0.0, 0.0, 0.0);
        return true;
    }

    // Vertex region B.
    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);

    if d3 >= 0.0 && d4 <= d3 {
        result.closest_point_on_simplex = *b;
        result.used_vertices = UsedVertices::B;
        result.set_barycentric_coordinates(0.0, 1.0, 0.0, 0.0);
        return true;
    }

    // Edge region AB.
    let vc = d1 * d4 - d3 * d2;

    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        result.closest_point_on_simplex = a + ab * v;
        result.used_vertices = UsedVertices::A | UsedVertices::B;
        result.set_barycentric_coordinates(1.0 - v, v, 0.0, 0.0);
        return true;
    }

    // Vertex region C.
    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);

    if d6 >= 0.0 && d5 <= d6 {
        result.closest_point_on_simplex = *c;
        result.used_vertices = UsedVertices::C;
        result.set_barycentric_coordinates(0.0, 0.0, 1.0, 0.0);
        return true;
    }

    // Edge region AC.
    let vb = d5 * d2 - d1 * d6;

    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        result.closest_point_on_simplex = a + ac * w;
        result.used_vertices = UsedVertices::A | UsedVertices::C;
        result.set_barycentric_coordinates(1.0 - w, 0.0, w, 0.0);
        return true;
    }

    // Edge region BC.
    let va = d3 * d6 - d5 * d4;

    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        result.closest_point_on_simplex = b + (c - b) * w;
        result.used_vertices = UsedVertices::B | UsedVertices::C;
        result.set_barycentric_coordinates(0.0, 1.0 - w, w, 0.0);
        return true;
    }

    // Face region.
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;

    result.closest_point_on_simplex = a + ab * v + ac * w;
    result.used_vertices = UsedVertices::A | UsedVertices::B | UsedVertices::C;
    result.set_barycentric_coordinates(1.0 - v - w, v, w, 0.0);
    true
}

/// Classifies `p` against the plane of the triangle `abc`, using `d` as a reference
/// point on the inner side.
///
/// Returns `Some(true)` if `p` and `d` lie on opposite sides of the plane, `Some(false)`
/// if they lie on the same side (or `p` lies on the plane), and `None` if `d` is
/// (almost) on the plane.
pub fn point_outside_of_plane(
    p: &Point<Real>,
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    d: &Point<Real>,
) -> Option<bool> {
    let normal = (b - a).cross(&(c - a));
    let sign_p = (p - a).dot(&normal);
    let sign_d = (d - a).dot(&normal);

    if sign_d * sign_d < DEGENERATE_TETRAHEDRON_EPSILON * DEGENERATE_TETRAHEDRON_EPSILON {
        return None;
    }

    Some(sign_p * sign_d < 0.0)
}

/// Computes the point of the tetrahedron `abcd` closest to `p`.
///
/// Returns `false` if `p` lies inside the tetrahedron, or if the tetrahedron is
/// degenerate (in which case `result.degenerate` is set).
pub fn closest_point_on_tetrahedron(
    p: &Point<Real>,
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    d: &Point<Real>,
    result: &mut SubSimplexClosestResult,
) -> bool {
    result.closest_point_on_simplex = *p;
    result.used_vertices = UsedVertices::all();

    let (Some(outside_abc), Some(outside_acd), Some(outside_adb), Some(outside_bdc)) = (
        point_outside_of_plane(p, a, b, c, d),
        point_outside_of_plane(p, a, c, d, b),
        point_outside_of_plane(p, a, d, b, c),
        point_outside_of_plane(p, b, d, c, a),
    ) else {
        result.degenerate = true;
        return false;
    };

    if !(outside_abc || outside_acd || outside_adb || outside_bdc) {
        return false;
    }

    let mut tmp = SubSimplexClosestResult::default();
    let mut best_sq_dist = Real::MAX;

    // Each face is tested with its own vertex order. `remap` sends the vertices
    // of the face (A, B, C of `tmp`) back to the tetrahedron vertices.
    let faces = [
        (outside_abc, [a, b, c], [0, 1, 2]),
        (outside_acd, [a, c, d], [0, 2, 3]),
        (outside_adb, [a, d, b], [0, 3, 1]),
        (outside_bdc, [b, d, c], [1, 3, 2]),
    ];

    for (outside, [fa, fb, fc], remap) in faces {
        if !outside {
            continue;
        }

        let _ = closest_point_on_triangle(p, fa, fb, fc, &mut tmp);
        let q = tmp.closest_point_on_simplex;
        let sq_dist = (q - p).norm_squared();

        if sq_dist < best_sq_dist {
            best_sq_dist = sq_dist;
            result.closest_point_on_simplex = q;
            result.used_vertices = UsedVertices::empty();
            let mut bcoords = [0.0; 4];

            for (k, vid) in remap.iter().enumerate() {
                if tmp
                    .used_vertices
                    .contains(UsedVertices::from_bits_truncate(1u8 << k))
                {
                    result.used_vertices |= UsedVertices::from_bits_truncate(1u8 << *vid);
                }

                bcoords[*vid] = tmp.barycentric_coords[k];
            }

            result.barycentric_coords = bcoords;
        }
    }

    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn segment_closest_point_clamps_to_endpoints() {
        let mut simplex = VoronoiSimplexSolver::new();
        let p = Point::new(3.0, 1.0, 0.0);
        let q = Point::new(0.0, 0.0, 0.0);
        simplex.add_vertex(&(p - q), &p, &q);
        let p2 = Point::new(5.0, -1.0, 0.0);
        simplex.add_vertex(&(p2 - q), &p2, &q);

        let v = simplex.closest().unwrap();
        // The origin projects before the first endpoint.
        assert_relative_eq!(v, Vector::new(3.0, 1.0, 0.0), epsilon = 1.0e-6);
        assert_eq!(simplex.num_vertices(), 1);
    }

    #[test]
    fn segment_interior_keeps_both_vertices() {
        let mut simplex = VoronoiSimplexSolver::new();
        let q = Point::origin();
        let a = Point::new(-1.0, 2.0, 0.0);
        let b = Point::new(1.0, 2.0, 0.0);
        simplex.add_vertex(&a.coords, &a, &q);
        simplex.add_vertex(&b.coords, &b, &q);

        let v = simplex.closest().unwrap();
        assert_relative_eq!(v, Vector::new(0.0, 2.0, 0.0), epsilon = 1.0e-6);
        assert_eq!(simplex.num_vertices(), 2);
    }

    #[test]
    fn triangle_regions() {
        let a = Point::new(0.0, 0.0, 1.0);
        let b = Point::new(2.0, 0.0, 1.0);
        let c = Point::new(0.0, 2.0, 1.0);
        let mut res = SubSimplexClosestResult::default();

        // Vertex region.
        let _ = closest_point_on_triangle(&Point::new(-1.0, -1.0, 0.0), &a, &b, &c, &mut res);
        assert_eq!(res.used_vertices, UsedVertices::A);
        assert_eq!(res.closest_point_on_simplex, a);

        // Edge region BC.
        let _ = closest_point_on_triangle(&Point::new(2.0, 2.0, 0.0), &a, &b, &c, &mut res);
        assert_eq!(res.used_vertices, UsedVertices::B | UsedVertices::C);
        assert_relative_eq!(res.closest_point_on_simplex, Point::new(1.0, 1.0, 1.0));

        // Face region.
        let _ = closest_point_on_triangle(&Point::new(0.5, 0.5, 0.0), &a, &b, &c, &mut res);
        assert_eq!(
            res.used_vertices,
            UsedVertices::A | UsedVertices::B | UsedVertices::C
        );
        assert_relative_eq!(res.closest_point_on_simplex, Point::new(0.5, 0.5, 1.0));
        assert!(res.is_valid());
    }

    #[test]
    fn flat_tetrahedron_is_degenerate() {
        let mut res = SubSimplexClosestResult::default();
        let separated = closest_point_on_tetrahedron(
            &Point::new(0.0, 0.0, 1.0),
            &Point::new(0.0, 0.0, 0.0),
            &Point::new(1.0, 0.0, 0.0),
            &Point::new(0.0, 1.0, 0.0),
            &Point::new(1.0, 1.0, 0.0),
            &mut res,
        );
        assert!(!separated);
        assert!(res.degenerate);
    }

    #[test]
    fn in_simplex_remembers_last_point() {
        let mut simplex = VoronoiSimplexSolver::new();
        let w = Vector::new(1.0, 2.0, 3.0);
        assert!(!simplex.in_simplex(&w));
        simplex.add_vertex(&w, &Point::from(w), &Point::origin());
        assert!(simplex.in_simplex(&w));
        simplex.remove_vertex(0);
        assert!(simplex.in_simplex(&w));
        simplex.reset();
        assert!(!simplex.in_simplex(&w));
    }

    #[test]
    fn in_simplex_detects_only_exact_copies_by_default() {
        let mut simplex = VoronoiSimplexSolver::new();
        let w = Vector::new(0.009, 0.0, 0.0);
        simplex.add_vertex(&w, &Point::from(w), &Point::origin());
        let nearby = Vector::new(0.0, 0.0, 0.0);
        assert!(!simplex.in_simplex(&nearby));

        simplex.equal_vertex_threshold = 1.0e-4;
        assert!(simplex.in_simplex(&nearby));
    }
}
