//! Penetration depth between two convex shapes using a hashed GJK followed by EPA.
//!
//! GJK here only searches for a simplex enclosing the origin of the Minkowski difference
//! `A - B`. Support directions are hashed so that a direction already sampled stops the
//! search. The simplex is then grown into a tetrahedron or a triangular bipyramid and
//! expanded by EPA until the face closest to the origin stops moving.

use crate::math::{Isometry, Point, Real, Rotation, Vector};
use crate::shape::ConvexShape;
use crate::utils::ObjectStack;
use na::{RealField, Unit};

/// The maximum number of GJK iterations.
pub const GJK_MAX_ITERATIONS: usize = 128;
/// The number of buckets of the support direction hash table.
pub const GJK_HASH_SIZE: usize = 64;
const GJK_HASH_MASK: usize = GJK_HASH_SIZE - 1;
/// Tolerance used by GJK to decide that the origin lies on a simplex feature.
pub const GJK_IN_SIMPLEX_EPSILON: Real = 1.0e-4;
const GJK_SQ_IN_SIMPLEX_EPSILON: Real = GJK_IN_SIMPLEX_EPSILON * GJK_IN_SIMPLEX_EPSILON;
/// The maximum number of EPA iterations.
pub const EPA_MAX_ITERATIONS: usize = 256;
/// Tolerance used by EPA to decide that the origin projects inside a face.
pub const EPA_IN_FACE_EPSILON: Real = 0.01;
/// EPA stops once a new support point improves the closest face by less than this.
pub const EPA_ACCURACY: Real = 0.001;

const_assert!(GJK_HASH_SIZE.is_power_of_two());

const MOD3: [usize; 5] = [0, 1, 2, 0, 1];

// Faces of the initial tetrahedron, then the (face, edge, face, edge) adjacencies.
const TETRA_FACES: [[usize; 3]; 4] = [[2, 1, 0], [3, 0, 1], [3, 1, 2], [3, 2, 0]];
const TETRA_EDGES: [[usize; 4]; 6] = [
    [0, 0, 2, 1],
    [0, 1, 1, 1],
    [0, 2, 3, 1],
    [1, 0, 3, 2],
    [2, 0, 1, 2],
    [3, 0, 2, 2],
];

// Faces of the initial triangular bipyramid, then the adjacencies.
const HEXA_FACES: [[usize; 3]; 6] = [
    [2, 0, 4],
    [4, 1, 2],
    [1, 4, 0],
    [0, 3, 1],
    [0, 2, 3],
    [1, 3, 2],
];
const HEXA_EDGES: [[usize; 4]; 9] = [
    [0, 0, 4, 0],
    [0, 1, 2, 1],
    [0, 2, 1, 2],
    [1, 1, 5, 2],
    [1, 0, 2, 0],
    [2, 2, 3, 2],
    [3, 1, 5, 0],
    [3, 0, 4, 2],
    [5, 1, 4, 1],
];

/// The outcome of a [`GjkEpaSolver`] query.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GjkEpaStatus {
    /// The shapes do not overlap.
    Separated,
    /// The shapes overlap and the penetration depth was computed.
    Penetrating,
    /// GJK ran out of iterations.
    GjkFailed,
    /// EPA could not build or expand its polytope.
    EpaFailed,
}

/// The result of a [`GjkEpaSolver`] query.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GjkEpaResults {
    /// The outcome of the query.
    pub status: GjkEpaStatus,
    /// The deepest point of each shape inside the other one, in world-space.
    pub witnesses: [Point<Real>; 2],
    /// The penetration direction, from the first witness toward the second one.
    pub normal: Vector<Real>,
    /// The penetration depth.
    pub depth: Real,
    /// The number of GJK iterations performed.
    pub gjk_iterations: usize,
    /// The number of EPA iterations performed.
    pub epa_iterations: usize,
}

impl GjkEpaResults {
    fn separated() -> Self {
        Self {
            status: GjkEpaStatus::Separated,
            witnesses: [Point::origin(); 2],
            normal: Vector::zeros(),
            depth: 0.0,
            gjk_iterations: 0,
            epa_iterations: 0,
        }
    }

    /// Did the query find a penetration?
    pub fn is_penetrating(&self) -> bool {
        self.status == GjkEpaStatus::Penetrating
    }
}

/// A vertex of the Minkowski difference, with the direction it was sampled along.
#[derive(Copy, Clone, Debug)]
struct Mkv {
    w: Vector<Real>,
    r: Vector<Real>,
}

impl Default for Mkv {
    fn default() -> Self {
        Self {
            w: Vector::zeros(),
            r: Vector::zeros(),
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct HashNode {
    ray: Vector<Real>,
    next: Option<usize>,
}

#[derive(Copy, Clone, Debug)]
struct Face {
    vertices: [usize; 3],
    children: [Option<usize>; 3],
    edges: [usize; 3],
    n: Vector<Real>,
    d: Real,
    mark: u32,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Solver computing penetration depths with a hashed GJK and EPA.
///
/// The solver owns the pools its queries allocate from. They are emptied at the end of
/// every query but keep their capacity, so reusing a solver avoids allocations.
#[derive(Clone, Debug, Default)]
pub struct GjkEpaSolver {
    hashes: ObjectStack<HashNode>,
    vertices: ObjectStack<Mkv>,
    faces: ObjectStack<Face>,
}

impl GjkEpaSolver {
    /// Creates a solver with empty pools.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the penetration depth between `shape_a` and `shape_b`.
    ///
    /// Both shapes are grown by `radial_margin` on top of their own collision margins.
    pub fn collide(
        &mut self,
        shape_a: &dyn ConvexShape,
        pos_a: &Isometry<Real>,
        shape_b: &dyn ConvexShape,
        pos_b: &Isometry<Real>,
        radial_margin: Real,
    ) -> GjkEpaResults {
        self.hashes.push();
        self.vertices.push();
        self.faces.push();

        let mut results = GjkEpaResults::separated();
        let mut gjk = Gjk::new(
            [shape_a, shape_b],
            [*pos_a, *pos_b],
            radial_margin + EPA_ACCURACY,
            &mut self.hashes,
        );

        let found = gjk.search_origin(Vector::x());
        results.gjk_iterations = gjk.iterations + 1;

        if found {
            if gjk.enclose_origin() {
                let mut epa = Epa::new(&mut gjk, &mut self.vertices, &mut self.faces);
                let depth = epa.evaluate_pd(EPA_ACCURACY);
                results.epa_iterations = epa.iterations + 1;

                if depth > 0.0 {
                    results.status = GjkEpaStatus::Penetrating;
                    results.normal = epa.normal;
                    results.depth = depth;
                    results.witnesses = epa.nearest;
                } else if epa.failed {
                    results.status = GjkEpaStatus::EpaFailed;
                }
            } else if gjk.failed {
                results.status = GjkEpaStatus::GjkFailed;
            }
        } else if gjk.failed {
            results.status = GjkEpaStatus::GjkFailed;
        }

        if results.status == GjkEpaStatus::GjkFailed {
            log::debug!(
                "GJK-EPA: GJK did not converge after {} iterations.",
                GJK_MAX_ITERATIONS
            );
        }

        self.faces.pop();
        self.vertices.pop();
        self.hashes.pop();

        results
    }
}

struct Gjk<'a> {
    shapes: [&'a dyn ConvexShape; 2],
    transforms: [Isometry<Real>; 2],
    table: [Option<usize>; GJK_HASH_SIZE],
    hashes: &'a mut ObjectStack<HashNode>,
    simplex: [Mkv; 5],
    ray: Vector<Real>,
    rank: usize,
    iterations: usize,
    margin: Real,
    failed: bool,
}

impl<'a> Gjk<'a> {
    fn new(
        shapes: [&'a dyn ConvexShape; 2],
        transforms: [Isometry<Real>; 2],
        margin: Real,
        hashes: &'a mut ObjectStack<HashNode>,
    ) -> Self {
        Self {
            shapes,
            transforms,
            table: [None; GJK_HASH_SIZE],
            hashes,
            simplex: [Mkv::default(); 5],
            ray: Vector::zeros(),
            rank: 0,
            iterations: 0,
            margin,
            failed: false,
        }
    }

    fn hash(v: &Vector<Real>) -> usize {
        let h = (v.x * 15461.0) as i32 ^ (v.y * 83003.0) as i32 ^ (v.z * 15473.0) as i32;
        (h.wrapping_mul(169639) as usize) & GJK_HASH_MASK
    }

    /// World-space support point of the `i`-th shape, its own margin included.
    fn local_support(&self, d: &Vector<Real>, i: usize) -> Point<Real> {
        self.shapes[i].support_point_with_margin(&self.transforms[i], d)
    }

    fn support(&self, d: &Vector<Real>) -> Mkv {
        let w = self.local_support(d, 0) - self.local_support(&-*d, 1) + *d * self.margin;
        Mkv { w, r: *d }
    }

    /// Samples the support point along `self.ray` unless that direction was already sampled.
    ///
    /// Returns `true` if the new point lies beyond the origin along `self.ray`.
    fn fetch_support(&mut self) -> bool {
        let h = Self::hash(&self.ray);
        let mut entry = self.table[h];

        while let Some(id) = entry {
            if self.hashes[id].ray == self.ray {
                self.rank = self.rank.saturating_sub(1);
                return false;
            }

            entry = self.hashes[id].next;
        }

        let id = self.hashes.alloc(HashNode {
            ray: self.ray,
            next: self.table[h],
        });
        self.table[h] = Some(id);

        let support = self.support(&self.ray);
        self.simplex[self.rank] = support;
        self.rank += 1;
        self.ray.dot(&support.w) > 0.0
    }

    fn solve_simplex2(&mut self, ao: &Vector<Real>, ab: &Vector<Real>) -> bool {
        if ab.dot(ao) >= 0.0 {
            let cabo = ab.cross(ao);

            if cabo.norm_squared() > GJK_SQ_IN_SIMPLEX_EPSILON {
                self.ray = cabo.cross(ab);
            } else {
                return true;
            }
        } else {
            self.rank = 1;
            self.simplex[0] = self.simplex[1];
            self.ray = *ao;
        }

        false
    }

    fn solve_simplex3(&mut self, ao: &Vector<Real>, ab: &Vector<Real>, ac: &Vector<Real>) -> bool {
        self.solve_simplex3a(ao, ab, ac, &ab.cross(ac))
    }

    fn solve_simplex3a(
        &mut self,
        ao: &Vector<Real>,
        ab: &Vector<Real>,
        ac: &Vector<Real>,
        cabc: &Vector<Real>,
    ) -> bool {
        if cabc.cross(ab).dot(ao) < -GJK_IN_SIMPLEX_EPSILON {
            self.rank = 2;
            self.simplex[0] = self.simplex[1];
            self.simplex[1] = self.simplex[2];
            self.solve_simplex2(ao, ab)
        } else if cabc.cross(ac).dot(ao) > GJK_IN_SIMPLEX_EPSILON {
            self.rank = 2;
            self.simplex[1] = self.simplex[2];
            self.solve_simplex2(ao, ac)
        } else {
            let d = cabc.dot(ao);

            if d.abs() > GJK_IN_SIMPLEX_EPSILON {
                if d > 0.0 {
                    self.ray = *cabc;
                } else {
                    self.ray = -*cabc;
                    self.simplex.swap(0, 1);
                }

                false
            } else {
                true
            }
        }
    }

    fn solve_simplex4(
        &mut self,
        ao: &Vector<Real>,
        ab: &Vector<Real>,
        ac: &Vector<Real>,
        ad: &Vector<Real>,
    ) -> bool {
        let crs = ab.cross(ac);
        if crs.dot(ao) > GJK_IN_SIMPLEX_EPSILON {
            self.rank = 3;
            self.simplex[0] = self.simplex[1];
            self.simplex[1] = self.simplex[2];
            self.simplex[2] = self.simplex[3];
            return self.solve_simplex3a(ao, ab, ac, &crs);
        }

        let crs = ac.cross(ad);
        if crs.dot(ao) > GJK_IN_SIMPLEX_EPSILON {
            self.rank = 3;
            self.simplex[2] = self.simplex[3];
            return self.solve_simplex3a(ao, ac, ad, &crs);
        }

        let crs = ad.cross(ab);
        if crs.dot(ao) > GJK_IN_SIMPLEX_EPSILON {
            self.rank = 3;
            self.simplex[1] = self.simplex[0];
            self.simplex[0] = self.simplex[2];
            self.simplex[2] = self.simplex[3];
            return self.solve_simplex3a(ao, ad, ab, &crs);
        }

        true
    }

    /// Looks for a simplex enclosing the origin, starting along `init_ray`.
    fn search_origin(&mut self, init_ray: Vector<Real>) -> bool {
        self.iterations = 0;
        self.rank = 0;
        self.failed = false;
        self.table = [None; GJK_HASH_SIZE];
        self.ray = init_ray.try_normalize(0.0).unwrap_or(init_ray);

        let _ = self.fetch_support();
        self.ray = -self.simplex[0].w;

        while self.iterations < GJK_MAX_ITERATIONS {
            let rl = self.ray.norm();
            self.ray /= if rl > 0.0 { rl } else { 1.0 };

            if !self.fetch_support() {
                return false;
            }

            let s = self.simplex;
            let found = match self.rank {
                2 => self.solve_simplex2(&-s[1].w, &(s[0].w - s[1].w)),
                3 => self.solve_simplex3(&-s[2].w, &(s[1].w - s[2].w), &(s[0].w - s[2].w)),
                4 => self.solve_simplex4(
                    &-s[3].w,
                    &(s[2].w - s[3].w),
                    &(s[1].w - s[3].w),
                    &(s[0].w - s[3].w),
                ),
                _ => false,
            };

            if found {
                return true;
            }

            self.iterations += 1;
        }

        self.failed = true;
        false
    }

    /// Grows the simplex found by `search_origin` into a tetrahedron or a bipyramid.
    fn enclose_origin(&mut self) -> bool {
        match self.rank {
            2 => {
                let ab = self.simplex[1].w - self.simplex[0].w;
                let b = [
                    ab.cross(&Vector::x()),
                    ab.cross(&Vector::y()),
                    ab.cross(&Vector::z()),
                ];
                let m = [b[0].norm_squared(), b[1].norm_squared(), b[2].norm_squared()];
                let best = if m[0] > m[1] {
                    if m[0] > m[2] {
                        0
                    } else {
                        2
                    }
                } else if m[1] > m[2] {
                    1
                } else {
                    2
                };

                let axis = Unit::new_normalize(ab);
                let rot = Rotation::from_axis_angle(&axis, Real::two_pi() / 3.0);
                let mut w = b[best];

                for i in [4, 2, 3] {
                    self.simplex[i] = self.support(&w.normalize());
                    w = rot * w;
                }

                self.rank = 5;
                true
            }
            3 => {
                let n = (self.simplex[1].w - self.simplex[0].w)
                    .cross(&(self.simplex[2].w - self.simplex[0].w))
                    .normalize();
                self.simplex[3] = self.support(&n);
                self.simplex[4] = self.support(&-n);
                self.rank = 5;
                true
            }
            4 | 5 => true,
            _ => false,
        }
    }
}

struct Epa<'a, 'b> {
    gjk: &'b mut Gjk<'a>,
    vertices: &'b mut ObjectStack<Mkv>,
    faces: &'b mut ObjectStack<Face>,
    root: Option<usize>,
    num_faces: usize,
    iterations: usize,
    failed: bool,
    normal: Vector<Real>,
    depth: Real,
    nearest: [Point<Real>; 2],
}

impl<'a, 'b> Epa<'a, 'b> {
    fn new(
        gjk: &'b mut Gjk<'a>,
        vertices: &'b mut ObjectStack<Mkv>,
        faces: &'b mut ObjectStack<Face>,
    ) -> Self {
        Self {
            gjk,
            vertices,
            faces,
            root: None,
            num_faces: 0,
            iterations: 0,
            failed: false,
            normal: Vector::zeros(),
            depth: 0.0,
            nearest: [Point::origin(); 2],
        }
    }

    /// Barycentric coordinates of the projection of the origin on `face`.
    fn coordinates(&self, face: &Face) -> [Real; 3] {
        let o = face.n * -face.d;
        let w = face.vertices.map(|v| self.vertices[v].w - o);
        let a = [
            w[0].cross(&w[1]).norm(),
            w[1].cross(&w[2]).norm(),
            w[2].cross(&w[0]).norm(),
        ];
        let sum = a[0] + a[1] + a[2];
        let sum = if sum > 0.0 { sum } else { 1.0 };

        [a[1] / sum, a[2] / sum, a[0] / sum]
    }

    fn find_best(&self) -> Option<usize> {
        let mut best = None;
        let mut best_d = Real::MAX;
        let mut curr = self.root;

        while let Some(id) = curr {
            if self.faces[id].d < best_d {
                best_d = self.faces[id].d;
                best = Some(id);
            }

            curr = self.faces[id].next;
        }

        best
    }

    /// Builds the face `(a, b, c)`. The returned flag is `false` if the origin does not
    /// project inside it.
    fn set(&self, a: usize, b: usize, c: usize) -> (Face, bool) {
        let (wa, wb, wc) = (
            self.vertices[a].w,
            self.vertices[b].w,
            self.vertices[c].w,
        );
        let nrm = (wb - wa).cross(&(wc - wa));
        let len = nrm.norm();
        let valid = wa.cross(&wb).dot(&nrm) >= -EPA_IN_FACE_EPSILON
            && wb.cross(&wc).dot(&nrm) >= -EPA_IN_FACE_EPSILON
            && wc.cross(&wa).dot(&nrm) >= -EPA_IN_FACE_EPSILON;
        let n = if len > 0.0 { nrm / len } else { Vector::zeros() };

        let face = Face {
            vertices: [a, b, c],
            children: [None; 3],
            edges: [0; 3],
            n,
            d: (-n.dot(&wa)).max(0.0),
            mark: 0,
            prev: None,
            next: None,
        };

        (face, valid && len > 0.0)
    }

    fn new_face(&mut self, a: usize, b: usize, c: usize) -> usize {
        let (mut face, valid) = self.set(a, b, c);

        if valid {
            face.next = self.root;
        }

        let id = self.faces.alloc(face);

        if valid {
            if let Some(root) = self.root {
                self.faces[root].prev = Some(id);
            }

            self.root = Some(id);
            self.num_faces += 1;
        }

        id
    }

    /// Removes `face` from the list of candidate faces.
    ///
    /// A face alone in the list has no neighbors and is left in place.
    fn detach(&mut self, face: usize) {
        let Face { prev, next, .. } = self.faces[face];

        if prev.is_none() && next.is_none() {
            return;
        }

        self.num_faces -= 1;

        if self.root == Some(face) {
            self.root = next;
            if let Some(next) = next {
                self.faces[next].prev = None;
            }
        } else if let Some(prev) = prev {
            self.faces[prev].next = next;
            if let Some(next) = next {
                self.faces[next].prev = Some(prev);
            }
        }

        self.faces[face].prev = None;
        self.faces[face].next = None;
    }

    fn link(&mut self, f0: usize, e0: usize, f1: usize, e1: usize) {
        self.faces[f0].children[e0] = Some(f1);
        self.faces[f1].edges[e1] = e0;
        self.faces[f1].children[e1] = Some(f0);
        self.faces[f0].edges[e0] = e1;
    }

    /// Replaces the faces visible from `w` by a fan of faces joining `w` to the horizon.
    ///
    /// `first` and `last` track the ends of the fan being built. Returns the number of
    /// faces created.
    fn build_horizon(
        &mut self,
        mark: u32,
        w: usize,
        face: Option<usize>,
        edge: usize,
        first: &mut Option<usize>,
        last: &mut Option<usize>,
    ) -> usize {
        let Some(f) = face else {
            return 0;
        };

        if self.faces[f].mark == mark {
            return 0;
        }

        let e1 = MOD3[edge + 1];
        let face_data = self.faces[f];

        if face_data.n.dot(&self.vertices[w].w) + face_data.d > 0.0 {
            let nf = self.new_face(face_data.vertices[e1], face_data.vertices[edge], w);
            self.link(nf, 0, f, edge);

            if let Some(cf) = *last {
                self.link(cf, 1, nf, 2);
            } else {
                *first = Some(nf);
            }

            *last = Some(nf);
            1
        } else {
            let e2 = MOD3[edge + 2];
            self.detach(f);
            self.faces[f].mark = mark;

            self.build_horizon(
                mark,
                w,
                face_data.children[e1],
                face_data.edges[e1],
                first,
                last,
            ) + self.build_horizon(
                mark,
                w,
                face_data.children[e2],
                face_data.edges[e2],
                first,
                last,
            )
        }
    }

    /// Expands the polytope enclosing the origin and returns the penetration depth.
    fn evaluate_pd(&mut self, accuracy: Real) -> Real {
        let mut best_face = None;
        let mut mark = 1;

        let topology: Option<(&[[usize; 3]], &[[usize; 4]])> = match self.gjk.rank {
            4 => Some((&TETRA_FACES, &TETRA_EDGES)),
            5 => Some((&HEXA_FACES, &HEXA_EDGES)),
            _ => None,
        };

        if let Some((face_ids, edge_ids)) = topology {
            let mut base_vertices = [0; 5];
            for (id, v) in base_vertices
                .iter_mut()
                .zip(self.gjk.simplex[..self.gjk.rank].iter())
            {
                *id = self.vertices.alloc(*v);
            }

            let base_faces: Vec<usize> = face_ids
                .iter()
                .map(|f| {
                    self.new_face(
                        base_vertices[f[0]],
                        base_vertices[f[1]],
                        base_vertices[f[2]],
                    )
                })
                .collect();

            for e in edge_ids {
                self.link(base_faces[e[0]], e[1], base_faces[e[2]], e[3]);
            }
        }

        if self.num_faces == 0 {
            log::debug!(
                "EPA: no initial face encloses the origin (simplex rank: {}).",
                self.gjk.rank
            );
            self.failed = true;
            self.depth = 0.0;
            return self.depth;
        }

        while self.iterations < EPA_MAX_ITERATIONS {
            let Some(bf) = self.find_best() else {
                break;
            };

            best_face = Some(bf);
            let face = self.faces[bf];
            let support = self.gjk.support(&-face.n);
            let w = self.vertices.alloc(support);
            let d = face.n.dot(&support.w) + face.d;

            if d >= -accuracy {
                break;
            }

            let mut first = None;
            let mut last = None;
            self.detach(bf);
            mark += 1;
            self.faces[bf].mark = mark;

            let nf = (0..3)
                .map(|i| {
                    self.build_horizon(
                        mark,
                        w,
                        face.children[i],
                        face.edges[i],
                        &mut first,
                        &mut last,
                    )
                })
                .sum::<usize>();

            if nf <= 2 {
                break;
            }

            if let (Some(cf), Some(ff)) = (last, first) {
                self.link(cf, 1, ff, 2);
            }

            self.iterations += 1;
        }

        if let Some(bf) = best_face {
            let face = self.faces[bf];
            let b = self.coordinates(&face);
            self.normal = face.n;
            self.depth = face.d.max(0.0);
            self.nearest = [Point::origin(); 2];

            for j in 0..3 {
                let r = self.vertices[face.vertices[j]].r;
                self.nearest[0] += self.gjk.local_support(&r, 0).coords * b[j];
                self.nearest[1] += self.gjk.local_support(&-r, 1).coords * b[j];
            }
        } else {
            self.failed = true;
        }

        self.depth
    }
}
