use crate::math::{Isometry, Point, Real, Vector};
use crate::query::convex_cast::{CastResult, ConvexCast, GjkConvexCast, SubSimplexConvexCast};
use crate::query::gjk::VoronoiSimplexSolver;
use crate::shape::{ConvexShape, TriMesh, Triangle, TriangleCallback};

/// Hits whose normal is shorter than this (squared) are discarded.
pub const MIN_CAST_NORMAL_SQUARED_LENGTH: Real = 1.0e-4;

/// The algorithm used to cast a shape against each triangle.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ConvexCastMethod {
    /// [`SubSimplexConvexCast`].
    #[default]
    SubSimplex,
    /// [`GjkConvexCast`].
    Gjk,
}

/// Receiver of the hits found by a [`TriangleConvexCast`].
pub trait ConvexCastHitCallback {
    /// Reports a hit closer than every hit reported so far.
    ///
    /// `normal` is a unit vector and `hit_point` lies on the triangle, both in world-space.
    /// Returns the hit fraction later hits must improve on, usually `hit_fraction`.
    fn report_hit(
        &mut self,
        normal: &Vector<Real>,
        hit_point: &Point<Real>,
        hit_fraction: Real,
        part_id: i32,
        triangle_index: i32,
    ) -> Real;
}

/// A hit found by a shape sweep against a triangle mesh.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConvexCastHit {
    /// The world-space contact normal, pointing from the triangle toward the swept shape.
    pub normal: Vector<Real>,
    /// The world-space contact point, on the triangle.
    pub hit_point: Point<Real>,
    /// The time of impact, in `[0, 1]`.
    pub hit_fraction: Real,
    /// The mesh part containing the hit triangle.
    pub part_id: i32,
    /// The index of the hit triangle.
    pub triangle_index: i32,
}

/// A [`ConvexCastHitCallback`] remembering the closest hit.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ClosestConvexCastHit {
    /// The closest hit reported so far.
    pub hit: Option<ConvexCastHit>,
}

impl ConvexCastHitCallback for ClosestConvexCastHit {
    fn report_hit(
        &mut self,
        normal: &Vector<Real>,
        hit_point: &Point<Real>,
        hit_fraction: Real,
        part_id: i32,
        triangle_index: i32,
    ) -> Real {
        self.hit = Some(ConvexCastHit {
            normal: *normal,
            hit_point: *hit_point,
            hit_fraction,
            part_id,
            triangle_index,
        });
        hit_fraction
    }
}

/// Sweeps a convex shape against the triangles of a mesh, one triangle at a time.
///
/// Feed it to [`TriMesh::process_all_triangles`] with the swept AABB of the shape. Only
/// hits improving on `hit_fraction` reach the callback, so the reported fractions are
/// decreasing.
pub struct TriangleConvexCast<'a, C> {
    /// The swept shape.
    pub convex_shape: &'a dyn ConvexShape,
    /// The start position of the swept shape.
    pub convex_from: Isometry<Real>,
    /// The end position of the swept shape.
    pub convex_to: Isometry<Real>,
    /// The position of the mesh.
    pub triangle_to_world: Isometry<Real>,
    /// The best hit fraction found so far, initially 1.
    pub hit_fraction: Real,
    /// The collision margin given to each triangle.
    pub triangle_margin: Real,
    /// See [`CastResult::allowed_penetration`].
    pub allowed_penetration: Real,
    /// The cast algorithm.
    pub method: ConvexCastMethod,
    /// The receiver of the hits.
    pub hit_callback: C,
}

impl<'a, C: ConvexCastHitCallback> TriangleConvexCast<'a, C> {
    /// Creates a sweep of `convex_shape` from `convex_from` to `convex_to` against a mesh
    /// positioned at `triangle_to_world`.
    pub fn new(
        convex_shape: &'a dyn ConvexShape,
        convex_from: Isometry<Real>,
        convex_to: Isometry<Real>,
        triangle_to_world: Isometry<Real>,
        hit_callback: C,
    ) -> Self {
        Self {
            convex_shape,
            convex_from,
            convex_to,
            triangle_to_world,
            hit_fraction: 1.0,
            triangle_margin: 0.0,
            allowed_penetration: 0.0,
            method: ConvexCastMethod::default(),
            hit_callback,
        }
    }
}

impl<C: ConvexCastHitCallback> TriangleCallback for TriangleConvexCast<'_, C> {
    fn process_triangle(&mut self, triangle: &[Point<Real>; 3], part_id: i32, triangle_index: i32) {
        let triangle =
            Triangle::with_margin(triangle[0], triangle[1], triangle[2], self.triangle_margin);
        let mut simplex = VoronoiSimplexSolver::new();
        let mut result = CastResult {
            fraction: 1.0,
            ..CastResult::with_allowed_penetration(self.allowed_penetration)
        };

        let hit = match self.method {
            ConvexCastMethod::SubSimplex => {
                SubSimplexConvexCast::new(self.convex_shape, &triangle, &mut simplex)
                    .calc_time_of_impact(
                        &self.convex_from,
                        &self.convex_to,
                        &self.triangle_to_world,
                        &self.triangle_to_world,
                        &mut result,
                    )
            }
            ConvexCastMethod::Gjk => GjkConvexCast::new(self.convex_shape, &triangle, &mut simplex)
                .calc_time_of_impact(
                    &self.convex_from,
                    &self.convex_to,
                    &self.triangle_to_world,
                    &self.triangle_to_world,
                    &mut result,
                ),
        };

        if hit
            && result.normal.norm_squared() > MIN_CAST_NORMAL_SQUARED_LENGTH
            && result.fraction < self.hit_fraction
        {
            let normal = result.normal.normalize();
            self.hit_fraction = self.hit_callback.report_hit(
                &normal,
                &result.hit_point,
                result.fraction,
                part_id,
                triangle_index,
            );
        }
    }
}

/// Sweeps `shape` from `from` to `to` against `mesh` placed at `mesh_pos`, and returns the
/// earliest hit.
pub fn cast_convex_against_trimesh(
    shape: &dyn ConvexShape,
    from: &Isometry<Real>,
    to: &Isometry<Real>,
    mesh: &TriMesh,
    mesh_pos: &Isometry<Real>,
    method: ConvexCastMethod,
) -> Option<ConvexCastHit> {
    let swept_aabb = shape
        .compute_aabb(from)
        .merged(&shape.compute_aabb(to))
        .transform_by(&mesh_pos.inverse());

    let mut cast = TriangleConvexCast::new(
        shape,
        *from,
        *to,
        *mesh_pos,
        ClosestConvexCastHit::default(),
    );
    cast.method = method;
    mesh.process_all_triangles(&mut cast, &swept_aabb);
    cast.hit_callback.hit
}
