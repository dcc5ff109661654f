//! Linear sweeps of convex shapes: time of impact by conservative advancement.

pub use self::gjk_convex_cast::{GjkConvexCast, GJK_CAST_MAX_ITERATIONS, GJK_CAST_RADIUS};
pub use self::sub_simplex_convex_cast::{
    SubSimplexConvexCast, SUB_SIMPLEX_CAST_EPSILON, SUB_SIMPLEX_CAST_MAX_ITERATIONS,
};
pub use self::triangle_convex_cast::{
    cast_convex_against_trimesh, ClosestConvexCastHit, ConvexCastHit, ConvexCastHitCallback,
    ConvexCastMethod, TriangleConvexCast, MIN_CAST_NORMAL_SQUARED_LENGTH,
};

use crate::math::{Isometry, Point, Real, Vector};

mod gjk_convex_cast;
mod sub_simplex_convex_cast;
mod triangle_convex_cast;

/// The `fraction` of a [`CastResult`] that did not record any hit.
pub const NO_HIT_FRACTION: Real = 1.0e30;

/// The output of a [`ConvexCast`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CastResult {
    /// The position of the first shape at the time of impact.
    pub hit_transform_a: Isometry<Real>,
    /// The position of the second shape at the time of impact.
    pub hit_transform_b: Isometry<Real>,
    /// The contact normal at the time of impact, pointing from the second shape toward the first one.
    pub normal: Vector<Real>,
    /// The contact point at the time of impact, on the second shape.
    pub hit_point: Point<Real>,
    /// The time of impact, in `[0, 1]`, or [`NO_HIT_FRACTION`].
    pub fraction: Real,
    /// Motions that bring the shapes closer along the normal by less than this are not
    /// reported as impacts.
    pub allowed_penetration: Real,
}

impl Default for CastResult {
    fn default() -> Self {
        Self {
            hit_transform_a: Isometry::identity(),
            hit_transform_b: Isometry::identity(),
            normal: Vector::zeros(),
            hit_point: Point::origin(),
            fraction: NO_HIT_FRACTION,
            allowed_penetration: 0.0,
        }
    }
}

impl CastResult {
    /// An empty result with the given allowed penetration.
    pub fn with_allowed_penetration(allowed_penetration: Real) -> Self {
        Self {
            allowed_penetration,
            ..Self::default()
        }
    }

    /// Did this result record a hit?
    pub fn has_hit(&self) -> bool {
        self.fraction <= 1.0
    }
}

/// Time of impact between two convex shapes undergoing linear motions.
pub trait ConvexCast {
    /// Computes the first time both shapes touch while their origins move linearly from
    /// `from_a` to `to_a` and from `from_b` to `to_b`.
    ///
    /// Only the translational parts of the end positions are used. Returns `false` if the
    /// shapes do not meet during the motion, if they move apart, or if the algorithm failed.
    /// Shapes that already overlap at the start yield an unspecified result.
    fn calc_time_of_impact(
        &mut self,
        from_a: &Isometry<Real>,
        to_a: &Isometry<Real>,
        from_b: &Isometry<Real>,
        to_b: &Isometry<Real>,
        result: &mut CastResult,
    ) -> bool;
}

/// `from` with its translation moved toward the translation of `to` by `lambda`.
pub(crate) fn interpolate_translation(
    from: &Isometry<Real>,
    to: &Isometry<Real>,
    lambda: Real,
) -> Isometry<Real> {
    let mut result = *from;
    result.translation.vector = from
        .translation
        .vector
        .lerp(&to.translation.vector, lambda);
    result
}
