//! Support mapping based Cuboid shape.

use crate::math::{Point, Real, Vector};
use crate::shape::{ConvexShape, SupportMap, DEFAULT_COLLISION_MARGIN};

/// Shape of a box.
///
/// The margin is contained inside the half-extents: the core is the box
/// shrunk by `margin` along every axis, so the full shape keeps its nominal size.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Cuboid {
    /// The half-extents of the cuboid, margin included.
    pub half_extents: Vector<Real>,
    /// The collision margin.
    pub margin: Real,
}

impl Cuboid {
    /// Creates a new box from its half-extents, with the default collision margin.
    ///
    /// The margin is clamped so that the core never becomes inverted.
    #[inline]
    pub fn new(half_extents: Vector<Real>) -> Cuboid {
        Self::with_margin(half_extents, DEFAULT_COLLISION_MARGIN)
    }

    /// Creates a new box from its half-extents and an explicit collision margin.
    #[inline]
    pub fn with_margin(half_extents: Vector<Real>, margin: Real) -> Cuboid {
        let margin = margin.max(0.0).min(half_extents.min());
        Cuboid {
            half_extents,
            margin,
        }
    }

    /// The half-extents of the core of this box.
    #[inline]
    pub fn half_extents_without_margin(&self) -> Vector<Real> {
        self.half_extents - Vector::repeat(self.margin)
    }
}

impl SupportMap for Cuboid {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let he = self.half_extents_without_margin();
        Point::new(
            if dir.x >= 0.0 { he.x } else { -he.x },
            if dir.y >= 0.0 { he.y } else { -he.y },
            if dir.z >= 0.0 { he.z } else { -he.z },
        )
    }
}

impl ConvexShape for Cuboid {
    #[inline]
    fn margin(&self) -> Real {
        self.margin
    }
}
