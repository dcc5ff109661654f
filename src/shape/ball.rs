use crate::math::{Point, Real, Vector};
use crate::shape::{ConvexShape, SupportMap};

/// A Ball shape.
///
/// The core of a ball is its center: the radius is entirely carried by the
/// collision margin.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Ball {
    /// The radius of the ball.
    pub radius: Real,
}

impl Ball {
    /// Creates a new ball with the given radius.
    #[inline]
    pub fn new(radius: Real) -> Ball {
        Ball { radius }
    }
}

impl SupportMap for Ball {
    #[inline]
    fn local_support_point(&self, _: &Vector<Real>) -> Point<Real> {
        Point::origin()
    }
}

impl ConvexShape for Ball {
    #[inline]
    fn margin(&self) -> Real {
        self.radius
    }
}
