use crate::math::{Point, Real, Vector};
use crate::shape::{ConvexShape, SupportMap};
use crate::utils;

/// Error raised when building a [`ConvexPointCloud`].
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConvexPointCloudError {
    /// A convex hull needs at least one point.
    #[error("a convex point cloud must contain at least one point.")]
    Empty,
}

/// The convex hull of a set of points, implicitly represented by its support mapping.
///
/// The margin is added around the hull.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct ConvexPointCloud {
    points: Vec<Point<Real>>,
    margin: Real,
}

impl ConvexPointCloud {
    /// Creates the implicit convex hull of `points`, grown by `margin`.
    pub fn try_new(points: Vec<Point<Real>>, margin: Real) -> Result<Self, ConvexPointCloudError> {
        if points.is_empty() {
            return Err(ConvexPointCloudError::Empty);
        }

        Ok(ConvexPointCloud {
            points,
            margin: margin.max(0.0),
        })
    }

    /// The points this hull was built from.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }
}

impl SupportMap for ConvexPointCloud {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        utils::point_cloud_support_point(dir, &self.points)
    }
}

impl ConvexShape for ConvexPointCloud {
    #[inline]
    fn margin(&self) -> Real {
        self.margin
    }
}
