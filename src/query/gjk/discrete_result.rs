use crate::math::{Isometry, Point, Real, Vector};

/// Distance used by result collectors before anything is reported.
pub const LARGE_DISTANCE: Real = 1.0e30;

/// The input of a discrete closest-points query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClosestPointInput {
    /// The world-space position of the first shape.
    pub transform_a: Isometry<Real>,
    /// The world-space position of the second shape.
    pub transform_b: Isometry<Real>,
    /// The query gives up as soon as the shapes are proven farther apart than the
    /// square root of this value.
    pub maximum_distance_squared: Real,
}

impl ClosestPointInput {
    /// Builds a query input without distance limit.
    pub fn new(transform_a: Isometry<Real>, transform_b: Isometry<Real>) -> Self {
        Self {
            transform_a,
            transform_b,
            maximum_distance_squared: LARGE_DISTANCE,
        }
    }
}

impl Default for ClosestPointInput {
    fn default() -> Self {
        Self::new(Isometry::identity(), Isometry::identity())
    }
}

/// Receiver of the contact points computed by a discrete collision detector.
pub trait DiscreteCollisionResult {
    /// Identifies the sub-parts (mesh part and triangle index) of the shapes being tested.
    fn set_shape_identifiers(
        &mut self,
        _part_id0: i32,
        _index0: i32,
        _part_id1: i32,
        _index1: i32,
    ) {
    }

    /// Reports one contact point.
    ///
    /// `point_in_world` lies on the second shape, `normal_on_b_in_world` is a unit
    /// vector pointing from the second shape toward the first one and `depth` is the
    /// signed distance between the shapes (negative if they penetrate).
    fn add_contact_point(
        &mut self,
        normal_on_b_in_world: &Vector<Real>,
        point_in_world: &Point<Real>,
        depth: Real,
    );
}

/// A result collector that keeps only the closest reported point.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointCollector {
    /// The normal of the closest point, from the second shape toward the first one.
    pub normal_on_b_in_world: Vector<Real>,
    /// The closest point, on the second shape.
    pub point_in_world: Point<Real>,
    /// The signed distance between the shapes.
    pub distance: Real,
    /// Whether any point was reported.
    pub has_result: bool,
}

impl Default for PointCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl PointCollector {
    /// An empty collector.
    pub fn new() -> Self {
        Self {
            normal_on_b_in_world: Vector::zeros(),
            point_in_world: Point::origin(),
            distance: LARGE_DISTANCE,
            has_result: false,
        }
    }

    /// The point on the first shape matching `self.point_in_world`.
    pub fn point_on_a(&self) -> Point<Real> {
        self.point_in_world + self.normal_on_b_in_world * self.distance
    }
}

impl DiscreteCollisionResult for PointCollector {
    fn add_contact_point(
        &mut self,
        normal_on_b_in_world: &Vector<Real>,
        point_in_world: &Point<Real>,
        depth: Real,
    ) {
        if depth < self.distance {
            self.has_result = true;
            self.normal_on_b_in_world = *normal_on_b_in_world;
            self.point_in_world = *point_in_world;
            self.distance = depth;
        }
    }
}
