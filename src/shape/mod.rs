//! Shapes supported by narrowphase3d.

pub use self::ball::Ball;
pub use self::capsule::Capsule;
pub use self::convex_point_cloud::{ConvexPointCloud, ConvexPointCloudError};
pub use self::cuboid::Cuboid;
pub use self::segment::Segment;
#[doc(inline)]
pub use self::support_map::{ConvexShape, SupportMap};
pub use self::triangle::Triangle;
pub use self::trimesh::{TriMesh, TriMeshError, TriangleCallback};

use crate::math::Real;

/// The collision margin given to shapes that carry it inside their nominal extents.
pub const DEFAULT_COLLISION_MARGIN: Real = 0.04;

mod ball;
mod capsule;
mod convex_point_cloud;
mod cuboid;
mod segment;
mod support_map;
mod triangle;
mod trimesh;
