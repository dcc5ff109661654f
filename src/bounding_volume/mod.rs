//! Bounding volumes.

#[doc(inline)]
pub use crate::bounding_volume::aabb::Aabb;
pub use crate::bounding_volume::aabb_utils::{local_point_cloud_aabb, support_map_aabb};

#[doc(hidden)]
pub mod aabb;
mod aabb_utils;
