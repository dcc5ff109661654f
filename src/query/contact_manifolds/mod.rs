//! Persistent contact manifolds: contact points cached across simulation steps.

pub use self::contact_callbacks::ContactCallbacks;
pub use self::convex_convex_algorithm::ConvexConvexAlgorithm;
pub use self::manifold_point::ManifoldPoint;
pub use self::manifold_result::{ContactBody, ContactMaterial, ManifoldResult, MAX_FRICTION};
pub use self::persistent_manifold::{
    BodyHandle, PersistentManifold, DEFAULT_CONTACT_BREAKING_THRESHOLD, MANIFOLD_CACHE_SIZE,
};

mod contact_callbacks;
mod convex_convex_algorithm;
mod manifold_point;
mod manifold_result;
mod persistent_manifold;
