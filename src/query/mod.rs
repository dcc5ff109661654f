//! Narrow-phase collision queries between convex shapes.
//!
//! # General cases
//! The most general methods provided by this module are:
//!
//! * [`query::contact()`] to compute one pair of contact points between two shapes, including penetrating contact.
//! * [`query::time_of_impact()`] to determine when two shapes undergoing translational motions hit for the first time.
//!
//! # Building blocks
//! The submodules expose the algorithms these functions are made of:
//!
//! * [`gjk`]: the Voronoi simplex solver and the GJK pair detector.
//! * [`epa`]: the standalone GJK/EPA solver with a margin-aware penetration depth.
//! * [`penetration`]: penetration depth solvers plugged into the GJK pair detector.
//! * [`convex_cast`]: linear sweeps of convex shapes, including sweeps against triangle meshes.
//! * [`PersistentManifold`] and [`ConvexConvexAlgorithm`]: contact points cached across
//!   simulation steps.
//!
//! [`query::contact()`]: crate::query::contact()
//! [`query::time_of_impact()`]: crate::query::time_of_impact()

pub use self::contact::{contact, contact_with_solver, Contact};
pub use self::contact_manifolds::{
    BodyHandle, ContactBody, ContactCallbacks, ContactMaterial, ConvexConvexAlgorithm,
    ManifoldPoint, ManifoldResult, PersistentManifold, DEFAULT_CONTACT_BREAKING_THRESHOLD,
    MANIFOLD_CACHE_SIZE, MAX_FRICTION,
};
pub use self::time_of_impact::{time_of_impact, time_of_impact_with_method};

pub mod contact;
mod contact_manifolds;
pub mod convex_cast;
pub mod epa;
pub mod gjk;
pub mod penetration;
mod time_of_impact;
