//! The EPA algorithm for penetration depth computation.

pub use self::gjk_epa::{
    GjkEpaResults, GjkEpaSolver, GjkEpaStatus, EPA_ACCURACY, EPA_IN_FACE_EPSILON,
    EPA_MAX_ITERATIONS, GJK_HASH_SIZE, GJK_IN_SIMPLEX_EPSILON, GJK_MAX_ITERATIONS,
};

mod gjk_epa;
