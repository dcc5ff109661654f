//! Implementation details of the `time_of_impact` function.

pub use self::time_of_impact::{time_of_impact, time_of_impact_with_method};

mod time_of_impact;
