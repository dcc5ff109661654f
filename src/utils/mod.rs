//! Various unsorted geometrical and logical operators.

pub use self::object_stack::ObjectStack;
pub use self::point_cloud_support_point::{
    point_cloud_support_point, point_cloud_support_point_id,
};

mod object_stack;
mod point_cloud_support_point;
