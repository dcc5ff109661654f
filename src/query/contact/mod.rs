//! Implementation details of the `contact` function.

pub use self::contact::Contact;
pub use self::contact_convex_convex::{contact, contact_with_solver};

mod contact;
mod contact_convex_convex;
