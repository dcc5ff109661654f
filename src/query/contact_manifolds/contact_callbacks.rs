use crate::query::{BodyHandle, ManifoldPoint};

/// Hooks notified by a [`PersistentManifold`](crate::query::PersistentManifold) about the
/// life of its contact points.
///
/// Both methods do nothing by default. `()` can be used when no notification is needed.
pub trait ContactCallbacks<Data> {
    /// Called with the user data of a contact point being removed or replaced.
    fn contact_destroyed(&mut self, _user_persistent_data: Data) {}

    /// Called for every contact point kept by a manifold refresh.
    fn contact_processed(
        &mut self,
        _point: &mut ManifoldPoint<Data>,
        _body0: BodyHandle,
        _body1: BodyHandle,
    ) {
    }
}

impl<Data> ContactCallbacks<Data> for () {}
