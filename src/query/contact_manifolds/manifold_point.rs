use crate::math::{Point, Real, Vector};

/// A contact point cached by a [`PersistentManifold`](crate::query::PersistentManifold).
///
/// The local points are fixed in the frame of each body, the world-space positions and
/// the distance are recomputed every time the manifold is refreshed.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ManifoldPoint<Data> {
    /// The contact point on the first body, in its local-space.
    pub local_point_a: Point<Real>,
    /// The contact point on the second body, in its local-space.
    pub local_point_b: Point<Real>,
    /// The contact point on the first body, in world-space.
    pub position_world_on_a: Point<Real>,
    /// The contact point on the second body, in world-space.
    pub position_world_on_b: Point<Real>,
    /// The unit contact normal, in world-space, pointing from the second body toward the first one.
    pub normal_world_on_b: Vector<Real>,
    /// The signed distance between both bodies along the normal. Negative if they penetrate.
    pub distance: Real,
    /// The friction coefficient of this contact.
    pub combined_friction: Real,
    /// The restitution coefficient of this contact.
    pub combined_restitution: Real,
    /// The mesh part of the first body involved in this contact.
    pub part_id0: i32,
    /// The mesh part of the second body involved in this contact.
    pub part_id1: i32,
    /// The triangle of the first body involved in this contact, or -1.
    pub index0: i32,
    /// The triangle of the second body involved in this contact, or -1.
    pub index1: i32,
    /// The impulse applied along the normal by the constraint solver, for warm-starting.
    pub applied_impulse: Real,
    /// The impulse applied along the first friction direction.
    pub applied_impulse_lateral1: Real,
    /// The impulse applied along the second friction direction.
    pub applied_impulse_lateral2: Real,
    /// Whether the friction directions were computed.
    pub lateral_friction_initialized: bool,
    /// The first friction direction.
    pub lateral_friction_dir1: Vector<Real>,
    /// The second friction direction.
    pub lateral_friction_dir2: Vector<Real>,
    /// The number of refreshes this contact survived.
    pub life_time: u32,
    /// Data attached by the constraint solver. Handed back to
    /// [`ContactCallbacks::contact_destroyed`](crate::query::ContactCallbacks::contact_destroyed)
    /// when this contact is removed.
    pub user_persistent_data: Option<Data>,
}

impl<Data> ManifoldPoint<Data> {
    /// Creates a contact point from local-space points, a world-space normal and a distance.
    pub fn new(
        local_point_a: Point<Real>,
        local_point_b: Point<Real>,
        normal_world_on_b: Vector<Real>,
        distance: Real,
    ) -> Self {
        Self {
            local_point_a,
            local_point_b,
            position_world_on_a: Point::origin(),
            position_world_on_b: Point::origin(),
            normal_world_on_b,
            distance,
            combined_friction: 0.0,
            combined_restitution: 0.0,
            part_id0: 0,
            part_id1: 0,
            index0: -1,
            index1: -1,
            applied_impulse: 0.0,
            applied_impulse_lateral1: 0.0,
            applied_impulse_lateral2: 0.0,
            lateral_friction_initialized: false,
            lateral_friction_dir1: Vector::zeros(),
            lateral_friction_dir2: Vector::zeros(),
            life_time: 0,
            user_persistent_data: None,
        }
    }
}
