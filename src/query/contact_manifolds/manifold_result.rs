use crate::math::{Isometry, Point, Real, Vector};
use crate::query::gjk::DiscreteCollisionResult;
use crate::query::{BodyHandle, ContactCallbacks, ManifoldPoint, PersistentManifold};

/// The largest combined friction coefficient.
pub const MAX_FRICTION: Real = 10.0;

/// Surface properties of a body.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactMaterial {
    /// The friction coefficient.
    pub friction: Real,
    /// The restitution coefficient.
    pub restitution: Real,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

impl ContactMaterial {
    /// The friction of a contact between `self` and `other`.
    pub fn combined_friction(&self, other: &ContactMaterial) -> Real {
        (self.friction * other.friction)
            .sqrt()
            .clamp(-MAX_FRICTION, MAX_FRICTION)
    }

    /// The restitution of a contact between `self` and `other`.
    pub fn combined_restitution(&self, other: &ContactMaterial) -> Real {
        self.restitution * other.restitution
    }
}

/// A body involved in a collision test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactBody {
    /// The handle of the body.
    pub handle: BodyHandle,
    /// The world-space position of the body.
    pub position: Isometry<Real>,
    /// The surface properties of the body.
    pub material: ContactMaterial,
}

impl ContactBody {
    /// A body with the default material.
    pub fn new(handle: BodyHandle, position: Isometry<Real>) -> Self {
        Self {
            handle,
            position,
            material: ContactMaterial::default(),
        }
    }
}

/// Feeds the contact points reported by a discrete collision detector into a
/// [`PersistentManifold`].
///
/// The manifold may track the bodies in the opposite order; local points and refreshes
/// are swapped accordingly.
pub struct ManifoldResult<'a, Data> {
    manifold: &'a mut PersistentManifold<Data>,
    callbacks: &'a mut dyn ContactCallbacks<Data>,
    body0: ContactBody,
    body1: ContactBody,
    part_id0: i32,
    part_id1: i32,
    index0: i32,
    index1: i32,
}

impl<'a, Data> ManifoldResult<'a, Data> {
    /// Creates a result feeding `manifold` with the contacts between `body0` and `body1`.
    pub fn new(
        manifold: &'a mut PersistentManifold<Data>,
        body0: ContactBody,
        body1: ContactBody,
        callbacks: &'a mut dyn ContactCallbacks<Data>,
    ) -> Self {
        Self {
            manifold,
            callbacks,
            body0,
            body1,
            part_id0: 0,
            part_id1: 0,
            index0: -1,
            index1: -1,
        }
    }

    /// The manifold being filled.
    pub fn manifold(&self) -> &PersistentManifold<Data> {
        self.manifold
    }

    /// Does the manifold track the bodies in the opposite order?
    pub fn is_swapped(&self) -> bool {
        self.manifold.body0() != self.body0.handle
    }

    /// Refreshes the manifold with the positions of both bodies.
    pub fn refresh_contact_points(&mut self) {
        if self.manifold.num_contacts() == 0 {
            return;
        }

        if self.is_swapped() {
            self.manifold.refresh_contact_points(
                &self.body1.position,
                &self.body0.position,
                self.callbacks,
            );
        } else {
            self.manifold.refresh_contact_points(
                &self.body0.position,
                &self.body1.position,
                self.callbacks,
            );
        }
    }
}

impl<Data> DiscreteCollisionResult for ManifoldResult<'_, Data> {
    fn set_shape_identifiers(&mut self, part_id0: i32, index0: i32, part_id1: i32, index1: i32) {
        self.part_id0 = part_id0;
        self.part_id1 = part_id1;
        self.index0 = index0;
        self.index1 = index1;
    }

    fn add_contact_point(
        &mut self,
        normal_on_b_in_world: &Vector<Real>,
        point_in_world: &Point<Real>,
        depth: Real,
    ) {
        if depth > self.manifold.contact_breaking_threshold {
            return;
        }

        let point_a = point_in_world + normal_on_b_in_world * depth;
        let (local_a, local_b) = if self.is_swapped() {
            (
                self.body1.position.inverse_transform_point(&point_a),
                self.body0.position.inverse_transform_point(point_in_world),
            )
        } else {
            (
                self.body0.position.inverse_transform_point(&point_a),
                self.body1.position.inverse_transform_point(point_in_world),
            )
        };

        let mut new_pt = ManifoldPoint::new(local_a, local_b, *normal_on_b_in_world, depth);
        new_pt.position_world_on_a = point_a;
        new_pt.position_world_on_b = *point_in_world;
        new_pt.combined_friction = self.body0.material.combined_friction(&self.body1.material);
        new_pt.combined_restitution = self
            .body0
            .material
            .combined_restitution(&self.body1.material);
        new_pt.part_id0 = self.part_id0;
        new_pt.part_id1 = self.part_id1;
        new_pt.index0 = self.index0;
        new_pt.index1 = self.index1;

        if let Some(insert_index) = self.manifold.get_cache_entry(&new_pt) {
            self.manifold.replace_contact_point(new_pt, insert_index);
        } else {
            let _ = self.manifold.add_manifold_point(new_pt, self.callbacks);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ContactBody, ContactMaterial, ManifoldResult};
    use crate::math::{Isometry, Point, Vector};
    use crate::query::gjk::DiscreteCollisionResult;
    use crate::query::{BodyHandle, PersistentManifold};

    #[test]
    fn combined_material() {
        let a = ContactMaterial {
            friction: 0.25,
            restitution: 0.5,
        };
        let b = ContactMaterial {
            friction: 1.0,
            restitution: 0.5,
        };
        assert_relative_eq!(a.combined_friction(&b), 0.5);
        assert_relative_eq!(a.combined_restitution(&b), 0.25);

        let sticky = ContactMaterial {
            friction: 1000.0,
            restitution: 0.0,
        };
        assert_eq!(sticky.combined_friction(&sticky), 10.0);
    }

    #[test]
    fn local_points_follow_body_order() {
        let body0 = ContactBody::new(BodyHandle(0), Isometry::translation(0.0, 1.0, 0.0));
        let body1 = ContactBody::new(BodyHandle(1), Isometry::identity());
        let point = Point::new(0.0, 0.5, 0.0);
        let mut callbacks = ();

        let mut manifold = PersistentManifold::<()>::new(BodyHandle(0), BodyHandle(1));
        let mut result = ManifoldResult::new(&mut manifold, body0, body1, &mut callbacks);
        assert!(!result.is_swapped());
        result.add_contact_point(&Vector::y(), &point, 0.01);
        result.add_contact_point(&Vector::y(), &point, 1.0);
        assert_eq!(manifold.num_contacts(), 1);
        let pt = manifold.contact_point(0);
        assert_relative_eq!(pt.local_point_a, Point::new(0.0, -0.49, 0.0));
        assert_relative_eq!(pt.local_point_b, point);
        assert_eq!(pt.index0, -1);

        let mut swapped = PersistentManifold::<()>::new(BodyHandle(1), BodyHandle(0));
        let mut result = ManifoldResult::new(&mut swapped, body0, body1, &mut callbacks);
        assert!(result.is_swapped());
        result.set_shape_identifiers(0, 3, 1, 4);
        result.add_contact_point(&Vector::y(), &point, 0.01);
        let pt = swapped.contact_point(0);
        assert_relative_eq!(pt.local_point_a, Point::new(0.0, 0.51, 0.0));
        assert_relative_eq!(pt.local_point_b, Point::new(0.0, -0.5, 0.0));
        assert_eq!((pt.part_id1, pt.index0, pt.index1), (1, 3, 4));
    }
}
