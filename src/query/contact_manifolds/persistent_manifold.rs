use crate::math::{Isometry, Real};
use crate::query::{ContactCallbacks, ManifoldPoint};
use arrayvec::ArrayVec;

/// The maximum number of contact points of a [`PersistentManifold`].
pub const MANIFOLD_CACHE_SIZE: usize = 4;

/// The default distance beyond which cached contact points are dropped.
pub const DEFAULT_CONTACT_BREAKING_THRESHOLD: Real = 0.02;

const_assert!(MANIFOLD_CACHE_SIZE == 4);

/// An opaque reference to a rigid body, owned by the caller.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BodyHandle(pub u32);

/// A small cache of contact points between two bodies, kept across simulation steps.
///
/// New points are merged with nearby cached ones, and once the four slots are taken the
/// point keeping the largest contact area is replaced. Points are dropped when the bodies
/// drift apart along or across the contact normal.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "f32")] {
/// use narrowphase3d::math::{Isometry, Point, Vector};
/// use narrowphase3d::query::{BodyHandle, ManifoldPoint, PersistentManifold};
///
/// let mut manifold = PersistentManifold::<()>::new(BodyHandle(0), BodyHandle(1));
/// let point = ManifoldPoint::new(Point::origin(), Point::origin(), Vector::y(), -0.01);
/// let _ = manifold.add_manifold_point(point, &mut ());
///
/// // Moving the bodies apart breaks the contact.
/// manifold.refresh_contact_points(
///     &Isometry::translation(0.0, 1.0, 0.0),
///     &Isometry::identity(),
///     &mut (),
/// );
/// assert_eq!(manifold.num_contacts(), 0);
/// # }
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct PersistentManifold<Data> {
    points: ArrayVec<ManifoldPoint<Data>, MANIFOLD_CACHE_SIZE>,
    body0: BodyHandle,
    body1: BodyHandle,
    /// Contact points farther apart than this are dropped.
    pub contact_breaking_threshold: Real,
}

impl<Data> PersistentManifold<Data> {
    /// Creates an empty manifold between two bodies.
    pub fn new(body0: BodyHandle, body1: BodyHandle) -> Self {
        Self {
            points: ArrayVec::new(),
            body0,
            body1,
            contact_breaking_threshold: DEFAULT_CONTACT_BREAKING_THRESHOLD,
        }
    }

    /// The first body.
    #[inline]
    pub fn body0(&self) -> BodyHandle {
        self.body0
    }

    /// The second body.
    #[inline]
    pub fn body1(&self) -> BodyHandle {
        self.body1
    }

    /// Sets the bodies this manifold is attached to.
    pub fn set_bodies(&mut self, body0: BodyHandle, body1: BodyHandle) {
        self.body0 = body0;
        self.body1 = body1;
    }

    /// The number of cached contact points.
    #[inline]
    pub fn num_contacts(&self) -> usize {
        self.points.len()
    }

    /// The cached contact points.
    #[inline]
    pub fn points(&self) -> &[ManifoldPoint<Data>] {
        &self.points
    }

    /// The `i`-th cached contact point.
    #[inline]
    pub fn contact_point(&self, i: usize) -> &ManifoldPoint<Data> {
        &self.points[i]
    }

    /// The `i`-th cached contact point.
    #[inline]
    pub fn contact_point_mut(&mut self, i: usize) -> &mut ManifoldPoint<Data> {
        &mut self.points[i]
    }

    /// Is `point` close enough to be kept by this manifold?
    #[inline]
    pub fn valid_contact_distance(&self, point: &ManifoldPoint<Data>) -> bool {
        point.distance <= self.contact_breaking_threshold
    }

    /// Hands the user data of the `i`-th point to `callbacks` and clears it.
    fn clear_user_cache(&mut self, i: usize, callbacks: &mut dyn ContactCallbacks<Data>) {
        if let Some(data) = self.points[i].user_persistent_data.take() {
            callbacks.contact_destroyed(data);
        }
    }

    /// The slot `new_point` should replace once the manifold is full.
    ///
    /// The deepest point is never replaced. Among the others, the one whose replacement
    /// leaves the largest area spanned by the remaining points is selected.
    pub fn sort_cached_points(&self, new_point: &ManifoldPoint<Data>) -> usize {
        let cache = &self.points;

        if !cache.is_full() {
            return cache.len();
        }

        let mut max_penetration_index = None;
        let mut max_penetration = new_point.distance;

        for (i, pt) in cache.iter().enumerate() {
            if pt.distance < max_penetration {
                max_penetration_index = Some(i);
                max_penetration = pt.distance;
            }
        }

        let p = new_point.local_point_a;
        let l = |i: usize| cache[i].local_point_a;
        let mut res = [
            (p - l(1)).cross(&(l(3) - l(2))).norm_squared(),
            (p - l(0)).cross(&(l(3) - l(2))).norm_squared(),
            (p - l(0)).cross(&(l(3) - l(1))).norm_squared(),
            (p - l(0)).cross(&(l(2) - l(1))).norm_squared(),
        ];

        if let Some(i) = max_penetration_index {
            res[i] = -1.0;
        }

        // First index with the largest area.
        let mut biggest_area = 0;
        for i in 1..MANIFOLD_CACHE_SIZE {
            if res[i] > res[biggest_area] {
                biggest_area = i;
            }
        }

        biggest_area
    }

    /// The index of the cached point closest to `new_point`, if closer than the breaking threshold.
    pub fn get_cache_entry(&self, new_point: &ManifoldPoint<Data>) -> Option<usize> {
        let mut shortest_dist = self.contact_breaking_threshold * self.contact_breaking_threshold;
        let mut nearest_point = None;

        for (i, pt) in self.points.iter().enumerate() {
            let dist = (pt.local_point_a - new_point.local_point_a).norm_squared();

            if dist < shortest_dist {
                shortest_dist = dist;
                nearest_point = Some(i);
            }
        }

        nearest_point
    }

    /// Adds a new contact point and returns its slot.
    ///
    /// If the manifold is full, the point selected by [`Self::sort_cached_points`] is
    /// replaced after its user data is handed to `callbacks`. A point beyond the
    /// breaking threshold is still stored and goes away at the next
    /// [`Self::refresh_contact_points`].
    pub fn add_manifold_point(
        &mut self,
        new_point: ManifoldPoint<Data>,
        callbacks: &mut dyn ContactCallbacks<Data>,
    ) -> usize {
        if !self.valid_contact_distance(&new_point) {
            log::debug!(
                "Contact point added at distance {} beyond the breaking threshold {}.",
                new_point.distance,
                self.contact_breaking_threshold
            );
        }

        if self.points.is_full() {
            let insert_index = self.sort_cached_points(&new_point);
            self.clear_user_cache(insert_index, callbacks);
            self.points[insert_index] = new_point;
            insert_index
        } else {
            self.points.push(new_point);
            self.points.len() - 1
        }
    }

    /// Replaces the `insert_index`-th point by `new_point`, keeping the life time, the
    /// applied impulses, and the user data of the replaced point.
    pub fn replace_contact_point(&mut self, mut new_point: ManifoldPoint<Data>, insert_index: usize) {
        let old = &mut self.points[insert_index];
        new_point.life_time = old.life_time;
        new_point.applied_impulse = old.applied_impulse;
        new_point.applied_impulse_lateral1 = old.applied_impulse_lateral1;
        new_point.applied_impulse_lateral2 = old.applied_impulse_lateral2;
        new_point.user_persistent_data = old.user_persistent_data.take();
        *old = new_point;
    }

    /// Removes the `index`-th point, moving the last point into its slot.
    pub fn remove_contact_point(&mut self, index: usize, callbacks: &mut dyn ContactCallbacks<Data>) {
        self.clear_user_cache(index, callbacks);
        let _ = self.points.swap_remove(index);
    }

    /// Updates the cached points for the new body positions and drops the stale ones.
    ///
    /// A point is dropped if the bodies separated by more than the breaking threshold
    /// along its normal, or slid by more than that threshold across it. Kept points are
    /// reported to [`ContactCallbacks::contact_processed`].
    pub fn refresh_contact_points(
        &mut self,
        tr_a: &Isometry<Real>,
        tr_b: &Isometry<Real>,
        callbacks: &mut dyn ContactCallbacks<Data>,
    ) {
        for pt in self.points.iter_mut().rev() {
            pt.position_world_on_a = tr_a * pt.local_point_a;
            pt.position_world_on_b = tr_b * pt.local_point_b;
            pt.distance = (pt.position_world_on_a - pt.position_world_on_b).dot(&pt.normal_world_on_b);
            pt.life_time += 1;
        }

        let threshold2 = self.contact_breaking_threshold * self.contact_breaking_threshold;

        for i in (0..self.points.len()).rev() {
            if !self.valid_contact_distance(&self.points[i]) {
                self.remove_contact_point(i, callbacks);
                continue;
            }

            let pt = &self.points[i];
            let projected_point = pt.position_world_on_a - pt.normal_world_on_b * pt.distance;
            let distance_2d = (pt.position_world_on_b - projected_point).norm_squared();

            if distance_2d > threshold2 {
                self.remove_contact_point(i, callbacks);
            } else {
                let (body0, body1) = (self.body0, self.body1);
                callbacks.contact_processed(&mut self.points[i], body0, body1);
            }
        }
    }

    /// Removes every contact point.
    pub fn clear_manifold(&mut self, callbacks: &mut dyn ContactCallbacks<Data>) {
        for i in 0..self.points.len() {
            self.clear_user_cache(i, callbacks);
        }

        self.points.clear();
    }
}
