/// Culling strategies.
///
/// A Culler tracks a dynamic set of host objects, keeps their world-space
/// AABBs up to date, and decides once per frame which of them intersect the
/// viewport. Implementations range from a linear scan to a spatial hash;
/// all of them mark exactly the same objects visible for the same input.

use crate::error::Result;
use super::bounds::AABB;
use super::config::CullerConfig;
use super::cullable::{Cullable, CullKey};
use super::linear_culler::LinearCuller;
use super::spatial_hash_culler::SpatialHashCuller;

/// Visibility counters of the last cull.
///
/// `visible + culled == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Number of tracked objects
    pub total: usize,
    /// Objects visible after the last cull
    pub visible: usize,
    /// Objects not visible after the last cull
    pub culled: usize,
}

/// Strategy for determining which tracked objects intersect the viewport.
///
/// Frame protocol: `add`/`remove` as objects enter and leave the scene,
/// `mark_dirty` when they move, then `cull(viewport, false)` once per frame
/// and render only the keys reported visible.
///
/// The trait is object-safe so the strategy can be picked at runtime
/// (see `create_culler`).
pub trait Culler<T: Cullable> {
    /// Track an object. Duplicate adds track the object twice.
    fn add(&mut self, object: T, static_object: bool) -> CullKey;

    /// Track a list of objects, flattening one level of containers, then
    /// refresh bounds for the whole tracked set.
    fn add_list(&mut self, objects: Vec<T>, static_object: bool) -> Vec<CullKey>;

    /// Stop tracking an object and hand it back. Unknown keys are a no-op.
    fn remove(&mut self, key: CullKey) -> Option<T>;

    /// Remove every known key in the list, skipping unknown ones.
    fn remove_list(&mut self, keys: &[CullKey]) -> Vec<T>;

    /// Refresh bounds of every object that needs it (dirty-test aware).
    fn update_objects(&mut self);

    /// Recompute one object's bounds. Returns false for unknown keys and
    /// for static objects whose bounds are already computed.
    fn update_object(&mut self, key: CullKey) -> bool;

    /// Update bounds (unless `skip_update`) and recompute visibility.
    fn cull(&mut self, viewport: &AABB, skip_update: bool);

    /// Keys whose cached AABB overlaps `region`, independent of visibility.
    fn query(&self, region: &AABB) -> Vec<CullKey>;

    /// Call `callback` for each object overlapping `region` until it
    /// returns true. Returns whether the search was stopped early.
    fn query_callback(
        &self,
        region: &AABB,
        callback: &mut dyn FnMut(CullKey, &T) -> bool,
    ) -> bool;

    /// Count total / visible / culled objects (single pass, not cached).
    fn stats(&self) -> CullStats;

    /// Flag an object's geometry as changed. Returns false for unknown keys.
    fn mark_dirty(&mut self, key: CullKey) -> bool;

    /// Borrow a tracked object.
    fn object(&self, key: CullKey) -> Option<&T>;

    /// Mutably borrow a tracked object; the object is marked dirty.
    fn object_mut(&mut self, key: CullKey) -> Option<&mut T>;

    /// Cached world-space AABB (None if unknown or never computed).
    fn aabb(&self, key: CullKey) -> Option<AABB>;

    /// Visibility from the last cull (None if unknown).
    fn is_visible(&self, key: CullKey) -> Option<bool>;

    /// Whether the object was added as static (None if unknown).
    fn is_static(&self, key: CullKey) -> Option<bool>;

    /// Keys visible after the last cull, in the strategy's iteration order.
    fn visible_keys(&self) -> Vec<CullKey>;

    /// Whether the key refers to a tracked object.
    fn contains(&self, key: CullKey) -> bool;

    /// Number of tracked objects
    fn len(&self) -> usize;

    /// Whether no object is tracked
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop tracking every object.
    fn clear(&mut self);
}

/// Build a culler for the configured strategy.
///
/// # Errors
///
/// Returns `Error::InvalidConfig` if the spatial-hash cell size is not a
/// finite, strictly positive number.
pub fn create_culler<T: Cullable + 'static>(config: CullerConfig) -> Result<Box<dyn Culler<T>>> {
    match config {
        CullerConfig::Linear(linear) => Ok(Box::new(LinearCuller::new(linear))),
        CullerConfig::SpatialHash(hash) => Ok(Box::new(SpatialHashCuller::new(hash)?)),
    }
}
