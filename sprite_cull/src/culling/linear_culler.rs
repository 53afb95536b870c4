/// LinearCuller - exhaustive AABB test against every tracked object.
///
/// Objects are stored in a SlotMap for O(1) lookup by key, with cached
/// bounds and state flags in parallel SecondaryMaps. A separate key list
/// keeps insertion order for culling and queries; removals leave stale
/// entries in it that are compacted lazily.

use slotmap::{SecondaryMap, SlotMap};
use crate::{cull_debug, cull_trace};
use super::bounds::AABB;
use super::config::LinearConfig;
use super::cullable::{world_aabb, Cullable, CullKey, EntryFlags};
use super::culler::{Culler, CullStats};

const SOURCE: &str = "cull2d::LinearCuller";

/// Linear-scan culler.
///
/// Suitable for small to medium scenes, or as the reference the spatial
/// hash is checked against. Cull and query cost is O(n).
pub struct LinearCuller<T: Cullable> {
    config: LinearConfig,
    /// Tracked host objects
    objects: SlotMap<CullKey, T>,
    /// Cached world-space bounds (present once computed)
    bounds: SecondaryMap<CullKey, AABB>,
    /// Visible / dirty / static / bounded bits
    flags: SecondaryMap<CullKey, EntryFlags>,
    /// Insertion order; may contain keys removed since the last compaction
    order: Vec<CullKey>,
    /// Number of removed keys still present in `order`
    stale: usize,
}

impl<T: Cullable> LinearCuller<T> {
    /// Create an empty culler.
    pub fn new(config: LinearConfig) -> Self {
        cull_debug!(SOURCE, "created (dirty_test = {})", config.dirty_test);
        Self {
            config,
            objects: SlotMap::with_key(),
            bounds: SecondaryMap::new(),
            flags: SecondaryMap::new(),
            order: Vec::new(),
            stale: 0,
        }
    }

    pub fn config(&self) -> &LinearConfig {
        &self.config
    }

    pub fn dirty_test(&self) -> bool {
        self.config.dirty_test
    }

    /// Switch between dirty-only and always-refresh updates.
    pub fn set_dirty_test(&mut self, dirty_test: bool) {
        self.config.dirty_test = dirty_test;
    }

    /// Iterate over tracked objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CullKey, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.objects.get(key).map(|object| (key, object)))
    }

    /// Insert without computing bounds.
    fn track(&mut self, object: T, static_object: bool) -> CullKey {
        let key = self.objects.insert(object);
        self.flags.insert(key, EntryFlags::for_new(static_object));
        self.order.push(key);
        key
    }

    /// Recompute and cache one object's bounds, clearing its dirty flag.
    fn refresh(&mut self, key: CullKey) {
        let Some(object) = self.objects.get(key) else {
            return;
        };
        self.bounds.insert(key, world_aabb(object));
        if let Some(flags) = self.flags.get_mut(key) {
            flags.insert(EntryFlags::BOUNDED);
            flags.remove(EntryFlags::DIRTY);
        }
    }

    /// Drop removed keys from the order list.
    fn compact(&mut self) {
        if self.stale == 0 {
            return;
        }
        let objects = &self.objects;
        self.order.retain(|&key| objects.contains_key(key));
        self.stale = 0;
    }

    fn overlapping<'a>(&'a self, region: &'a AABB) -> impl Iterator<Item = CullKey> + 'a {
        self.order.iter().copied().filter(move |&key| {
            self.bounds
                .get(key)
                .is_some_and(|aabb| aabb.intersects(region))
        })
    }
}

impl<T: Cullable> Default for LinearCuller<T> {
    fn default() -> Self {
        Self::new(LinearConfig::default())
    }
}

impl<T: Cullable> Culler<T> for LinearCuller<T> {
    fn add(&mut self, object: T, static_object: bool) -> CullKey {
        let key = self.track(object, static_object);
        if self.config.dirty_test || static_object {
            self.refresh(key);
        }
        key
    }

    fn add_list(&mut self, objects: Vec<T>, static_object: bool) -> Vec<CullKey> {
        let entries = objects.len();
        let mut keys = Vec::with_capacity(entries);

        for object in objects {
            let children = object.children();
            if children.is_empty() {
                keys.push(self.track(object, static_object));
            } else {
                // The container itself is never culled, only its leaves
                for child in children {
                    keys.push(self.track(child, static_object));
                }
            }
        }

        // Full resync of the tracked set
        for i in 0..self.order.len() {
            let key = self.order[i];
            let skip = match self.flags.get(key) {
                Some(flags) => flags.contains(EntryFlags::STATIC | EntryFlags::BOUNDED),
                None => true,
            };
            if !skip {
                self.refresh(key);
            }
        }

        cull_debug!(SOURCE, "add_list: {} leaves from {} entries ({} tracked)",
            keys.len(), entries, self.objects.len());
        keys
    }

    fn remove(&mut self, key: CullKey) -> Option<T> {
        let Some(object) = self.objects.remove(key) else {
            cull_trace!(SOURCE, "remove: {:?} is not tracked", key);
            return None;
        };
        self.bounds.remove(key);
        self.flags.remove(key);
        self.stale += 1;
        if self.stale * 2 > self.order.len() {
            self.compact();
        }
        Some(object)
    }

    fn remove_list(&mut self, keys: &[CullKey]) -> Vec<T> {
        keys.iter().filter_map(|&key| self.remove(key)).collect()
    }

    fn update_objects(&mut self) {
        let dirty_test = self.config.dirty_test;
        for i in 0..self.order.len() {
            let key = self.order[i];
            let needs_refresh = self.flags
                .get(key)
                .is_some_and(|flags| flags.needs_refresh(dirty_test));
            if needs_refresh {
                self.refresh(key);
            }
        }
    }

    fn update_object(&mut self, key: CullKey) -> bool {
        let Some(flags) = self.flags.get(key).copied() else {
            return false;
        };
        if flags.contains(EntryFlags::STATIC | EntryFlags::BOUNDED) {
            return false;
        }
        self.refresh(key);
        true
    }

    fn cull(&mut self, viewport: &AABB, skip_update: bool) {
        if !skip_update {
            self.update_objects();
        }
        self.compact();

        let mut visible_count = 0;
        for &key in &self.order {
            let visible = self.bounds
                .get(key)
                .is_some_and(|aabb| aabb.intersects(viewport));
            if let Some(flags) = self.flags.get_mut(key) {
                flags.set(EntryFlags::VISIBLE, visible);
            }
            if visible {
                visible_count += 1;
            }
        }

        cull_trace!(SOURCE, "cull {:?}: {} visible / {} tracked",
            viewport, visible_count, self.order.len());
    }

    fn query(&self, region: &AABB) -> Vec<CullKey> {
        self.overlapping(region).collect()
    }

    fn query_callback(
        &self,
        region: &AABB,
        callback: &mut dyn FnMut(CullKey, &T) -> bool,
    ) -> bool {
        for key in self.overlapping(region) {
            if let Some(object) = self.objects.get(key) {
                if callback(key, object) {
                    return true;
                }
            }
        }
        false
    }

    fn stats(&self) -> CullStats {
        let mut total = 0;
        let mut visible = 0;
        for flags in self.flags.values() {
            total += 1;
            if flags.contains(EntryFlags::VISIBLE) {
                visible += 1;
            }
        }
        CullStats { total, visible, culled: total - visible }
    }

    fn mark_dirty(&mut self, key: CullKey) -> bool {
        match self.flags.get_mut(key) {
            Some(flags) => {
                flags.insert(EntryFlags::DIRTY);
                true
            }
            None => false,
        }
    }

    fn object(&self, key: CullKey) -> Option<&T> {
        self.objects.get(key)
    }

    fn object_mut(&mut self, key: CullKey) -> Option<&mut T> {
        if !self.mark_dirty(key) {
            return None;
        }
        self.objects.get_mut(key)
    }

    fn aabb(&self, key: CullKey) -> Option<AABB> {
        self.bounds.get(key).copied()
    }

    fn is_visible(&self, key: CullKey) -> Option<bool> {
        self.flags.get(key).map(|flags| flags.contains(EntryFlags::VISIBLE))
    }

    fn is_static(&self, key: CullKey) -> Option<bool> {
        self.flags.get(key).map(|flags| flags.contains(EntryFlags::STATIC))
    }

    fn visible_keys(&self) -> Vec<CullKey> {
        self.order
            .iter()
            .copied()
            .filter(|&key| self.is_visible(key) == Some(true))
            .collect()
    }

    fn contains(&self, key: CullKey) -> bool {
        self.objects.contains_key(key)
    }

    fn len(&self) -> usize {
        self.objects.len()
    }

    fn clear(&mut self) {
        self.objects.clear();
        self.bounds.clear();
        self.flags.clear();
        self.order.clear();
        self.stale = 0;
        cull_debug!(SOURCE, "cleared");
    }
}

#[cfg(test)]
#[path = "linear_culler_tests.rs"]
mod tests;
