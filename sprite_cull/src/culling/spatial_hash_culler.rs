/// SpatialHashCuller - uniform-grid bucketing for sub-linear culling.
///
/// Same tracked-object tables as the linear culler (SlotMap of objects,
/// SecondaryMaps of bounds and flags) plus a `SpatialGrid` index. Culls
/// and queries only look at objects registered in cells overlapping the
/// region, then apply the exact AABB test to each candidate: the grid
/// narrows the candidate set, it never decides visibility on its own.

use slotmap::{SecondaryMap, SlotMap};
use crate::error::Result;
use crate::{cull_config_err, cull_debug, cull_trace};
use super::bounds::AABB;
use super::config::SpatialHashConfig;
use super::cullable::{world_aabb, Cullable, CullKey, EntryFlags};
use super::culler::{Culler, CullStats};
use super::spatial_grid::SpatialGrid;

const SOURCE: &str = "cull2d::SpatialHashCuller";

/// Visibility counters plus bucket occupancy, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpatialHashStats {
    /// Number of tracked objects
    pub total: usize,
    /// Objects visible after the last cull
    pub visible: usize,
    /// Objects not visible after the last cull
    pub culled: usize,
    /// Number of non-empty buckets
    pub buckets: usize,
    /// Size of the fullest bucket
    pub largest_bucket: usize,
    /// Mean objects per non-empty bucket
    pub average_bucket_size: f32,
    /// Non-empty buckets visited by the last cull
    pub buckets_visited: usize,
}

/// Spatial-hash culler.
///
/// Suited to large, sparse or clustered scenes where the viewport covers a
/// small fraction of the world. Cell size trades bucket fan-out (objects
/// spanning many small cells) against per-cell candidate count (many
/// objects in large cells).
pub struct SpatialHashCuller<T: Cullable> {
    config: SpatialHashConfig,
    /// Tracked host objects
    objects: SlotMap<CullKey, T>,
    /// Cached world-space bounds
    bounds: SecondaryMap<CullKey, AABB>,
    /// Visible / dirty / static / bounded bits
    flags: SecondaryMap<CullKey, EntryFlags>,
    /// Cell → keys index, kept in sync with `bounds`
    grid: SpatialGrid,
    /// Non-empty buckets visited by the last cull
    last_buckets_visited: usize,
}

impl<T: Cullable> SpatialHashCuller<T> {
    /// Create an empty culler.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if a cell dimension is not finite or
    /// not strictly positive.
    pub fn new(config: SpatialHashConfig) -> Result<Self> {
        if !(config.cell_width.is_finite() && config.cell_width > 0.0) {
            return Err(cull_config_err!(SOURCE,
                "cell width must be finite and > 0, got {}", config.cell_width));
        }
        if !(config.cell_height.is_finite() && config.cell_height > 0.0) {
            return Err(cull_config_err!(SOURCE,
                "cell height must be finite and > 0, got {}", config.cell_height));
        }

        cull_debug!(SOURCE, "created ({}x{} cells, dirty_test = {}, span_cells = {})",
            config.cell_width, config.cell_height, config.dirty_test, config.span_cells);

        Ok(Self {
            config,
            objects: SlotMap::with_key(),
            bounds: SecondaryMap::new(),
            flags: SecondaryMap::new(),
            grid: SpatialGrid::new(config.cell_width, config.cell_height, config.span_cells),
            last_buckets_visited: 0,
        })
    }

    pub fn config(&self) -> &SpatialHashConfig {
        &self.config
    }

    pub fn dirty_test(&self) -> bool {
        self.config.dirty_test
    }

    /// Switch between dirty-only and always-refresh updates.
    pub fn set_dirty_test(&mut self, dirty_test: bool) {
        self.config.dirty_test = dirty_test;
    }

    /// The underlying grid index (read-only).
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Iterate over tracked objects (slot order).
    pub fn iter(&self) -> impl Iterator<Item = (CullKey, &T)> + '_ {
        self.objects.iter()
    }

    /// Tracked objects sharing at least one cell with `key`.
    pub fn neighbors(&self, key: CullKey) -> Vec<CullKey> {
        self.grid.neighbors(key)
    }

    /// World-space bounds of every cell holding an object.
    pub fn world_bounds(&self) -> Option<AABB> {
        self.grid.occupied_bounds()
    }

    /// Fraction of cells inside `region` that hold no object.
    pub fn sparseness(&self, region: &AABB) -> f32 {
        self.grid.sparseness(region)
    }

    pub fn bucket_count(&self) -> usize {
        self.grid.bucket_count()
    }

    pub fn largest_bucket(&self) -> usize {
        self.grid.largest_bucket()
    }

    pub fn average_bucket_size(&self) -> f32 {
        self.grid.average_bucket_size()
    }

    pub fn last_buckets_visited(&self) -> usize {
        self.last_buckets_visited
    }

    /// Visibility counters plus grid occupancy.
    pub fn hash_stats(&self) -> SpatialHashStats {
        let stats = self.stats();
        SpatialHashStats {
            total: stats.total,
            visible: stats.visible,
            culled: stats.culled,
            buckets: self.grid.bucket_count(),
            largest_bucket: self.grid.largest_bucket(),
            average_bucket_size: self.grid.average_bucket_size(),
            buckets_visited: self.last_buckets_visited,
        }
    }

    /// Insert without computing bounds (the next refresh pass buckets it).
    fn track(&mut self, object: T, static_object: bool) -> CullKey {
        let key = self.objects.insert(object);
        self.flags.insert(key, EntryFlags::for_new(static_object));
        key
    }

    /// Recompute bounds, clear dirty, and move the key to its new cells.
    fn refresh_entry(
        key: CullKey,
        object: &T,
        flags: &mut EntryFlags,
        bounds: &mut SecondaryMap<CullKey, AABB>,
        grid: &mut SpatialGrid,
    ) {
        let aabb = world_aabb(object);
        bounds.insert(key, aabb);
        grid.update(key, &aabb);
        flags.insert(EntryFlags::BOUNDED);
        flags.remove(EntryFlags::DIRTY);
    }

    fn refresh(&mut self, key: CullKey) {
        let (Some(object), Some(flags)) = (self.objects.get(key), self.flags.get_mut(key)) else {
            return;
        };
        Self::refresh_entry(key, object, flags, &mut self.bounds, &mut self.grid);
    }

    /// Refresh every object matching `predicate` on its flags.
    fn refresh_where(&mut self, predicate: impl Fn(EntryFlags) -> bool) {
        for (key, object) in self.objects.iter() {
            let Some(flags) = self.flags.get_mut(key) else {
                continue;
            };
            if predicate(*flags) {
                Self::refresh_entry(key, object, flags, &mut self.bounds, &mut self.grid);
            }
        }
    }

    fn overlapping(&self, region: &AABB) -> Vec<CullKey> {
        self.grid
            .candidates(region)
            .into_iter()
            .filter(|&key| {
                self.bounds
                    .get(key)
                    .is_some_and(|aabb| aabb.intersects(region))
            })
            .collect()
    }
}

impl<T: Cullable> Culler<T> for SpatialHashCuller<T> {
    fn add(&mut self, object: T, static_object: bool) -> CullKey {
        // Always bucketed immediately, whatever the dirty-test mode
        let key = self.track(object, static_object);
        self.refresh(key);
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
                for child in children {
                    keys.push(self.track(child, static_object));
                }
            }
        }

        // Full resync; already-bounded static objects keep their bounds
        self.refresh_where(|flags| !flags.contains(EntryFlags::STATIC | EntryFlags::BOUNDED));

        cull_debug!(SOURCE, "add_list: {} leaves from {} entries ({} tracked, {} buckets)",
            keys.len(), entries, self.objects.len(), self.grid.bucket_count());
        keys
    }

    fn remove(&mut self, key: CullKey) -> Option<T> {
        let Some(object) = self.objects.remove(key) else {
            cull_trace!(SOURCE, "remove: {:?} is not tracked", key);
            return None;
        };
        self.bounds.remove(key);
        self.flags.remove(key);
        self.grid.remove(key);
        Some(object)
    }

    fn remove_list(&mut self, keys: &[CullKey]) -> Vec<T> {
        keys.iter().filter_map(|&key| self.remove(key)).collect()
    }

    fn update_objects(&mut self) {
        let dirty_test = self.config.dirty_test;
        self.refresh_where(|flags| flags.needs_refresh(dirty_test));
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

        for flags in self.flags.values_mut() {
            flags.remove(EntryFlags::VISIBLE);
        }

        let bounds = &self.bounds;
        let flags = &mut self.flags;
        let mut visible_count = 0;
        let visited = self.grid.for_each_candidate(viewport, |key| {
            let overlaps = bounds
                .get(key)
                .is_some_and(|aabb| aabb.intersects(viewport));
            if !overlaps {
                return;
            }
            if let Some(entry) = flags.get_mut(key) {
                if !entry.contains(EntryFlags::VISIBLE) {
                    entry.insert(EntryFlags::VISIBLE);
                    visible_count += 1;
                }
            }
        });
        self.last_buckets_visited = visited;

        cull_trace!(SOURCE, "cull {:?}: {} visible / {} tracked, {} buckets visited",
            viewport, visible_count, self.objects.len(), visited);
    }

    fn query(&self, region: &AABB) -> Vec<CullKey> {
        let mut results = self.overlapping(region);
        results.sort_unstable();
        results
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
        self.flags
            .iter()
            .filter(|(_, flags)| flags.contains(EntryFlags::VISIBLE))
            .map(|(key, _)| key)
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
        self.grid.clear();
        self.last_buckets_visited = 0;
        cull_debug!(SOURCE, "cleared");
    }
}

#[cfg(test)]
#[path = "spatial_hash_culler_tests.rs"]
mod tests;
