/// SpatialGrid - uniform-grid spatial index over world-space AABBs.
///
/// World space is divided into `cell_width x cell_height` cells addressed by
/// integer `(cx, cy)` = `(floor(x / cell_width), floor(y / cell_height))`.
/// Only non-empty cells exist (hash map of buckets), so the grid is
/// unbounded and costs nothing for empty space.
///
/// Two placement modes:
/// - spanning: an object is registered in every cell its AABB overlaps.
///   Objects near cell boundaries appear in several buckets, so candidate
///   lists must be deduplicated. Objects covering more than
///   `MAX_SPAN_CELLS` cells are kept in a separate oversized list instead.
/// - point: an object is registered only in the cell containing its AABB
///   center. Queries are padded by the largest half-extent ever inserted,
///   which keeps candidate sets complete.

use rustc_hash::{FxHashMap, FxHashSet};
use glam::Vec2;
use super::bounds::AABB;
use super::cullable::CullKey;

/// Integer cell coordinate
pub type Cell = (i32, i32);

/// Inclusive rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl CellRange {
    /// A range covering exactly one cell.
    pub fn single(cell: Cell) -> Self {
        Self { x0: cell.0, y0: cell.1, x1: cell.0, y1: cell.1 }
    }

    /// Number of cells in the range, saturating at `u64::MAX`.
    pub fn cell_count(&self) -> u64 {
        let w = (self.x1 as i64 - self.x0 as i64 + 1).max(0) as u64;
        let h = (self.y1 as i64 - self.y0 as i64 + 1).max(0) as u64;
        w.saturating_mul(h)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 >= self.x0 && cell.0 <= self.x1 && cell.1 >= self.y0 && cell.1 <= self.y1
    }

    /// Whether the two ranges share at least one cell.
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    /// Iterate cells row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (x0, x1) = (self.x0, self.x1);
        (self.y0..=self.y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
    }
}

/// Spanning placements covering more cells than this are not bucketed.
/// The key goes to the oversized list instead, which every query scans.
pub const MAX_SPAN_CELLS: u64 = 1024;

/// Uniform-grid index mapping cells to the keys registered in them.
pub struct SpatialGrid {
    cell_width: f32,
    cell_height: f32,
    span_cells: bool,
    /// Non-empty buckets only
    buckets: FxHashMap<Cell, Vec<CullKey>>,
    /// Reverse lookup: key → cells it is registered in.
    /// Needed for O(cells) remove without scanning buckets.
    locations: FxHashMap<CullKey, CellRange>,
    /// Keys whose placement exceeds `MAX_SPAN_CELLS`
    oversized: Vec<CullKey>,
    /// Largest half width/height inserted in point mode (query padding)
    max_half_extent: Vec2,
}

impl SpatialGrid {
    /// Create an empty grid. Cell dimensions must be finite and > 0
    /// (validated by the owning culler).
    pub fn new(cell_width: f32, cell_height: f32, span_cells: bool) -> Self {
        debug_assert!(cell_width > 0.0 && cell_height > 0.0);
        Self {
            cell_width,
            cell_height,
            span_cells,
            buckets: FxHashMap::default(),
            locations: FxHashMap::default(),
            oversized: Vec::new(),
            max_half_extent: Vec2::ZERO,
        }
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    pub fn span_cells(&self) -> bool {
        self.span_cells
    }

    /// Cell containing a world-space point.
    pub fn cell_of(&self, point: Vec2) -> Cell {
        (
            (point.x / self.cell_width).floor() as i32,
            (point.y / self.cell_height).floor() as i32,
        )
    }

    /// Every cell an AABB touches, edges included.
    pub fn range_of(&self, aabb: &AABB) -> CellRange {
        let (x0, y0) = self.cell_of(aabb.min());
        let (x1, y1) = self.cell_of(aabb.max());
        CellRange { x0, y0, x1, y1 }
    }

    /// Cells an object with this AABB gets registered in.
    fn placement(&self, aabb: &AABB) -> CellRange {
        if self.span_cells {
            self.range_of(aabb)
        } else {
            CellRange::single(self.cell_of(aabb.center()))
        }
    }

    /// Cells a query over `region` has to visit.
    pub fn query_range(&self, region: &AABB) -> CellRange {
        if self.span_cells {
            self.range_of(region)
        } else {
            self.range_of(&region.expanded(self.max_half_extent))
        }
    }

    /// Register a key. The key must not already be in the grid.
    pub fn insert(&mut self, key: CullKey, aabb: &AABB) {
        debug_assert!(!self.locations.contains_key(&key), "key inserted twice: {:?}", key);
        if !self.span_cells {
            self.max_half_extent = self.max_half_extent
                .max(Vec2::new(aabb.width * 0.5, aabb.height * 0.5));
        }
        let range = self.placement(aabb);
        if range.cell_count() > MAX_SPAN_CELLS {
            self.oversized.push(key);
        } else {
            for cell in range.cells() {
                self.buckets.entry(cell).or_default().push(key);
            }
        }
        self.locations.insert(key, range);
    }

    /// Unregister a key. Returns false if it was not in the grid.
    pub fn remove(&mut self, key: CullKey) -> bool {
        let Some(range) = self.locations.remove(&key) else {
            return false;
        };
        if range.cell_count() > MAX_SPAN_CELLS {
            if let Some(pos) = self.oversized.iter().position(|&k| k == key) {
                self.oversized.swap_remove(pos);
            }
            return true;
        }
        for cell in range.cells() {
            if let Some(bucket) = self.buckets.get_mut(&cell) {
                if let Some(pos) = bucket.iter().position(|&k| k == key) {
                    bucket.swap_remove(pos);
                }
                if bucket.is_empty() {
                    self.buckets.remove(&cell);
                }
            }
        }
        true
    }

    /// Move a key to the cells matching its new AABB.
    ///
    /// Returns true if the key was rehashed, false if its cells did not
    /// change. Unknown keys are inserted.
    pub fn update(&mut self, key: CullKey, aabb: &AABB) -> bool {
        let Some(&current) = self.locations.get(&key) else {
            self.insert(key, aabb);
            return true;
        };
        if !self.span_cells {
            self.max_half_extent = self.max_half_extent
                .max(Vec2::new(aabb.width * 0.5, aabb.height * 0.5));
        }
        if self.placement(aabb) == current {
            return false;
        }
        self.remove(key);
        self.insert(key, aabb);
        true
    }

    /// Visit every key registered in a bucket the query over `region`
    /// covers. A key may be visited once per bucket it is registered in.
    ///
    /// Returns the number of non-empty buckets visited. When the query
    /// range holds more cells than there are buckets, the buckets are
    /// scanned instead of the cells. Oversized keys whose range overlaps
    /// the query are visited too.
    pub fn for_each_candidate(&self, region: &AABB, mut visit: impl FnMut(CullKey)) -> usize {
        let range = self.query_range(region);
        let mut visited = 0;

        for &key in &self.oversized {
            if self.locations.get(&key).is_some_and(|placed| placed.overlaps(&range)) {
                visit(key);
            }
        }

        if range.cell_count() > self.buckets.len() as u64 {
            for (cell, bucket) in &self.buckets {
                if range.contains(*cell) {
                    visited += 1;
                    bucket.iter().for_each(|&key| visit(key));
                }
            }
        } else {
            for cell in range.cells() {
                if let Some(bucket) = self.buckets.get(&cell) {
                    visited += 1;
                    bucket.iter().for_each(|&key| visit(key));
                }
            }
        }

        visited
    }

    /// Deduplicated candidates for `region`, in discovery order.
    pub fn candidates(&self, region: &AABB) -> Vec<CullKey> {
        let mut seen = FxHashSet::default();
        let mut results = Vec::new();
        self.for_each_candidate(region, |key| {
            if seen.insert(key) {
                results.push(key);
            }
        });
        results
    }

    /// Keys sharing at least one cell with `key` (excluding itself).
    pub fn neighbors(&self, key: CullKey) -> Vec<CullKey> {
        let Some(&range) = self.locations.get(&key) else {
            return Vec::new();
        };
        let mut seen = FxHashSet::default();
        let mut results = Vec::new();
        let mut push = |other: CullKey| {
            if other != key && seen.insert(other) {
                results.push(other);
            }
        };

        if range.cell_count() > self.buckets.len() as u64 {
            for (cell, bucket) in &self.buckets {
                if range.contains(*cell) {
                    bucket.iter().for_each(|&other| push(other));
                }
            }
        } else {
            for cell in range.cells() {
                if let Some(bucket) = self.buckets.get(&cell) {
                    bucket.iter().for_each(|&other| push(other));
                }
            }
        }
        for &other in &self.oversized {
            if self.locations.get(&other).is_some_and(|placed| placed.overlaps(&range)) {
                push(other);
            }
        }
        results
    }

    /// Cells a key is registered in.
    pub fn cell_range(&self, key: CullKey) -> Option<CellRange> {
        self.locations.get(&key).copied()
    }

    /// Keys registered in one cell.
    pub fn bucket(&self, cell: Cell) -> &[CullKey] {
        self.buckets.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of keys held outside the buckets
    pub fn oversized_count(&self) -> usize {
        self.oversized.len()
    }

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Size of the fullest bucket (0 if the grid is empty)
    pub fn largest_bucket(&self) -> usize {
        self.buckets.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Mean number of keys per non-empty bucket (0 if the grid is empty)
    pub fn average_bucket_size(&self) -> f32 {
        if self.buckets.is_empty() {
            return 0.0;
        }
        let entries: usize = self.buckets.values().map(Vec::len).sum();
        entries as f32 / self.buckets.len() as f32
    }

    /// World-space bounds of all cells holding a key (None if empty).
    pub fn occupied_bounds(&self) -> Option<AABB> {
        let bucketed = self.buckets.keys().map(|&cell| CellRange::single(cell));
        let oversized = self.oversized.iter().filter_map(|key| self.locations.get(key).copied());
        let range = bucketed.chain(oversized).reduce(|acc, r| CellRange {
            x0: acc.x0.min(r.x0),
            y0: acc.y0.min(r.y0),
            x1: acc.x1.max(r.x1),
            y1: acc.y1.max(r.y1),
        })?;
        Some(AABB::new(
            range.x0 as f32 * self.cell_width,
            range.y0 as f32 * self.cell_height,
            (range.x1 as i64 - range.x0 as i64 + 1) as f32 * self.cell_width,
            (range.y1 as i64 - range.y0 as i64 + 1) as f32 * self.cell_height,
        ))
    }

    /// Fraction of cells touched by `region` that hold no bucket (0.0..=1.0).
    /// Oversized keys are not counted.
    pub fn sparseness(&self, region: &AABB) -> f32 {
        let range = self.range_of(region);
        let total = range.cell_count();
        if total == 0 {
            return 1.0;
        }
        let occupied = self.buckets.keys().filter(|&&cell| range.contains(cell)).count() as u64;
        (total - occupied) as f32 / total as f32
    }

    /// Remove every key and bucket, and reset the point-mode padding.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.locations.clear();
        self.oversized.clear();
        self.max_half_extent = Vec2::ZERO;
    }
}
