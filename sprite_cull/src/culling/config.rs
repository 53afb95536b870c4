/// Culler configuration.
///
/// Each strategy takes an explicit configuration struct, built once at
/// construction. `CullerConfig` selects the strategy when the host only
/// wants a `Box<dyn Culler<T>>`.

/// LinearCuller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearConfig {
    /// `true`: only refresh bounds of dirty, non-static objects.
    /// `false`: refresh every non-static object on every update.
    pub dirty_test: bool,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            dirty_test: false,
        }
    }
}

/// SpatialHashCuller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialHashConfig {
    /// Width of a grid cell in world units (must be finite and > 0).
    ///
    /// With `span_cells`, an object costs one bucket entry per cell it
    /// covers. Objects covering more than `MAX_SPAN_CELLS` cells are kept
    /// in an unbucketed list that every cull and query scans, so very small
    /// cells next to very large sprites trade memory for scan time.
    pub cell_width: f32,
    /// Height of a grid cell in world units (must be finite and > 0)
    pub cell_height: f32,
    /// `true`: only refresh bounds of dirty, non-static objects.
    /// `false`: refresh (and rehash) every non-static object on every update.
    pub dirty_test: bool,
    /// `true`: register objects in every cell their AABB overlaps.
    /// `false`: register objects by their AABB center only; queries are
    /// padded by the largest half-extent seen so results stay exact.
    pub span_cells: bool,
}

impl SpatialHashConfig {
    /// Square cells of the given size, other options at their defaults.
    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            cell_width: cell_size,
            cell_height: cell_size,
            ..Self::default()
        }
    }
}

impl Default for SpatialHashConfig {
    fn default() -> Self {
        Self {
            cell_width: 1000.0,
            cell_height: 1000.0,
            dirty_test: true,
            span_cells: true,
        }
    }
}

/// Strategy selection for `create_culler`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CullerConfig {
    /// Exhaustive scan over every tracked object
    Linear(LinearConfig),
    /// Uniform-grid bucketing
    SpatialHash(SpatialHashConfig),
}

impl Default for CullerConfig {
    fn default() -> Self {
        CullerConfig::Linear(LinearConfig::default())
    }
}
