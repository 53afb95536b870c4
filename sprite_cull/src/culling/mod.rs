//! Culling module
//!
//! Provides the host capability trait, bounds math, and the culling
//! strategies (linear scan and spatial hash) behind a common trait.

mod bounds;
mod cullable;
mod config;
mod culler;
mod linear_culler;
mod spatial_grid;
mod spatial_hash_culler;
pub mod mock_sprite;

pub use bounds::AABB;
pub use cullable::{Cullable, CullKey, EntryFlags, world_aabb};
pub use config::{LinearConfig, SpatialHashConfig, CullerConfig};
pub use culler::{Culler, CullStats, create_culler};
pub use linear_culler::LinearCuller;
pub use spatial_grid::{SpatialGrid, CellRange, Cell, MAX_SPAN_CELLS};
pub use spatial_hash_culler::{SpatialHashCuller, SpatialHashStats};
pub use mock_sprite::MockSprite;
