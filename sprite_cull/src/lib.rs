/*!
# Sprite Cull

Visibility culling for real-time 2D renderers.

Every frame the host renderer asks which of its (possibly thousands of)
drawables intersect the viewport. This crate answers that question and keeps
the spatial bookkeeping needed to answer it cheaply, without ever owning the
drawing logic itself.

## Architecture

- **Cullable**: Capability trait the host drawable implements (position, pivot, scale, local bounds)
- **Culler**: Strategy trait shared by every culling implementation
- **LinearCuller**: Exhaustive AABB test against every tracked object
- **SpatialHashCuller**: Uniform-grid bucketing, only tests objects in overlapping cells
- **Logger**: Pluggable logging sink used by the engine

Tracked objects are addressed by stable `CullKey` handles. The engine stores
bounds and visibility in its own tables; the host looks them up by key.
*/

// Internal modules
mod error;
pub mod log;
pub mod culling;

// Main cull2d namespace module
pub mod cull2d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types and dispatch, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity, enabled,
        };
    }

    // Culling sub-module with strategies and shared types
    pub mod culling {
        pub use crate::culling::*;
    }
}

// Re-export math library at crate root
pub use glam;

