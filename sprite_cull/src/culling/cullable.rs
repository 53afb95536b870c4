/// Host-side capability and engine-side per-object state.
///
/// The host drawable only has to expose its transform and local bounds
/// through `Cullable`. Everything the engine writes (cached bounds,
/// visibility, dirty/static bookkeeping) lives in engine-owned tables keyed
/// by `CullKey`, never on the host object.

use bitflags::bitflags;
use glam::Vec2;
use slotmap::new_key_type;
use super::bounds::AABB;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle to an object tracked by a culler.
    ///
    /// Keys remain valid even after other objects are removed.
    /// A key becomes invalid only when its own object is removed, and is
    /// never handed out again for another object.
    pub struct CullKey;
}

// ===== CAPABILITY =====

/// Anything with a world position, pivot, scale and local bounds.
///
/// Implemented by the host's drawable type (typically a cheap shared handle
/// onto a scene node). The engine only ever reads through this trait.
pub trait Cullable {
    /// World position of the object's origin
    fn position(&self) -> Vec2;

    /// Pivot offset, in local units, subtracted from the local bounds
    fn pivot(&self) -> Vec2;

    /// Non-uniform scale; negative components flip the object
    fn scale(&self) -> Vec2;

    /// Bounding rectangle in local (unscaled, unpivoted) space
    fn local_bounds(&self) -> AABB;

    /// Child drawables, if this object is a container.
    ///
    /// Only consulted by `add_list`: a container with children is replaced by
    /// its children and is never tracked itself.
    fn children(&self) -> Vec<Self>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

/// Compute the world-space AABB of an object.
///
/// `x = position.x + (local.x - pivot.x) * |scale.x|` (y symmetric),
/// `width = local.width * |scale.x|`, `height = local.height * |scale.y|`.
/// The absolute scale keeps flipped objects from producing inverted boxes.
pub fn world_aabb<T: Cullable + ?Sized>(object: &T) -> AABB {
    let local = object.local_bounds();
    let position = object.position();
    let pivot = object.pivot();
    let scale = object.scale().abs();

    AABB {
        x: position.x + (local.x - pivot.x) * scale.x,
        y: position.y + (local.y - pivot.y) * scale.y,
        width: local.width * scale.x,
        height: local.height * scale.y,
    }
}

// ===== FLAGS =====

bitflags! {
    /// Engine-owned per-object state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntryFlags: u8 {
        /// Result of the last cull
        const VISIBLE = 1 << 0;
        /// Geometry changed since the last bounds refresh
        const DIRTY   = 1 << 1;
        /// Bounds are computed once and never refreshed again
        const STATIC  = 1 << 2;
        /// Bounds have been computed at least once
        const BOUNDED = 1 << 3;
    }
}

impl EntryFlags {
    /// Initial flags for a freshly added object.
    pub fn for_new(static_object: bool) -> Self {
        if static_object {
            EntryFlags::STATIC
        } else {
            EntryFlags::empty()
        }
    }

    /// Whether the next bounds pass has to refresh this object.
    ///
    /// Objects never bounded are always refreshed. Bounded static objects
    /// never are. Otherwise, with `dirty_test` only dirty objects are.
    pub fn needs_refresh(self, dirty_test: bool) -> bool {
        if !self.contains(EntryFlags::BOUNDED) {
            return true;
        }
        if self.contains(EntryFlags::STATIC) {
            return false;
        }
        !dirty_test || self.contains(EntryFlags::DIRTY)
    }
}
