/// Mock sprite - a minimal host drawable implementing `Cullable`.
///
/// Cloning a `MockSprite` clones the handle, not the node: every clone sees
/// the same transform. This mirrors how a host scene graph hands shared
/// node references to the culler while keeping ownership of the node.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use glam::Vec2;
use super::bounds::AABB;
use super::cullable::Cullable;

struct MockSpriteNode {
    name: String,
    position: Cell<Vec2>,
    pivot: Cell<Vec2>,
    scale: Cell<Vec2>,
    local_bounds: Cell<AABB>,
    children: RefCell<Vec<MockSprite>>,
}

/// Shared handle onto a mock scene node.
#[derive(Clone)]
pub struct MockSprite {
    node: Rc<MockSpriteNode>,
}

impl MockSprite {
    /// Create a leaf sprite at the origin with unit scale and no pivot.
    pub fn new(local_bounds: AABB) -> Self {
        Self::named("sprite", local_bounds)
    }

    /// Create a named leaf sprite (the name only helps debugging).
    pub fn named(name: &str, local_bounds: AABB) -> Self {
        Self {
            node: Rc::new(MockSpriteNode {
                name: name.to_string(),
                position: Cell::new(Vec2::ZERO),
                pivot: Cell::new(Vec2::ZERO),
                scale: Cell::new(Vec2::ONE),
                local_bounds: Cell::new(local_bounds),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Create a sprite whose world bounds equal `world` (identity transform
    /// with the position carrying the offset).
    pub fn at(world: AABB) -> Self {
        let sprite = Self::new(AABB::new(0.0, 0.0, world.width, world.height));
        sprite.set_position(world.x, world.y);
        sprite
    }

    /// Create an empty container (zero-size local bounds).
    pub fn container(name: &str) -> Self {
        Self::named(name, AABB::default())
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn set_position(&self, x: f32, y: f32) {
        self.node.position.set(Vec2::new(x, y));
    }

    pub fn set_pivot(&self, x: f32, y: f32) {
        self.node.pivot.set(Vec2::new(x, y));
    }

    pub fn set_scale(&self, x: f32, y: f32) {
        self.node.scale.set(Vec2::new(x, y));
    }

    pub fn set_local_bounds(&self, bounds: AABB) {
        self.node.local_bounds.set(bounds);
    }

    /// Append a child node (shares the handle).
    pub fn add_child(&self, child: MockSprite) {
        self.node.children.borrow_mut().push(child);
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &MockSprite) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl std::fmt::Debug for MockSprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSprite")
            .field("name", &self.node.name)
            .field("position", &self.node.position.get())
            .field("local_bounds", &self.node.local_bounds.get())
            .field("children", &self.node.children.borrow().len())
            .finish()
    }
}

impl Cullable for MockSprite {
    fn position(&self) -> Vec2 {
        self.node.position.get()
    }

    fn pivot(&self) -> Vec2 {
        self.node.pivot.get()
    }

    fn scale(&self) -> Vec2 {
        self.node.scale.get()
    }

    fn local_bounds(&self) -> AABB {
        self.node.local_bounds.get()
    }

    fn children(&self) -> Vec<Self> {
        self.node.children.borrow().clone()
    }
}
