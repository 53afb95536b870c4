/// Tests for AABB
///
/// Covers the open-interval overlap rule shared by cull and query paths,
/// point containment, and the union/expansion helpers.

use super::*;

// ============================================================================
// Overlap
// ============================================================================

#[test]
fn test_intersects_partial_overlap() {
    let object = AABB::new(0.0, 0.0, 10.0, 10.0);
    let viewport = AABB::new(5.0, 5.0, 10.0, 10.0);
    assert!(object.intersects(&viewport));
    assert!(viewport.intersects(&object));
}

#[test]
fn test_intersects_disjoint() {
    let object = AABB::new(0.0, 0.0, 10.0, 10.0);
    let viewport = AABB::new(20.0, 20.0, 5.0, 5.0);
    assert!(!object.intersects(&viewport));
}

#[test]
fn test_edge_touching_is_not_intersecting() {
    let object = AABB::new(0.0, 0.0, 10.0, 10.0);
    // Shares the x = 10 edge, zero overlap width
    let right = AABB::new(10.0, 0.0, 5.0, 5.0);
    // Shares the y = 10 edge, zero overlap height
    let below = AABB::new(0.0, 10.0, 5.0, 5.0);
    // Touches the bottom-right corner only
    let corner = AABB::new(10.0, 10.0, 5.0, 5.0);

    assert!(!object.intersects(&right));
    assert!(!object.intersects(&below));
    assert!(!object.intersects(&corner));
}

#[test]
fn test_containment_intersects() {
    let outer = AABB::new(-100.0, -100.0, 200.0, 200.0);
    let inner = AABB::new(-1.0, -1.0, 2.0, 2.0);
    assert!(outer.intersects(&inner));
    assert!(inner.intersects(&outer));
}

#[test]
fn test_intersects_is_symmetric_for_non_square_boxes() {
    // Wide, short box against a narrow, tall one
    let wide = AABB::new(0.0, 0.0, 100.0, 2.0);
    let tall = AABB::new(150.0, -50.0, 2.0, 100.0);
    assert_eq!(wide.intersects(&tall), tall.intersects(&wide));
    assert!(!wide.intersects(&tall));
}

// ============================================================================
// Helpers
// ============================================================================

#[test]
fn test_edges_and_center() {
    let b = AABB::new(2.0, 4.0, 6.0, 8.0);
    assert_eq!(b.right(), 8.0);
    assert_eq!(b.bottom(), 12.0);
    assert_eq!(b.center(), Vec2::new(5.0, 8.0));
    assert_eq!(b.min(), Vec2::new(2.0, 4.0));
    assert_eq!(b.max(), Vec2::new(8.0, 12.0));
}

#[test]
fn test_contains_point_half_open() {
    let b = AABB::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.contains_point(Vec2::new(0.0, 0.0)));
    assert!(b.contains_point(Vec2::new(9.99, 5.0)));
    assert!(!b.contains_point(Vec2::new(10.0, 5.0)));
    assert!(!b.contains_point(Vec2::new(5.0, -0.1)));
}

#[test]
fn test_union() {
    let a = AABB::new(0.0, 0.0, 10.0, 10.0);
    let b = AABB::new(20.0, -5.0, 5.0, 5.0);
    assert_eq!(a.union(&b), AABB::new(0.0, -5.0, 25.0, 15.0));
}

#[test]
fn test_expanded() {
    let b = AABB::new(10.0, 10.0, 4.0, 4.0);
    assert_eq!(b.expanded(Vec2::new(1.0, 2.0)), AABB::new(9.0, 8.0, 6.0, 8.0));
}

#[test]
fn test_from_origin_size() {
    let b = AABB::from_origin_size(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
    assert_eq!(b, AABB::new(1.0, 2.0, 3.0, 4.0));
}
