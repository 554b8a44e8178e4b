use glam::Vec3;

use super::*;

fn unit_tree(max_depth: u32) -> CubeNode {
  CubeNode::new(Aabb::new(Vec3::ZERO, Vec3::splat(8.0)), max_depth)
}

// =========================================================================
// Construction
// =========================================================================

/// Corners follow the marching-cubes order and come straight from the bounds.
#[test]
fn test_corner_order() {
  let node = CubeNode::new(Aabb::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)), 3);
  let c = node.corners();

  assert_eq!(c[0], Vec3::new(1.0, 2.0, 3.0));
  assert_eq!(c[1], Vec3::new(4.0, 2.0, 3.0));
  assert_eq!(c[2], Vec3::new(4.0, 5.0, 3.0));
  assert_eq!(c[3], Vec3::new(1.0, 5.0, 3.0));
  assert_eq!(c[4], Vec3::new(1.0, 2.0, 6.0));
  assert_eq!(c[5], Vec3::new(4.0, 2.0, 6.0));
  assert_eq!(c[6], Vec3::new(4.0, 5.0, 6.0));
  assert_eq!(c[7], Vec3::new(1.0, 5.0, 6.0));
}

/// A fresh node is an undug leaf at depth 0.
#[test]
fn test_new_node_is_undug_leaf() {
  let node = unit_tree(3);

  assert!(node.is_leaf());
  assert_eq!(node.depth(), 0);
  assert_eq!(node.size(), 1);
  assert!(node.samples().iter().all(|&s| s == UNDUG_SAMPLE));
}

// =========================================================================
// subdivide_max
// =========================================================================

/// A region touching one corner refines a single path down to max depth.
#[test]
fn test_subdivide_max_single_path() {
  let mut node = unit_tree(3);
  let region = Aabb::new(Vec3::splat(0.1), Vec3::splat(0.2));

  node.subdivide_max(&region);

  // Root + 8 per level along one path
  assert_eq!(node.size(), 1 + 8 * 3);

  let leaves = node.query_leaves(&region);
  assert_eq!(leaves.len(), 1);
  assert_eq!(leaves[0].depth(), 3);
  assert_eq!(leaves[0].bounds().size(), Vec3::splat(1.0));
}

/// Regions outside the tree leave it untouched.
#[test]
fn test_subdivide_max_outside_region_is_noop() {
  let mut node = unit_tree(3);
  let region = Aabb::new(Vec3::splat(100.0), Vec3::splat(101.0));

  node.subdivide_max(&region);

  assert!(node.is_leaf());
  assert_eq!(node.size(), 1);
}

/// Leaves at the max depth never split.
#[test]
fn test_subdivide_max_stops_at_max_depth() {
  let mut node = unit_tree(0);
  node.subdivide_max(&Aabb::EVERYTHING);

  assert!(node.is_leaf());
  assert!(node.is_max_depth_leaf());
}

/// Refining a whole tree yields 8^depth finest leaves.
#[test]
fn test_subdivide_max_everything() {
  let mut node = unit_tree(2);
  node.subdivide_max(&Aabb::EVERYTHING);

  assert_eq!(node.leaf_count(), 64);
  assert_eq!(node.max_depth_leaf_count(), 64);
  assert_eq!(node.size(), 1 + 8 + 64);
}

/// Repeating the same subdivision changes nothing.
#[test]
fn test_subdivide_max_is_idempotent() {
  let mut node = unit_tree(4);
  let region = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));

  node.subdivide_max(&region);
  let size = node.size();
  node.subdivide_max(&region);

  assert_eq!(node.size(), size);
}

/// Children tile the parent exactly and share the parent's corner.
#[test]
fn test_children_tile_parent() {
  let mut node = unit_tree(1);
  node.subdivide_max(&Aabb::EVERYTHING);

  let children = node.children().expect("root should be split");
  let mut volume = 0.0;
  for (i, child) in children.iter().enumerate() {
    assert_eq!(child.depth(), 1);
    assert_eq!(child.corners()[i], node.corners()[i], "child {} corner", i);
    let size = child.bounds().size();
    volume += size.x * size.y * size.z;
  }

  assert_eq!(volume, 8.0 * 8.0 * 8.0);
}

// =========================================================================
// Traversal
// =========================================================================

/// visit_leaves only reaches leaves overlapping the region.
#[test]
fn test_visit_leaves_respects_region() {
  let mut node = unit_tree(2);
  node.subdivide_max(&Aabb::EVERYTHING);

  // Box strictly inside the first 2x2x2 leaf
  let region = Aabb::new(Vec3::splat(0.5), Vec3::splat(1.5));
  let mut visited = 0;
  node.visit_leaves(&region, &mut |leaf| {
    assert!(leaf.bounds().overlaps(&region));
    visited += 1;
  });

  assert_eq!(visited, 1);
}

/// Touching faces count as overlap.
#[test]
fn test_visit_leaves_includes_touching_neighbours() {
  let mut node = unit_tree(1);
  node.subdivide_max(&Aabb::EVERYTHING);

  // Point on the shared center of all 8 children
  let region = Aabb::new(Vec3::splat(4.0), Vec3::splat(4.0));
  assert_eq!(node.query_leaves(&region).len(), 8);
}

/// Mutations through visit_leaves_mut are visible afterwards.
#[test]
fn test_visit_leaves_mut_writes_samples() {
  let mut node = unit_tree(1);
  node.subdivide_max(&Aabb::EVERYTHING);

  node.visit_leaves_mut(&Aabb::EVERYTHING, &mut |leaf| {
    leaf.samples_mut()[0] = 1.0;
  });

  let mut seen = 0;
  node.visit_all_leaves(&mut |leaf| {
    assert_eq!(leaf.samples()[0], 1.0);
    seen += 1;
  });
  assert_eq!(seen, 8);
}

/// Coarse leaves outside a refined region remain leaves below max depth.
#[test]
fn test_partial_refinement_leaves_mixed_depths() {
  let mut node = unit_tree(3);
  node.subdivide_max(&Aabb::new(Vec3::splat(0.1), Vec3::splat(0.2)));

  let mut depths = Vec::new();
  node.visit_all_leaves(&mut |leaf| depths.push(leaf.depth()));

  assert_eq!(depths.len(), node.leaf_count());
  assert_eq!(depths.iter().filter(|&&d| d == 3).count(), 8);
  assert_eq!(depths.iter().filter(|&&d| d == 1).count(), 7);
  assert_eq!(depths.iter().filter(|&&d| d == 2).count(), 7);
}
