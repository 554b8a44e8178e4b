//! CubeNode - owned octree of marching cubes.
//!
//! Each node is an axis-aligned cube carrying its 8 corner positions and the
//! cavity field sampled at those corners. A node is either a leaf or owns
//! exactly 8 children; dropping a node drops its whole subtree.
//!
//! ```text
//!       7──────6         Corners:
//!      /│     /│           0=(min,min,min)  1=(max,min,min)
//!     4─┼────5 │           2=(max,max,min)  3=(min,max,min)
//!     │ 3────┼─2           4=(min,min,max)  5=(max,min,max)
//!     │/     │/            6=(max,max,max)  7=(min,max,max)
//!     0──────1
//! ```
//!
//! Child `i` spans the box between corner `i` and the parent's center, so
//! child `i` shares corner `i` with its parent.

use glam::Vec3;

use super::Aabb;
use crate::marching_cubes::tables::CORNER_UNIT_OFFSETS;

/// Sample value of a corner that no dig has reached yet.
pub const UNDUG_SAMPLE: f32 = f32::NEG_INFINITY;

/// Octree node holding one marching cube.
#[derive(Debug)]
pub struct CubeNode {
  bounds: Aabb,
  corners: [Vec3; 8],
  samples: [f32; 8],
  children: Option<Box<[CubeNode; 8]>>,
  depth: u32,
  max_depth: u32,
}

impl CubeNode {
  /// Create a root node covering `bounds`.
  pub fn new(bounds: Aabb, max_depth: u32) -> Self {
    Self::with_depth(bounds, max_depth, 0)
  }

  fn with_depth(bounds: Aabb, max_depth: u32, depth: u32) -> Self {
    Self {
      bounds,
      corners: std::array::from_fn(|i| corner_position(&bounds, i)),
      samples: [UNDUG_SAMPLE; 8],
      children: None,
      depth,
      max_depth,
    }
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  #[inline]
  pub fn bounds(&self) -> &Aabb {
    &self.bounds
  }

  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  #[inline]
  pub fn max_depth(&self) -> u32 {
    self.max_depth
  }

  /// True for leaves at the finest level - the only cubes that get meshed.
  #[inline]
  pub fn is_max_depth_leaf(&self) -> bool {
    self.is_leaf() && self.depth == self.max_depth
  }

  /// Corner world positions, in marching-cubes corner order.
  #[inline]
  pub fn corners(&self) -> &[Vec3; 8] {
    &self.corners
  }

  /// Field samples at the corners.
  #[inline]
  pub fn samples(&self) -> &[f32; 8] {
    &self.samples
  }

  #[inline]
  pub fn samples_mut(&mut self) -> &mut [f32; 8] {
    &mut self.samples
  }

  pub fn children(&self) -> Option<&[CubeNode; 8]> {
    self.children.as_deref()
  }

  /// Subdivide every node overlapping `region` down to the max depth.
  ///
  /// Nodes that are already split are only refined further where they
  /// overlap the region. New children start undug.
  pub fn subdivide_max(&mut self, region: &Aabb) {
    if self.depth == self.max_depth || !self.bounds.overlaps(region) {
      return;
    }

    if self.is_leaf() {
      self.subdivide();
    }

    if let Some(children) = self.children.as_deref_mut() {
      for child in children.iter_mut() {
        child.subdivide_max(region);
      }
    }
  }

  fn subdivide(&mut self) {
    let center = self.bounds.center();
    let depth = self.depth + 1;
    let max_depth = self.max_depth;
    let corners = self.corners;

    let children: [CubeNode; 8] = std::array::from_fn(|i| {
      let bounds = Aabb::new(corners[i].min(center), corners[i].max(center));
      CubeNode::with_depth(bounds, max_depth, depth)
    });
    self.children = Some(Box::new(children));
  }

  /// Visit every leaf overlapping `region`, depth first.
  pub fn visit_leaves<F>(&self, region: &Aabb, f: &mut F)
  where
    F: FnMut(&CubeNode),
  {
    if !self.bounds.overlaps(region) {
      return;
    }

    match self.children.as_deref() {
      None => f(self),
      Some(children) => {
        for child in children {
          child.visit_leaves(region, f);
        }
      }
    }
  }

  /// Mutable variant of [`CubeNode::visit_leaves`].
  pub fn visit_leaves_mut<F>(&mut self, region: &Aabb, f: &mut F)
  where
    F: FnMut(&mut CubeNode),
  {
    if !self.bounds.overlaps(region) {
      return;
    }

    if self.is_leaf() {
      f(self);
      return;
    }

    if let Some(children) = self.children.as_deref_mut() {
      for child in children.iter_mut() {
        child.visit_leaves_mut(region, f);
      }
    }
  }

  /// Visit every leaf of the tree.
  pub fn visit_all_leaves<F>(&self, f: &mut F)
  where
    F: FnMut(&CubeNode),
  {
    self.visit_leaves(&Aabb::EVERYTHING, f);
  }

  /// Collect the leaves overlapping `region`, in traversal order.
  pub fn query_leaves(&self, region: &Aabb) -> Vec<&CubeNode> {
    let mut nodes = Vec::new();
    self.collect_leaves(region, &mut nodes);
    nodes
  }

  fn collect_leaves<'a>(&'a self, region: &Aabb, nodes: &mut Vec<&'a CubeNode>) {
    if !self.bounds.overlaps(region) {
      return;
    }

    match self.children.as_deref() {
      None => nodes.push(self),
      Some(children) => {
        for child in children {
          child.collect_leaves(region, nodes);
        }
      }
    }
  }

  /// Total number of nodes in this subtree, including this one.
  pub fn size(&self) -> usize {
    1 + self
      .children
      .as_deref()
      .map_or(0, |children| children.iter().map(CubeNode::size).sum())
  }

  /// Number of leaves in this subtree.
  pub fn leaf_count(&self) -> usize {
    match self.children.as_deref() {
      None => 1,
      Some(children) => children.iter().map(CubeNode::leaf_count).sum(),
    }
  }

  /// Number of leaves at the max depth in this subtree.
  pub fn max_depth_leaf_count(&self) -> usize {
    let mut count = 0;
    self.visit_all_leaves(&mut |leaf| {
      if leaf.is_max_depth_leaf() {
        count += 1;
      }
    });
    count
  }
}

/// Corner `index` of `bounds`, taking coordinates straight from min/max so
/// that cubes sharing a face report bit-identical corner positions.
#[inline]
fn corner_position(bounds: &Aabb, index: usize) -> Vec3 {
  let [ox, oy, oz] = CORNER_UNIT_OFFSETS[index];
  Vec3::new(
    if ox == 0 { bounds.min.x } else { bounds.max.x },
    if oy == 0 { bounds.min.y } else { bounds.max.y },
    if oz == 0 { bounds.min.z } else { bounds.max.z },
  )
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
