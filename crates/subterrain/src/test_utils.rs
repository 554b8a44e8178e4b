//! Test utilities shared by the orchestrator tests.
//!
//! Fixtures for small and default sized volumes plus snapshots of the field
//! that can be compared across dig orders.

use std::collections::HashMap;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SubterrainConfig;
use crate::octree::CubeNode;
use crate::{Subterrain, SubterrainModel};

/// Bit-exact key for a position.
pub type PositionKey = [u32; 3];

#[inline]
pub fn position_key(p: Vec3) -> PositionKey {
  p.to_array().map(f32::to_bits)
}

// =============================================================================
// Fixtures
// =============================================================================

/// 16 unit volume, 0.5 resolution: depth 5, bounds [-8, -16, -8] .. [8, 0, 8].
pub fn small_config() -> SubterrainConfig {
  SubterrainConfig::new()
    .with_isosurface_resolution(0.5)
    .with_volume_size(16.0)
}

pub fn small_subterrain() -> Subterrain {
  Subterrain::new(small_config()).unwrap()
}

/// 200 unit volume, 0.5 resolution: depth 9, 256 unit bounds.
pub fn default_subterrain() -> Subterrain {
  Subterrain::new(SubterrainConfig::default()).unwrap()
}

/// Random digs inside the small volume, reproducible per seed.
pub fn random_digs(seed: u64, count: usize) -> Vec<(Vec3, f32)> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|_| {
      let center = Vec3::new(
        rng.random_range(-7.0..7.0),
        rng.random_range(-15.0..-1.0),
        rng.random_range(-7.0..7.0),
      );
      (center, rng.random_range(0.25..3.0))
    })
    .collect()
}

// =============================================================================
// Field snapshots
// =============================================================================

/// Samples of every max-depth leaf, keyed by the leaf's min corner.
pub fn leaf_samples(root: &CubeNode) -> HashMap<PositionKey, [f32; 8]> {
  let mut samples = HashMap::new();
  root.visit_all_leaves(&mut |leaf| {
    if leaf.is_max_depth_leaf() {
      samples.insert(position_key(leaf.bounds().min), *leaf.samples());
    }
  });
  samples
}

/// Every sample reported at each corner position by the max-depth leaves
/// that share it.
pub fn corner_samples(root: &CubeNode) -> HashMap<PositionKey, Vec<f32>> {
  let mut corners: HashMap<PositionKey, Vec<f32>> = HashMap::new();
  root.visit_all_leaves(&mut |leaf| {
    if leaf.is_max_depth_leaf() {
      for (corner, &sample) in leaf.corners().iter().zip(leaf.samples()) {
        corners.entry(position_key(*corner)).or_default().push(sample);
      }
    }
  });
  corners
}

// =============================================================================
// Model helpers
// =============================================================================

pub fn model_positions(model: &SubterrainModel) -> Vec<Vec3> {
  model
    .vertices()
    .iter()
    .map(|v| Vec3::from_array(v.position))
    .collect()
}

/// Emitted triangles as position triples.
pub fn model_triangles(model: &SubterrainModel) -> Vec<[Vec3; 3]> {
  model_positions(model)
    .chunks_exact(3)
    .map(|t| [t[0], t[1], t[2]])
    .collect()
}
