//! Subterrain configuration and the octree geometry derived from it.
//!
//! ```text
//!   volume_size / isosurface_resolution ──► max_depth = ceil(log2(ratio))
//!                                              │
//!                                              ▼
//!   adjusted size = 2^max_depth × resolution   (leaves exactly one
//!                                               resolution wide)
//!                                              │
//!                                              ▼
//!   bounds = [-0.5, -1, -0.5] .. [0.5, 0, 0.5] × adjusted size
//!            (the volume hangs below the ground plane y = 0)
//! ```

use glam::Vec3;

use crate::error::ConfigError;
use crate::octree::Aabb;

/// Deepest octree supported. Beyond this, leaf counts along a single dig
/// and f32 corner precision both become unreasonable.
pub const MAX_SUPPORTED_DEPTH: u32 = 20;

/// Construction-time parameters of a subterrain. Fixed after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct SubterrainConfig {
  /// Edge length of the finest cubes in world units.
  pub isosurface_resolution: f32,

  /// Requested edge length of the whole volume. Rounded up so that the
  /// volume is a power-of-two multiple of the resolution.
  pub volume_size: f32,

  /// Vertices closer than this on every axis are welded together.
  pub weld_epsilon: f32,

  /// Polygonize leaves on the rayon pool. Output is identical either way.
  pub parallel_polygonize: bool,
}

impl Default for SubterrainConfig {
  fn default() -> Self {
    Self {
      isosurface_resolution: 0.5,
      volume_size: 200.0,
      weld_epsilon: 1e-5,
      parallel_polygonize: true,
    }
  }
}

impl SubterrainConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_isosurface_resolution(mut self, resolution: f32) -> Self {
    self.isosurface_resolution = resolution;
    self
  }

  pub fn with_volume_size(mut self, size: f32) -> Self {
    self.volume_size = size;
    self
  }

  pub fn with_weld_epsilon(mut self, epsilon: f32) -> Self {
    self.weld_epsilon = epsilon;
    self
  }

  pub fn with_parallel_polygonize(mut self, parallel: bool) -> Self {
    self.parallel_polygonize = parallel;
    self
  }

  /// Check the parameters and derive the octree geometry.
  pub fn validate(&self) -> Result<OctreeGeometry, ConfigError> {
    let resolution = self.isosurface_resolution;
    if !(resolution.is_finite() && resolution > 0.0) {
      return Err(ConfigError::InvalidResolution { resolution });
    }

    if !(self.volume_size.is_finite() && self.volume_size >= resolution) {
      return Err(ConfigError::VolumeTooSmall {
        volume_size: self.volume_size,
        resolution,
      });
    }

    let epsilon = self.weld_epsilon;
    if !(epsilon.is_finite() && epsilon > 0.0) {
      return Err(ConfigError::InvalidWeldEpsilon { epsilon });
    }

    // Smallest depth whose leaves tile the requested volume
    let ratio = self.volume_size as f64 / resolution as f64;
    let mut max_depth = 0u32;
    while ((1u64 << max_depth) as f64) < ratio {
      max_depth += 1;
      if max_depth > MAX_SUPPORTED_DEPTH {
        return Err(ConfigError::DepthTooLarge {
          depth: max_depth,
          max: MAX_SUPPORTED_DEPTH,
        });
      }
    }

    Ok(OctreeGeometry::new(max_depth, resolution))
  }
}

/// Octree dimensions derived from a validated [`SubterrainConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctreeGeometry {
  pub max_depth: u32,
  pub resolution: f32,
  /// `2^max_depth * resolution`.
  pub adjusted_size: f32,
  pub bounds: Aabb,
}

impl OctreeGeometry {
  fn new(max_depth: u32, resolution: f32) -> Self {
    let adjusted_size = (1u64 << max_depth) as f32 * resolution;
    let bounds = Aabb::new(
      Vec3::new(-0.5, -1.0, -0.5) * adjusted_size,
      Vec3::new(0.5, 0.0, 0.5) * adjusted_size,
    );

    Self {
      max_depth,
      resolution,
      adjusted_size,
      bounds,
    }
  }

  /// Number of finest cubes along one axis.
  #[inline]
  pub fn cubes_per_axis(&self) -> u64 {
    1u64 << self.max_depth
  }
}
