//! Error types.

use std::collections::TryReserveError;

/// Invalid [`SubterrainConfig`](crate::SubterrainConfig).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
  #[error("isosurface resolution must be positive and finite, got {resolution}")]
  InvalidResolution { resolution: f32 },

  #[error("volume size {volume_size} must be finite and at least one cube ({resolution})")]
  VolumeTooSmall { volume_size: f32, resolution: f32 },

  #[error("weld epsilon must be positive and finite, got {epsilon}")]
  InvalidWeldEpsilon { epsilon: f32 },

  #[error("octree depth {depth} exceeds the supported maximum of {max}")]
  DepthTooLarge { depth: u32, max: u32 },
}

/// Rejected dig request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DigError {
  #[error("dig radius must be finite and non-negative, got {radius}")]
  InvalidRadius { radius: f32 },

  #[error("dig center must be finite, got ({x}, {y}, {z})")]
  NonFiniteCenter { x: f32, y: f32, z: f32 },
}

/// Failure while building the mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
  #[error("vertex count {count} does not fit a u32 index")]
  IndexOverflow { count: usize },

  #[error("mesh buffer allocation failed: {0}")]
  Allocation(#[from] TryReserveError),

  #[error("non-finite {attribute} on vertex {index}")]
  NonFiniteVertex { attribute: &'static str, index: usize },
}

/// Top-level error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubterrainError {
  #[error("invalid configuration: {0}")]
  Config(#[from] ConfigError),

  #[error("invalid dig: {0}")]
  Dig(#[from] DigError),

  #[error("mesh regeneration failed: {0}")]
  Mesh(#[from] MeshError),
}
