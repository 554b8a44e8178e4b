//! subterrain - Diggable underground terrain as an octree of marching cubes
//!
//! The volume starts solid. Every dig carves a sphere into a cavity field
//! stored at the corners of an octree that is only refined where something
//! was dug. Each update rebuilds one welded, smooth-shaded triangle mesh
//! from the finest leaves and hands it out as a flat interleaved vertex
//! stream ready for upload.
//!
//! # Features
//!
//! - **Sparse field**: undug space stays as a handful of coarse leaves
//! - **Max accumulation**: digs are idempotent and order independent
//! - **Welded surface**: shared vertices across cubes, half-edge smooth normals
//! - **Flat stream**: position, normal and barycentric per vertex, two draw
//!   groups over the same range
//! - **Parallel polygonization**: rayon over leaves, output order preserved
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use subterrain::{CavityQueue, Subterrain, SubterrainConfig};
//!
//! let mut subterrain = Subterrain::new(SubterrainConfig::default())?;
//! let mut queue = CavityQueue::new();
//!
//! queue.enqueue(Vec3::new(0.0, -20.0, 0.0), 5.0);
//!
//! if let Some(stats) = subterrain.update(&mut queue)? {
//!   println!("{} triangles", stats.triangles);
//!   upload(subterrain.model().bytes());
//! }
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod finalize;
pub mod half_edge;
pub mod marching_cubes;
pub mod metrics;
pub mod model;
pub mod octree;
pub mod queue;
pub mod subterrain;
pub mod weld;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used items
pub use config::{OctreeGeometry, SubterrainConfig, MAX_SUPPORTED_DEPTH};
pub use error::{ConfigError, DigError, MeshError, SubterrainError};
pub use field::DigReport;
pub use metrics::{RegenerationStats, SubterrainMetrics};
pub use model::{
  DrawGroup, DrawMode, MaterialHandle, SubterrainModel, SubterrainVertex, SUBTERRAIN_VERTEX_LAYOUT,
};
pub use octree::{Aabb, CubeNode};
pub use queue::{CavityQueue, CavityRequest};
pub use subterrain::Subterrain;
