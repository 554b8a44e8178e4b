//! Octree of marching cubes.
//!
//! The tree is explicit: every node owns its 8 children and stores the cavity
//! field at its own corners. Only the regions that have been dug are refined
//! to the finest level, everything else stays as coarse undug leaves.
//!
//! ```text
//! Cube Size = volume_size / 2^depth
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `Aabb` - inclusive axis-aligned boxes for nodes and regions
//! - [`node`]: `CubeNode` - the tree itself, subdivision and leaf traversal

pub mod bounds;
pub mod node;

// Re-exports
pub use bounds::Aabb;
pub use node::{CubeNode, UNDUG_SAMPLE};
