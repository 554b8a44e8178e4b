//! Vertex welding.
//!
//! Neighbouring cubes emit the same vertex for every edge they share. The
//! welder folds those duplicates into one indexed mesh:
//!
//! ```text
//!   position ──► key = floor(position / epsilon)     (i64 per axis)
//!                   │
//!                   ▼
//!   scan the 27 buckets around key for a vertex within epsilon on every
//!   axis ──► hit: reuse its index (merged += 1)
//!        └─► miss: append, index = insertion order
//! ```
//!
//! Checking the neighbouring buckets catches duplicates that straddle a
//! bucket boundary.

use std::collections::HashMap;

use glam::Vec3;
use smallvec::SmallVec;

use crate::error::MeshError;
use crate::marching_cubes::CubePolygon;

type BucketKey = [i64; 3];

/// Indexed triangle mesh produced by the welder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeldedMesh {
  /// Unique vertex positions; the index is the insertion order.
  pub positions: Vec<Vec3>,
  /// Triangles as global index triples.
  pub triangles: Vec<[u32; 3]>,
  /// Number of inserted vertices that reused an existing one.
  pub merged: usize,
}

impl WeldedMesh {
  #[inline]
  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.triangles.is_empty()
  }
}

/// Epsilon-quantized spatial hash assigning global vertex indices.
#[derive(Debug)]
pub struct VertexWelder {
  epsilon: f32,
  buckets: HashMap<BucketKey, SmallVec<[u32; 2]>>,
  mesh: WeldedMesh,
}

impl VertexWelder {
  pub fn new(epsilon: f32) -> Self {
    debug_assert!(epsilon > 0.0, "weld epsilon must be positive");
    Self {
      epsilon,
      buckets: HashMap::new(),
      mesh: WeldedMesh::default(),
    }
  }

  pub fn epsilon(&self) -> f32 {
    self.epsilon
  }

  /// Insert a position, returning the index of the vertex it welded to.
  pub fn insert(&mut self, position: Vec3) -> Result<u32, MeshError> {
    if !position.is_finite() {
      return Err(MeshError::NonFiniteVertex {
        attribute: "position",
        index: self.mesh.positions.len(),
      });
    }

    let key = self.key(position);
    if let Some(index) = self.find(key, position) {
      self.mesh.merged += 1;
      return Ok(index);
    }

    let count = self.mesh.positions.len();
    let index = u32::try_from(count).map_err(|_| MeshError::IndexOverflow { count })?;
    self.mesh.positions.try_reserve(1)?;
    self.mesh.positions.push(position);
    self.buckets.entry(key).or_default().push(index);

    Ok(index)
  }

  /// Weld one cube's vertices and append its triangles.
  pub fn add_polygon(&mut self, polygon: &CubePolygon) -> Result<(), MeshError> {
    if polygon.is_empty() {
      return Ok(());
    }

    let mut remap: SmallVec<[u32; 12]> = SmallVec::new();
    for &vertex in &polygon.vertices {
      remap.push(self.insert(vertex)?);
    }

    self.mesh.triangles.try_reserve(polygon.triangles.len())?;
    for &[a, b, c] in &polygon.triangles {
      self
        .mesh
        .triangles
        .push([remap[a as usize], remap[b as usize], remap[c as usize]]);
    }

    Ok(())
  }

  /// Finish welding and hand out the mesh.
  pub fn finish(self) -> WeldedMesh {
    self.mesh
  }

  #[inline]
  fn key(&self, position: Vec3) -> BucketKey {
    let scaled = position / self.epsilon;
    [
      scaled.x.floor() as i64,
      scaled.y.floor() as i64,
      scaled.z.floor() as i64,
    ]
  }

  /// Lowest index within epsilon of `position` on every axis.
  fn find(&self, key: BucketKey, position: Vec3) -> Option<u32> {
    let mut best: Option<u32> = None;

    for dx in -1..=1 {
      for dy in -1..=1 {
        for dz in -1..=1 {
          let neighbour = [key[0] + dx, key[1] + dy, key[2] + dz];
          let Some(bucket) = self.buckets.get(&neighbour) else {
            continue;
          };

          for &index in bucket {
            let other = self.mesh.positions[index as usize];
            let close = (other - position).abs().cmple(Vec3::splat(self.epsilon)).all();
            if close && best.map_or(true, |b| index < b) {
              best = Some(index);
            }
          }
        }
      }
    }

    best
  }
}
