//! Marching cubes polygonizer.
//!
//! Converts one cube (8 corner positions + 8 field samples) into a small
//! triangle soup. The function is pure: it knows nothing about neighbouring
//! cubes, so leaves can be polygonized in any order or in parallel.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  corners: [Vec3; 8]   samples: [f32; 8]                         │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!   cube index = bit i set if samples[i] > 0 (corner inside a cavity)
//!   early-out if homogeneous (index == 0 or index == 255)
//!                               │
//!                               ▼
//!   for each crossing edge: interpolate the zero crossing
//!   (evaluated from the edge's lower corner, see below)
//!                               │
//!                               ▼
//!   TRI_TABLE[index] → up to 5 triangles over the local vertices
//! ```
//!
//! Two cubes sharing an edge see that edge with opposite corner order (edge
//! 0 of one cube is edge 2 of the cube below it). Interpolation always starts
//! at the corner with the smaller coordinates, so both cubes produce the
//! same bit pattern for the shared vertex and welding stays exact.

pub mod tables;

use glam::Vec3;
use smallvec::SmallVec;

use crate::octree::CubeNode;
use tables::{CORNER_UNIT_OFFSETS, EDGE_CORNERS, EDGE_TABLE, MAX_CUBE_TRIANGLES, TRI_TABLE};

/// Triangle soup produced by a single cube.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CubePolygon {
  /// Local vertices, one per crossing edge, in ascending edge order.
  pub vertices: SmallVec<[Vec3; 12]>,
  /// Triangles as index triples into `vertices`.
  pub triangles: SmallVec<[[u8; 3]; MAX_CUBE_TRIANGLES]>,
}

impl CubePolygon {
  /// Returns true if the cube produced no geometry.
  pub fn is_empty(&self) -> bool {
    self.triangles.is_empty()
  }

  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }
}

/// Build the 8-bit cube index: bit `i` is set when corner `i` is dug out.
#[inline]
pub fn cube_index(samples: &[f32; 8]) -> u8 {
  samples
    .iter()
    .enumerate()
    .fold(0u8, |mask, (i, &s)| if s > 0.0 { mask | (1 << i) } else { mask })
}

/// Polygonize a cube given its corners and samples.
pub fn polygonize(corners: &[Vec3; 8], samples: &[f32; 8]) -> CubePolygon {
  let index = cube_index(samples) as usize;
  let edge_mask = EDGE_TABLE[index];

  let mut polygon = CubePolygon::default();
  if edge_mask == 0 {
    return polygon;
  }

  // Local vertex slot per edge
  let mut edge_vertex = [u8::MAX; 12];
  for (edge, slot) in edge_vertex.iter_mut().enumerate() {
    if edge_mask & (1 << edge) == 0 {
      continue;
    }

    let [mut a, mut b] = EDGE_CORNERS[edge].map(usize::from);
    if corner_rank(b) < corner_rank(a) {
      std::mem::swap(&mut a, &mut b);
    }

    *slot = polygon.vertices.len() as u8;
    polygon
      .vertices
      .push(interpolate(corners[a], samples[a], corners[b], samples[b]));
  }

  for tri in TRI_TABLE[index].chunks_exact(3) {
    if tri[0] < 0 {
      break;
    }
    polygon.triangles.push([
      edge_vertex[tri[0] as usize],
      edge_vertex[tri[1] as usize],
      edge_vertex[tri[2] as usize],
    ]);
  }

  polygon
}

/// Polygonize an octree leaf.
#[inline]
pub fn polygonize_node(node: &CubeNode) -> CubePolygon {
  polygonize(node.corners(), node.samples())
}

/// Position of the zero crossing between two corners on opposite sides.
///
/// Undug corners (-inf) sit infinitely far from the surface, so the crossing
/// snaps onto the other corner.
#[inline]
fn interpolate(p0: Vec3, s0: f32, p1: Vec3, s1: f32) -> Vec3 {
  match (s0.is_finite(), s1.is_finite()) {
    (true, true) => {
      let t = (s0 / (s0 - s1)).clamp(0.0, 1.0);
      p0 + (p1 - p0) * t
    }
    (true, false) => p0,
    _ => p1,
  }
}

/// Sum of a corner's unit offsets; along any edge the lower corner has the
/// smaller rank.
#[inline]
fn corner_rank(corner: usize) -> u8 {
  let [x, y, z] = CORNER_UNIT_OFFSETS[corner];
  x + y + z
}
