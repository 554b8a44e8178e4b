//! Mesh finalization: welded mesh → flat GPU vertex stream.
//!
//! ```text
//!   WeldedMesh ──► HalfEdgeMesh (degenerate triangles dropped)
//!                      │
//!                      ├─► face normal  = cross(b - a, c - a)   (unnormalized,
//!                      │                  so larger faces weigh more)
//!                      ├─► vertex normal = normalize(Σ ring face normals)
//!                      ▼
//!   per face, per corner: (position, vertex normal, barycentric)
//! ```

use glam::Vec3;

use crate::error::MeshError;
use crate::half_edge::HalfEdgeMesh;
use crate::model::{SubterrainVertex, BARYCENTRIC_CORNERS};
use crate::weld::WeldedMesh;

/// Vertex stream ready to be swapped into the model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FinalizedMesh {
  pub vertices: Vec<SubterrainVertex>,
  /// Triangles emitted; degenerate input triangles are not counted.
  pub triangle_count: usize,
}

impl FinalizedMesh {
  /// Index count of each draw group.
  pub fn index_count(&self) -> Result<u32, MeshError> {
    let count = self.triangle_count * 3;
    u32::try_from(count).map_err(|_| MeshError::IndexOverflow { count })
  }
}

/// Unnormalized normal of triangle `a, b, c`.
#[inline]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
  (b - a).cross(c - a)
}

/// One unnormalized normal per half-edge face.
pub fn face_normals(mesh: &HalfEdgeMesh) -> Vec<Vec3> {
  (0..mesh.faces.len() as u32)
    .map(|face| {
      let [a, b, c] = mesh.face_vertices(face);
      face_normal(
        mesh.vertices[a as usize].position,
        mesh.vertices[b as usize].position,
        mesh.vertices[c as usize].position,
      )
    })
    .collect()
}

/// Normalized sum of the face normals around each vertex. Vertices without
/// faces, or whose faces cancel out, get a zero normal.
pub fn vertex_normals(mesh: &HalfEdgeMesh, face_normals: &[Vec3]) -> Vec<Vec3> {
  (0..mesh.vertices.len() as u32)
    .map(|vertex| {
      mesh
        .vertex_faces(vertex)
        .map(|face| face_normals[face as usize])
        .sum::<Vec3>()
        .normalize_or_zero()
    })
    .collect()
}

/// Build the flat vertex stream for a welded mesh.
pub fn finalize(welded: &WeldedMesh) -> Result<FinalizedMesh, MeshError> {
  let mesh = HalfEdgeMesh::build(&welded.positions, &welded.triangles)?;
  let face_normals = face_normals(&mesh);
  let vertex_normals = vertex_normals(&mesh, &face_normals);

  let mut vertices: Vec<SubterrainVertex> = Vec::new();
  vertices.try_reserve_exact(mesh.faces.len() * 3)?;

  for (face, &face_normal) in face_normals.iter().enumerate() {
    let corners = mesh.face_vertices(face as u32);
    for (corner, &vertex) in corners.iter().enumerate() {
      let position = mesh.vertices[vertex as usize].position;
      let mut normal = vertex_normals[vertex as usize];
      if normal == Vec3::ZERO {
        normal = face_normal.normalize_or_zero();
      }

      let index = vertices.len();
      if !position.is_finite() {
        return Err(MeshError::NonFiniteVertex {
          attribute: "position",
          index,
        });
      }
      if !normal.is_finite() {
        return Err(MeshError::NonFiniteVertex {
          attribute: "normal",
          index,
        });
      }

      vertices.push(SubterrainVertex {
        position: position.to_array(),
        normal: normal.to_array(),
        barycentric: BARYCENTRIC_CORNERS[corner],
      });
    }
  }

  Ok(FinalizedMesh {
    triangle_count: mesh.faces.len(),
    vertices,
  })
}

#[cfg(test)]
#[path = "finalize_test.rs"]
mod finalize_test;
