//! Transient half-edge mesh used to find the faces around each vertex.
//!
//! Index-based arena storage. Every triangle side gets one half-edge;
//! sides without an opposite get a boundary twin (no face) so the ring walk
//! around a vertex can cross open borders instead of stopping.
//!
//! ```text
//!            v2
//!           ╱  ╲
//!    prev  ╱    ╲  next          e.symmetric runs v1 → v0
//!         ╱  f   ╲               e.previous.symmetric is the next
//!       v0 ──e──► v1             outgoing half-edge around v0
//! ```

use std::collections::HashMap;

use glam::Vec3;
use smallvec::SmallVec;

use crate::error::MeshError;

pub type HalfEdgeId = u32;
pub type VertexId = u32;
pub type FaceId = u32;

/// No element.
pub const INVALID: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfEdge {
  /// Vertex this half-edge leaves from.
  pub origin: VertexId,
  pub next: HalfEdgeId,
  pub previous: HalfEdgeId,
  /// Opposite half-edge. Always valid once the mesh is built.
  pub symmetric: HalfEdgeId,
  /// `None` for boundary twins.
  pub face: Option<FaceId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfEdgeVertex {
  pub position: Vec3,
  /// One outgoing half-edge, or [`INVALID`] for unreferenced vertices.
  pub edge: HalfEdgeId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfEdgeFace {
  /// Half-edge leaving the triangle's first vertex.
  pub edge: HalfEdgeId,
  /// Index of the source triangle.
  pub triangle: usize,
}

/// Half-edge mesh over a welded triangle list.
#[derive(Clone, Debug, Default)]
pub struct HalfEdgeMesh {
  pub vertices: Vec<HalfEdgeVertex>,
  pub edges: Vec<HalfEdge>,
  pub faces: Vec<HalfEdgeFace>,
}

impl HalfEdgeMesh {
  /// Build the mesh from positions and index triples.
  ///
  /// Triangles repeating a vertex have no area and are left out. When more
  /// than two faces share an undirected edge only the first pair is linked;
  /// the rest get boundary twins.
  pub fn build(positions: &[Vec3], triangles: &[[u32; 3]]) -> Result<Self, MeshError> {
    let count = positions.len();
    if u32::try_from(count).is_err() {
      return Err(MeshError::IndexOverflow { count });
    }

    let mut vertices: Vec<HalfEdgeVertex> = Vec::new();
    vertices.try_reserve_exact(count)?;
    vertices.extend(positions.iter().map(|&position| HalfEdgeVertex {
      position,
      edge: INVALID,
    }));

    let mut edges: Vec<HalfEdge> = Vec::new();
    edges.try_reserve(triangles.len() * 3)?;
    let mut faces: Vec<HalfEdgeFace> = Vec::new();
    faces.try_reserve(triangles.len())?;

    // Directed (from, to) -> half-edge, first insertion wins
    let mut directed: HashMap<(VertexId, VertexId), HalfEdgeId> = HashMap::new();

    for (triangle, &tri) in triangles.iter().enumerate() {
      if is_degenerate(tri) {
        continue;
      }

      let face = faces.len() as FaceId;
      let base = Self::next_edge_id(&edges, 3)?;

      for i in 0..3u32 {
        let from = tri[i as usize];
        let to = tri[((i + 1) % 3) as usize];
        let id = base + i;

        edges.push(HalfEdge {
          origin: from,
          next: base + (i + 1) % 3,
          previous: base + (i + 2) % 3,
          symmetric: INVALID,
          face: Some(face),
        });

        let vertex = &mut vertices[from as usize];
        if vertex.edge == INVALID {
          vertex.edge = id;
        }

        directed.entry((from, to)).or_insert(id);
      }

      faces.push(HalfEdgeFace { edge: base, triangle });
    }

    // Pair symmetric half-edges, giving unmatched sides a boundary twin
    let interior_count = edges.len();
    for id in 0..interior_count {
      if edges[id].symmetric != INVALID {
        continue;
      }

      let from = edges[id].origin;
      let to = edges[edges[id].next as usize].origin;

      let partner = directed
        .get(&(to, from))
        .copied()
        .filter(|&other| edges[other as usize].symmetric == INVALID);

      match partner {
        Some(other) => {
          edges[id].symmetric = other;
          edges[other as usize].symmetric = id as HalfEdgeId;
        }
        None => {
          let twin = Self::next_edge_id(&edges, 1)?;
          edges[id].symmetric = twin;
          edges.push(HalfEdge {
            origin: to,
            next: INVALID,
            previous: INVALID,
            symmetric: id as HalfEdgeId,
            face: None,
          });
        }
      }
    }

    Self::link_boundary_loops(&mut edges, interior_count);

    Ok(Self {
      vertices,
      edges,
      faces,
    })
  }

  fn next_edge_id(edges: &[HalfEdge], reserve: usize) -> Result<HalfEdgeId, MeshError> {
    let count = edges.len() + reserve;
    if count >= INVALID as usize {
      return Err(MeshError::IndexOverflow { count });
    }
    Ok(edges.len() as HalfEdgeId)
  }

  /// Chain boundary twins head to tail around each hole.
  fn link_boundary_loops(edges: &mut [HalfEdge], interior_count: usize) {
    let mut boundary_from: HashMap<VertexId, HalfEdgeId> = HashMap::new();
    for (id, edge) in edges.iter().enumerate().skip(interior_count) {
      boundary_from.entry(edge.origin).or_insert(id as HalfEdgeId);
    }

    for id in interior_count..edges.len() {
      let end = edges[edges[id].symmetric as usize].origin;
      if let Some(&next) = boundary_from.get(&end) {
        if edges[next as usize].previous == INVALID {
          edges[id].next = next;
          edges[next as usize].previous = id as HalfEdgeId;
        }
      }
    }
  }

  #[inline]
  pub fn edge(&self, id: HalfEdgeId) -> &HalfEdge {
    &self.edges[id as usize]
  }

  /// Vertex a half-edge points to.
  #[inline]
  pub fn destination(&self, id: HalfEdgeId) -> VertexId {
    self.edge(self.edge(id).symmetric).origin
  }

  #[inline]
  pub fn is_boundary(&self, id: HalfEdgeId) -> bool {
    self.edge(id).face.is_none()
  }

  pub fn boundary_edge_count(&self) -> usize {
    self.edges.iter().filter(|e| e.face.is_none()).count()
  }

  /// The three vertices of a face in winding order.
  pub fn face_vertices(&self, face: FaceId) -> [VertexId; 3] {
    let ab = self.faces[face as usize].edge;
    let bc = self.edge(ab).next;
    let ca = self.edge(ab).previous;
    [self.edge(ab).origin, self.edge(bc).origin, self.edge(ca).origin]
  }

  /// Outgoing half-edges around a vertex.
  ///
  /// Walks `previous.symmetric` from the vertex's edge until back at the
  /// start. If the walk runs into an unlinked border it restarts the other
  /// way round with `symmetric.next`.
  pub fn vertex_ring(&self, vertex: VertexId) -> SmallVec<[HalfEdgeId; 8]> {
    let mut ring: SmallVec<[HalfEdgeId; 8]> = SmallVec::new();
    let start = self.vertices[vertex as usize].edge;
    if start == INVALID {
      return ring;
    }

    let mut edge = start;
    loop {
      ring.push(edge);
      let previous = self.edge(edge).previous;
      if previous == INVALID {
        self.walk_reverse(start, &mut ring);
        break;
      }

      edge = self.edge(previous).symmetric;
      if edge == start || ring.contains(&edge) {
        break;
      }
    }

    ring
  }

  fn walk_reverse(&self, start: HalfEdgeId, ring: &mut SmallVec<[HalfEdgeId; 8]>) {
    let mut edge = start;
    loop {
      let next = self.edge(self.edge(edge).symmetric).next;
      if next == INVALID || ring.contains(&next) {
        return;
      }
      ring.push(next);
      edge = next;
    }
  }

  /// Faces around a vertex, in ring order.
  pub fn vertex_faces(&self, vertex: VertexId) -> impl Iterator<Item = FaceId> + '_ {
    self
      .vertex_ring(vertex)
      .into_iter()
      .filter_map(move |edge| self.edge(edge).face)
  }
}

/// True if a triangle repeats a vertex index.
#[inline]
pub fn is_degenerate([a, b, c]: [u32; 3]) -> bool {
  a == b || b == c || c == a
}

#[cfg(test)]
#[path = "half_edge_test.rs"]
mod half_edge_test;
