use glam::Vec3;

use super::*;

fn tetrahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
  let positions = vec![
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
  ];
  // Consistently wound, outward facing
  let triangles = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
  (positions, triangles)
}

/// Every half-edge's symmetric points back at it and starts where it ends.
fn assert_symmetric_pairs(mesh: &HalfEdgeMesh) {
  for (id, edge) in mesh.edges.iter().enumerate() {
    assert_ne!(edge.symmetric, INVALID, "edge {} has no symmetric", id);
    let sym = mesh.edge(edge.symmetric);
    assert_eq!(sym.symmetric as usize, id);
    if edge.next != INVALID {
      assert_eq!(mesh.edge(edge.next).origin, sym.origin);
    }
  }
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn test_single_triangle_gets_boundary_loop() {
  let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
  let mesh = HalfEdgeMesh::build(&positions, &[[0, 1, 2]]).unwrap();

  assert_eq!(mesh.faces.len(), 1);
  assert_eq!(mesh.edges.len(), 6);
  assert_eq!(mesh.boundary_edge_count(), 3);
  assert_symmetric_pairs(&mesh);

  // Boundary twins form one closed loop
  for id in 3..6u32 {
    let edge = mesh.edge(id);
    assert!(mesh.is_boundary(id));
    assert_ne!(edge.next, INVALID);
    assert_eq!(mesh.edge(edge.next).previous, id);
    assert!(mesh.is_boundary(edge.next));
  }
}

#[test]
fn test_closed_mesh_has_no_boundary() {
  let (positions, triangles) = tetrahedron();
  let mesh = HalfEdgeMesh::build(&positions, &triangles).unwrap();

  assert_eq!(mesh.faces.len(), 4);
  assert_eq!(mesh.edges.len(), 12);
  assert_eq!(mesh.boundary_edge_count(), 0);
  assert_symmetric_pairs(&mesh);
}

#[test]
fn test_face_vertices_keep_winding() {
  let (positions, triangles) = tetrahedron();
  let mesh = HalfEdgeMesh::build(&positions, &triangles).unwrap();

  for (face, tri) in triangles.iter().enumerate() {
    assert_eq!(mesh.face_vertices(face as FaceId), *tri);
    assert_eq!(mesh.faces[face].triangle, face);
  }
}

#[test]
fn test_degenerate_triangles_are_skipped() {
  let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
  let triangles = [[0, 1, 1], [0, 1, 2], [2, 2, 2]];
  let mesh = HalfEdgeMesh::build(&positions, &triangles).unwrap();

  assert_eq!(mesh.faces.len(), 1);
  assert_eq!(mesh.faces[0].triangle, 1);
  assert!(is_degenerate([0, 1, 1]));
  assert!(!is_degenerate([0, 1, 2]));
}

#[test]
fn test_non_manifold_edge_does_not_break_pairing() {
  // Three triangles fanning off the edge 0-1
  let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z, Vec3::NEG_Y];
  let triangles = [[0, 1, 2], [1, 0, 3], [1, 0, 4]];
  let mesh = HalfEdgeMesh::build(&positions, &triangles).unwrap();

  assert_eq!(mesh.faces.len(), 3);
  assert_symmetric_pairs(&mesh);

  // Every ring walk terminates
  for v in 0..positions.len() as VertexId {
    let ring = mesh.vertex_ring(v);
    assert!(!ring.is_empty());
    assert!(ring.iter().all(|&e| mesh.edge(e).origin == v));
  }
}

// =========================================================================
// Vertex rings
// =========================================================================

#[test]
fn test_ring_around_closed_vertex() {
  let (positions, triangles) = tetrahedron();
  let mesh = HalfEdgeMesh::build(&positions, &triangles).unwrap();

  for v in 0..4 {
    let ring = mesh.vertex_ring(v);
    assert_eq!(ring.len(), 3, "vertex {} ring", v);
    assert!(ring.iter().all(|&e| mesh.edge(e).origin == v));

    let mut faces: Vec<FaceId> = mesh.vertex_faces(v).collect();
    faces.sort();
    faces.dedup();
    assert_eq!(faces.len(), 3);
  }
}

#[test]
fn test_ring_crosses_boundary() {
  // Two triangles sharing the diagonal of a unit square
  let positions = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
  let triangles = [[0, 1, 2], [0, 2, 3]];
  let mesh = HalfEdgeMesh::build(&positions, &triangles).unwrap();

  assert_eq!(mesh.boundary_edge_count(), 4);

  // Corner on the diagonal touches both faces
  let faces: Vec<FaceId> = mesh.vertex_faces(0).collect();
  assert_eq!(faces.len(), 2);

  // Corner off the diagonal touches one
  let faces: Vec<FaceId> = mesh.vertex_faces(1).collect();
  assert_eq!(faces, vec![0]);
}

#[test]
fn test_unreferenced_vertex_has_empty_ring() {
  let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::splat(5.0)];
  let mesh = HalfEdgeMesh::build(&positions, &[[0, 1, 2]]).unwrap();

  assert_eq!(mesh.vertices[3].edge, INVALID);
  assert!(mesh.vertex_ring(3).is_empty());
}

#[test]
fn test_destination() {
  let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
  let mesh = HalfEdgeMesh::build(&positions, &[[0, 1, 2]]).unwrap();

  assert_eq!(mesh.destination(0), 1);
  assert_eq!(mesh.destination(1), 2);
  assert_eq!(mesh.destination(2), 0);
}
