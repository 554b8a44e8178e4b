use glam::Vec3;

use super::*;
use crate::half_edge::HalfEdgeMesh;

fn welded(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> WeldedMesh {
  WeldedMesh {
    positions,
    triangles,
    merged: 0,
  }
}

fn normal_of(vertex: &SubterrainVertex) -> Vec3 {
  Vec3::from_array(vertex.normal)
}

#[test]
fn test_face_normal_is_unnormalized() {
  let n = face_normal(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
  assert_eq!(n, Vec3::new(0.0, 0.0, 6.0));
}

#[test]
fn test_single_triangle_stream() {
  let mesh = welded(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]]);
  let out = finalize(&mesh).unwrap();

  assert_eq!(out.triangle_count, 1);
  assert_eq!(out.index_count().unwrap(), 3);
  assert_eq!(out.vertices.len(), 3);

  let expected_positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
  for (i, vertex) in out.vertices.iter().enumerate() {
    assert_eq!(vertex.position, expected_positions[i]);
    assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
    assert_eq!(vertex.barycentric, BARYCENTRIC_CORNERS[i]);
  }
}

#[test]
fn test_shared_vertex_normals_are_area_weighted() {
  // Two faces folded along the x axis: one facing +z, a larger one facing +y
  let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(0.0, 0.0, 2.0)];
  let mesh = welded(positions, vec![[0, 1, 2], [1, 0, 3]]);
  let out = finalize(&mesh).unwrap();

  // Shared vertices average (0,0,1) and (0,2,0)
  let expected = Vec3::new(0.0, 2.0, 1.0).normalize();
  let shared = normal_of(&out.vertices[0]);
  assert!((shared - expected).length() < 1e-6, "got {}", shared);

  // Unshared vertices keep their own face direction
  assert!((normal_of(&out.vertices[2]) - Vec3::Z).length() < 1e-6);
  assert!((normal_of(&out.vertices[5]) - Vec3::Y).length() < 1e-6);
}

#[test]
fn test_closed_mesh_normals_point_outward() {
  let positions = vec![
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
  ];
  let triangles = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
  let out = finalize(&welded(positions, triangles)).unwrap();

  let centroid = Vec3::splat(0.25);
  assert_eq!(out.vertices.len(), 12);
  for vertex in &out.vertices {
    let p = Vec3::from_array(vertex.position);
    let n = normal_of(vertex);
    assert!((n.length() - 1.0).abs() < 1e-5);
    assert!(n.dot(p - centroid) > 0.0, "normal {} at {} points inward", n, p);
  }
}

#[test]
fn test_ring_normals_match_direct_accumulation() {
  // Fan of four triangles around the origin, tilted up at the rim
  let positions = vec![
    Vec3::ZERO,
    Vec3::new(1.0, 0.2, 0.0),
    Vec3::new(0.0, 0.1, 1.0),
    Vec3::new(-1.0, 0.3, 0.0),
    Vec3::new(0.0, 0.0, -1.0),
  ];
  let triangles = vec![[0, 2, 1], [0, 3, 2], [0, 4, 3], [0, 1, 4]];
  let half_edge = HalfEdgeMesh::build(&positions, &triangles).unwrap();
  let faces = face_normals(&half_edge);
  let normals = vertex_normals(&half_edge, &faces);

  for (v, &normal) in normals.iter().enumerate() {
    let direct: Vec3 = triangles
      .iter()
      .zip(&faces)
      .filter(|(tri, _)| tri.contains(&(v as u32)))
      .map(|(_, &n)| n)
      .sum();
    assert!((normal - direct.normalize()).length() < 1e-6, "vertex {}", v);
  }
}

#[test]
fn test_degenerate_triangles_are_not_emitted() {
  let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
  let mesh = welded(positions, vec![[0, 0, 1], [0, 1, 2], [2, 1, 1]]);
  let out = finalize(&mesh).unwrap();

  assert_eq!(out.triangle_count, 1);
  assert_eq!(out.vertices.len(), 3);
  assert_eq!(out.index_count().unwrap(), 3);
}

#[test]
fn test_cancelling_faces_fall_back_to_face_normal() {
  // Same triangle wound both ways: every vertex normal sums to zero
  let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
  let mesh = welded(positions, vec![[0, 1, 2], [0, 2, 1]]);
  let out = finalize(&mesh).unwrap();

  assert_eq!(out.vertices.len(), 6);
  for vertex in &out.vertices[..3] {
    assert_eq!(normal_of(vertex), Vec3::Z);
  }
  for vertex in &out.vertices[3..] {
    assert_eq!(normal_of(vertex), Vec3::NEG_Z);
  }
}

#[test]
fn test_empty_mesh() {
  let out = finalize(&WeldedMesh::default()).unwrap();

  assert!(out.vertices.is_empty());
  assert_eq!(out.triangle_count, 0);
  assert_eq!(out.index_count().unwrap(), 0);
}

#[test]
fn test_non_finite_position_is_an_error() {
  let positions = vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Y];
  let result = finalize(&welded(positions, vec![[0, 1, 2]]));

  assert!(matches!(
    result,
    Err(MeshError::NonFiniteVertex {
      attribute: "position",
      index: 1
    })
  ));
}
