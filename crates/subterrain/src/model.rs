//! Renderable subterrain model.
//!
//! One flat, non-indexed vertex stream shared by two draw groups:
//!
//! ```text
//!   ┌──────────── SubterrainVertex (36 bytes) ────────────┐
//!   │ position [f32; 3] │ normal [f32; 3] │ bary [f32; 3] │
//!   └───────────────────┴─────────────────┴───────────────┘
//!     offset 0            offset 12         offset 24
//!
//!   "inside"  group: material A, triangles, start 0, count = tris × 3
//!   "outside" group: material B, triangles, start 0, count = tris × 3
//! ```
//!
//! Both groups draw the same triangles; they only differ by material.

use bytemuck::{Pod, Zeroable};

use crate::octree::Aabb;

/// Output vertex: position, vertex normal and the barycentric coordinate of
/// the corner within its triangle.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SubterrainVertex {
  pub position: [f32; 3],
  pub normal: [f32; 3],
  pub barycentric: [f32; 3],
}

impl SubterrainVertex {
  /// Floats per vertex.
  pub const COMPONENTS: usize = 9;
  /// Bytes per vertex.
  pub const STRIDE: usize = std::mem::size_of::<SubterrainVertex>();
}

/// Barycentric coordinate of each triangle corner.
pub const BARYCENTRIC_CORNERS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Vertex attribute semantic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
  Position,
  Normal,
  Barycentric,
}

/// Placement of one attribute inside a vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttributeLayout {
  pub attribute: VertexAttribute,
  /// Byte offset from the start of the vertex.
  pub offset: usize,
  /// Number of f32 components.
  pub components: u32,
}

/// Interleaved vertex layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLayout {
  pub attributes: [VertexAttributeLayout; 3],
  pub stride: usize,
}

impl VertexLayout {
  pub fn attribute(&self, attribute: VertexAttribute) -> Option<&VertexAttributeLayout> {
    self.attributes.iter().find(|a| a.attribute == attribute)
  }
}

/// Layout of [`SubterrainVertex`].
pub const SUBTERRAIN_VERTEX_LAYOUT: VertexLayout = VertexLayout {
  attributes: [
    VertexAttributeLayout {
      attribute: VertexAttribute::Position,
      offset: std::mem::offset_of!(SubterrainVertex, position),
      components: 3,
    },
    VertexAttributeLayout {
      attribute: VertexAttribute::Normal,
      offset: std::mem::offset_of!(SubterrainVertex, normal),
      components: 3,
    },
    VertexAttributeLayout {
      attribute: VertexAttribute::Barycentric,
      offset: std::mem::offset_of!(SubterrainVertex, barycentric),
      components: 3,
    },
  ],
  stride: SubterrainVertex::STRIDE,
};

/// Opaque material handle owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawMode {
  #[default]
  Triangles,
}

/// Named range of the vertex buffer drawn with one material.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawGroup {
  pub name: &'static str,
  pub material: Option<MaterialHandle>,
  pub mode: DrawMode,
  pub start_index: u32,
  pub index_count: u32,
}

impl DrawGroup {
  fn new(name: &'static str) -> Self {
    Self {
      name,
      material: None,
      mode: DrawMode::Triangles,
      start_index: 0,
      index_count: 0,
    }
  }
}

pub const INSIDE_GROUP: &str = "inside";
pub const OUTSIDE_GROUP: &str = "outside";

/// Vertex buffer, layout, bounds and draw groups of the subterrain mesh.
#[derive(Clone, Debug)]
pub struct SubterrainModel {
  layout: VertexLayout,
  vertices: Vec<SubterrainVertex>,
  bounds: Aabb,
  groups: [DrawGroup; 2],
}

impl SubterrainModel {
  /// Empty model covering `bounds`.
  pub fn new(bounds: Aabb) -> Self {
    Self {
      layout: SUBTERRAIN_VERTEX_LAYOUT,
      vertices: Vec::new(),
      bounds,
      groups: [DrawGroup::new(INSIDE_GROUP), DrawGroup::new(OUTSIDE_GROUP)],
    }
  }

  #[inline]
  pub fn layout(&self) -> &VertexLayout {
    &self.layout
  }

  #[inline]
  pub fn bounds(&self) -> &Aabb {
    &self.bounds
  }

  #[inline]
  pub fn vertices(&self) -> &[SubterrainVertex] {
    &self.vertices
  }

  /// Vertex buffer as raw bytes for upload.
  pub fn bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.vertices)
  }

  /// Vertex buffer as a flat float stream, 9 floats per vertex.
  pub fn floats(&self) -> &[f32] {
    bytemuck::cast_slice(&self.vertices)
  }

  pub fn vertex_count(&self) -> usize {
    self.vertices.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.vertices.len() / 3
  }

  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  pub fn groups(&self) -> &[DrawGroup] {
    &self.groups
  }

  pub fn group(&self, name: &str) -> Option<&DrawGroup> {
    self.groups.iter().find(|g| g.name == name)
  }

  pub fn inside(&self) -> &DrawGroup {
    &self.groups[0]
  }

  pub fn outside(&self) -> &DrawGroup {
    &self.groups[1]
  }

  pub fn set_materials(&mut self, inside: Option<MaterialHandle>, outside: Option<MaterialHandle>) {
    self.groups[0].material = inside;
    self.groups[1].material = outside;
  }

  /// Swap in a freshly built vertex stream and resize both groups.
  pub(crate) fn replace_vertices(&mut self, vertices: Vec<SubterrainVertex>, index_count: u32) {
    debug_assert_eq!(vertices.len(), index_count as usize);
    for group in &mut self.groups {
      group.index_count = index_count;
    }
    self.vertices = vertices;
  }
}
