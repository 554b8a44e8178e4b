//! Axis-aligned bounding box used for octree nodes and dig regions.

use glam::Vec3;

/// Single-precision axis-aligned bounding box.
///
/// Bounds are inclusive on both ends: boxes that only touch along a face,
/// edge or corner still overlap. Dig regions rely on this so that cubes
/// sharing a face with the padded region are refined and updated as well.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
  /// Minimum corner (inclusive).
  pub min: Vec3,
  /// Maximum corner (inclusive).
  pub max: Vec3,
}

impl Aabb {
  /// Box covering all of space. Used to walk the whole tree.
  pub const EVERYTHING: Self = Self {
    min: Vec3::NEG_INFINITY,
    max: Vec3::INFINITY,
  };

  /// Create a new AABB from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create a new AABB from center and half-extents.
  pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
    Self {
      min: center - half_extents,
      max: center + half_extents,
    }
  }

  /// Box around a sphere, grown by `padding` on every side.
  pub fn around_sphere(center: Vec3, radius: f32, padding: f32) -> Self {
    Self::from_center_half_extents(center, Vec3::splat(radius + padding))
  }

  /// Check if this AABB overlaps with another (touching counts).
  #[inline]
  pub fn overlaps(&self, other: &Aabb) -> bool {
    self.min.x <= other.max.x
      && self.max.x >= other.min.x
      && self.min.y <= other.max.y
      && self.max.y >= other.min.y
      && self.min.z <= other.max.z
      && self.max.z >= other.min.z
  }

  /// Check if this AABB contains a point.
  #[inline]
  pub fn contains_point(&self, point: Vec3) -> bool {
    point.cmpge(self.min).all() && point.cmple(self.max).all()
  }

  /// Grow the box by `amount` on every side.
  #[inline]
  pub fn expanded(&self, amount: f32) -> Self {
    Self {
      min: self.min - Vec3::splat(amount),
      max: self.max + Vec3::splat(amount),
    }
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }
}
