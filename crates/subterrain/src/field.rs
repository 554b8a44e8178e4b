//! Cavity field accumulation.
//!
//! Every octree corner stores an approximation of the signed distance into
//! the union of all dug spheres (positive = inside a cavity). A dig raises
//! the samples near the sphere and never lowers any:
//!
//! ```text
//!   sample[c] = max(sample[c], radius - |c - center|)
//! ```
//!
//! Because `max` is commutative, associative and idempotent, the order in
//! which digs arrive does not matter and repeating a dig changes nothing.

use glam::Vec3;

use crate::error::DigError;
use crate::octree::{Aabb, CubeNode};

/// Summary of a single dig.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DigReport {
  /// Padded region that was refined and updated.
  pub region: Aabb,
  /// Leaves whose corners were updated.
  pub leaves_touched: usize,
}

/// Reject radii and centers that would poison the field.
pub fn validate_dig(center: Vec3, radius: f32) -> Result<(), DigError> {
  if !center.is_finite() {
    return Err(DigError::NonFiniteCenter {
      x: center.x,
      y: center.y,
      z: center.z,
    });
  }

  if !(radius.is_finite() && radius >= 0.0) {
    return Err(DigError::InvalidRadius { radius });
  }

  Ok(())
}

/// Region affected by a dig: `center ± (radius + resolution)`. The extra
/// resolution catches cubes straddling the sphere's surface.
#[inline]
pub fn dig_region(center: Vec3, radius: f32, resolution: f32) -> Aabb {
  Aabb::around_sphere(center, radius, resolution)
}

/// Carve a sphere into the field.
///
/// Refines every node overlapping the region to the max depth, then raises
/// the corner samples of all leaves in the region. Digs entirely outside the
/// tree touch nothing.
pub fn dig(
  root: &mut CubeNode,
  center: Vec3,
  radius: f32,
  resolution: f32,
) -> Result<DigReport, DigError> {
  validate_dig(center, radius)?;

  let region = dig_region(center, radius, resolution);
  root.subdivide_max(&region);

  let mut leaves_touched = 0;
  root.visit_leaves_mut(&region, &mut |leaf| {
    accumulate(leaf, center, radius);
    leaves_touched += 1;
  });

  Ok(DigReport {
    region,
    leaves_touched,
  })
}

/// Raise one leaf's samples toward the sphere's field.
#[inline]
pub fn accumulate(leaf: &mut CubeNode, center: Vec3, radius: f32) {
  let corners = *leaf.corners();
  for (sample, corner) in leaf.samples_mut().iter_mut().zip(corners) {
    *sample = sample.max(radius - corner.distance(center));
  }
}
