//! Pending dig requests.
//!
//! Enqueue → drain, the same stage shape as the rest of the pipeline: the
//! game side enqueues cavities whenever it likes, and
//! [`Subterrain::update`](crate::Subterrain::update) takes all of them at
//! once. A drained request is gone; nothing is retried.

use glam::Vec3;

/// A spherical cavity to carve out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CavityRequest {
  /// Unique identifier for this request
  pub id: u64,
  /// Sphere center in world units
  pub center: Vec3,
  /// Sphere radius in world units
  pub radius: f32,
}

/// Queue of cavities waiting for the next update.
#[derive(Debug, Default)]
pub struct CavityQueue {
  pending: Vec<CavityRequest>,
  next_id: u64,
}

impl CavityQueue {
  pub fn new() -> Self {
    Self::default()
  }

  /// Enqueue a cavity, returning the assigned ID.
  pub fn enqueue(&mut self, center: Vec3, radius: f32) -> u64 {
    let id = self.next_id;
    self.next_id += 1;

    self.pending.push(CavityRequest { id, center, radius });

    id
  }

  /// Take every pending request, oldest first.
  pub fn drain(&mut self) -> Vec<CavityRequest> {
    std::mem::take(&mut self.pending)
  }

  /// Number of pending requests.
  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pending.is_empty()
  }
}

impl Extend<(Vec3, f32)> for CavityQueue {
  fn extend<I: IntoIterator<Item = (Vec3, f32)>>(&mut self, iter: I) {
    for (center, radius) in iter {
      self.enqueue(center, radius);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_enqueue_assigns_sequential_ids() {
    let mut queue = CavityQueue::new();
    assert!(queue.is_empty());

    assert_eq!(queue.enqueue(Vec3::ZERO, 1.0), 0);
    assert_eq!(queue.enqueue(Vec3::X, 2.0), 1);
    assert_eq!(queue.pending_count(), 2);
  }

  #[test]
  fn test_drain_takes_everything_once() {
    let mut queue = CavityQueue::new();
    queue.extend([(Vec3::ZERO, 1.0), (Vec3::Y, 0.5), (Vec3::Z, 3.0)]);

    let drained = queue.drain();
    assert_eq!(drained.len(), 3);
    let ids: Vec<u64> = drained.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(drained[1].center, Vec3::Y);
    assert_eq!(drained[1].radius, 0.5);

    assert!(queue.is_empty());
    assert!(queue.drain().is_empty());
  }

  #[test]
  fn test_ids_keep_counting_after_drain() {
    let mut queue = CavityQueue::new();
    queue.enqueue(Vec3::ZERO, 1.0);
    queue.drain();

    assert_eq!(queue.enqueue(Vec3::ZERO, 1.0), 1);
  }
}
