//! Regeneration statistics.
//!
//! Feature-gated and runtime-toggled so collection costs nothing when
//! disabled. Per-pass [`RegenerationStats`] are always returned to the
//! caller; only the rolling history in [`SubterrainMetrics`] is gated.
//!
//! ```ignore
//! use subterrain::metrics::COLLECT_METRICS;
//!
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let avg = subterrain.metrics().avg_regeneration_us();
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity history, oldest values evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn sum(&self) -> u64 {
    self.buffer.iter().sum()
  }

  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128)
  }
}

/// Counters and timings of one regeneration pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegenerationStats {
  /// Digs applied since the previous regeneration.
  pub digs: usize,
  /// Requests dropped as invalid during the same update.
  pub rejected_digs: usize,
  /// Max-depth leaves polygonized.
  pub leaves: usize,
  /// Leaves that produced at least one triangle.
  pub surface_leaves: usize,
  /// Unique vertices after welding.
  pub vertices: usize,
  /// Vertex insertions folded into an existing vertex.
  pub merged: usize,
  /// Triangles emitted to the model.
  pub triangles: usize,
  /// Zero-area triangles left out of the model.
  pub degenerate_triangles: usize,

  pub polygonize_us: u64,
  pub weld_us: u64,
  pub finalize_us: u64,
  pub total_us: u64,
}

/// Rolling statistics kept by a [`Subterrain`](crate::Subterrain).
#[derive(Debug, Clone, Default)]
pub struct SubterrainMetrics {
  /// Whole regeneration times in microseconds.
  pub regeneration_timings: RollingWindow<u64>,
  /// Single dig times in microseconds.
  pub dig_timings: RollingWindow<u64>,
  /// Most recent regeneration.
  pub last: Option<RegenerationStats>,
  pub total_regenerations: u64,
  pub total_digs: u64,
  pub total_rejected_digs: u64,
  pub total_failed_regenerations: u64,
}

impl SubterrainMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_dig(&mut self, timing_us: u64) {
    if is_enabled() {
      self.dig_timings.push(timing_us);
      self.total_digs += 1;
    }
  }

  pub fn record_rejected_dig(&mut self) {
    if is_enabled() {
      self.total_rejected_digs += 1;
    }
  }

  pub fn record_regeneration(&mut self, stats: &RegenerationStats) {
    if is_enabled() {
      self.regeneration_timings.push(stats.total_us);
      self.last = Some(*stats);
      self.total_regenerations += 1;
    }
  }

  pub fn record_failed_regeneration(&mut self) {
    if is_enabled() {
      self.total_failed_regenerations += 1;
    }
  }

  pub fn avg_regeneration_us(&self) -> f64 {
    self.regeneration_timings.average()
  }

  pub fn avg_dig_us(&self) -> f64 {
    self.dig_timings.average()
  }

  /// Reset timing history. Totals are cumulative and kept.
  pub fn reset(&mut self) {
    self.regeneration_timings.clear();
    self.dig_timings.clear();
    self.last = None;
  }
}
