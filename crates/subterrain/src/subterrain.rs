//! Regeneration orchestrator.
//!
//! Owns the octree, the only state that persists between updates, and the
//! renderable model rebuilt from it.
//!
//! ```text
//! ┌──────────────┐  drain   ┌──────────────────────────────────────────┐
//! │ CavityQueue  │ ───────► │ dig each request                         │
//! └──────────────┘          │   subdivide_max(region) → max-accumulate │
//!                           └────────────────────┬─────────────────────┘
//!                                                │ ≥ 1 dig applied
//!                                                ▼
//!   max-depth leaves ─► polygonize (rayon, leaf order kept)
//!                    ─► weld (single thread, stable indices)
//!                    ─► finalize (normals, flat stream)
//!                    ─► swap into the model on success only
//! ```
//!
//! A failed regeneration returns the error and leaves the previous model in
//! place.

use glam::Vec3;
use rayon::prelude::*;
use web_time::Instant;

use crate::config::{OctreeGeometry, SubterrainConfig};
use crate::error::{DigError, MeshError, SubterrainError};
use crate::field::{self, DigReport};
use crate::finalize::{self, FinalizedMesh};
use crate::marching_cubes::{polygonize_node, CubePolygon};
use crate::metrics::{RegenerationStats, SubterrainMetrics};
use crate::model::{MaterialHandle, SubterrainModel};
use crate::octree::{Aabb, CubeNode};
use crate::queue::CavityQueue;
use crate::weld::{VertexWelder, WeldedMesh};

/// Underground terrain: cavity field, octree and renderable mesh.
#[derive(Debug)]
pub struct Subterrain {
  config: SubterrainConfig,
  geometry: OctreeGeometry,
  root: CubeNode,
  model: SubterrainModel,
  /// Digs applied since the last successful regeneration.
  dirty_digs: usize,
  metrics: SubterrainMetrics,
}

impl Subterrain {
  /// Validate the configuration and allocate an undug volume.
  pub fn new(config: SubterrainConfig) -> Result<Self, SubterrainError> {
    let geometry = config.validate()?;

    tracing::debug!(
      max_depth = geometry.max_depth,
      adjusted_size = geometry.adjusted_size,
      "subterrain created"
    );

    Ok(Self {
      root: CubeNode::new(geometry.bounds, geometry.max_depth),
      model: SubterrainModel::new(geometry.bounds),
      config,
      geometry,
      dirty_digs: 0,
      metrics: SubterrainMetrics::new(),
    })
  }

  pub fn config(&self) -> &SubterrainConfig {
    &self.config
  }

  pub fn geometry(&self) -> &OctreeGeometry {
    &self.geometry
  }

  pub fn bounds(&self) -> &Aabb {
    &self.geometry.bounds
  }

  /// Root of the cavity octree.
  pub fn octree(&self) -> &CubeNode {
    &self.root
  }

  /// Model built by the last successful regeneration.
  pub fn model(&self) -> &SubterrainModel {
    &self.model
  }

  pub fn metrics(&self) -> &SubterrainMetrics {
    &self.metrics
  }

  /// True if digs were applied since the last successful regeneration.
  pub fn is_dirty(&self) -> bool {
    self.dirty_digs > 0
  }

  pub fn set_materials(&mut self, inside: Option<MaterialHandle>, outside: Option<MaterialHandle>) {
    self.model.set_materials(inside, outside);
  }

  // ===========================================================================
  // Digging
  // ===========================================================================

  /// Carve a sphere into the field without rebuilding the mesh.
  #[tracing::instrument(level = "debug", skip(self), name = "subterrain::dig")]
  pub fn dig(&mut self, center: Vec3, radius: f32) -> Result<DigReport, DigError> {
    let start = Instant::now();
    let report = field::dig(&mut self.root, center, radius, self.geometry.resolution)?;

    self.dirty_digs += 1;
    self.metrics.record_dig(start.elapsed().as_micros() as u64);

    Ok(report)
  }

  /// Apply every queued dig, then rebuild the mesh if any dig was applied.
  ///
  /// Every drained request is consumed, valid or not. Invalid ones are
  /// logged and dropped. Returns `None` when nothing was dug.
  #[tracing::instrument(skip_all, name = "subterrain::update")]
  pub fn update(
    &mut self,
    queue: &mut CavityQueue,
  ) -> Result<Option<RegenerationStats>, SubterrainError> {
    let requests = queue.drain();
    if requests.is_empty() {
      return Ok(None);
    }

    let mut digs = 0;
    let mut rejected = 0;
    for request in requests {
      match self.dig(request.center, request.radius) {
        Ok(_) => digs += 1,
        Err(error) => {
          tracing::warn!(id = request.id, %error, "dropping cavity request");
          self.metrics.record_rejected_dig();
          rejected += 1;
        }
      }
    }

    if digs == 0 {
      return Ok(None);
    }

    let mut stats = self.regenerate()?;
    stats.digs = digs;
    stats.rejected_digs = rejected;
    Ok(Some(stats))
  }

  // ===========================================================================
  // Regeneration
  // ===========================================================================

  /// Rebuild the whole mesh from the current field.
  #[tracing::instrument(skip_all, name = "subterrain::regenerate")]
  pub fn regenerate(&mut self) -> Result<RegenerationStats, MeshError> {
    let digs = self.dirty_digs;
    let built = self.build(digs);
    self.commit(built)
  }

  /// Polygonize every max-depth leaf, in leaf order. Empty cubes are
  /// dropped.
  pub fn polygonize(&self) -> Vec<CubePolygon> {
    let _span = tracing::info_span!("polygonize").entered();

    let mut leaves = self.root.query_leaves(&Aabb::EVERYTHING);
    leaves.retain(|leaf| leaf.is_max_depth_leaf());

    if self.config.parallel_polygonize {
      leaves
        .into_par_iter()
        .map(polygonize_node)
        .filter(|polygon| !polygon.is_empty())
        .collect()
    } else {
      leaves
        .into_iter()
        .map(polygonize_node)
        .filter(|polygon| !polygon.is_empty())
        .collect()
    }
  }

  /// Weld polygons into one indexed mesh.
  pub fn weld(&self, polygons: &[CubePolygon]) -> Result<WeldedMesh, MeshError> {
    let _span = tracing::info_span!("weld").entered();

    let mut welder = VertexWelder::new(self.config.weld_epsilon);
    for polygon in polygons {
      welder.add_polygon(polygon)?;
    }
    Ok(welder.finish())
  }

  fn build(&self, digs: usize) -> Result<(FinalizedMesh, RegenerationStats), MeshError> {
    let start = Instant::now();
    let leaves = self.root.max_depth_leaf_count();

    let polygonize_start = Instant::now();
    let polygons = self.polygonize();
    let polygonize_us = polygonize_start.elapsed().as_micros() as u64;

    let weld_start = Instant::now();
    let welded = self.weld(&polygons)?;
    let weld_us = weld_start.elapsed().as_micros() as u64;

    let finalize_start = Instant::now();
    let mesh = {
      let _span = tracing::info_span!("finalize").entered();
      finalize::finalize(&welded)?
    };
    let finalize_us = finalize_start.elapsed().as_micros() as u64;

    let stats = RegenerationStats {
      digs,
      rejected_digs: 0,
      leaves,
      surface_leaves: polygons.len(),
      vertices: welded.vertex_count(),
      merged: welded.merged,
      triangles: mesh.triangle_count,
      degenerate_triangles: welded.triangle_count() - mesh.triangle_count,
      polygonize_us,
      weld_us,
      finalize_us,
      total_us: start.elapsed().as_micros() as u64,
    };

    Ok((mesh, stats))
  }

  /// Swap a built mesh into the model, or keep the old one on error.
  fn commit(
    &mut self,
    built: Result<(FinalizedMesh, RegenerationStats), MeshError>,
  ) -> Result<RegenerationStats, MeshError> {
    let built = built.and_then(|(mesh, stats)| Ok((mesh.index_count()?, mesh, stats)));
    let (index_count, mesh, stats) = match built {
      Ok(parts) => parts,
      Err(error) => {
        tracing::error!(%error, "subterrain regeneration failed, keeping previous model");
        self.metrics.record_failed_regeneration();
        return Err(error);
      }
    };

    self.model.replace_vertices(mesh.vertices, index_count);
    self.dirty_digs = 0;
    self.metrics.record_regeneration(&stats);

    tracing::debug!(
      digs = stats.digs,
      leaves = stats.leaves,
      vertices = stats.vertices,
      merged = stats.merged,
      triangles = stats.triangles,
      index_count,
      total_us = stats.total_us,
      "subterrain regenerated"
    );

    Ok(stats)
  }
}

#[cfg(test)]
#[path = "subterrain_test.rs"]
mod subterrain_test;
