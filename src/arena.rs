use crate::chunk::ChunkUnit;
use crate::engine::SnapshotEngine;
use crate::error::{Error, Result};
use crate::metadata::ArenaMetadata;
use crate::region::{Region, GRID_EDGE};
use crate::vector::Vector;
use smol_str::SmolStr;
use std::sync::{Arc, Mutex};

/// A registered rectangular volume, partitioned into chunk-grid units.
///
/// Partitioning is 2-D over x/z columns; each unit spans the arena's full
/// height. Units are stored in canonical ZX order (z ascending, then x
/// ascending), which every enumeration uses.
pub struct Arena {
    name: SmolStr,
    region: Region,
    chunks: Vec<Arc<ChunkUnit>>,
    meta: Arc<Mutex<ArenaMetadata>>,
}

impl Arena {
    pub fn new(name: impl Into<SmolStr>, region: Region) -> Result<Self> {
        let name = name.into();
        let size = region.size();
        if size.x() <= 0 || size.y() <= 0 || size.z() <= 0 {
            return Err(Error::InvalidRegion(format!(
                "region size {size} has a non-positive component"
            )));
        }
        if !region.minimum().is_valid() || !region.maximum().is_valid() {
            return Err(Error::InvalidRegion(format!(
                "region {} to {} leaves the world bounds",
                region.minimum(),
                region.maximum()
            )));
        }
        if !region.is_grid_aligned() {
            return Err(Error::InvalidRegion(format!(
                "region at {} with size {} is not aligned to the {GRID_EDGE}-block grid",
                region.minimum(),
                region.size()
            )));
        }
        let mut chunks = Vec::new();
        let min = region.minimum();
        for gz in 0..size.z() / GRID_EDGE {
            for gx in 0..size.x() / GRID_EDGE {
                let unit_min = min.add(Vector::at(gx * GRID_EDGE, 0, gz * GRID_EDGE));
                let unit_size = Vector::at(GRID_EDGE, size.y(), GRID_EDGE);
                let unit = ChunkUnit::new(name.clone(), Region::new(unit_min, unit_size));
                chunks.push(Arc::new(unit));
            }
        }
        chunks.sort_by(|a, b| ChunkUnit::zx_order(a, b));
        let meta = Arc::new(Mutex::new(ArenaMetadata::new(name.clone())));
        Ok(Arena {
            name,
            region,
            chunks,
            meta,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Units in canonical ZX order.
    pub fn chunks(&self) -> &[Arc<ChunkUnit>] {
        &self.chunks
    }

    pub fn metadata(&self) -> Arc<Mutex<ArenaMetadata>> {
        Arc::clone(&self.meta)
    }

    /// Whether every unit has a persisted, verified snapshot.
    pub fn is_analyzed(&self) -> bool {
        self.chunks.iter().all(|c| c.is_analyzed())
    }

    /// Fans capture out to every unit. Units proceed independently.
    pub fn capture_all(&self, engine: &Arc<SnapshotEngine>) {
        log::info!("capturing arena {} ({} chunks)", self.name, self.chunks.len());
        for chunk in &self.chunks {
            engine.analyze_chunk(Arc::clone(chunk), Arc::clone(&self.meta));
        }
    }

    /// Fans revert out to every unit. Units proceed independently.
    pub fn revert_all(&self, engine: &Arc<SnapshotEngine>) {
        log::info!("reverting arena {} ({} chunks)", self.name, self.chunks.len());
        for chunk in &self.chunks {
            engine.revert_chunk(Arc::clone(chunk));
        }
    }

    /// Cancels any in-flight reverts across the arena.
    pub fn cancel_revert_all(&self, engine: &Arc<SnapshotEngine>) {
        for chunk in &self.chunks {
            engine.cancel_revert(chunk);
        }
    }
}
