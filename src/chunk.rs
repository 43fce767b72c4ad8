use crate::metadata::ChunkMetadata;
use crate::region::Region;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering as AtomicOrdering};
use std::sync::Mutex;

/// Stable identifier of a chunk unit, also its persistence key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkId(SmolStr);

impl ChunkId {
    pub fn new(arena: &str, grid_x: i32, grid_z: i32) -> Self {
        ChunkId(SmolStr::new(format!("{arena}_{grid_x}_{grid_z}")))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Operation token for one chunk unit. At most one capture or revert runs
/// per unit at a time; transitions go through compare-and-swap only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChunkState {
    Idle = 0,
    Capturing = 1,
    Reverting = 2,
}

impl ChunkState {
    fn from_u8(raw: u8) -> ChunkState {
        match raw {
            1 => ChunkState::Capturing,
            2 => ChunkState::Reverting,
            _ => ChunkState::Idle,
        }
    }
}

/// A chunk-grid-aligned sub-unit of an arena.
///
/// Holds the unit's extent, its snapshot metadata, and the state token
/// gating concurrent operations. The owning arena is referenced by name
/// only; the arena aggregate owns the unit, never the other way around.
pub struct ChunkUnit {
    id: ChunkId,
    arena: SmolStr,
    region: Region,
    grid_x: i32,
    grid_z: i32,
    state: AtomicU8,
    meta: Mutex<ChunkMetadata>,
}

impl ChunkUnit {
    pub fn new(arena: impl Into<SmolStr>, region: Region) -> Self {
        let arena = arena.into();
        let grid_x = region.grid_x();
        let grid_z = region.grid_z();
        let id = ChunkId::new(&arena, grid_x, grid_z);
        let meta = ChunkMetadata::new(id.clone(), region.size());
        ChunkUnit {
            id,
            arena,
            region,
            grid_x,
            grid_z,
            state: AtomicU8::new(ChunkState::Idle as u8),
            meta: Mutex::new(meta),
        }
    }

    pub fn id(&self) -> &ChunkId {
        &self.id
    }

    pub fn arena(&self) -> &str {
        &self.arena
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn grid_x(&self) -> i32 {
        self.grid_x
    }

    pub fn grid_z(&self) -> i32 {
        self.grid_z
    }

    pub fn state(&self) -> ChunkState {
        ChunkState::from_u8(self.state.load(AtomicOrdering::Acquire))
    }

    /// Claims the unit for an operation. Fails when any operation is
    /// already in flight.
    pub fn try_begin(&self, target: ChunkState) -> bool {
        self.state
            .compare_exchange(
                ChunkState::Idle as u8,
                target as u8,
                AtomicOrdering::AcqRel,
                AtomicOrdering::Acquire,
            )
            .is_ok()
    }

    /// Releases the unit back to idle at the end of an operation.
    pub fn finish(&self) {
        self.state
            .store(ChunkState::Idle as u8, AtomicOrdering::Release);
    }

    pub fn is_reverting(&self) -> bool {
        self.state() == ChunkState::Reverting
    }

    /// Cooperative cancellation: clears an in-flight revert. The next
    /// scheduled batch observes the token and stops, so cancellation takes
    /// effect within one tick and never interrupts a running batch.
    pub fn cancel_revert(&self) {
        let _ = self.state.compare_exchange(
            ChunkState::Reverting as u8,
            ChunkState::Idle as u8,
            AtomicOrdering::AcqRel,
            AtomicOrdering::Acquire,
        );
    }

    pub fn is_analyzed(&self) -> bool {
        self.meta.lock().unwrap().is_analyzed()
    }

    pub fn metadata(&self) -> ChunkMetadata {
        self.meta.lock().unwrap().clone()
    }

    pub(crate) fn record_hash(&self, hash: String) {
        self.meta.lock().unwrap().hash = hash;
    }

    pub(crate) fn clear_hash(&self) {
        self.meta.lock().unwrap().hash.clear();
    }

    /// Canonical enumeration order: z ascending, then x ascending.
    pub fn zx_order(a: &ChunkUnit, b: &ChunkUnit) -> Ordering {
        a.grid_z
            .cmp(&b.grid_z)
            .then_with(|| a.grid_x.cmp(&b.grid_x))
    }

    /// Iterates the unit's cells in relative coordinates.
    pub fn iter(&self) -> crate::region::RegionIterator {
        self.region.iter()
    }
}

impl fmt::Debug for ChunkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkUnit")
            .field("id", &self.id)
            .field("grid_x", &self.grid_x)
            .field("grid_z", &self.grid_z)
            .field("state", &self.state())
            .finish()
    }
}
