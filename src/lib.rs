//! Tick-bounded capture and restore of voxel world volumes.
//!
//! An [`Arena`] is a registered rectangular volume, partitioned into
//! chunk-grid [`ChunkUnit`]s. The [`SnapshotEngine`] captures each unit's
//! block state into a content-verified snapshot and can later revert the
//! unit to it, pacing all world access into bounded per-tick batches so a
//! single-threaded simulation host never stalls. Hosts plug in through the
//! [`World`], [`Scheduler`] and [`SnapshotStore`] traits.

pub mod arena;
pub mod block_state;
pub mod chunk;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod region;
pub mod scheduler;
pub mod snapshot;
pub mod vector;
pub mod volume;
pub mod world;

pub use arena::Arena;
pub use block_state::BlockState;
pub use chunk::{ChunkId, ChunkState, ChunkUnit};
pub use engine::{EngineConfig, SnapshotEngine};
pub use error::{Error, Result};
pub use metadata::{ArenaMetadata, ChunkMetadata, Metadata};
pub use region::{Region, RegionIterator, GRID_EDGE};
pub use scheduler::{AsyncTask, Scheduler, TickTask};
pub use snapshot::{FileStore, MemoryStore, SnapshotStore};
pub use vector::Vector;
pub use volume::VolumeData;
pub use world::World;
