use crate::chunk::{ChunkState, ChunkUnit};
use crate::error::{Error, Result};
use crate::metadata::ArenaMetadata;
use crate::region::RegionIterator;
use crate::scheduler::Scheduler;
use crate::snapshot::{self, SnapshotStore};
use crate::volume::VolumeData;
use crate::world::World;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Tuning knobs for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum block reads or writes a single unit performs per tick.
    #[serde(default = "default_max_transactions")]
    pub max_transactions: usize,
}

fn default_max_transactions() -> usize {
    4096
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_transactions: default_max_transactions(),
        }
    }
}

/// Runs the tick-bounded capture and revert state machines.
///
/// Both operations follow the same shape: claim the unit's state token,
/// prepare on a background task, then walk the unit's cells in bounded
/// batches on the tick thread, one batch per tick, and finish on a
/// background task. Failures are unit-scoped; one chunk going wrong never
/// touches its siblings.
pub struct SnapshotEngine {
    scheduler: Arc<dyn Scheduler>,
    store: Arc<dyn SnapshotStore>,
    config: EngineConfig,
}

struct CaptureRun {
    chunk: Arc<ChunkUnit>,
    arena: Arc<Mutex<ArenaMetadata>>,
    iter: RegionIterator,
    data: VolumeData,
}

struct RevertRun {
    chunk: Arc<ChunkUnit>,
    iter: RegionIterator,
    data: VolumeData,
}

impl SnapshotEngine {
    pub fn new(scheduler: Arc<dyn Scheduler>, store: Arc<dyn SnapshotStore>) -> Self {
        SnapshotEngine::with_config(scheduler, store, EngineConfig::default())
    }

    pub fn with_config(
        scheduler: Arc<dyn Scheduler>,
        store: Arc<dyn SnapshotStore>,
        mut config: EngineConfig,
    ) -> Self {
        // A zero budget would reschedule empty batches forever.
        config.max_transactions = config.max_transactions.max(1);
        SnapshotEngine {
            scheduler,
            store,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Captures the chunk's current world state into a persisted snapshot.
    ///
    /// No-op if the chunk is already analyzed or any operation is in
    /// flight. The snapshot only becomes authoritative once the store's
    /// returned hash matches the hash computed for this cycle, at which
    /// point the chunk's metadata is appended to the arena aggregate.
    pub fn analyze_chunk(
        self: &Arc<Self>,
        chunk: Arc<ChunkUnit>,
        arena: Arc<Mutex<ArenaMetadata>>,
    ) {
        if chunk.is_analyzed() {
            return;
        }
        if !chunk.try_begin(ChunkState::Capturing) {
            return;
        }
        log::debug!("analyzing chunk {}", chunk.id());
        let engine = Arc::clone(self);
        self.scheduler.run_async(Box::new(move || {
            let run = CaptureRun {
                iter: chunk.iter(),
                data: VolumeData::new(chunk.region().size()),
                chunk,
                arena,
            };
            engine.schedule_capture_batch(run);
        }));
    }

    fn schedule_capture_batch(self: &Arc<Self>, mut run: CaptureRun) {
        let engine = Arc::clone(self);
        let budget = self.config.max_transactions;
        self.scheduler.run_next_tick(Box::new(move |world| {
            world.load_chunk(run.chunk.grid_x(), run.chunk.grid_z());
            match capture_batch(&run.chunk, &mut run.iter, &mut run.data, world, budget) {
                Ok(true) => engine.finish_capture(run),
                Ok(false) => engine.schedule_capture_batch(run),
                Err(e) => {
                    log::error!("capture of chunk {} failed: {e}", run.chunk.id());
                    run.chunk.finish();
                }
            }
        }));
    }

    fn finish_capture(self: &Arc<Self>, run: CaptureRun) {
        let engine = Arc::clone(self);
        self.scheduler.run_async(Box::new(move || {
            let CaptureRun {
                chunk, arena, data, ..
            } = run;
            let verified = (|| -> Result<()> {
                let bytes = snapshot::encode(&data)?;
                let expected = snapshot::content_hash(&bytes);
                chunk.record_hash(expected.clone());
                let actual = engine.store.save(chunk.id(), &data)?;
                if actual != expected {
                    return Err(Error::PersistenceMismatch {
                        id: chunk.id().clone(),
                        expected,
                        actual,
                    });
                }
                Ok(())
            })();
            match verified {
                Ok(()) => {
                    arena.lock().unwrap().append(chunk.metadata());
                    log::info!("chunk {} analyzed", chunk.id());
                }
                Err(e) => {
                    // Unverified snapshot; the chunk stays not-analyzed.
                    chunk.clear_hash();
                    log::error!("capture of chunk {} failed: {e}", chunk.id());
                }
            }
            chunk.finish();
        }));
    }

    /// Restores the chunk's persisted snapshot back into the world.
    ///
    /// No-op if any operation is already in flight on the chunk. A missing
    /// snapshot aborts this unit only, with the state token cleared.
    pub fn revert_chunk(self: &Arc<Self>, chunk: Arc<ChunkUnit>) {
        if !chunk.try_begin(ChunkState::Reverting) {
            return;
        }
        log::debug!("reverting chunk {}", chunk.id());
        let engine = Arc::clone(self);
        self.scheduler.run_async(Box::new(move || {
            match engine.store.load(chunk.id()) {
                Ok(Some(data)) => {
                    let run = RevertRun {
                        iter: chunk.iter(),
                        data,
                        chunk,
                    };
                    engine.schedule_revert_batch(run);
                }
                Ok(None) => {
                    log::warn!("{}", Error::MissingSnapshot(chunk.id().clone()));
                    chunk.cancel_revert();
                }
                Err(e) => {
                    log::error!("revert of chunk {} failed: {e}", chunk.id());
                    chunk.cancel_revert();
                }
            }
        }));
    }

    fn schedule_revert_batch(self: &Arc<Self>, mut run: RevertRun) {
        let engine = Arc::clone(self);
        let budget = self.config.max_transactions;
        self.scheduler.run_next_tick(Box::new(move |world| {
            // A cancellation between ticks stops the run before it writes
            // anything else.
            if !run.chunk.is_reverting() {
                log::debug!("revert of chunk {} cancelled", run.chunk.id());
                return;
            }
            world.load_chunk(run.chunk.grid_x(), run.chunk.grid_z());
            match revert_batch(&run.chunk, &mut run.iter, &run.data, world, budget) {
                Ok(true) => {
                    log::info!("chunk {} reverted", run.chunk.id());
                    run.chunk.cancel_revert();
                }
                Ok(false) => engine.schedule_revert_batch(run),
                Err(e) => {
                    log::error!("revert of chunk {} failed: {e}", run.chunk.id());
                    run.chunk.cancel_revert();
                }
            }
        }));
    }

    /// Cooperatively cancels an in-flight revert on the chunk. Takes
    /// effect before the next batch; the current batch always completes.
    pub fn cancel_revert(&self, chunk: &ChunkUnit) {
        chunk.cancel_revert();
    }
}

/// Reads up to `budget` cells from the world into the volume, in iterator
/// order. Returns whether the run is complete.
fn capture_batch(
    chunk: &ChunkUnit,
    iter: &mut RegionIterator,
    data: &mut VolumeData,
    world: &mut dyn World,
    budget: usize,
) -> Result<bool> {
    let minimum = chunk.region().minimum();
    for _ in 0..budget {
        let Some(relative) = iter.next() else { break };
        let real = minimum.add(relative);
        let state = world.block_at(real.x(), real.y(), real.z());
        data.set(relative, state)?;
    }
    Ok(iter.len() == 0)
}

/// Writes up to `budget` cells from the volume back into the world.
/// Returns whether the run is complete.
fn revert_batch(
    chunk: &ChunkUnit,
    iter: &mut RegionIterator,
    data: &VolumeData,
    world: &mut dyn World,
    budget: usize,
) -> Result<bool> {
    let minimum = chunk.region().minimum();
    for _ in 0..budget {
        let Some(relative) = iter.next() else { break };
        let real = minimum.add(relative);
        let state = data.get(relative)?.clone();
        world.set_block_at(real.x(), real.y(), real.z(), state);
    }
    Ok(iter.len() == 0)
}
