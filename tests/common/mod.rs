use regolith::{AsyncTask, BlockState, Scheduler, TickTask, World};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Deterministic scheduler: tasks queue up and only run when the test
/// steps them, so batch boundaries land exactly where the engine put them.
#[derive(Default)]
pub struct TestScheduler {
    ticks: Mutex<VecDeque<TickTask>>,
    asyncs: Mutex<VecDeque<AsyncTask>>,
}

impl TestScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(TestScheduler::default())
    }

    pub fn pending_ticks(&self) -> usize {
        self.ticks.lock().unwrap().len()
    }

    pub fn pending_async(&self) -> usize {
        self.asyncs.lock().unwrap().len()
    }

    /// Drains background tasks, including any they enqueue in turn.
    pub fn run_async_tasks(&self) {
        loop {
            let task = self.asyncs.lock().unwrap().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    /// Runs one simulation tick: everything scheduled before this tick
    /// executes, anything rescheduled waits for the next call.
    pub fn tick(&self, world: &mut dyn World) {
        let due: Vec<TickTask> = self.ticks.lock().unwrap().drain(..).collect();
        for task in due {
            task(world);
        }
    }

    /// Alternates background tasks and ticks until nothing is pending.
    /// Returns the number of ticks that ran.
    pub fn run_until_idle(&self, world: &mut dyn World) -> usize {
        let mut ticks = 0;
        loop {
            self.run_async_tasks();
            if self.pending_ticks() == 0 {
                break;
            }
            self.tick(world);
            ticks += 1;
        }
        ticks
    }
}

impl Scheduler for TestScheduler {
    fn run_next_tick(&self, task: TickTask) {
        self.ticks.lock().unwrap().push_back(task);
    }

    fn run_async(&self, task: AsyncTask) {
        self.asyncs.lock().unwrap().push_back(task);
    }
}

/// In-memory world: unset coordinates read as air.
#[derive(Default)]
pub struct FakeWorld {
    blocks: HashMap<(i32, i32, i32), BlockState>,
    pub loaded_chunks: Vec<(i32, i32)>,
    pub write_count: usize,
}

impl FakeWorld {
    pub fn new() -> Self {
        FakeWorld::default()
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, state: BlockState) {
        self.blocks.insert((x, y, z), state);
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.blocks
            .get(&(x, y, z))
            .cloned()
            .unwrap_or_else(BlockState::air)
    }

    /// Fills a box with a deterministic coordinate-derived pattern.
    pub fn fill_pattern(&mut self, min: (i32, i32, i32), size: (i32, i32, i32)) {
        for y in min.1..min.1 + size.1 {
            for z in min.2..min.2 + size.2 {
                for x in min.0..min.0 + size.0 {
                    self.set(x, y, z, pattern_block(x, y, z));
                }
            }
        }
    }
}

/// A block state unique to its coordinate, for cell-by-cell verification.
pub fn pattern_block(x: i32, y: i32, z: i32) -> BlockState {
    BlockState::new("minecraft:stone").with_property("tag", format!("{x}_{y}_{z}"))
}

impl World for FakeWorld {
    fn load_chunk(&mut self, grid_x: i32, grid_z: i32) {
        self.loaded_chunks.push((grid_x, grid_z));
    }

    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.get(x, y, z)
    }

    fn set_block_at(&mut self, x: i32, y: i32, z: i32, state: BlockState) {
        self.write_count += 1;
        self.blocks.insert((x, y, z), state);
    }
}
