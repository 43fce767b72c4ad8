use crate::world::World;

/// Work scheduled onto the simulation tick thread, with world access.
pub type TickTask = Box<dyn FnOnce(&mut dyn World) + Send>;

/// Work scheduled onto a background worker, no world access.
pub type AsyncTask = Box<dyn FnOnce() + Send>;

/// Fire-and-forget task submission into the host's scheduling primitives.
///
/// The engine splits its work along this seam: block reads and writes go
/// through `run_next_tick` in bounded batches, while persistence, hashing
/// and iterator setup go through `run_async`.
pub trait Scheduler: Send + Sync {
    /// Runs the task on the tick thread, no earlier than the next tick.
    fn run_next_tick(&self, task: TickTask);

    /// Runs the task on a background worker at some point in the future.
    fn run_async(&self, task: AsyncTask);
}
