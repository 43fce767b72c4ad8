use crate::block_state::BlockState;

/// Host world access. Every method runs on the simulation tick thread; the
/// engine never calls into a `World` from a background task.
pub trait World: Send {
    /// Makes sure the chunk column at the given grid coordinates is loaded
    /// before the engine touches its blocks. Hosts backed by an async chunk
    /// loader resolve the load before returning.
    fn load_chunk(&mut self, grid_x: i32, grid_z: i32);

    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockState;

    fn set_block_at(&mut self, x: i32, y: i32, z: i32, state: BlockState);
}
