use crate::chunk::ChunkId;

/// Error type for capture/restore operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("minimum cannot be greater than maximum ({min} > {max})")]
    InvalidRange { min: i32, max: i32 },
    #[error("coordinate ({x}, {y}, {z}) out of bounds for volume of size {size}")]
    IndexOutOfRange { x: i32, y: i32, z: i32, size: String },
    #[error("invalid region: {0}")]
    InvalidRegion(String),
    #[error("snapshot hash mismatch for chunk {id}: expected {expected}, stored {actual}")]
    PersistenceMismatch {
        id: ChunkId,
        expected: String,
        actual: String,
    },
    #[error("no snapshot data for chunk {0}")]
    MissingSnapshot(ChunkId),
    #[error("invalid snapshot data: {0}")]
    InvalidFormat(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
