use crate::chunk::ChunkId;
use crate::vector::Vector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Record of one chunk's last successfully persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub id: ChunkId,
    pub hash: String,
    pub size: Vector,
}

impl ChunkMetadata {
    pub fn new(id: ChunkId, size: Vector) -> Self {
        ChunkMetadata {
            id,
            hash: String::new(),
            size,
        }
    }

    /// A chunk counts as analyzed once a content hash has been recorded.
    pub fn is_analyzed(&self) -> bool {
        !self.hash.is_empty()
    }
}

/// Aggregate of chunk records belonging to one arena. `chunks` only ever
/// grows while operations are in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaMetadata {
    pub name: SmolStr,
    pub created: DateTime<Utc>,
    pub chunks: Vec<ChunkMetadata>,
}

impl ArenaMetadata {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        ArenaMetadata {
            name: name.into(),
            created: Utc::now(),
            chunks: Vec::new(),
        }
    }

    pub fn append(&mut self, chunk: ChunkMetadata) {
        self.chunks.push(chunk);
    }
}

/// The two metadata shapes share serialization, nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metadata {
    Chunk(ChunkMetadata),
    Arena(ArenaMetadata),
}
