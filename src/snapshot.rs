use crate::chunk::ChunkId;
use crate::error::{Error, Result};
use crate::volume::VolumeData;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

const MAGIC: &[u8; 4] = b"RGSN";
const VERSION: u32 = 1;

/// File extension for persisted chunk snapshots.
pub const SNAPSHOT_EXTENSION: &str = "rgsn";

/// Serializes a volume behind a magic/version header.
pub fn encode(data: &VolumeData) -> Result<Vec<u8>> {
    let payload = bincode::serialize(data)?;
    let mut buf = Vec::with_capacity(8 + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&VERSION.to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub fn decode(bytes: &[u8]) -> Result<VolumeData> {
    if bytes.len() < 8 {
        return Err(Error::InvalidFormat("snapshot data too short".into()));
    }
    if &bytes[0..4] != MAGIC {
        return Err(Error::InvalidFormat("invalid snapshot magic bytes".into()));
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != VERSION {
        return Err(Error::InvalidFormat(format!(
            "unsupported snapshot version: {version}"
        )));
    }
    let mut data: VolumeData = bincode::deserialize(&bytes[8..])?;
    data.rebuild_palette_index();
    Ok(data)
}

/// Fingerprint of serialized snapshot bytes, as a hex string.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(bytes);
    format!("{:08x}", hasher.finalize())
}

/// Persistence collaborator for chunk snapshots.
///
/// `save` must return the hash of the bytes it actually persisted, computed
/// after the write, so the caller can verify the cycle end to end.
pub trait SnapshotStore: Send + Sync {
    fn save(&self, id: &ChunkId, data: &VolumeData) -> Result<String>;

    fn load(&self, id: &ChunkId) -> Result<Option<VolumeData>>;
}

/// One snapshot file per chunk id under a base directory.
///
/// Writes go to a temporary file first and are renamed into place, then the
/// final file is read back to compute the returned hash.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    fn path_for(&self, id: &ChunkId) -> PathBuf {
        self.dir.join(format!("{id}.{SNAPSHOT_EXTENSION}"))
    }
}

impl SnapshotStore for FileStore {
    fn save(&self, id: &ChunkId, data: &VolumeData) -> Result<String> {
        let bytes = encode(data)?;
        let path = self.path_for(id);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;
        let written = fs::read(&path)?;
        Ok(content_hash(&written))
    }

    fn load(&self, id: &ChunkId) -> Result<Option<VolumeData>> {
        let path = self.path_for(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode(&bytes).map(Some)
    }
}

/// Keeps snapshots in memory. Useful for ephemeral hosts and tests.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<ChunkId, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, id: &ChunkId, data: &VolumeData) -> Result<String> {
        let bytes = encode(data)?;
        let hash = content_hash(&bytes);
        self.snapshots
            .lock()
            .unwrap()
            .insert(id.clone(), bytes);
        Ok(hash)
    }

    fn load(&self, id: &ChunkId) -> Result<Option<VolumeData>> {
        let guard = self.snapshots.lock().unwrap();
        match guard.get(id) {
            Some(bytes) => decode(bytes).map(Some),
            None => Ok(None),
        }
    }
}
