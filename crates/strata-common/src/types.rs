use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, crate::error::StrataError>;

/// Chunk coordinates, either absolute or region-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkPos { x, z }
    }

    /// Position inside the owning 32x32 region.
    pub fn region_local(&self) -> ChunkPos {
        ChunkPos {
            x: self.x & 31,
            z: self.z & 31,
        }
    }
}
