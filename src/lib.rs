//! Tag-tree codec and region container reader.

pub use strata_common as common;
pub use strata_logger as logger;
pub use strata_nbt as nbt;
pub use strata_world as world;

// Re-export commonly used items
pub use strata_common::{ChunkPos, Result, StrataError};
pub use strata_logger::{log, LogSeverity};
pub use strata_nbt::{Compression, Endian, ListTag, NbtDocument, SerializationProfile, Tag, TagKind};
pub use strata_world::{BlockState, Chunk, ChunkSection, PaletteIndexedVolume, Region};
