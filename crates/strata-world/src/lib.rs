//! Chunk storage on top of the tag codec: block states, palette-packed
//! section volumes, chunks and the sector-based region container.

pub mod block_state;
pub mod chunk;
pub mod palette;
pub mod region;
pub mod section;

pub use block_state::BlockState;
pub use chunk::Chunk;
pub use palette::PaletteIndexedVolume;
pub use region::{ChunkLocation, Region};
pub use section::ChunkSection;
