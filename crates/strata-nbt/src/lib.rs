//! Binary tag trees: the primitive layer, the tag model with path
//! addressing, the recursive codec and the compressed document envelope.

pub mod binary;
pub mod codec;
pub mod document;
pub mod path;
pub mod profile;
pub mod snbt;
pub mod tag;

pub use document::NbtDocument;
pub use profile::{Compression, Endian, SerializationProfile};
pub use tag::{ListTag, Tag, TagKind};
