use crate::block_state::BlockState;
use crate::palette::SECTION_WIDTH;
use crate::section::{ChunkSection, DEFAULT_BIOME};
use once_cell::sync::Lazy;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use strata_common::{ChunkPos, Result, StrataError};
use strata_nbt::{Compression, ListTag, NbtDocument, Tag, TagKind};

static AIR_STATE: Lazy<BlockState> = Lazy::new(BlockState::air);

/// A decoded region entry: its table slot data, the document it holds and
/// the sections projected out of that document.
#[derive(Debug, Clone)]
pub struct Chunk {
    offset: u32,
    sector_count: u8,
    timestamp: u32,
    compression: Compression,
    document: NbtDocument,
    sections: BTreeMap<i32, ChunkSection>,
}

/// Section height and in-section y for a world y.
fn split_y(y: i32) -> (i32, usize) {
    (y >> 4, (y & 15) as usize)
}

fn check_column(x: usize, z: usize) -> Result<()> {
    for coord in [x, z] {
        if coord >= SECTION_WIDTH {
            return Err(StrataError::IndexOutOfRange {
                index: coord,
                len: SECTION_WIDTH,
            });
        }
    }
    Ok(())
}

fn load_sections(document: &NbtDocument) -> Result<BTreeMap<i32, ChunkSection>> {
    let mut sections = BTreeMap::new();
    if !document.contains("sections") {
        return Ok(sections);
    }
    for tag in document.root.get_list("sections")? {
        let y = if tag.contains("Y") {
            tag.get_byte("Y")? as i32
        } else {
            0
        };
        sections.insert(y, ChunkSection::from_tag(tag)?);
    }
    Ok(sections)
}

impl Chunk {
    pub fn new(
        offset: u32,
        sector_count: u8,
        timestamp: u32,
        compression: Compression,
        document: NbtDocument,
    ) -> Result<Self> {
        let sections = load_sections(&document)?;
        Ok(Chunk {
            offset,
            sector_count,
            timestamp,
            compression,
            document,
            sections,
        })
    }

    /// A chunk with no sections, not yet placed in any region file.
    pub fn empty(x: i32, z: i32) -> Self {
        let mut root = HashMap::new();
        root.insert("xPos".to_string(), Tag::Int(x));
        root.insert("zPos".to_string(), Tag::Int(z));
        Chunk {
            offset: 0,
            sector_count: 0,
            timestamp: 0,
            compression: Compression::Zlib,
            document: NbtDocument::new("", Tag::Compound(root)),
            sections: BTreeMap::new(),
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn sector_count(&self) -> u8 {
        self.sector_count
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn document(&self) -> &NbtDocument {
        &self.document
    }

    pub fn x(&self) -> Option<i32> {
        self.document.root.get_int("xPos").ok()
    }

    pub fn z(&self) -> Option<i32> {
        self.document.root.get_int("zPos").ok()
    }

    /// Absolute chunk position, if the document records one.
    pub fn position(&self) -> Option<ChunkPos> {
        Some(ChunkPos::new(self.x()?, self.z()?))
    }

    pub fn region_position(&self) -> Option<ChunkPos> {
        self.position().map(|pos| pos.region_local())
    }

    /// Sections keyed by section height, lowest first.
    pub fn sections(&self) -> &BTreeMap<i32, ChunkSection> {
        &self.sections
    }

    pub fn get_section(&self, y: i32) -> Option<&ChunkSection> {
        self.sections.get(&y)
    }

    pub fn get_section_mut(&mut self, y: i32) -> Option<&mut ChunkSection> {
        self.sections.get_mut(&y)
    }

    pub fn create_section(&mut self, y: i32) -> Result<&mut ChunkSection> {
        match self.sections.entry(y) {
            Entry::Occupied(_) => Err(StrataError::InvalidData(format!(
                "section {} already exists",
                y
            ))),
            Entry::Vacant(entry) => Ok(entry.insert(ChunkSection::new())),
        }
    }

    pub fn get_or_create_section(&mut self, y: i32) -> &mut ChunkSection {
        self.sections.entry(y).or_default()
    }

    /// Block at chunk-local `x`/`z` and world `y`. Missing sections read as
    /// air.
    pub fn get_block(&self, x: usize, y: i32, z: usize) -> Result<&BlockState> {
        check_column(x, z)?;
        let (section_y, local_y) = split_y(y);
        match self.sections.get(&section_y) {
            Some(section) => section.get_block(x, local_y, z),
            None => Ok(&*AIR_STATE),
        }
    }

    pub fn set_block(&mut self, x: usize, y: i32, z: usize, state: BlockState) -> Result<()> {
        check_column(x, z)?;
        let (section_y, local_y) = split_y(y);
        self.get_or_create_section(section_y)
            .set_block(x, local_y, z, state)
    }

    /// Biome at chunk-local `x`/`z` and world `y`. Missing sections read as
    /// plains.
    pub fn get_biome(&self, x: usize, y: i32, z: usize) -> Result<&str> {
        check_column(x, z)?;
        let (section_y, local_y) = split_y(y);
        match self.sections.get(&section_y) {
            Some(section) => section.get_biome(x, local_y, z),
            None => Ok(DEFAULT_BIOME),
        }
    }

    pub fn set_biome(&mut self, x: usize, y: i32, z: usize, biome: impl Into<String>) -> Result<()> {
        check_column(x, z)?;
        let (section_y, local_y) = split_y(y);
        self.get_or_create_section(section_y)
            .set_biome(x, local_y, z, biome)
    }

    /// Writes the in-memory sections back into the document's `sections`
    /// list.
    pub fn store_sections(&mut self) -> Result<()> {
        let mut list = ListTag::new(TagKind::Compound);
        for (&y, section) in &self.sections {
            let y = i8::try_from(y).map_err(|_| {
                StrataError::InvalidData(format!("section height {} does not fit a byte", y))
            })?;
            list.push(section.to_tag(y)?)?;
        }
        self.document.set_tag("sections", Tag::List(list))
    }
}
