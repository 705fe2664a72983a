use crate::block_state::BlockState;
use crate::palette::PaletteIndexedVolume;
use std::collections::HashMap;
use strata_common::{Result, StrataError};
use strata_nbt::{ListTag, Tag, TagKind};

pub const DEFAULT_BIOME: &str = "minecraft:plains";

/// One 16-block-tall slab of a chunk.
#[derive(Debug, Clone)]
pub struct ChunkSection {
    pub blocks: PaletteIndexedVolume<BlockState>,
    pub biomes: PaletteIndexedVolume<String>,
}

impl Default for ChunkSection {
    fn default() -> Self {
        ChunkSection::new()
    }
}

fn words_of(tag: &Tag, path: &str) -> Result<Option<Vec<u64>>> {
    if !tag.contains(path) {
        return Ok(None);
    }
    Ok(Some(
        tag.get_long_array(path)?.iter().map(|&l| l as u64).collect(),
    ))
}

fn volume<T>(palette: Vec<T>, data: Option<Vec<u64>>) -> Result<PaletteIndexedVolume<T>>
where
    T: Clone + Eq + std::hash::Hash,
{
    match data {
        Some(data) => PaletteIndexedVolume::from_parts(data, palette),
        None => PaletteIndexedVolume::from_palette(palette),
    }
}

/// `{palette: [...], data: [L; ...]}`, with `data` omitted for single-entry
/// palettes where every index is zero.
fn container_tag<T>(volume: &PaletteIndexedVolume<T>, palette: Tag) -> Tag
where
    T: Clone + Eq + std::hash::Hash,
{
    let mut compound = HashMap::new();
    compound.insert("palette".to_string(), palette);
    if volume.palette().len() > 1 {
        let data = volume.data().iter().map(|&w| w as i64).collect();
        compound.insert("data".to_string(), Tag::LongArray(data));
    }
    Tag::Compound(compound)
}

impl ChunkSection {
    /// All air, all plains.
    pub fn new() -> Self {
        ChunkSection {
            blocks: PaletteIndexedVolume::new(BlockState::air()),
            biomes: PaletteIndexedVolume::new(DEFAULT_BIOME.to_string()),
        }
    }

    /// Projects one entry of a chunk's `sections` list. Missing
    /// `block_states` or `biomes` fall back to air and plains.
    pub fn from_tag(tag: &Tag) -> Result<Self> {
        let mut section = ChunkSection::new();

        if tag.contains("block_states") {
            let palette = tag
                .get_list("block_states.palette")?
                .iter()
                .map(BlockState::from_tag)
                .collect::<Result<Vec<_>>>()?;
            let data = words_of(tag, "block_states.data")?;
            section.blocks = volume(palette, data)?;
        }

        if tag.contains("biomes") {
            let palette = tag
                .get_list("biomes.palette")?
                .iter()
                .map(|biome| {
                    biome.as_string().map(str::to_owned).ok_or(StrataError::WrongTagKind {
                        expected: TagKind::String.name(),
                        found: biome.kind().name(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let data = words_of(tag, "biomes.data")?;
            section.biomes = volume(palette, data)?;
        }

        Ok(section)
    }

    /// The on-disk compound for this section at section height `y`.
    pub fn to_tag(&self, y: i8) -> Result<Tag> {
        let block_palette = BlockState::palette_to_tag(self.blocks.palette())?;
        let biome_palette = ListTag::from_tags(
            TagKind::String,
            self.biomes.palette().iter().map(|b| Tag::string(b.clone())).collect(),
        )?;

        let mut compound = HashMap::new();
        compound.insert("Y".to_string(), Tag::Byte(y));
        compound.insert(
            "block_states".to_string(),
            container_tag(&self.blocks, block_palette),
        );
        compound.insert(
            "biomes".to_string(),
            container_tag(&self.biomes, Tag::List(biome_palette)),
        );
        Ok(Tag::Compound(compound))
    }

    pub fn get_block(&self, x: usize, y: usize, z: usize) -> Result<&BlockState> {
        self.blocks.get(x, y, z)
    }

    pub fn set_block(&mut self, x: usize, y: usize, z: usize, state: BlockState) -> Result<()> {
        self.blocks.set(x, y, z, state)
    }

    pub fn get_biome(&self, x: usize, y: usize, z: usize) -> Result<&str> {
        self.biomes.get(x, y, z).map(String::as_str)
    }

    pub fn set_biome(&mut self, x: usize, y: usize, z: usize, biome: impl Into<String>) -> Result<()> {
        self.biomes.set(x, y, z, biome.into())
    }

    pub fn fill_blocks(&mut self, state: BlockState) {
        self.blocks.fill(state);
    }

    pub fn fill_biomes(&mut self, biome: impl Into<String>) {
        self.biomes.fill(biome.into());
    }
}
