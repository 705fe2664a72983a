use std::collections::HashMap;
use std::hash::Hash;
use strata_common::{Result, StrataError};

/// Cells along each axis of a section.
pub const SECTION_WIDTH: usize = 16;
/// Cells in a 16x16x16 section.
pub const CELL_COUNT: usize = SECTION_WIDTH * SECTION_WIDTH * SECTION_WIDTH;
pub const MIN_BITS_PER_ENTRY: u32 = 4;
pub const MAX_BITS_PER_ENTRY: u32 = 32;

/// `max(4, ceil(log2(len)))`.
pub fn bits_for_palette_len(len: usize) -> u32 {
    let needed = if len <= 1 {
        0
    } else {
        usize::BITS - (len - 1).leading_zeros()
    };
    needed.max(MIN_BITS_PER_ENTRY)
}

/// Backing words for every cell at `bits`. `4096 * bits` is always a
/// multiple of 64, so fields pack with no slack at the end.
fn words_for(bits: u32) -> usize {
    CELL_COUNT * bits as usize / 64
}

fn cell_index(x: usize, y: usize, z: usize) -> Result<usize> {
    for coord in [x, y, z] {
        if coord >= SECTION_WIDTH {
            return Err(StrataError::IndexOutOfRange {
                index: coord,
                len: SECTION_WIDTH,
            });
        }
    }
    Ok((y << 8) | (z << 4) | x)
}

/// Reads the `bits`-wide field of cell `index`. A field may continue into the
/// next word. `None` when `data` ends before the field does.
fn read_field(data: &[u64], bits: u32, index: usize) -> Option<u64> {
    let bit = index * bits as usize;
    let word = bit / 64;
    let offset = (bit % 64) as u32;
    let mask = (1u64 << bits) - 1;

    let mut value = *data.get(word)? >> offset;
    if offset + bits > 64 {
        value |= *data.get(word + 1)? << (64 - offset);
    }
    Some(value & mask)
}

fn write_field(data: &mut [u64], bits: u32, index: usize, value: u64) {
    let bit = index * bits as usize;
    let word = bit / 64;
    let offset = (bit % 64) as u32;
    let mask = (1u64 << bits) - 1;
    let value = value & mask;

    data[word] = (data[word] & !(mask << offset)) | (value << offset);
    if offset + bits > 64 {
        let spill_mask = (1u64 << (offset + bits - 64)) - 1;
        data[word + 1] = (data[word + 1] & !spill_mask) | (value >> (64 - offset));
    }
}

/// 4096 cells, each a bit-packed index into an append-only palette.
///
/// Cells are addressed `(y << 8) | (z << 4) | x`. The index width is
/// `max(4, ceil(log2(palette.len())))`; growing past a power of two re-encodes
/// every cell at the wider width. Palette indices never change once assigned,
/// so growth never disturbs a previous read.
#[derive(Debug, Clone)]
pub struct PaletteIndexedVolume<T> {
    data: Vec<u64>,
    palette: Vec<T>,
    palette_index: HashMap<T, usize>,
    bits_per_entry: u32,
}

impl<T: Clone + Eq + Hash> PaletteIndexedVolume<T> {
    /// Every cell holds `value`.
    pub fn new(value: T) -> Self {
        let mut palette_index = HashMap::new();
        palette_index.insert(value.clone(), 0);
        PaletteIndexedVolume {
            data: vec![0; words_for(MIN_BITS_PER_ENTRY)],
            palette: vec![value],
            palette_index,
            bits_per_entry: MIN_BITS_PER_ENTRY,
        }
    }

    /// Wraps decoded packed words and their palette.
    ///
    /// `data` may be shorter than 4096 cells need, as with the 4x4x4 biome
    /// arrays of recent chunk files. Cells past its end fail on read, and the
    /// array is zero-extended on the first write. Indices are checked against
    /// the palette on read, not here.
    pub fn from_parts(data: Vec<u64>, palette: Vec<T>) -> Result<Self> {
        if palette.is_empty() {
            return Err(StrataError::InvalidData(
                "volume palette is empty".to_string(),
            ));
        }
        let bits_per_entry = bits_for_palette_len(palette.len());
        if bits_per_entry > MAX_BITS_PER_ENTRY {
            return Err(StrataError::InvalidData(format!(
                "palette of {} entries is too large",
                palette.len()
            )));
        }
        let mut palette_index = HashMap::with_capacity(palette.len());
        for (i, value) in palette.iter().enumerate() {
            palette_index.entry(value.clone()).or_insert(i);
        }
        Ok(PaletteIndexedVolume {
            data,
            palette,
            palette_index,
            bits_per_entry,
        })
    }

    /// A palette without packed data: every cell points at entry 0.
    pub fn from_palette(palette: Vec<T>) -> Result<Self> {
        let words = words_for(bits_for_palette_len(palette.len()).min(MAX_BITS_PER_ENTRY));
        Self::from_parts(vec![0; words], palette)
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<&T> {
        let index = cell_index(x, y, z)?;
        let field = read_field(&self.data, self.bits_per_entry, index).ok_or_else(|| {
            StrataError::InvalidData(format!(
                "cell {} lies past the {} stored words",
                index,
                self.data.len()
            ))
        })? as usize;
        self.palette.get(field).ok_or_else(|| {
            StrataError::InvalidData(format!(
                "cell {} references palette entry {} of {}",
                index,
                field,
                self.palette.len()
            ))
        })
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) -> Result<()> {
        let index = cell_index(x, y, z)?;
        let needed = words_for(self.bits_per_entry);
        if self.data.len() < needed {
            self.data.resize(needed, 0);
        }
        let palette_index = match self.palette_index.get(&value) {
            Some(&i) => i,
            None => self.push_palette(value)?,
        };
        write_field(
            &mut self.data,
            self.bits_per_entry,
            index,
            palette_index as u64,
        );
        Ok(())
    }

    /// Resets to a single-entry palette; every cell resolves to `value`.
    pub fn fill(&mut self, value: T) {
        *self = Self::new(value);
    }

    pub fn palette(&self) -> &[T] {
        &self.palette
    }

    pub fn bits_per_entry(&self) -> u32 {
        self.bits_per_entry
    }

    /// Packed words, as stored on disk.
    pub fn data(&self) -> &[u64] {
        &self.data
    }

    fn push_palette(&mut self, value: T) -> Result<usize> {
        let new_bits = bits_for_palette_len(self.palette.len() + 1);
        if new_bits > MAX_BITS_PER_ENTRY {
            return Err(StrataError::InvalidData(format!(
                "palette cannot grow past {} entries",
                self.palette.len()
            )));
        }
        if new_bits != self.bits_per_entry {
            self.repack(new_bits);
        }
        let index = self.palette.len();
        self.palette_index.insert(value.clone(), index);
        self.palette.push(value);
        Ok(index)
    }

    /// Re-encodes all 4096 cells from the current width to `new_bits`.
    fn repack(&mut self, new_bits: u32) {
        let mut data = vec![0u64; words_for(new_bits)];
        for index in 0..CELL_COUNT {
            let value = read_field(&self.data, self.bits_per_entry, index).unwrap_or(0);
            write_field(&mut data, new_bits, index, value);
        }
        self.data = data;
        self.bits_per_entry = new_bits;
    }
}
