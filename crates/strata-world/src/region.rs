//! The sector-based region container.
//!
//! A region file starts with two 4 KiB tables of 1024 big-endian entries: the
//! first holds `(u24 sector offset, u8 sector count)` per chunk slot, the
//! second a `u32` timestamp per slot. Slot `i` belongs to region-local chunk
//! `(i % 32, i / 32)`. Each present chunk lives at `offset * 4096` as
//! `[length: i32][compression: u8][payload: length - 1]`.

use crate::chunk::Chunk;
use byteorder::{BigEndian, ReadBytesExt};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use strata_common::{ChunkPos, Result, StrataError};
use strata_logger::{log, LogSeverity};
use strata_nbt::binary::read_bytes;
use strata_nbt::{Compression, Endian, NbtDocument, SerializationProfile};

pub const SECTOR_SIZE: u64 = 4096;
pub const REGION_WIDTH: usize = 32;
pub const REGION_CHUNKS: usize = REGION_WIDTH * REGION_WIDTH;
/// Location table plus timestamp table.
pub const HEADER_SIZE: u64 = 2 * SECTOR_SIZE;

/// One slot of the region header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkLocation {
    pub offset: u32,
    pub sector_count: u8,
    pub timestamp: u32,
}

impl ChunkLocation {
    pub fn is_absent(&self) -> bool {
        self.offset == 0 || self.sector_count == 0
    }
}

/// Reads both header tables.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Vec<ChunkLocation>> {
    let mut locations = Vec::with_capacity(REGION_CHUNKS);
    for _ in 0..REGION_CHUNKS {
        let offset = reader.read_u24::<BigEndian>()?;
        let sector_count = reader.read_u8()?;
        locations.push(ChunkLocation {
            offset,
            sector_count,
            timestamp: 0,
        });
    }
    for location in locations.iter_mut() {
        location.timestamp = reader.read_u32::<BigEndian>()?;
    }
    Ok(locations)
}

/// Reads and decodes the chunk a present slot points at.
pub fn read_chunk<R: Read + Seek>(reader: &mut R, location: &ChunkLocation) -> Result<Chunk> {
    reader.seek(SeekFrom::Start(location.offset as u64 * SECTOR_SIZE))?;

    let length = reader.read_i32::<BigEndian>()?;
    let allocated = (location.sector_count as u64 * SECTOR_SIZE).saturating_sub(4);
    if length < 1 || length as u64 > allocated {
        return Err(StrataError::InvalidData(format!(
            "chunk at sector {} declares {} bytes, {} allocated",
            location.offset, length, allocated
        )));
    }

    let compression = Compression::from_id(reader.read_u8()?)?;
    let payload = read_bytes(reader, length as usize - 1)?;
    let profile = SerializationProfile::new(Endian::Big, compression, 0);
    let document = NbtDocument::from_bytes(&payload, &profile)?;

    Chunk::new(
        location.offset,
        location.sector_count,
        location.timestamp,
        compression,
        document,
    )
}

/// Every present chunk of one region file, decoded eagerly.
#[derive(Debug, Clone, Default)]
pub struct Region {
    chunks: Vec<Chunk>,
    index: HashMap<ChunkPos, usize>,
}

impl Region {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let region = Self::from_reader(&mut reader)?;
        log(
            format!(
                "Loaded {} chunks from region {}",
                region.len(),
                path.display()
            ),
            LogSeverity::Info,
        );
        Ok(region)
    }

    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let locations = read_header(reader)?;

        let mut region = Region::default();
        for (slot, location) in locations.iter().enumerate() {
            if location.is_absent() {
                continue;
            }
            let chunk = read_chunk(reader, location)?;
            let pos = chunk.region_position().unwrap_or_else(|| {
                ChunkPos::new((slot % REGION_WIDTH) as i32, (slot / REGION_WIDTH) as i32)
            });
            log(
                format!(
                    "Chunk {},{} at sector {} ({} sectors, {:?})",
                    pos.x,
                    pos.z,
                    location.offset,
                    location.sector_count,
                    chunk.compression()
                ),
                LogSeverity::Debug,
            );
            if region.index.insert(pos, region.chunks.len()).is_some() {
                log(
                    format!("Chunk {},{} appears twice, keeping the later entry", pos.x, pos.z),
                    LogSeverity::Warning,
                );
            }
            region.chunks.push(chunk);
        }
        Ok(region)
    }

    /// Chunk at region-local `(x, z)`, or `None` if that slot is empty.
    pub fn get_chunk(&self, x: i32, z: i32) -> Option<&Chunk> {
        let index = *self.index.get(&ChunkPos::new(x, z))?;
        self.chunks.get(index)
    }

    pub fn get_chunk_mut(&mut self, x: i32, z: i32) -> Option<&mut Chunk> {
        let index = *self.index.get(&ChunkPos::new(x, z))?;
        self.chunks.get_mut(index)
    }

    /// Chunks in header table order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
