use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;
use strata::{Chunk, Compression, Endian, SerializationProfile};

pub const SECTOR: usize = 4096;

/// One occupied header slot and the chunk bytes it points at.
pub struct Entry {
    pub slot: usize,
    pub timestamp: u32,
    pub compression_id: u8,
    pub payload: Vec<u8>,
}

impl Entry {
    pub fn chunk(slot: usize, chunk: &Chunk, compression: Compression) -> Self {
        let profile = SerializationProfile::new(Endian::Big, compression, 0);
        Entry {
            slot,
            timestamp: 1_700_000_000 + slot as u32,
            compression_id: compression.id(),
            payload: chunk.document().to_bytes(&profile).unwrap(),
        }
    }
}

/// Header tables followed by each entry's sectors, allocated from sector 2.
pub fn build_region(entries: &[Entry]) -> Vec<u8> {
    let mut bytes = vec![0u8; 2 * SECTOR];
    let mut next_sector = 2u32;

    for entry in entries {
        let mut sector = Vec::new();
        sector
            .write_i32::<BigEndian>(entry.payload.len() as i32 + 1)
            .unwrap();
        sector.write_u8(entry.compression_id).unwrap();
        sector.write_all(&entry.payload).unwrap();
        let count = sector.len().div_ceil(SECTOR);
        sector.resize(count * SECTOR, 0);

        let location = (next_sector << 8) | count as u32;
        let at = entry.slot * 4;
        bytes[at..at + 4].copy_from_slice(&location.to_be_bytes());
        bytes[SECTOR + at..SECTOR + at + 4].copy_from_slice(&entry.timestamp.to_be_bytes());
        bytes.extend(sector);
        next_sector += count as u32;
    }
    bytes
}
