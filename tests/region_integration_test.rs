mod common;

use assert_matches::assert_matches;
use common::*;
use std::io::Cursor;
use strata::{BlockState, Chunk, Compression, Region, StrataError};

fn village_chunk(x: i32, z: i32) -> Chunk {
    let mut chunk = Chunk::empty(x, z);
    for section in -4..4 {
        chunk
            .create_section(section)
            .unwrap()
            .fill_blocks(BlockState::new("minecraft:stone"));
    }
    let door = BlockState::new("minecraft:oak_door")
        .with_property("facing", "east")
        .with_property("half", "lower");
    chunk.set_block(3, 64, 12, door).unwrap();
    chunk.set_block(3, 63, 12, BlockState::new("minecraft:cobblestone")).unwrap();
    chunk.set_biome(0, 64, 0, "minecraft:meadow").unwrap();
    chunk.store_sections().unwrap();
    chunk
}

#[test]
fn test_region_block_and_biome_lookup() {
    let bytes = build_region(&[
        Entry::chunk(0, &village_chunk(-32, -32), Compression::Zlib),
        Entry::chunk(40, &village_chunk(-24, -31), Compression::Gzip),
    ]);
    let region = Region::from_reader(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(region.len(), 2);

    let chunk = region.get_chunk(8, 1).unwrap();
    assert_eq!(chunk.compression(), Compression::Gzip);
    assert_eq!(chunk.timestamp(), 1_700_000_040);

    let door = chunk.get_block(3, 64, 12).unwrap();
    assert_eq!(door.to_string(), "minecraft:oak_door[facing=east,half=lower]");
    assert_eq!(chunk.get_block(3, 63, 12).unwrap().name, "minecraft:cobblestone");
    assert_eq!(chunk.get_block(0, -64, 0).unwrap().name, "minecraft:stone");
    assert_eq!(chunk.get_block(15, 63, 15).unwrap().name, "minecraft:stone");
    assert!(chunk.get_block(0, 64, 0).unwrap().is_air());
    assert!(chunk.get_block(0, 200, 0).unwrap().is_air());
    assert_eq!(chunk.get_biome(0, 64, 0).unwrap(), "minecraft:meadow");
    assert_eq!(chunk.get_biome(1, 64, 0).unwrap(), "minecraft:plains");

    assert!(region.get_chunk(0, 0).is_some());
    assert!(region.get_chunk(31, 31).is_none());
}

#[test]
fn test_absent_entries_never_resolve() {
    let bytes = build_region(&[Entry::chunk(5, &Chunk::empty(5, 0), Compression::Zlib)]);
    let region = Region::from_reader(&mut Cursor::new(bytes)).unwrap();
    for z in 0..32 {
        for x in 0..32 {
            assert_eq!(region.get_chunk(x, z).is_some(), (x, z) == (5, 0));
        }
    }
}

#[test]
fn test_corrupt_entry_fails_whole_region() {
    let mut bytes = build_region(&[
        Entry::chunk(0, &Chunk::empty(0, 0), Compression::Zlib),
        Entry::chunk(1, &Chunk::empty(1, 0), Compression::Zlib),
    ]);
    // Second entry's sector starts after the first's; break its zlib stream.
    let second = 3 * SECTOR + 5;
    bytes[second..second + 4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    assert!(Region::from_reader(&mut Cursor::new(bytes)).is_err());
}

#[test]
fn test_region_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.-1.-1.mca");
    std::fs::write(
        &path,
        build_region(&[Entry::chunk(1023, &village_chunk(-1, -1), Compression::Zlib)]),
    )
    .unwrap();

    let region = Region::open(&path).unwrap();
    let chunk = region.get_chunk(31, 31).unwrap();
    assert_eq!(chunk.offset(), 2);
    assert_eq!(chunk.get_biome(0, 64, 0).unwrap(), "minecraft:meadow");

    std::fs::write(&path, [0u8; 10]).unwrap();
    assert_matches!(Region::open(&path), Err(StrataError::IoTruncated));
}
