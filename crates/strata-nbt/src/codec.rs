use crate::binary::{
    read_byte_array, read_int_array, read_length, read_long_array, read_string, write_byte_array,
    write_int_array, write_length, write_long_array, write_string,
};
use crate::tag::{check_kind, ListTag, Tag, TagKind};
use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use std::collections::HashMap;
use std::io::{Read, Write};
use strata_common::{Result, StrataError};

/// Deepest container nesting accepted in either direction.
pub const MAX_DEPTH: usize = 512;

/// Reads one `[kind][name][payload]` entry. Returns `None` for `End`.
pub fn read_named_tag<B: ByteOrder, R: Read>(reader: &mut R) -> Result<Option<(String, Tag)>> {
    read_entry::<B, R>(reader, 0)
}

/// Reads the document root, where `End` is not allowed.
pub fn read_root<B: ByteOrder, R: Read>(reader: &mut R) -> Result<(String, Tag)> {
    read_named_tag::<B, R>(reader)?.ok_or(StrataError::InvalidTagKind(TagKind::End.id()))
}

fn read_entry<B: ByteOrder, R: Read>(
    reader: &mut R,
    depth: usize,
) -> Result<Option<(String, Tag)>> {
    let kind = TagKind::from_id(reader.read_u8()?)?;
    if kind == TagKind::End {
        return Ok(None);
    }
    let name = read_string::<B, _>(reader)?;
    let tag = read_payload::<B, R>(reader, kind, depth)?;
    Ok(Some((name, tag)))
}

fn read_payload<B: ByteOrder, R: Read>(reader: &mut R, kind: TagKind, depth: usize) -> Result<Tag> {
    match kind {
        TagKind::End => Err(StrataError::InvalidTagKind(TagKind::End.id())),
        TagKind::Byte => Ok(Tag::Byte(reader.read_i8()?)),
        TagKind::Short => Ok(Tag::Short(reader.read_i16::<B>()?)),
        TagKind::Int => Ok(Tag::Int(reader.read_i32::<B>()?)),
        TagKind::Long => Ok(Tag::Long(reader.read_i64::<B>()?)),
        TagKind::Float => Ok(Tag::Float(reader.read_f32::<B>()?)),
        TagKind::Double => Ok(Tag::Double(reader.read_f64::<B>()?)),
        TagKind::ByteArray => Ok(Tag::ByteArray(read_byte_array::<B, _>(reader)?)),
        TagKind::String => Ok(Tag::String(read_string::<B, _>(reader)?)),
        TagKind::IntArray => Ok(Tag::IntArray(read_int_array::<B, _>(reader)?)),
        TagKind::LongArray => Ok(Tag::LongArray(read_long_array::<B, _>(reader)?)),
        TagKind::List => {
            let depth = enter(depth)?;
            let element_kind = TagKind::from_id(reader.read_u8()?)?;
            let length = read_length::<B, _>(reader)?;
            if element_kind == TagKind::End && length > 0 {
                return Err(StrataError::InvalidTagKind(TagKind::End.id()));
            }
            let mut items = Vec::with_capacity(length.min(1024));
            for _ in 0..length {
                items.push(read_payload::<B, R>(reader, element_kind, depth)?);
            }
            Ok(Tag::List(ListTag::from_decoded(element_kind, items)))
        }
        TagKind::Compound => {
            let depth = enter(depth)?;
            let mut compound = HashMap::new();
            while let Some((name, tag)) = read_entry::<B, R>(reader, depth)? {
                compound.insert(name, tag);
            }
            Ok(Tag::Compound(compound))
        }
    }
}

fn enter(depth: usize) -> Result<usize> {
    let depth = depth + 1;
    if depth > MAX_DEPTH {
        return Err(StrataError::DepthLimitExceeded(MAX_DEPTH));
    }
    Ok(depth)
}

/// Writes `[kind][name][payload]`.
pub fn write_named_tag<B: ByteOrder, W: Write>(writer: &mut W, name: &str, tag: &Tag) -> Result<()> {
    write_entry::<B, W>(writer, name, tag, 0)
}

fn write_entry<B: ByteOrder, W: Write>(
    writer: &mut W,
    name: &str,
    tag: &Tag,
    depth: usize,
) -> Result<()> {
    writer.write_u8(tag.kind().id())?;
    write_string::<B, _>(writer, name)?;
    write_payload::<B, W>(writer, tag, depth)
}

fn write_payload<B: ByteOrder, W: Write>(writer: &mut W, tag: &Tag, depth: usize) -> Result<()> {
    match tag {
        Tag::Byte(v) => writer.write_i8(*v)?,
        Tag::Short(v) => writer.write_i16::<B>(*v)?,
        Tag::Int(v) => writer.write_i32::<B>(*v)?,
        Tag::Long(v) => writer.write_i64::<B>(*v)?,
        Tag::Float(v) => writer.write_f32::<B>(*v)?,
        Tag::Double(v) => writer.write_f64::<B>(*v)?,
        Tag::ByteArray(v) => write_byte_array::<B, _>(writer, v)?,
        Tag::String(v) => write_string::<B, _>(writer, v)?,
        Tag::IntArray(v) => write_int_array::<B, _>(writer, v)?,
        Tag::LongArray(v) => write_long_array::<B, _>(writer, v)?,
        Tag::List(list) => {
            let depth = enter(depth)?;
            writer.write_u8(list.element_kind().id())?;
            write_length::<B, _>(writer, list.len())?;
            for item in list {
                check_kind(list.element_kind(), item)?;
                write_payload::<B, W>(writer, item, depth)?;
            }
        }
        Tag::Compound(map) => {
            let depth = enter(depth)?;
            // Sorted so the same tree always encodes to the same bytes.
            let mut names: Vec<&String> = map.keys().collect();
            names.sort();
            for name in names {
                write_entry::<B, W>(writer, name, &map[name], depth)?;
            }
            writer.write_u8(TagKind::End.id())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use byteorder::{BigEndian, LittleEndian};
    use std::io::Cursor;

    fn round_trip<B: ByteOrder>(name: &str, tag: &Tag) -> (String, Tag) {
        let mut buffer = Vec::new();
        write_named_tag::<B, _>(&mut buffer, name, tag).unwrap();
        read_root::<B, _>(&mut Cursor::new(buffer)).unwrap()
    }

    #[test]
    fn test_tag_read_write() {
        let test_cases = vec![
            (Tag::Byte(42), "byte"),
            (Tag::Short(1234), "short"),
            (Tag::Int(12345678), "int"),
            (Tag::Long(123456789012), "long"),
            (Tag::Float(3.14), "float"),
            (Tag::Double(3.14159), "double"),
            (Tag::ByteArray(vec![1, -2, 3]), "bytearray"),
            (Tag::string("Hello, World!"), "string"),
            (
                Tag::List(
                    ListTag::from_tags(TagKind::Int, vec![Tag::Int(1), Tag::Int(2), Tag::Int(3)])
                        .unwrap(),
                ),
                "list",
            ),
            (Tag::IntArray(vec![1, 2, 3]), "intarray"),
            (Tag::LongArray(vec![1, 2, 3]), "longarray"),
        ];

        for (tag, name) in test_cases {
            assert_eq!(round_trip::<BigEndian>(name, &tag), (name.to_string(), tag.clone()));
            assert_eq!(round_trip::<LittleEndian>(name, &tag), (name.to_string(), tag));
        }
    }

    #[test]
    fn test_wire_layout_big_endian() {
        let mut inner = HashMap::new();
        inner.insert("v".to_string(), Tag::Short(258));
        let mut buffer = Vec::new();
        write_named_tag::<BigEndian, _>(&mut buffer, "r", &Tag::Compound(inner)).unwrap();
        assert_eq!(
            buffer,
            vec![
                10, 0, 1, b'r', // compound "r"
                2, 0, 1, b'v', 0x01, 0x02, // short "v" = 258
                0, // end
            ]
        );
    }

    #[test]
    fn test_compound_children_written_in_name_order() {
        let names = ["zeta", "alpha", "Mid", "beta", "a"];
        let mut forward = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            forward.insert(name.to_string(), Tag::Byte(i as i8));
        }
        let mut backward = HashMap::with_capacity(64);
        for (i, name) in names.iter().enumerate().rev() {
            backward.insert(name.to_string(), Tag::Byte(i as i8));
        }

        let mut first = Vec::new();
        write_named_tag::<BigEndian, _>(&mut first, "", &Tag::Compound(forward)).unwrap();
        let mut second = Vec::new();
        write_named_tag::<BigEndian, _>(&mut second, "", &Tag::Compound(backward)).unwrap();
        assert_eq!(first, second);

        // Root header is 3 bytes; each child is kind, u16 length, name, one byte.
        let mut expected = vec![10, 0, 0];
        for name in ["Mid", "a", "alpha", "beta", "zeta"] {
            let i = names.iter().position(|n| *n == name).unwrap();
            expected.extend_from_slice(&[1, 0, name.len() as u8]);
            expected.extend_from_slice(name.as_bytes());
            expected.push(i as u8);
        }
        expected.push(0);
        assert_eq!(first, expected);
    }

    #[test]
    fn test_list_wire_has_no_per_element_kind() {
        let list = ListTag::from_tags(TagKind::Byte, vec![Tag::Byte(7), Tag::Byte(8)]).unwrap();
        let mut buffer = Vec::new();
        write_named_tag::<LittleEndian, _>(&mut buffer, "", &Tag::List(list)).unwrap();
        assert_eq!(buffer, vec![9, 0, 0, 1, 2, 0, 0, 0, 7, 8]);
    }

    #[test]
    fn test_compound_duplicate_names_last_wins() {
        let bytes = vec![
            10, 0, 0, // root compound
            3, 0, 1, b'a', 0, 0, 0, 1, // a = 1
            3, 0, 1, b'a', 0, 0, 0, 2, // a = 2
            0,
        ];
        let (_, tag) = read_root::<BigEndian, _>(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(tag.get_int("a").unwrap(), 2);
    }

    #[test]
    fn test_invalid_tag_kind() {
        let bytes = vec![10, 0, 0, 99, 0, 0];
        assert_matches!(
            read_root::<BigEndian, _>(&mut Cursor::new(bytes)),
            Err(StrataError::InvalidTagKind(99))
        );
    }

    #[test]
    fn test_end_at_top_level_is_invalid() {
        assert_matches!(
            read_root::<BigEndian, _>(&mut Cursor::new(vec![0])),
            Err(StrataError::InvalidTagKind(0))
        );
    }

    #[test]
    fn test_list_of_end_must_be_empty() {
        let empty = vec![9, 0, 0, 0, 0, 0, 0, 0];
        let (_, tag) = read_root::<BigEndian, _>(&mut Cursor::new(empty)).unwrap();
        assert_eq!(tag.as_list().unwrap().element_kind(), TagKind::End);

        let non_empty = vec![9, 0, 0, 0, 0, 0, 0, 1];
        assert_matches!(
            read_root::<BigEndian, _>(&mut Cursor::new(non_empty)),
            Err(StrataError::InvalidTagKind(0))
        );
    }

    #[test]
    fn test_truncated_compound() {
        // Compound with an Int child missing two payload bytes and the End.
        let bytes = vec![10, 0, 0, 3, 0, 1, b'x', 0, 0];
        assert_matches!(
            read_root::<BigEndian, _>(&mut Cursor::new(bytes)),
            Err(StrataError::IoTruncated)
        );
    }

    #[test]
    fn test_depth_limit() {
        // MAX_DEPTH + 1 nested lists of lists.
        let mut bytes = vec![9, 0, 0];
        for _ in 0..MAX_DEPTH {
            bytes.extend_from_slice(&[9, 0, 0, 0, 1]);
        }
        bytes.extend_from_slice(&[0, 0, 0, 0, 0]);
        assert_matches!(
            read_root::<BigEndian, _>(&mut Cursor::new(bytes)),
            Err(StrataError::DepthLimitExceeded(MAX_DEPTH))
        );
    }

    #[test]
    fn test_encode_rejects_list_mutated_out_of_band() {
        let mut list = ListTag::from_tags(TagKind::Int, vec![Tag::Int(1)]).unwrap();
        *list.get_mut(0).unwrap() = Tag::string("sneaky");
        let mut buffer = Vec::new();
        assert_matches!(
            write_named_tag::<BigEndian, _>(&mut buffer, "", &Tag::List(list)),
            Err(StrataError::ListKindMismatch { .. })
        );
    }

    #[test]
    fn test_empty_list() {
        let tag = Tag::empty_list(TagKind::Compound);
        let (name, read_tag) = round_trip::<BigEndian>("empty", &tag);
        assert_eq!(name, "empty");
        assert_eq!(read_tag, tag);
    }
}
