//! Length-prefixed strings and arrays on top of `byteorder`.
//!
//! Scalars go straight through `ReadBytesExt`/`WriteBytesExt`; this module
//! adds the prefixed shapes. Every function is generic over the byte order so
//! callers dispatch on the profile's endianness once, at the top.

use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use strata_common::{Result, StrataError};

/// Upper bound on speculative allocation for a length read off the wire.
const PREALLOC_LIMIT: usize = 64 * 1024;

/// Reads a non-negative `i32` element count.
pub fn read_length<B: ByteOrder, R: Read>(reader: &mut R) -> Result<usize> {
    let length = reader.read_i32::<B>()?;
    if length < 0 {
        return Err(StrataError::InvalidData(format!(
            "negative length prefix: {}",
            length
        )));
    }
    Ok(length as usize)
}

pub fn write_length<B: ByteOrder, W: Write>(writer: &mut W, length: usize) -> Result<()> {
    let length = i32::try_from(length).map_err(|_| {
        StrataError::InvalidData(format!("length {} does not fit an i32 prefix", length))
    })?;
    writer.write_i32::<B>(length)?;
    Ok(())
}

/// Reads exactly `length` bytes, failing with `IoTruncated` on a short source.
pub fn read_bytes<R: Read>(reader: &mut R, length: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(length.min(PREALLOC_LIMIT));
    let read = reader.by_ref().take(length as u64).read_to_end(&mut bytes)?;
    if read != length {
        return Err(StrataError::IoTruncated);
    }
    Ok(bytes)
}

pub fn read_string<B: ByteOrder, R: Read>(reader: &mut R) -> Result<String> {
    let length = reader.read_u16::<B>()? as usize;
    let bytes = read_bytes(reader, length)?;
    String::from_utf8(bytes).map_err(|e| StrataError::InvalidData(e.to_string()))
}

/// Writes the UTF-8 byte length as a `u16`, then the bytes.
pub fn write_string<B: ByteOrder, W: Write>(writer: &mut W, value: &str) -> Result<()> {
    let length = u16::try_from(value.len()).map_err(|_| {
        StrataError::InvalidData(format!(
            "string of {} bytes exceeds the u16 length prefix",
            value.len()
        ))
    })?;
    writer.write_u16::<B>(length)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

pub fn read_byte_array<B: ByteOrder, R: Read>(reader: &mut R) -> Result<Vec<i8>> {
    let length = read_length::<B, _>(reader)?;
    let bytes = read_bytes(reader, length)?;
    Ok(bytes.into_iter().map(|b| b as i8).collect())
}

pub fn write_byte_array<B: ByteOrder, W: Write>(writer: &mut W, value: &[i8]) -> Result<()> {
    write_length::<B, _>(writer, value.len())?;
    let bytes: Vec<u8> = value.iter().map(|&b| b as u8).collect();
    writer.write_all(&bytes)?;
    Ok(())
}

pub fn read_int_array<B: ByteOrder, R: Read>(reader: &mut R) -> Result<Vec<i32>> {
    let length = read_length::<B, _>(reader)?;
    let mut ints = Vec::with_capacity(length.min(PREALLOC_LIMIT));
    for _ in 0..length {
        ints.push(reader.read_i32::<B>()?);
    }
    Ok(ints)
}

pub fn write_int_array<B: ByteOrder, W: Write>(writer: &mut W, value: &[i32]) -> Result<()> {
    write_length::<B, _>(writer, value.len())?;
    for &i in value {
        writer.write_i32::<B>(i)?;
    }
    Ok(())
}

pub fn read_long_array<B: ByteOrder, R: Read>(reader: &mut R) -> Result<Vec<i64>> {
    let length = read_length::<B, _>(reader)?;
    let mut longs = Vec::with_capacity(length.min(PREALLOC_LIMIT));
    for _ in 0..length {
        longs.push(reader.read_i64::<B>()?);
    }
    Ok(longs)
}

pub fn write_long_array<B: ByteOrder, W: Write>(writer: &mut W, value: &[i64]) -> Result<()> {
    write_length::<B, _>(writer, value.len())?;
    for &l in value {
        writer.write_i64::<B>(l)?;
    }
    Ok(())
}
