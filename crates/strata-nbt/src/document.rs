use crate::codec::{read_root, write_named_tag};
use crate::profile::{Endian, SerializationProfile};
use crate::tag::Tag;
use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;
use strata_common::{Result, StrataError};
use strata_logger::{log, LogSeverity};

/// A complete tag file: header version, root name and root tag.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtDocument {
    /// Only stored by profiles with a header; reads as 0 otherwise.
    pub version: i32,
    pub name: String,
    pub root: Tag,
}

impl NbtDocument {
    pub fn new(name: impl Into<String>, root: Tag) -> Self {
        NbtDocument {
            version: 0,
            name: name.into(),
            root,
        }
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Inflates the whole source, then decodes the header and root tag.
    pub fn read<R: Read>(reader: R, profile: &SerializationProfile) -> Result<Self> {
        profile.validate()?;
        let buffer = profile.compression.decompress(reader)?;
        match profile.endian {
            Endian::Big => Self::decode::<BigEndian>(&buffer, profile.header_size),
            Endian::Little => Self::decode::<LittleEndian>(&buffer, profile.header_size),
        }
    }

    pub fn from_bytes(bytes: &[u8], profile: &SerializationProfile) -> Result<Self> {
        Self::read(bytes, profile)
    }

    fn decode<B: ByteOrder>(buffer: &[u8], header_size: usize) -> Result<Self> {
        let mut cursor = Cursor::new(buffer);
        let mut version = 0;
        if header_size > 0 {
            version = cursor.read_i32::<B>()?;
            if buffer.len() < header_size {
                return Err(StrataError::IoTruncated);
            }
            cursor.set_position(header_size as u64);
        }
        let (name, root) = read_root::<B, _>(&mut cursor)?;
        Ok(NbtDocument {
            version,
            name,
            root,
        })
    }

    /// Encodes header and root into memory, then writes them through the
    /// profile's compression.
    pub fn write<W: Write>(&self, writer: W, profile: &SerializationProfile) -> Result<()> {
        let buffer = self.encode(profile)?;
        profile.compression.compress(writer, &buffer)
    }

    pub fn to_bytes(&self, profile: &SerializationProfile) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out, profile)?;
        Ok(out)
    }

    fn encode(&self, profile: &SerializationProfile) -> Result<Vec<u8>> {
        profile.validate()?;
        let mut buffer = Vec::new();
        match profile.endian {
            Endian::Big => self.encode_into::<BigEndian>(&mut buffer, profile.header_size)?,
            Endian::Little => self.encode_into::<LittleEndian>(&mut buffer, profile.header_size)?,
        }
        Ok(buffer)
    }

    fn encode_into<B: ByteOrder>(&self, buffer: &mut Vec<u8>, header_size: usize) -> Result<()> {
        if header_size > 0 {
            buffer.write_i32::<B>(self.version)?;
            buffer.resize(header_size, 0);
        }
        write_named_tag::<B, _>(buffer, &self.name, &self.root)
    }

    pub fn read_file<P: AsRef<Path>>(path: P, profile: &SerializationProfile) -> Result<Self> {
        let path = path.as_ref();
        log(
            format!("Reading tag document {}", path.display()),
            LogSeverity::Debug,
        );
        let file = File::open(path)?;
        Self::read(BufReader::new(file), profile)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P, profile: &SerializationProfile) -> Result<()> {
        let path = path.as_ref();
        log(
            format!("Writing tag document {}", path.display()),
            LogSeverity::Debug,
        );
        // An encode error must leave an existing file untouched.
        let buffer = self.encode(profile)?;
        let mut writer = BufWriter::new(File::create(path)?);
        profile.compression.compress(&mut writer, &buffer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_java_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_file(path, &SerializationProfile::JAVA)
    }

    pub fn read_bedrock_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_file(path, &SerializationProfile::BEDROCK)
    }

    pub fn write_java_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_file(path, &SerializationProfile::JAVA)
    }

    pub fn write_bedrock_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_file(path, &SerializationProfile::BEDROCK)
    }

    pub fn get_tag(&self, path: &str) -> Result<&Tag> {
        self.root.get_tag(path)
    }

    pub fn set_tag(&mut self, path: &str, value: Tag) -> Result<()> {
        self.root.set_tag(path, value)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.root.contains(path)
    }
}
