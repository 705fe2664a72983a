use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;
use strata_common::{Result, StrataError};

/// Byte order used for every multi-byte scalar and length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Big,
    Little,
}

/// Envelope around the whole tag stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Gzip,
    Zlib,
}

impl Compression {
    /// Maps a region entry's compression byte. `0` is accepted as an alias of
    /// the uncompressed scheme `3`.
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 | 3 => Ok(Compression::None),
            1 => Ok(Compression::Gzip),
            2 => Ok(Compression::Zlib),
            other => Err(StrataError::UnsupportedCompression(other)),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Compression::Gzip => 1,
            Compression::Zlib => 2,
            Compression::None => 3,
        }
    }

    /// Inflates everything the reader yields into memory.
    pub fn decompress<R: Read>(self, reader: R) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        match self {
            Compression::None => {
                let mut reader = reader;
                reader.read_to_end(&mut buffer)?;
            }
            Compression::Gzip => {
                GzDecoder::new(reader).read_to_end(&mut buffer)?;
            }
            Compression::Zlib => {
                ZlibDecoder::new(reader).read_to_end(&mut buffer)?;
            }
        }
        Ok(buffer)
    }

    pub fn compress<W: Write>(self, writer: W, data: &[u8]) -> Result<()> {
        match self {
            Compression::None => {
                let mut writer = writer;
                writer.write_all(data)?;
                writer.flush()?;
            }
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(writer, flate2::Compression::default());
                encoder.write_all(data)?;
                encoder.finish()?;
            }
            Compression::Zlib => {
                let mut encoder = ZlibEncoder::new(writer, flate2::Compression::default());
                encoder.write_all(data)?;
                encoder.finish()?;
            }
        }
        Ok(())
    }
}

/// Endianness, compression and header size governing one codec call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializationProfile {
    pub endian: Endian,
    pub compression: Compression,
    #[serde(default)]
    pub header_size: usize,
}

impl SerializationProfile {
    /// Java edition files: big-endian, gzip, no header.
    pub const JAVA: SerializationProfile = SerializationProfile {
        endian: Endian::Big,
        compression: Compression::Gzip,
        header_size: 0,
    };

    /// Bedrock edition files: little-endian, raw, 4-byte version plus 4 reserved bytes.
    pub const BEDROCK: SerializationProfile = SerializationProfile {
        endian: Endian::Little,
        compression: Compression::None,
        header_size: 8,
    };

    pub fn new(endian: Endian, compression: Compression, header_size: usize) -> Self {
        SerializationProfile {
            endian,
            compression,
            header_size,
        }
    }

    /// A header must at least hold the 32-bit version field.
    pub fn validate(&self) -> Result<()> {
        if self.header_size > 0 && self.header_size < 4 {
            return Err(StrataError::InvalidProfile(format!(
                "header size {} cannot hold the 4-byte version",
                self.header_size
            )));
        }
        Ok(())
    }

    /// Loads a profile from a JSON document such as
    /// `{"endian":"little","compression":"none","header_size":8}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: SerializationProfile = serde_json::from_str(json)
            .map_err(|e| StrataError::InvalidProfile(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }
}

impl Default for SerializationProfile {
    fn default() -> Self {
        SerializationProfile::JAVA
    }
}

impl FromStr for SerializationProfile {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "java" => Ok(SerializationProfile::JAVA),
            "bedrock" => Ok(SerializationProfile::BEDROCK),
            other => Err(StrataError::InvalidProfile(format!(
                "unknown profile name: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_compression_ids() {
        assert_eq!(Compression::from_id(0).unwrap(), Compression::None);
        assert_eq!(Compression::from_id(1).unwrap(), Compression::Gzip);
        assert_eq!(Compression::from_id(2).unwrap(), Compression::Zlib);
        assert_eq!(Compression::from_id(3).unwrap(), Compression::None);
        assert_matches!(
            Compression::from_id(4),
            Err(StrataError::UnsupportedCompression(4))
        );
        assert_matches!(
            Compression::from_id(130),
            Err(StrataError::UnsupportedCompression(130))
        );
    }

    #[test]
    fn test_compress_decompress() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(8);
        for compression in [Compression::None, Compression::Gzip, Compression::Zlib] {
            let mut packed = Vec::new();
            compression.compress(&mut packed, &data).unwrap();
            if compression != Compression::None {
                assert!(packed.len() < data.len());
            }
            let unpacked = compression.decompress(packed.as_slice()).unwrap();
            assert_eq!(unpacked, data);
        }
    }

    #[test]
    fn test_named_profiles() {
        assert_eq!(
            "java".parse::<SerializationProfile>().unwrap(),
            SerializationProfile::JAVA
        );
        assert_eq!(
            "Bedrock".parse::<SerializationProfile>().unwrap(),
            SerializationProfile::BEDROCK
        );
        assert_matches!(
            "pocket".parse::<SerializationProfile>(),
            Err(StrataError::InvalidProfile(_))
        );
    }

    #[test]
    fn test_profile_from_json() {
        let profile = SerializationProfile::from_json(
            r#"{"endian":"little","compression":"none","header_size":8}"#,
        )
        .unwrap();
        assert_eq!(profile, SerializationProfile::BEDROCK);

        let profile =
            SerializationProfile::from_json(r#"{"endian":"big","compression":"zlib"}"#).unwrap();
        assert_eq!(profile.header_size, 0);
        assert_eq!(profile.compression, Compression::Zlib);

        assert_matches!(
            SerializationProfile::from_json(r#"{"endian":"middle","compression":"none"}"#),
            Err(StrataError::InvalidProfile(_))
        );
    }

    #[test]
    fn test_validate_rejects_short_header() {
        let profile = SerializationProfile::new(Endian::Little, Compression::None, 2);
        assert_matches!(profile.validate(), Err(StrataError::InvalidProfile(_)));
        assert!(SerializationProfile::BEDROCK.validate().is_ok());
        assert!(SerializationProfile::JAVA.validate().is_ok());
    }
}
