//! LNG header
//!
//! The magic and the endianness marker are always little-endian; every other
//! field follows the marker.

use super::error::{LngError, LngResult};
use binrw::{BinReaderExt, BinWriterExt, Endian};
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek, Write};

/// `"LANG"` read as a little-endian word
pub const LNG_MAGIC: u32 = 0x474E_414C;

/// Size of the header
pub const HEADER_SIZE: u64 = 24;

/// Ground Zeroes tables
pub const VERSION_GZ: u32 = 2;

/// The Phantom Pain tables
pub const VERSION_TPP: u32 = 3;

const MARKER_LE: u32 = 0x454C;
const MARKER_BE: u32 = 0x4542;

/// Byte order of a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endianness {
    /// Little-endian
    #[default]
    #[serde(rename = "LE")]
    Little,
    /// Big-endian
    #[serde(rename = "BE")]
    Big,
}

impl Endianness {
    const fn marker(self) -> u32 {
        match self {
            Self::Little => MARKER_LE,
            Self::Big => MARKER_BE,
        }
    }

    /// binrw byte order
    pub const fn endian(self) -> Endian {
        match self {
            Self::Little => Endian::Little,
            Self::Big => Endian::Big,
        }
    }
}

/// LNG header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LngHeader {
    /// [`VERSION_GZ`] or [`VERSION_TPP`]
    pub version: u32,
    /// Byte order of the rest of the file
    pub endianness: Endianness,
    /// Number of entries
    pub entry_count: u32,
    /// Offset of the values region
    pub values_offset: u32,
    /// Offset of the keys region
    pub keys_offset: u32,
}

impl LngHeader {
    /// Read and validate a header
    pub fn read<R: Read + Seek>(reader: &mut R) -> LngResult<Self> {
        let magic: u32 = reader.read_le()?;
        if magic != LNG_MAGIC {
            return Err(LngError::InvalidMagic(magic));
        }
        let raw_version: [u8; 4] = reader.read_le()?;
        let marker: u32 = reader.read_le()?;
        let endianness = match marker {
            MARKER_LE => Endianness::Little,
            MARKER_BE => Endianness::Big,
            other => return Err(LngError::InvalidEndianness(other)),
        };
        let version = match endianness {
            Endianness::Little => u32::from_le_bytes(raw_version),
            Endianness::Big => u32::from_be_bytes(raw_version),
        };
        if version != VERSION_GZ && version != VERSION_TPP {
            return Err(LngError::InvalidVersion(version));
        }

        let endian = endianness.endian();
        Ok(Self {
            version,
            endianness,
            entry_count: reader.read_type(endian)?,
            values_offset: reader.read_type(endian)?,
            keys_offset: reader.read_type(endian)?,
        })
    }

    /// Write the header
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> LngResult<()> {
        let endian = self.endianness.endian();
        writer.write_le(&LNG_MAGIC)?;
        writer.write_type(&self.version, endian)?;
        writer.write_le(&self.endianness.marker())?;
        writer.write_type(&self.entry_count, endian)?;
        writer.write_type(&self.values_offset, endian)?;
        writer.write_type(&self.keys_offset, endian)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_big_endian_header() {
        let header = LngHeader {
            version: VERSION_TPP,
            endianness: Endianness::Big,
            entry_count: 92,
            values_offset: 24,
            keys_offset: 3692,
        };
        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).unwrap();
        let bytes = cursor.into_inner();

        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[0..4], b"LANG");
        assert_eq!(&bytes[4..8], &[0, 0, 0, 3]);
        assert_eq!(&bytes[8..10], b"BE");
        assert_eq!(&bytes[12..16], &[0, 0, 0, 92]);

        let read = LngHeader::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read, header);
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut bytes = b"LANG".to_vec();
        bytes.extend(2u32.to_le_bytes());
        bytes.extend(b"XX\0\0");
        bytes.extend([0u8; 12]);
        assert!(matches!(
            LngHeader::read(&mut Cursor::new(bytes.clone())),
            Err(LngError::InvalidEndianness(_))
        ));

        bytes[8..10].copy_from_slice(b"LE");
        bytes[4] = 9;
        assert!(matches!(
            LngHeader::read(&mut Cursor::new(bytes.clone())),
            Err(LngError::InvalidVersion(9))
        ));

        bytes[0] = b'X';
        assert!(matches!(
            LngHeader::read(&mut Cursor::new(bytes)),
            Err(LngError::InvalidMagic(_))
        ));
    }
}
