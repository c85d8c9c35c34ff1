//! FPK entries and references

use super::error::{FpkError, FpkResult};
use super::header::StringHeader;
use crate::util;
use binrw::{BinRead, BinWrite};
use foxkit_crypto::fpk;
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Size of an entry record
pub const ENTRY_RECORD_SIZE: u64 = 48;

/// Size of a reference record
pub const REFERENCE_RECORD_SIZE: u64 = 16;

/// On-disk entry record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct EntryRecord {
    /// Absolute payload offset
    #[brw(pad_after = 4)]
    pub data_offset: u32,
    /// Payload size as stored
    #[brw(pad_after = 4)]
    pub data_size: u32,
    /// Location of the path string
    pub file_path: StringHeader,
    /// MD5 of the path string
    pub path_md5: [u8; 16],
}

/// Read a string stored at `header.offset`, restoring the stream position
fn read_string<R: Read + Seek>(reader: &mut R, header: StringHeader) -> FpkResult<String> {
    let restore = reader.stream_position()?;
    reader.seek(SeekFrom::Start(u64::from(header.offset)))?;
    let mut buf = vec![0u8; header.length as usize];
    reader.read_exact(&mut buf)?;
    reader.seek(SeekFrom::Start(restore))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// MD5 of a path string as stored in entry records
pub fn path_digest(path: &str) -> [u8; 16] {
    md5::compute(path.as_bytes()).0
}

/// A file stored in the package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FpkEntry {
    /// Path of the file inside the package
    pub file_path: String,
    /// MD5 of `file_path`
    pub path_md5: [u8; 16],
    /// Unknown words of the path string header, written back unchanged
    pub path_unknown: [u32; 2],
    /// Payload offset, recomputed on write
    pub data_offset: u32,
    /// Payload size as stored, recomputed on write
    pub data_size: u32,
    /// Whether the payload is stored with the FPK cipher
    pub encrypted: bool,
    /// Plain payload; loaded from disk on write when empty
    pub data: Vec<u8>,
}

impl FpkEntry {
    /// Create an entry to be packed from `file_path`
    pub fn new(file_path: impl Into<String>, encrypted: bool) -> Self {
        let file_path = file_path.into();
        Self {
            path_md5: path_digest(&file_path),
            file_path,
            encrypted,
            ..Self::default()
        }
    }

    /// Read an entry record at the current position, along with its path and payload
    ///
    /// A payload that carries the cipher marker but fails to decrypt is kept
    /// as-is and reported as not encrypted.
    pub fn read<R: Read + Seek>(reader: &mut R) -> FpkResult<Self> {
        let record = EntryRecord::read(reader)?;
        let file_path = read_string(reader, record.file_path)?;

        let mut entry = Self {
            file_path,
            path_md5: record.path_md5,
            path_unknown: record.file_path.unknown(),
            data_offset: record.data_offset,
            data_size: record.data_size,
            ..Self::default()
        };

        if record.data_size > 0 {
            let restore = reader.stream_position()?;
            reader.seek(SeekFrom::Start(u64::from(record.data_offset)))?;
            let mut raw = vec![0u8; record.data_size as usize];
            reader.read_exact(&mut raw)?;
            reader.seek(SeekFrom::Start(restore))?;

            entry.data = raw;
            if fpk::is_encrypted(&entry.data) {
                match fpk::decrypt(&entry.data, &entry.file_path) {
                    Ok(plain) => {
                        entry.data = plain;
                        entry.encrypted = true;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Keeping {} as plain data, decryption failed: {e}",
                            entry.file_path
                        );
                    }
                }
            }
        }

        tracing::debug!("Read FPK entry {} ({} bytes)", entry.file_path, entry.data.len());
        Ok(entry)
    }

    /// Load the payload from `base_dir` when none is held in memory
    pub fn load_data(&mut self, base_dir: &Path) -> FpkResult<()> {
        if self.data.is_empty() {
            self.data = fs::read(base_dir.join(self.relative_path()?))?;
        }
        Ok(())
    }

    /// Payload bytes as they are written to the package
    pub fn stored_data(&self) -> Vec<u8> {
        if self.encrypted {
            fpk::encrypt(&self.data, &self.file_path)
        } else {
            self.data.clone()
        }
    }

    /// Path relative to an extraction or source directory
    pub fn relative_path(&self) -> FpkResult<PathBuf> {
        util::relative_path(&self.file_path)
            .ok_or_else(|| FpkError::InvalidPath(self.file_path.clone()))
    }

    pub(crate) fn record(&self, file_path: StringHeader) -> EntryRecord {
        let path_md5 = if self.path_md5 == [0u8; 16] {
            path_digest(&self.file_path)
        } else {
            self.path_md5
        };
        EntryRecord {
            data_offset: self.data_offset,
            data_size: self.data_size,
            file_path,
            path_md5,
        }
    }
}

/// A path the package depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FpkReference {
    /// Referenced path
    pub file_path: String,
    /// Unknown words of the path string header, written back unchanged
    pub path_unknown: [u32; 2],
}

impl FpkReference {
    /// Create a reference
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            path_unknown: [0; 2],
        }
    }

    /// Read a reference record at the current position
    pub fn read<R: Read + Seek>(reader: &mut R) -> FpkResult<Self> {
        let header = StringHeader::read(reader)?;
        Ok(Self {
            file_path: read_string(reader, header)?,
            path_unknown: header.unknown(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    #[test]
    fn test_record_layout() {
        let record = EntryRecord {
            data_offset: 0x100,
            data_size: 0x20,
            file_path: StringHeader {
                offset: 0x40,
                unknown1: 0x11,
                length: 7,
                unknown2: 0x22,
            },
            path_md5: [0xAA; 16],
        };
        let mut cursor = Cursor::new(Vec::new());
        record.write(&mut cursor).expect("write should succeed");
        let bytes = cursor.into_inner();
        assert_eq!(bytes.len(), ENTRY_RECORD_SIZE as usize);
        assert_eq!(&bytes[0..4], &0x100u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &0x20u32.to_le_bytes());
        assert_eq!(&bytes[16..20], &0x40u32.to_le_bytes());
        assert_eq!(&bytes[20..24], &0x11u32.to_le_bytes());
        assert_eq!(&bytes[24..28], &7u32.to_le_bytes());
        assert_eq!(&bytes[28..32], &0x22u32.to_le_bytes());
        assert_eq!(&bytes[32..], &[0xAA; 16]);
    }

    #[test]
    fn test_path_digest() {
        let entry = FpkEntry::new("/Assets/a.lua", false);
        assert_eq!(entry.path_md5, path_digest("/Assets/a.lua"));
        assert_eq!(hex::encode(path_digest("")), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_stored_data() {
        let mut entry = FpkEntry::new("/Assets/tpp/script/mission/mission_main.lua", true);
        entry.data = b"local this = {}".to_vec();
        let stored = entry.stored_data();
        assert_eq!(stored[0], 0x1B);
        assert_eq!(fpk::decrypt(&stored, &entry.file_path).unwrap(), entry.data);

        entry.encrypted = false;
        assert_eq!(entry.stored_data(), entry.data);
    }

    #[test]
    fn test_load_data() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        fs::create_dir_all(dir.path().join("Assets")).unwrap();
        fs::write(dir.path().join("Assets/a.lua"), b"disk").unwrap();

        let mut entry = FpkEntry::new("/Assets/a.lua", false);
        entry.load_data(dir.path()).expect("load should succeed");
        assert_eq!(entry.data, b"disk");

        entry.data = b"memory".to_vec();
        entry.load_data(dir.path()).unwrap();
        assert_eq!(entry.data, b"memory");
    }
}
