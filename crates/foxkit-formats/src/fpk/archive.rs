//! FPK package reading, extraction and writing

use super::entry::{ENTRY_RECORD_SIZE, FpkEntry, FpkReference, REFERENCE_RECORD_SIZE};
use super::error::{FpkError, FpkResult};
use super::header::{FpkHeader, FpkKind, HEADER_SIZE, StringHeader};
use crate::util::align_write;
use binrw::{BinRead, BinWrite};
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Alignment of the string block and of every payload
const ALIGNMENT: u64 = 16;

/// An FPK or FPKD package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fpk {
    /// Package variant
    pub kind: FpkKind,
    /// Files in the package
    pub entries: Vec<FpkEntry>,
    /// Paths the package depends on
    pub references: Vec<FpkReference>,
}

fn to_u32(value: u64) -> FpkResult<u32> {
    u32::try_from(value).map_err(|_| FpkError::PackageTooLarge(value))
}

impl Fpk {
    /// Create an empty package
    pub fn new(kind: FpkKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Package variant
    pub fn kind(&self) -> FpkKind {
        self.kind
    }

    /// Parse a package, payloads included
    pub fn read<R: Read + Seek>(reader: &mut R) -> FpkResult<Self> {
        let header = FpkHeader::read(reader)?;

        let mut entries = Vec::with_capacity(header.entry_count as usize);
        for _ in 0..header.entry_count {
            entries.push(FpkEntry::read(reader)?);
        }

        let mut references = Vec::with_capacity(header.reference_count as usize);
        for _ in 0..header.reference_count {
            references.push(FpkReference::read(reader)?);
        }

        tracing::info!(
            "Read {} package: {} entries, {} references",
            header.kind(),
            entries.len(),
            references.len()
        );

        Ok(Self {
            kind: header.kind(),
            entries,
            references,
        })
    }

    /// Open and parse a package file
    pub fn open(path: impl AsRef<Path>) -> FpkResult<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read(&mut reader)
    }

    /// Find an entry by its exact stored path
    pub fn find(&self, path: &str) -> Option<&FpkEntry> {
        self.entries.iter().find(|e| e.file_path == path)
    }

    /// Write one entry's payload to `writer`
    pub fn extract_to<W: Write>(&self, path: &str, writer: &mut W) -> FpkResult<usize> {
        let entry = self
            .find(path)
            .ok_or_else(|| FpkError::EntryNotFound(path.to_string()))?;
        writer.write_all(&entry.data)?;
        Ok(entry.data.len())
    }

    /// Write one entry's payload to `out_dir/<path>`, creating parent directories
    pub fn extract(&self, path: &str, out_dir: &Path) -> FpkResult<PathBuf> {
        let entry = self
            .find(path)
            .ok_or_else(|| FpkError::EntryNotFound(path.to_string()))?;
        let target = out_dir.join(entry.relative_path()?);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &entry.data)?;
        Ok(target)
    }

    /// Write the package
    ///
    /// Path strings go first, right after the record tables, then the
    /// 16-byte aligned payloads. Records are written last, once every offset
    /// is known. Entries without in-memory data are loaded from `base_dir`.
    pub fn write<W: Write + Seek>(&mut self, writer: &mut W, base_dir: &Path) -> FpkResult<()> {
        let tables = HEADER_SIZE
            + self.entries.len() as u64 * ENTRY_RECORD_SIZE
            + self.references.len() as u64 * REFERENCE_RECORD_SIZE;
        writer.seek(SeekFrom::Start(tables))?;

        let mut entry_strings = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            entry_strings.push(write_string(writer, &entry.file_path, entry.path_unknown)?);
        }
        let mut reference_strings = Vec::with_capacity(self.references.len());
        for reference in &self.references {
            reference_strings.push(write_string(
                writer,
                &reference.file_path,
                reference.path_unknown,
            )?);
        }
        align_write(writer, ALIGNMENT)?;

        for entry in &mut self.entries {
            entry.load_data(base_dir)?;
            let stored = entry.stored_data();
            entry.data_offset = to_u32(writer.stream_position()?)?;
            entry.data_size = to_u32(stored.len() as u64)?;
            writer.write_all(&stored)?;
            align_write(writer, ALIGNMENT)?;
            tracing::debug!("Wrote FPK entry {} ({} bytes)", entry.file_path, stored.len());
        }

        let end = writer.stream_position()?;
        let mut header = FpkHeader::new(self.kind);
        header.file_size = to_u32(end)?;
        header.entry_count = to_u32(self.entries.len() as u64)?;
        header.reference_count = to_u32(self.references.len() as u64)?;

        writer.seek(SeekFrom::Start(0))?;
        header.write(writer)?;
        for (entry, string) in self.entries.iter_mut().zip(entry_strings) {
            let record = entry.record(string);
            entry.path_md5 = record.path_md5;
            record.write(writer)?;
        }
        for string in reference_strings {
            string.write(writer)?;
        }
        writer.seek(SeekFrom::Start(end))?;

        tracing::info!(
            "Wrote {} package: {} entries, {} references, {end} bytes",
            self.kind,
            self.entries.len(),
            self.references.len()
        );
        Ok(())
    }
}

/// Write a NUL-terminated string at the current position
fn write_string<W: Write + Seek>(
    writer: &mut W,
    text: &str,
    unknown: [u32; 2],
) -> FpkResult<StringHeader> {
    let header = StringHeader {
        offset: to_u32(writer.stream_position()?)?,
        unknown1: unknown[0],
        length: to_u32(text.len() as u64)?,
        unknown2: unknown[1],
    };
    writer.write_all(text.as_bytes())?;
    writer.write_all(&[0])?;
    Ok(header)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;
    use pretty_assertions::assert_eq;

    const MISSION: &str = "/Assets/tpp/script/mission/mission_main.lua";

    fn sample() -> Fpk {
        let mut fpk = Fpk::new(FpkKind::Fpkd);
        let mut plain = FpkEntry::new("/Assets/tpp/level/a.fox2", false);
        plain.data = vec![1, 2, 3, 4, 5];
        let mut secret = FpkEntry::new(MISSION, true);
        secret.data = b"local this = {}\nreturn this\n".to_vec();
        fpk.entries = vec![plain, secret];
        fpk.references = vec![FpkReference::new("/Assets/tpp/pack/common.fpk")];
        fpk
    }

    fn write(fpk: &mut Fpk) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        fpk.write(&mut cursor, Path::new(".")).expect("write should succeed");
        cursor.into_inner()
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = write(&mut sample());
        let full = Fpk::read(&mut Cursor::new(bytes.clone())).unwrap();
        bytes.truncate(full.entries[1].data_offset as usize + 4);

        let err = Fpk::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            FpkError::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn test_string_header_words_survive_repack() {
        let mut fpk = sample();
        fpk.entries[0].path_unknown = [3, 0xFFFF_FFFF];
        fpk.references[0].path_unknown = [0, 9];
        let bytes = write(&mut fpk);

        let mut read = Fpk::read(&mut Cursor::new(bytes.clone())).unwrap();
        assert_eq!(read.entries[0].path_unknown, [3, 0xFFFF_FFFF]);
        assert_eq!(read.entries[1].path_unknown, [0, 0]);
        assert_eq!(read.references[0].path_unknown, [0, 9]);
        assert_eq!(write(&mut read), bytes);
    }

    #[test]
    fn test_round_trip() {
        let mut fpk = sample();
        let bytes = write(&mut fpk);
        let read = Fpk::read(&mut Cursor::new(bytes)).expect("read should succeed");
        assert_eq!(read, fpk);
    }

    #[test]
    fn test_layout() {
        let mut fpk = sample();
        let bytes = write(&mut fpk);

        let header = FpkHeader::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(header.file_size as usize, bytes.len());
        assert_eq!(header.entry_count, 2);
        assert_eq!(header.reference_count, 1);

        // strings start right after the tables
        let tables = 48 + 2 * 48 + 16;
        let first = &bytes[tables..tables + 24];
        assert_eq!(first, b"/Assets/tpp/level/a.fox2");
        assert_eq!(bytes[tables + 24], 0);

        for entry in &fpk.entries {
            assert_eq!(entry.data_offset % 16, 0);
        }
        assert_eq!(bytes.len() % 16, 0);
        assert_eq!(bytes[fpk.entries[1].data_offset as usize], 0x1B);
    }

    #[test]
    fn test_extract() {
        let mut fpk = sample();
        let bytes = write(&mut fpk);
        let read = Fpk::read(&mut Cursor::new(bytes)).unwrap();

        let mut out = Vec::new();
        read.extract_to(MISSION, &mut out).expect("extract should succeed");
        assert_eq!(out, b"local this = {}\nreturn this\n");
        assert!(matches!(
            read.extract_to("/missing.lua", &mut out),
            Err(FpkError::EntryNotFound(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let target = read.extract(MISSION, dir.path()).unwrap();
        assert_eq!(target, dir.path().join(&MISSION[1..]));
        assert_eq!(fs::read(target).unwrap(), out);
    }

    #[test]
    fn test_malformed_cipher_falls_back_to_raw() {
        let mut fpk = Fpk::new(FpkKind::Fpk);
        let mut entry = FpkEntry::new("/a.lua", false);
        // starts with the marker but is not a valid ciphertext
        entry.data = vec![0x1B, 0x01];
        fpk.entries.push(entry);
        let bytes = write(&mut fpk);

        let read = Fpk::read(&mut Cursor::new(bytes)).unwrap();
        let raw = &read.entries[0];
        assert!(!raw.encrypted);
        assert_eq!(raw.data, vec![0x1B, 0x01]);
    }

    #[test]
    fn test_empty_package() {
        let mut fpk = Fpk::new(FpkKind::Fpk);
        let bytes = write(&mut fpk);
        assert_eq!(bytes.len(), 48);
        let read = Fpk::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read.kind(), FpkKind::Fpk);
        assert!(read.entries.is_empty());
    }
}
