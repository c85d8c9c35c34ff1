//! QAR archive reading, extraction and writing

use super::entry::{ENTRY_HEADER_SIZE, QarEntry};
use super::error::{QarError, QarResult};
use super::header::{HEADER_SIZE, QarHeader};
use crate::util::{self, align_write, read_up_to};
use binrw::{BinRead, BinWrite};
use foxkit_crypto::Dictionary;
use foxkit_crypto::section::{SECTION_SIZE, decrypt_sections, encrypt_sections};
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Pack an entry position and hash into a section word
pub fn pack_section(position: u64, shift: u32, hash: u64) -> u64 {
    ((position >> shift) << 40) | ((hash & 0xFF) << 32) | ((hash >> 32) & 0xFF_FFFF_FFFF)
}

/// Byte offset encoded in a section word
pub fn section_offset(section: u64, shift: u32) -> u64 {
    (section >> 40) << shift
}

/// Whether a section word carries the hash fragments of `hash`
pub fn section_matches(section: u64, hash: u64) -> bool {
    section & 0xFFFF_FFFF == hash >> 32 && (section >> 32) & 0xFF == hash & 0xFF
}

/// Turn an archive path into a path relative to an extraction or source directory
pub fn relative_path(file_path: &str) -> QarResult<PathBuf> {
    util::relative_path(file_path).ok_or_else(|| QarError::InvalidPath(file_path.to_string()))
}

/// A QAR archive
///
/// Reading decodes the header, section table and every entry header. Entry
/// payloads stay on disk; extraction reads them through the same reader that
/// was used to parse the archive, which must stay open for as long as the
/// archive is in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qar {
    /// Archive header
    pub header: QarHeader,
    /// Entries in section-table order
    pub entries: Vec<QarEntry>,
}

impl Qar {
    /// Create an empty archive
    pub fn new(flags: u32, version: u32) -> Self {
        Self {
            header: QarHeader::new(flags, version),
            entries: Vec::new(),
        }
    }

    /// Archive flags
    pub fn flags(&self) -> u32 {
        self.header.flags
    }

    /// Cipher version
    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Parse an archive
    pub fn read<R: Read + Seek>(reader: &mut R) -> QarResult<Self> {
        let header = QarHeader::read(reader)?;
        let shift = header.block_shift();
        let count = header.file_count as usize;

        let mut table = vec![0u8; count * SECTION_SIZE];
        let read = read_up_to(reader, &mut table)?;
        let sections = decrypt_sections(&table[..read], count, header.version)?;

        let mut entries = Vec::with_capacity(count);
        for section in sections {
            reader.seek(SeekFrom::Start(section_offset(section, shift)))?;
            let entry = QarEntry::read(reader, header.version)?;
            if !section_matches(section, entry.hash()) {
                tracing::warn!(
                    "Section word {section:016x} does not match entry hash {:016x}",
                    entry.hash()
                );
            }
            entries.push(entry);
        }

        tracing::info!(
            "Read QAR archive: {} entries, version {}, flags {:#x}",
            entries.len(),
            header.version,
            header.flags
        );

        Ok(Self { header, entries })
    }

    /// Open and parse an archive file, returning the reader for later extraction
    pub fn open(path: impl AsRef<Path>) -> QarResult<(Self, BufReader<File>)> {
        let mut reader = BufReader::new(File::open(path)?);
        let qar = Self::read(&mut reader)?;
        Ok((qar, reader))
    }

    /// Give every entry a path from `dictionary`
    ///
    /// Unresolved entries get their placeholder name and remember their hash
    /// so they can be packed again. Returns the number of resolved entries.
    pub fn apply_dictionary(&mut self, dictionary: &Dictionary) -> usize {
        let mut resolved_count = 0;
        for entry in &mut self.entries {
            let (name, resolved) = dictionary.resolve(entry.hash());
            if resolved {
                resolved_count += 1;
            } else {
                entry.name_hash_for_packing = entry.hash();
            }
            entry.file_path = name;
        }
        resolved_count
    }

    /// Find an entry by hash, or by the hash encoded in a placeholder name
    pub fn find(&self, name: &str, hash: u64) -> Option<&QarEntry> {
        let from_name = Dictionary::parse_unresolved(name);
        self.entries
            .iter()
            .find(|e| e.hash() == hash || Some(e.hash()) == from_name)
    }

    /// Decode one entry into `writer`, returning the number of bytes written
    pub fn extract_to<R, W>(&self, name: &str, hash: u64, reader: &mut R, writer: &mut W) -> QarResult<usize>
    where
        R: Read + Seek,
        W: Write,
    {
        let entry = self.find(name, hash).ok_or_else(|| QarError::EntryNotFound {
            name: name.to_string(),
            hash,
        })?;
        let data = entry.read_data(reader)?;
        writer.write_all(&data)?;
        Ok(data.len())
    }

    /// Decode one entry to `out_dir/<name>`, creating parent directories
    pub fn extract<R: Read + Seek>(&self, name: &str, hash: u64, reader: &mut R, out_dir: &Path) -> QarResult<PathBuf> {
        let target = out_dir.join(relative_path(name)?);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&target)?;
        self.extract_to(name, hash, reader, &mut file)?;
        Ok(target)
    }

    /// Write the archive
    ///
    /// Entries with no in-memory data are loaded from `base_dir` by their path.
    /// Header counts, offsets, entry hashes and sizes are all recomputed.
    pub fn write<W: Write + Seek>(&mut self, writer: &mut W, base_dir: &Path) -> QarResult<()> {
        let shift = self.header.block_shift();
        let alignment = self.header.alignment();
        let version = self.header.version;

        writer.seek(SeekFrom::Start(HEADER_SIZE + (self.entries.len() * SECTION_SIZE) as u64))?;
        let first_offset = align_write(writer, alignment)?;

        let mut sections = Vec::with_capacity(self.entries.len());
        for entry in &mut self.entries {
            entry.version = version;
            if entry.data.is_empty() {
                entry.data = fs::read(base_dir.join(relative_path(&entry.file_path)?))?;
            }

            let position = writer.stream_position()?;
            let bytes = entry.to_bytes()?;
            sections.push(pack_section(position, shift, entry.hash()));
            entry.data_offset = position + ENTRY_HEADER_SIZE;

            tracing::debug!(
                "Writing QAR entry {} ({:016x}, {} bytes)",
                entry.file_path,
                entry.hash(),
                bytes.len()
            );
            writer.write_all(&bytes)?;
            align_write(writer, alignment)?;
        }

        let end = writer.stream_position()?;
        self.header.magic = super::header::QAR_MAGIC;
        self.header.file_count = u32::try_from(self.entries.len())
            .map_err(|_| QarError::ArchiveTooLarge(end))?;
        self.header.block_file_end =
            u32::try_from(end >> shift).map_err(|_| QarError::ArchiveTooLarge(end))?;
        self.header.offset_first_file =
            u32::try_from(first_offset).map_err(|_| QarError::ArchiveTooLarge(end))?;
        self.header.reserved = 0;

        writer.seek(SeekFrom::Start(0))?;
        self.header.write(writer)?;
        writer.write_all(&encrypt_sections(&sections, version))?;
        writer.seek(SeekFrom::Start(end))?;

        tracing::info!("Wrote QAR archive: {} entries, {end} bytes", self.entries.len());
        Ok(())
    }
}
