//! QAR entries
//!
//! An entry is a 32-byte masked header followed by the payload. The payload
//! (optional data header plus body) is always covered by the outer
//! [`Stream1Cipher`]; a data header with a known magic adds the inner
//! [`Stream2Cipher`] over the body. Bodies may also be zlib-compressed, which
//! is signalled by differing compressed and uncompressed sizes.

use super::error::{QarError, QarResult};
use crate::util::{align_up, read_up_to};
use binrw::{BinRead, BinWrite};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use foxkit_crypto::hashing::{META_FLAG, hash_with_extension};
use foxkit_crypto::stream1::BLOCK_SIZE;
use foxkit_crypto::{ContentDigest, Stream1Cipher, Stream2Cipher, XOR_TABLE};
use std::io::{Read, Seek, SeekFrom, Write};

/// Size of an entry header
pub const ENTRY_HEADER_SIZE: u64 = 32;

/// Mask applied to both halves of the entry hash
pub const HASH_MASK: u64 = ((XOR_TABLE[0] as u64) << 32) | XOR_TABLE[0] as u64;

/// Data header magic with an 8-byte header (magic, key)
pub const ENCRYPTION_MAGIC_1: u32 = 0xA0F8_EFE6;

/// Data header magic with a 16-byte header (magic, key, sizes)
pub const ENCRYPTION_MAGIC_2: u32 = 0xE3F8_EFE6;

/// Size of the data header announced by `magic`, 0 when there is none
pub const fn data_header_size(magic: u32) -> usize {
    match magic {
        ENCRYPTION_MAGIC_1 => 8,
        ENCRYPTION_MAGIC_2 => 16,
        _ => 0,
    }
}

/// Masked 32-byte entry header
#[derive(Debug, Clone, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct EntryHeader {
    /// Full 64-bit entry hash
    #[br(map = |x: u64| x ^ HASH_MASK)]
    #[bw(map = |x: &u64| x ^ HASH_MASK)]
    pub hash: u64,

    /// Stored payload size
    #[br(map = |x: u32| x ^ XOR_TABLE[1])]
    #[bw(map = |x: &u32| x ^ XOR_TABLE[1])]
    pub compressed_size: u32,

    /// Payload size after inflation (data header included)
    #[br(map = |x: u32| x ^ XOR_TABLE[2])]
    #[bw(map = |x: &u32| x ^ XOR_TABLE[2])]
    pub uncompressed_size: u32,

    /// MD5 of the plaintext payload
    #[br(map = |x: [u8; 16]| ContentDigest::from_masked(x))]
    #[bw(map = |d: &ContentDigest| d.to_masked())]
    pub md5: ContentDigest,
}

/// Optional header at the start of a payload announcing the inner cipher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataHeader {
    /// [`ENCRYPTION_MAGIC_1`], [`ENCRYPTION_MAGIC_2`] or 0
    pub encryption_magic: u32,
    /// Inner cipher key
    pub key: u32,
    /// Body size after inflation (16-byte form only)
    pub uncompressed_size: u32,
    /// Stored body size (16-byte form only)
    pub compressed_size: u32,
}

impl DataHeader {
    /// Interpret the first 8 decrypted payload bytes
    pub fn parse(bytes: &[u8; 8]) -> Self {
        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if data_header_size(magic) == 0 {
            return Self::default();
        }
        Self {
            encryption_magic: magic,
            key: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            ..Self::default()
        }
    }

    /// Size on disk
    pub fn size(&self) -> usize {
        data_header_size(self.encryption_magic)
    }

    /// Whether the inner cipher is active
    pub fn is_encrypted(&self) -> bool {
        self.size() > 0
    }

    /// Serialized form, empty when there is no header
    pub fn to_bytes(&self) -> Vec<u8> {
        let size = self.size();
        let mut out = Vec::with_capacity(size);
        if size == 0 {
            return out;
        }
        out.extend_from_slice(&self.encryption_magic.to_le_bytes());
        out.extend_from_slice(&self.key.to_le_bytes());
        if size > 8 {
            out.extend_from_slice(&self.uncompressed_size.to_le_bytes());
            out.extend_from_slice(&self.compressed_size.to_le_bytes());
        }
        out
    }
}

/// One archive entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QarEntry {
    /// Decoded entry header
    pub header: EntryHeader,
    /// Data header found at the start of the payload
    pub data_header: DataHeader,
    /// Resolved or placeholder path; empty until a dictionary is applied
    pub file_path: String,
    /// Absolute offset of the payload
    pub data_offset: u64,
    /// Whether the body is zlib-compressed
    ///
    /// Cleared on write when deflating does not shrink the body.
    pub compressed: bool,
    /// Cipher version inherited from the archive
    pub version: u32,
    /// Whether the hash carries the meta flag
    pub meta_flag: bool,
    /// Hash to pack under when the path is only a placeholder
    pub name_hash_for_packing: u64,
    /// Plain body used when writing; loaded from disk when empty
    pub data: Vec<u8>,
}

impl QarEntry {
    /// Create an entry to be packed from `file_path`
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// Entry hash as stored in the archive
    pub fn hash(&self) -> u64 {
        self.header.hash
    }

    /// Hash the entry will be written under
    pub fn packing_hash(&self) -> u64 {
        if self.name_hash_for_packing == 0 {
            hash_with_extension(&self.file_path)
        } else {
            self.name_hash_for_packing
        }
    }

    fn cipher(&self) -> Stream1Cipher {
        Stream1Cipher::new(self.header.md5.as_bytes(), self.header.hash, self.version)
    }

    /// Read an entry header at the current position and peek at its data header
    ///
    /// The payload itself stays on disk until [`read_data`](Self::read_data).
    pub fn read<R: Read + Seek>(reader: &mut R, version: u32) -> QarResult<Self> {
        let header = EntryHeader::read(reader)?;
        let data_offset = reader.stream_position()?;

        let mut entry = Self {
            compressed: header.compressed_size != header.uncompressed_size,
            meta_flag: header.hash & META_FLAG != 0,
            header,
            data_offset,
            version,
            ..Self::default()
        };

        let mut peek = [0u8; BLOCK_SIZE];
        let wanted = entry.stored_size().min(BLOCK_SIZE);
        let read = read_up_to(reader, &mut peek)?;
        if read < wanted {
            return Err(QarError::DataTruncated {
                expected: wanted,
                actual: read,
            });
        }
        entry.cipher().apply(&mut peek, 0);
        entry.data_header = DataHeader::parse(&peek);

        tracing::debug!(
            "Read QAR entry {:016x} at offset {} (compressed: {}, encryption: {:08x})",
            entry.header.hash,
            entry.data_offset,
            entry.compressed,
            entry.data_header.encryption_magic
        );

        Ok(entry)
    }

    /// Bytes the payload occupies on disk, data header included
    fn stored_size(&self) -> usize {
        self.header
            .compressed_size
            .max(self.header.uncompressed_size) as usize
    }

    /// Read, decrypt and inflate the payload body
    pub fn read_data<R: Read + Seek>(&self, reader: &mut R) -> QarResult<Vec<u8>> {
        let size = self.stored_size();

        reader.seek(SeekFrom::Start(self.data_offset))?;
        let mut buf = vec![0u8; align_up(size as u64, BLOCK_SIZE as u64) as usize];
        let read = read_up_to(reader, &mut buf)?;
        if read < size {
            return Err(QarError::DataTruncated {
                expected: size,
                actual: read,
            });
        }
        self.cipher().apply(&mut buf, 0);
        buf.truncate(size);

        let header_size = self.data_header.size();
        if header_size > 0 {
            if size < header_size {
                return Err(QarError::PayloadTruncated {
                    size,
                    header: header_size,
                });
            }
            buf.drain(..header_size);
            Stream2Cipher::new(self.data_header.key).apply(&mut buf);
        }

        if self.compressed {
            let mut inflated = Vec::new();
            ZlibDecoder::new(buf.as_slice()).read_to_end(&mut inflated)?;
            let expected = (self.header.uncompressed_size as usize).saturating_sub(header_size);
            inflated.truncate(expected);
            return Ok(inflated);
        }

        Ok(buf)
    }

    /// Build the on-disk form of the entry (header plus ciphered payload)
    ///
    /// Updates the header, data header and flags to match what was produced.
    pub fn to_bytes(&mut self) -> QarResult<Vec<u8>> {
        let plain_len =
            u32::try_from(self.data.len()).map_err(|_| QarError::EntryTooLarge(self.data.len()))?;

        let mut body = if self.compressed {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
            encoder.write_all(&self.data)?;
            encoder.finish()?
        } else {
            self.data.clone()
        };
        // Readers treat equal sizes as a plain entry
        if self.compressed && body.len() >= self.data.len() {
            body.clone_from(&self.data);
            self.compressed = false;
        }
        let stored_len =
            u32::try_from(body.len()).map_err(|_| QarError::EntryTooLarge(body.len()))?;
        self.header.uncompressed_size = plain_len;
        self.header.compressed_size = stored_len;

        if self.data_header.key > 0 {
            if self.data_header.encryption_magic != ENCRYPTION_MAGIC_1 {
                self.data_header.encryption_magic = ENCRYPTION_MAGIC_2;
            }
            self.data_header.compressed_size = self.header.compressed_size;
            self.data_header.uncompressed_size = self.header.uncompressed_size;
            let header_size = self.data_header.size() as u32;
            self.header.uncompressed_size += header_size;
            self.header.compressed_size += header_size;
            Stream2Cipher::new(self.data_header.key).apply(&mut body);
        } else {
            self.data_header = DataHeader::default();
        }

        let mut payload = self.data_header.to_bytes();
        payload.extend_from_slice(&body);

        self.header.hash = self.packing_hash();
        self.header.md5 = ContentDigest::from_data(&payload);
        self.meta_flag = self.header.hash & META_FLAG != 0;
        self.data_offset = ENTRY_HEADER_SIZE;

        self.cipher().apply(&mut payload, 0);

        let mut out = binrw::io::Cursor::new(Vec::with_capacity(32 + payload.len()));
        self.header.write(&mut out)?;
        let mut out = out.into_inner();
        out.extend_from_slice(&payload);
        Ok(out)
    }
}
