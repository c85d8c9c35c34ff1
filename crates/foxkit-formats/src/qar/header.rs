//! QAR archive header

use binrw::{BinRead, BinWrite};
use foxkit_crypto::XOR_TABLE;

/// Archive magic
pub const QAR_MAGIC: [u8; 4] = *b"SQAR";

/// Size of the archive header
pub const HEADER_SIZE: u64 = 32;

/// Flag bit selecting 4096-byte entry alignment
pub const FLAG_LARGE_BLOCKS: u32 = 0x800;

/// Fixed 32-byte archive header
///
/// Every word after the magic is stored XOR-ed with one of the header masks;
/// the fields here hold the plain values.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct QarHeader {
    /// Magic bytes, always "SQAR"
    #[br(assert(magic == QAR_MAGIC, "Invalid QAR magic: expected 'SQAR', got {:02X?}", magic))]
    pub magic: [u8; 4],

    /// Archive flags; bit 0x800 selects 4096-byte blocks
    #[br(map = |x: u32| x ^ XOR_TABLE[0])]
    #[bw(map = |x: &u32| x ^ XOR_TABLE[0])]
    pub flags: u32,

    /// Number of entries in the section table
    #[br(map = |x: u32| x ^ XOR_TABLE[1])]
    #[bw(map = |x: &u32| x ^ XOR_TABLE[1])]
    pub file_count: u32,

    /// Unused by the engine, kept as read
    #[br(map = |x: u32| x ^ XOR_TABLE[2])]
    #[bw(map = |x: &u32| x ^ XOR_TABLE[2])]
    pub unknown_count: u32,

    /// End of the last entry, in blocks
    #[br(map = |x: u32| x ^ XOR_TABLE[3])]
    #[bw(map = |x: &u32| x ^ XOR_TABLE[3])]
    pub block_file_end: u32,

    /// Byte offset of the first entry
    #[br(map = |x: u32| x ^ XOR_TABLE[0])]
    #[bw(map = |x: &u32| x ^ XOR_TABLE[0])]
    pub offset_first_file: u32,

    /// Cipher version, 1 or 2
    #[br(map = |x: u32| x ^ XOR_TABLE[0])]
    #[bw(map = |x: &u32| x ^ XOR_TABLE[0])]
    pub version: u32,

    /// Reserved, zero in every known archive
    #[br(map = |x: u32| x ^ XOR_TABLE[1])]
    #[bw(map = |x: &u32| x ^ XOR_TABLE[1])]
    pub reserved: u32,
}

impl QarHeader {
    /// Create a header for a new archive; counts and offsets are filled in on write
    pub fn new(flags: u32, version: u32) -> Self {
        Self {
            magic: QAR_MAGIC,
            flags,
            file_count: 0,
            unknown_count: 0,
            block_file_end: 0,
            offset_first_file: 0,
            version,
            reserved: 0,
        }
    }

    /// log2 of the entry alignment
    pub fn block_shift(&self) -> u32 {
        if self.flags & FLAG_LARGE_BLOCKS != 0 { 12 } else { 10 }
    }

    /// Entry alignment in bytes
    pub fn alignment(&self) -> u64 {
        1 << self.block_shift()
    }
}
