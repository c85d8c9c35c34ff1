//! FOX2 document header

use binrw::{BinRead, BinWrite};

/// First document magic
pub const FOX2_MAGIC: u32 = 0x786F_62F2;

/// Second document magic
pub const FOX2_MAGIC2: u32 = 0x35;

/// Size of the document header
pub const HEADER_SIZE: u64 = 32;

/// Document header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct Fox2Header {
    /// Always [`FOX2_MAGIC`]
    #[br(assert(magic == FOX2_MAGIC, "invalid FOX2 magic: {:#010x}", magic))]
    pub magic: u32,
    /// Usually [`FOX2_MAGIC2`]
    pub magic2: u32,
    /// Number of entities
    pub entity_count: u32,
    /// Offset of the literal pool
    pub string_table_offset: u32,
    /// Offset of the first entity
    #[brw(pad_after = 12)]
    pub data_offset: u32,
}

impl Default for Fox2Header {
    fn default() -> Self {
        Self {
            magic: FOX2_MAGIC,
            magic2: FOX2_MAGIC2,
            entity_count: 0,
            string_table_offset: 0,
            data_offset: HEADER_SIZE as u32,
        }
    }
}
