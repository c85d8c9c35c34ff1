//! FPK package header and string records

use binrw::{BinRead, BinWrite};
use std::fmt;
use std::str::FromStr;

use super::error::FpkError;

/// Magic of a plain package
pub const FPK_MAGIC: [u8; 10] = *b"foxfpk\0win";

/// Magic of a data package
pub const FPKD_MAGIC: [u8; 10] = *b"foxfpkdwin";

/// Size of the package header
pub const HEADER_SIZE: u64 = 48;

/// Package variant, selected by the magic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FpkKind {
    /// `.fpk`
    #[default]
    Fpk,
    /// `.fpkd`
    Fpkd,
}

impl FpkKind {
    /// Magic written for this variant
    pub fn magic(self) -> [u8; 10] {
        match self {
            Self::Fpk => FPK_MAGIC,
            Self::Fpkd => FPKD_MAGIC,
        }
    }

    /// Variant announced by a magic
    pub fn from_magic(magic: &[u8; 10]) -> Option<Self> {
        match *magic {
            FPK_MAGIC => Some(Self::Fpk),
            FPKD_MAGIC => Some(Self::Fpkd),
            _ => None,
        }
    }

    /// Name used in definitions and as file extension
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fpk => "fpk",
            Self::Fpkd => "fpkd",
        }
    }
}

impl fmt::Display for FpkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FpkKind {
    type Err = FpkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fpk" => Ok(Self::Fpk),
            "fpkd" => Ok(Self::Fpkd),
            other => Err(FpkError::UnknownType(other.to_string())),
        }
    }
}

/// Fixed 48-byte package header
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FpkHeader {
    /// "foxfpk\0win" or "foxfpkdwin"
    #[br(assert(FpkKind::from_magic(&magic).is_some(), "Invalid FPK magic: {:02X?}", magic))]
    pub magic: [u8; 10],

    /// Total package size
    pub file_size: u32,

    /// Always 2
    #[brw(pad_before = 18)]
    pub magic2: u32,

    /// Number of entries
    pub entry_count: u32,

    /// Number of references
    #[brw(pad_after = 4)]
    pub reference_count: u32,
}

impl FpkHeader {
    /// Create a header for `kind`; sizes and counts are filled in on write
    pub fn new(kind: FpkKind) -> Self {
        Self {
            magic: kind.magic(),
            file_size: 0,
            magic2: 2,
            entry_count: 0,
            reference_count: 0,
        }
    }

    /// Package variant
    pub fn kind(&self) -> FpkKind {
        FpkKind::from_magic(&self.magic).unwrap_or_default()
    }
}

/// Location of a string stored elsewhere in the package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct StringHeader {
    /// Absolute offset of the text
    pub offset: u32,
    /// Unknown, zero in packages written from scratch
    pub unknown1: u32,
    /// Text length without the terminator
    pub length: u32,
    /// Unknown, zero in packages written from scratch
    pub unknown2: u32,
}

impl StringHeader {
    /// Unknown words, in file order
    pub fn unknown(&self) -> [u32; 2] {
        [self.unknown1, self.unknown2]
    }
}

/// Size of a string header
pub const STRING_HEADER_SIZE: u64 = 16;
