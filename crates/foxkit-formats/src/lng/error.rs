//! LNG error types

use thiserror::Error;

/// LNG-specific error type
#[derive(Debug, Error)]
pub enum LngError {
    /// File does not start with `LANG`
    #[error("invalid LNG magic: {0:#010x}")]
    InvalidMagic(u32),

    /// Endianness marker is neither `LE` nor `BE`
    #[error("unknown endianness marker: {0:#x}")]
    InvalidEndianness(u32),

    /// Version other than 2 or 3
    #[error("unsupported LNG version: {0}")]
    InvalidVersion(u32),

    /// Value text runs off the end of the file
    #[error("unterminated value at offset {0}")]
    UnterminatedValue(u64),

    /// Table does not fit the 32-bit offset fields
    #[error("language table too large: {0} bytes")]
    TooLarge(u64),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for LNG operations
pub type LngResult<T> = Result<T, LngError>;
