//! FPK error types

use thiserror::Error;

/// FPK-specific error type
#[derive(Debug, Error)]
pub enum FpkError {
    /// No entry has the requested path
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// Entry path could not be turned into a relative file path
    #[error("invalid entry path: {0}")]
    InvalidPath(String),

    /// Unknown definition type
    #[error("unknown FPK type: {0}")]
    UnknownType(String),

    /// Package grew past what the 32-bit offsets can address
    #[error("package too large: {0} bytes")]
    PackageTooLarge(u64),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for FPK operations
pub type FpkResult<T> = Result<T, FpkError>;
