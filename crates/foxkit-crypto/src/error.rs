//! Error types for hashing and cipher operations

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The section table holds fewer bytes than the entry count requires
    #[error("Section table truncated: expected {expected} bytes, got {actual}")]
    SectionTableTruncated {
        /// Bytes needed for all entries
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// An FPK payload too short to carry a marker and terminator
    #[error("FPK payload too short to decrypt: {0} bytes")]
    FpkPayloadTooShort(usize),

    /// Decrypted FPK payload did not end with NUL
    #[error("FPK payload terminator is not null: {0:#04x}")]
    FpkTerminatorMissing(u8),

    /// I/O error while reading a dictionary
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
