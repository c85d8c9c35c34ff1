//! QAR error types

use thiserror::Error;

/// QAR-specific error type
#[derive(Debug, Error)]
pub enum QarError {
    /// No entry matches the requested name or hash
    #[error("entry not found: {name} ({hash:016x})")]
    EntryNotFound {
        /// Requested name
        name: String,
        /// Requested hash
        hash: u64,
    },

    /// Payload shorter than its data header
    #[error("entry payload truncated: {size} bytes, data header needs {header}")]
    PayloadTruncated {
        /// Recorded payload size
        size: usize,
        /// Data header size
        header: usize,
    },

    /// Stream ended before the bytes an entry records
    #[error("entry data truncated: expected {expected} bytes, got {actual}")]
    DataTruncated {
        /// Bytes the entry header records
        expected: usize,
        /// Bytes available before end of stream
        actual: usize,
    },

    /// Entry path could not be turned into a relative file path
    #[error("invalid entry path: {0}")]
    InvalidPath(String),

    /// Entry payload does not fit the 32-bit size fields
    #[error("entry too large: {0} bytes")]
    EntryTooLarge(usize),

    /// Archive grew past what the header's block fields can address
    #[error("archive too large: {0} bytes")]
    ArchiveTooLarge(u64),

    /// Hash or cipher failure
    #[error("crypto error: {0}")]
    Crypto(#[from] foxkit_crypto::CryptoError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for QAR operations
pub type QarResult<T> = Result<T, QarError>;
