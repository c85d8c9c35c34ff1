//! FOX2 error types

use super::types::DataType;
use thiserror::Error;

/// FOX2-specific error type
#[derive(Debug, Error)]
pub enum Fox2Error {
    /// Property header names a type tag past the known set
    #[error("unknown data type tag: {0}")]
    UnknownDataType(u8),

    /// Property header names a container tag past the known set
    #[error("unknown container tag: {0}")]
    UnknownContainer(u8),

    /// Type has a tag but no known layout
    #[error("unsupported data type: {0}")]
    UnsupportedType(DataType),

    /// A value does not match its property's declared type
    #[error("value of type {found} in a {expected} property")]
    TypeMismatch {
        /// Declared property type
        expected: DataType,
        /// Type of the offending value
        found: DataType,
    },

    /// Property body does not fit the 16-bit size field
    #[error("property too large: {0} bytes")]
    PropertyTooLarge(usize),

    /// Too many values or properties for the 16-bit count fields
    #[error("too many items: {0}")]
    TooManyItems(usize),

    /// Hex hash or address that does not parse
    #[error("invalid hex value: {0}")]
    InvalidHex(String),

    /// JSON value does not fit the declared type
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for FOX2 operations
pub type Fox2Result<T> = Result<T, Fox2Error>;
