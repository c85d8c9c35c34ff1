//! Error types for the foxkit command line tool.
//!
//! All errors use thiserror for consistent error handling across the codebase.

use foxkit_crypto::CryptoError;
use foxkit_formats::fox2::Fox2Error;
use foxkit_formats::fpk::FpkError;
use foxkit_formats::lng::LngError;
use foxkit_formats::qar::QarError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No subcommand and no input file
    #[error("No input file given, run with --help for usage")]
    MissingInput,

    /// Input suffix does not map to any command
    #[error("Don't know what to do with {}", .0.display())]
    UnknownFileType(PathBuf),
}

/// Command execution errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Failed to read or write a file
    #[error("I/O error on {}: {source}", .path.display())]
    File {
        /// File that was being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Definition or document JSON could not be parsed or produced
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// QAR archive error
    #[error("QAR error: {0}")]
    Qar(#[from] QarError),

    /// FPK package error
    #[error("FPK error: {0}")]
    Fpk(#[from] FpkError),

    /// FOX2 document error
    #[error("FOX2 error: {0}")]
    Fox2(#[from] Fox2Error),

    /// LNG table error
    #[error("LNG error: {0}")]
    Lng(#[from] LngError),

    /// Dictionary loading error
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] CryptoError),

    /// Path has no file name or suffix to derive an output from
    #[error("Cannot derive an output name from {}", .0.display())]
    NoOutputName(PathBuf),

    /// File suffix does not match what the command handles
    #[error("Unsupported input for this command: {}", .0.display())]
    UnsupportedInput(PathBuf),
}

impl CommandError {
    /// Attach the path to an I/O error
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}

/// Result type for command execution
pub type CommandResult<T> = Result<T, CommandError>;
