/*!
 * Error types for the smi2srt application.
 *
 * This module contains custom error types for the different stages of a
 * conversion, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while reading and parsing a subtitle file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// The format detector found no known signature
    #[error("{file}: unknown file format {leading:?}")]
    UnsupportedFormat {
        /// Offending file name
        file: String,
        /// First decoded character codes, for diagnostics
        leading: Vec<u32>,
    },

    /// A recognized file yielded no usable cues
    #[error("{file}: no cues found")]
    NoCuesFound {
        /// Offending file name
        file: String,
    },

    /// A block or line did not match the expected shape
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// An inline markup directive that has no translation
    #[error("{file}: unknown command {command}")]
    UnknownCommand {
        /// Offending file name
        file: String,
        /// Raw command token, without the leading backslash
        command: String,
    },

    /// A cue ends before it starts and cannot be repaired
    #[error("{file}: cue ends before it starts ({start_ms}ms --> {stop_ms}ms)")]
    SyncOrderingInvalid {
        /// Offending file name
        file: String,
        /// Declared start
        start_ms: u64,
        /// Declared stop
        stop_ms: u64,
    },

    /// The bytes could not be decoded with the resolved encoding
    #[error("{file}: cannot decode as {encoding}")]
    Decode {
        /// Offending file name
        file: String,
        /// Encoding label that was requested or guessed
        encoding: String,
    },
}

impl SubtitleError {
    /// Whether a batch run should only warn about this error
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoCuesFound { .. } | Self::UnknownCommand { .. })
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Invalid configuration or option combination
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
