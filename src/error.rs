//! Error types for citation-arcs operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, configuring, or rendering arc diagrams.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Citation data could not be decoded.
    #[error("Invalid citation data: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid dimensions for framebuffer or viewport.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A render parameter is out of range or could not be parsed.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Configuration file does not exist or cannot be read.
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Configuration file is not valid YAML for [`crate::config::Config`].
    #[error("Configuration parse error at line {line}: {message}")]
    ConfigParse {
        /// 1-based line of the failure (0 if unknown).
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Invalid color string.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name: name.to_string(), reason: reason.into() }
    }
}
