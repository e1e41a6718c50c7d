//! Error types for setlist export.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fitting and rendering a setlist.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The setlist or song catalog could not be parsed.
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    /// The width oracle could not measure the given text.
    #[error("Cannot measure text: {0}")]
    UnmeasurableText(String),

    /// The drawing backend rejected an operation.
    #[error("Render error: {0}")]
    RenderError(String),

    /// A layout setting is out of range.
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}
