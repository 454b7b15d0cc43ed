//! Error types for the pagination pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing, laying out or assembling a document
#[derive(Error, Debug)]
pub enum Error {
    /// A frame could not be accepted (empty handle, zero-sized image, bad pixel buffer)
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Page template, grid or encoding options are malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The document builder reported a failure; no partial output is returned
    #[error("Document assembly failed: {0}")]
    AssemblyFailed(String),

    /// The surface could not be encoded or an encoded blob could not be read
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    /// The recorder worker has already finished
    #[error("Recorder closed")]
    Closed,

    /// Filesystem error while saving output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::CaptureFailed(err.to_string())
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::AssemblyFailed(err.to_string())
    }
}
