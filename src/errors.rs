//! Error types for bodystream

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by stream construction and stream operations
#[derive(Debug, Error)]
pub enum StreamError {
    /// Temporary handle could not be opened or populated
    #[error("could not open temporary stream: {0}")]
    ResourceAcquisition(#[source] io::Error),

    /// File path/mode combination rejected, or the returned handle invalid
    #[error("unable to open {} using mode {mode}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        mode: String,
        #[source]
        source: io::Error,
    },

    /// Unparseable access mode string
    #[error("invalid access mode `{0}`")]
    InvalidMode(String),

    /// Value supplied as a handle is not a live resource
    #[error("handle is not a live resource")]
    InvalidHandle,

    /// Supplied cache stream does not meet the cache contract
    #[error("cache stream must be seekable and writable")]
    InvalidCache,

    /// Read attempted on a non-readable stream
    #[error("stream is not readable")]
    NotReadable,

    /// Write attempted on a non-writable stream
    #[error("stream is not writable")]
    NotWritable,

    /// Seek attempted on a non-seekable stream
    #[error("stream is not seekable")]
    NotSeekable,

    /// Operation requiring a handle attempted after detach or close
    #[error("stream is detached")]
    Detached,

    /// Underlying read failed mid-operation
    #[error("could not read from stream: {0}")]
    Unreadable(#[source] io::Error),

    /// I/O error during other stream operations
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for stream operations
pub type StreamResult<T> = Result<T, StreamError>;
