//! Stream construction
//!
//! Single entry point for building [`Stream`]s from literal content, a
//! file path plus access mode, or an already-open resource handle. All
//! three paths converge on one wrapping step, so every stream starts with
//! capability flags derived the same way and a cache that is either empty
//! or explicitly supplied.

use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::body::Stream;
use crate::errors::{StreamError, StreamResult};
use crate::handle::BodyHandle;
use crate::mode::AccessMode;

/// Factory for message body streams
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamFactory;

impl StreamFactory {
    pub fn new() -> Self {
        StreamFactory
    }

    /// Stream over a fresh unnamed temporary resource holding `content`,
    /// with the cursor reset to position 0
    ///
    /// Fails with [`StreamError::ResourceAcquisition`] when no temporary
    /// handle can be opened or populated.
    pub fn create_stream(&self, content: impl AsRef<[u8]>) -> StreamResult<Stream> {
        let mut file = tempfile::tempfile().map_err(StreamError::ResourceAcquisition)?;
        file.write_all(content.as_ref())
            .map_err(StreamError::ResourceAcquisition)?;
        file.seek(SeekFrom::Start(0))
            .map_err(StreamError::ResourceAcquisition)?;

        Self::wrap(BodyHandle::file(file, AccessMode::read_write()), None)
    }

    /// Stream over the file at `path`, opened with `mode`
    ///
    /// Both failure paths - the platform rejecting the path/mode
    /// combination, and the returned handle failing its validity probe -
    /// normalize to [`StreamError::FileOpen`] carrying the path and mode.
    /// No partial stream is ever returned.
    pub fn create_stream_from_file(
        &self,
        path: impl AsRef<Path>,
        mode: AccessMode,
        cache: Option<Stream>,
    ) -> StreamResult<Stream> {
        let path = path.as_ref();

        let file = mode
            .open_options()
            .open(path)
            .map_err(|e| open_error(path, &mode, e))?;
        if let Err(e) = file.metadata() {
            return Err(open_error(path, &mode, e));
        }

        debug!(path = %path.display(), mode = %mode, "opened file stream");
        Self::wrap(BodyHandle::file_at(file, mode, path), cache)
    }

    /// Stream over an already-open resource handle
    ///
    /// Fails with [`StreamError::InvalidHandle`] when the argument is not
    /// a live resource; that is a caller-contract violation, not an I/O
    /// failure. An optional cache stream carries content that was already
    /// consumed from the handle upstream.
    pub fn create_stream_from_handle(
        &self,
        handle: BodyHandle,
        cache: Option<Stream>,
    ) -> StreamResult<Stream> {
        if !handle.is_live() {
            return Err(StreamError::InvalidHandle);
        }
        Self::wrap(handle, cache)
    }

    fn wrap(handle: BodyHandle, cache: Option<Stream>) -> StreamResult<Stream> {
        match cache {
            Some(cache) => Stream::with_cache(handle, cache),
            None => Ok(Stream::new(handle)),
        }
    }
}

fn open_error(path: &Path, mode: &AccessMode, source: io::Error) -> StreamError {
    StreamError::FileOpen {
        path: path.to_path_buf(),
        mode: mode.to_string(),
        source,
    }
}
