//! Resource-backed stream

use std::io::{Read, Seek, SeekFrom, Write};

use bytes::Bytes;
use serde_json::{json, Value};
use tracing::debug;

use super::MessageBody;
use crate::errors::{StreamError, StreamResult};
use crate::handle::BodyHandle;

/// Upper bound on the read buffer reserved ahead of time (64KB, standard
/// pipe buffer size); larger reads grow as bytes actually arrive
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Seekable, bufferable stream over a single resource handle
///
/// Capability flags are derived once from the handle when the stream is
/// built and never re-derived. The stream starts Attached and becomes
/// Detached through [`detach`](MessageBody::detach) or
/// [`close`](MessageBody::close); there is no way back. The cached size is
/// computed lazily from handle metadata and deliberately left stale across
/// writes.
#[derive(Debug)]
pub struct Stream {
    handle: Option<BodyHandle>,
    size: Option<u64>,
    readable: bool,
    writable: bool,
    seekable: bool,
    reached_eof: bool,
    finished: bool,
    cache: Option<Box<Stream>>,
}

impl Stream {
    /// Wrap a resource handle
    pub fn new(handle: BodyHandle) -> Self {
        Self::build(handle, None)
    }

    /// Wrap a resource handle, attaching a cache stream
    ///
    /// The cache receives a copy of everything [`contents`] reads, so
    /// already-consumed content can be served again through
    /// [`to_bytes`]. It must be seekable and writable.
    ///
    /// [`contents`]: MessageBody::contents
    /// [`to_bytes`]: MessageBody::to_bytes
    pub fn with_cache(handle: BodyHandle, cache: Stream) -> StreamResult<Self> {
        if !cache.is_seekable() || !cache.is_writable() {
            return Err(StreamError::InvalidCache);
        }
        Ok(Self::build(handle, Some(Box::new(cache))))
    }

    fn build(mut handle: BodyHandle, cache: Option<Box<Stream>>) -> Self {
        let seekable = handle.probe_seekable();
        Stream {
            readable: handle.is_readable(),
            writable: handle.is_writable(),
            seekable,
            size: None,
            reached_eof: false,
            finished: false,
            cache,
            handle: Some(handle),
        }
    }

    fn release(&mut self) -> Option<BodyHandle> {
        self.size = None;
        self.readable = false;
        self.writable = false;
        self.seekable = false;
        self.reached_eof = false;
        self.finished = false;
        self.handle.take()
    }
}

impl MessageBody for Stream {
    fn read(&mut self, n: usize) -> StreamResult<Bytes> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        if !self.readable {
            return Err(StreamError::NotReadable);
        }

        let mut buf = Vec::with_capacity(n.min(READ_CHUNK_SIZE));
        let got = Read::by_ref(handle)
            .take(n as u64)
            .read_to_end(&mut buf)
            .map_err(StreamError::Unreadable)?;
        if got < n {
            self.reached_eof = true;
        }
        Ok(Bytes::from(buf))
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<usize> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        if !self.writable {
            return Err(StreamError::NotWritable);
        }

        // the cached size is intentionally not refreshed here
        handle.write_all(data)?;
        Ok(data.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> StreamResult<u64> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        if !self.seekable {
            return Err(StreamError::NotSeekable);
        }

        let position = handle.seek(pos)?;
        self.reached_eof = false;
        Ok(position)
    }

    fn tell(&mut self) -> StreamResult<u64> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        Ok(handle.stream_position()?)
    }

    fn eof(&self) -> bool {
        self.handle.is_none() || self.reached_eof
    }

    fn is_readable(&self) -> bool {
        self.readable
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn is_seekable(&self) -> bool {
        self.seekable
    }

    fn size(&mut self) -> Option<u64> {
        if self.size.is_none() {
            self.size = self.handle.as_ref().and_then(BodyHandle::len_hint);
        }
        self.size
    }

    fn contents(&mut self) -> StreamResult<Bytes> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        if !self.readable {
            return Err(StreamError::NotReadable);
        }

        let mut buf = Vec::new();
        handle.read_to_end(&mut buf).map_err(StreamError::Unreadable)?;
        self.reached_eof = true;

        if let Some(cache) = self.cache.as_mut() {
            cache.write(&buf)?;
        }
        self.finished = true;

        Ok(Bytes::from(buf))
    }

    fn metadata(&self, key: Option<&str>) -> Option<Value> {
        let handle = self.handle.as_ref()?;

        let uri = match handle.path() {
            Some(path) => Value::String(path.display().to_string()),
            None if handle.stream_type() == "MEMORY" => Value::String("memory".to_string()),
            None => Value::Null,
        };
        let meta = json!({
            "mode": handle.mode_str(),
            "seekable": self.seekable,
            "stream_type": handle.stream_type(),
            "uri": uri,
            "eof": self.eof(),
        });

        match key {
            None => Some(meta),
            Some(k) => meta.get(k).cloned(),
        }
    }

    fn to_bytes(&mut self) -> Bytes {
        if !self.readable {
            return Bytes::new();
        }
        if self.finished {
            if let Some(cache) = self.cache.as_mut() {
                if cache.rewind().is_err() {
                    return Bytes::new();
                }
                return cache.contents().unwrap_or_default();
            }
        }
        if self.seekable && self.rewind().is_err() {
            return Bytes::new();
        }
        self.contents().unwrap_or_default()
    }

    fn close(&mut self) {
        // dropping the released handle closes the resource
        if let Some(handle) = self.release() {
            debug!(stream_type = handle.stream_type(), "closing stream");
        }
    }

    fn detach(&mut self) -> Option<BodyHandle> {
        let handle = self.release();
        if let Some(handle) = &handle {
            debug!(stream_type = handle.stream_type(), "detaching stream handle");
        }
        handle
    }
}
