//! Write-through body for live output

use std::io::{self, SeekFrom, Write};

use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use super::MessageBody;
use crate::errors::StreamResult;
use crate::handle::BodyHandle;

/// Body with no backing resource that pushes every write straight to the
/// live output channel
///
/// Used for chunked/live responses where bytes must reach the client as
/// they are produced. Output captured by upstream buffering layers can be
/// staged with [`push_buffered`](NonBufferedBody::push_buffered) and is
/// drained to the channel ahead of the next write, so overall output order
/// is preserved.
///
/// Half the stream contract is fixed by construction: never readable,
/// never seekable, no size, position 0, always at EOF. Read-family
/// operations return empty results instead of failing, since reading a
/// write-through body is meaningless rather than erroneous.
pub struct NonBufferedBody<W: Write = io::Stdout> {
    channel: W,
    buffered: Vec<Vec<u8>>,
}

impl NonBufferedBody<io::Stdout> {
    /// Body writing through to stdout
    pub fn new() -> Self {
        Self::with_channel(io::stdout())
    }
}

impl Default for NonBufferedBody<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> NonBufferedBody<W> {
    /// Body writing through to the given channel
    pub fn with_channel(channel: W) -> Self {
        NonBufferedBody {
            channel,
            buffered: Vec::new(),
        }
    }

    /// Stage output captured by an upstream buffering layer
    ///
    /// Staged layers are emitted oldest-first ahead of the next write.
    pub fn push_buffered(&mut self, pending: impl Into<Vec<u8>>) {
        self.buffered.push(pending.into());
    }

    /// Consume the body, returning the output channel
    pub fn into_channel(self) -> W {
        self.channel
    }
}

impl<W: Write> MessageBody for NonBufferedBody<W> {
    fn read(&mut self, _n: usize) -> StreamResult<Bytes> {
        Ok(Bytes::new())
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<usize> {
        let mut emitted = 0;

        let mut drained = Vec::new();
        for layer in self.buffered.drain(..) {
            drained.extend_from_slice(&layer);
        }
        if !drained.is_empty() {
            match self.channel.write_all(&drained) {
                Ok(()) => emitted += drained.len(),
                Err(e) => debug!(error = %e, "output channel gone, dropping buffered output"),
            }
        }

        match self.channel.write_all(data) {
            Ok(()) => emitted += data.len(),
            Err(e) => debug!(error = %e, "output channel gone, dropping body write"),
        }
        let _ = self.channel.flush();

        Ok(emitted)
    }

    fn seek(&mut self, _pos: SeekFrom) -> StreamResult<u64> {
        Ok(0)
    }

    fn tell(&mut self) -> StreamResult<u64> {
        Ok(0)
    }

    fn eof(&self) -> bool {
        true
    }

    fn is_readable(&self) -> bool {
        false
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn is_seekable(&self) -> bool {
        false
    }

    fn size(&mut self) -> Option<u64> {
        None
    }

    fn contents(&mut self) -> StreamResult<Bytes> {
        Ok(Bytes::new())
    }

    fn metadata(&self, _key: Option<&str>) -> Option<Value> {
        None
    }

    fn to_bytes(&mut self) -> Bytes {
        Bytes::new()
    }

    fn close(&mut self) {}

    fn detach(&mut self) -> Option<BodyHandle> {
        None
    }
}
