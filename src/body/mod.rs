//! Message body streams
//!
//! One capability contract, two implementations: [`Stream`] wraps a
//! resource handle and supports random access; [`NonBufferedBody`] has no
//! backing resource and pushes every write straight to the live output
//! channel. HTTP message components consume both through [`MessageBody`]
//! without caring which one they hold.

mod non_buffered;
mod stream;

pub use non_buffered::NonBufferedBody;
pub use stream::Stream;

use std::io::SeekFrom;

use bytes::Bytes;
use serde_json::Value;

use crate::errors::StreamResult;
use crate::handle::BodyHandle;

/// Common contract for message body streams
///
/// Capability-gated: calling an operation the stream's capability set does
/// not support is a contract violation and fails with the matching error,
/// except where an implementation documents an empty/no-op result instead.
pub trait MessageBody {
    /// Read up to `n` bytes from the current cursor position
    ///
    /// Returns fewer bytes once the end of the resource is reached.
    fn read(&mut self, n: usize) -> StreamResult<Bytes>;

    /// Write `data` at the current cursor position, returning the number
    /// of bytes accepted
    fn write(&mut self, data: &[u8]) -> StreamResult<usize>;

    /// Move the cursor, returning the new position
    fn seek(&mut self, pos: SeekFrom) -> StreamResult<u64>;

    /// Move the cursor back to position 0
    fn rewind(&mut self) -> StreamResult<()> {
        self.seek(SeekFrom::Start(0)).map(drop)
    }

    /// Current cursor position
    fn tell(&mut self) -> StreamResult<u64>;

    /// Whether the last read hit the end of the resource
    fn eof(&self) -> bool;

    /// Whether `read`/`contents` are permitted
    fn is_readable(&self) -> bool;

    /// Whether `write` is permitted
    fn is_writable(&self) -> bool;

    /// Whether `seek`/`rewind` are permitted
    fn is_seekable(&self) -> bool;

    /// Size of the underlying resource in bytes, if it has one
    ///
    /// Computed from handle metadata on first call and memoized; writes do
    /// not refresh the cached value.
    fn size(&mut self) -> Option<u64>;

    /// Read from the current cursor position to the end of the resource
    fn contents(&mut self) -> StreamResult<Bytes>;

    /// Stream metadata, either the whole map or a single entry
    ///
    /// Returns `None` for unknown keys and for streams with nothing to
    /// report (detached, or no backing resource).
    fn metadata(&self, key: Option<&str>) -> Option<Value>;

    /// Best-effort full contents from position 0
    ///
    /// Never fails: any internal error yields an empty result instead.
    fn to_bytes(&mut self) -> Bytes;

    /// Release the underlying resource; repeated calls are no-ops
    fn close(&mut self);

    /// Hand the underlying resource back to the caller without closing it
    ///
    /// The stream is inert afterwards; there is no way to re-attach.
    fn detach(&mut self) -> Option<BodyHandle>;
}
