//! Resource handles
//!
//! A [`BodyHandle`] is the platform I/O primitive a [`Stream`] wraps: an
//! in-memory buffer or an open file, each with its own cursor. The handle
//! owns the underlying resource; dropping it releases the resource.
//!
//! [`Stream`]: crate::body::Stream

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::mode::AccessMode;

/// An open I/O resource with a position cursor
#[derive(Debug)]
pub enum BodyHandle {
    /// Growable in-memory buffer
    Memory(Cursor<Vec<u8>>),
    /// Open file descriptor together with the mode it was opened under
    File {
        file: File,
        mode: AccessMode,
        path: Option<PathBuf>,
    },
}

impl BodyHandle {
    /// In-memory handle holding `content`, cursor at position 0
    pub fn from_bytes(content: impl Into<Vec<u8>>) -> Self {
        BodyHandle::Memory(Cursor::new(content.into()))
    }

    /// Wrap an already-open file
    pub fn file(file: File, mode: AccessMode) -> Self {
        BodyHandle::File {
            file,
            mode,
            path: None,
        }
    }

    /// Wrap an already-open file, recording the path it was opened from
    pub fn file_at(file: File, mode: AccessMode, path: impl Into<PathBuf>) -> Self {
        BodyHandle::File {
            file,
            mode,
            path: Some(path.into()),
        }
    }

    /// Whether this is a live resource
    ///
    /// Memory buffers always are. File handles are probed through
    /// `metadata()`, which fails on a dead or never-valid descriptor.
    pub fn is_live(&self) -> bool {
        match self {
            BodyHandle::Memory(_) => true,
            BodyHandle::File { file, .. } => file.metadata().is_ok(),
        }
    }

    /// Whether reads are permitted on this handle
    pub fn is_readable(&self) -> bool {
        match self {
            BodyHandle::Memory(_) => true,
            BodyHandle::File { mode, .. } => mode.is_readable(),
        }
    }

    /// Whether writes are permitted on this handle
    pub fn is_writable(&self) -> bool {
        match self {
            BodyHandle::Memory(_) => true,
            BodyHandle::File { mode, .. } => mode.is_writable(),
        }
    }

    /// One-time seekability probe
    ///
    /// Pipes and sockets wrapped as files report a cursor error here.
    pub(crate) fn probe_seekable(&mut self) -> bool {
        match self {
            BodyHandle::Memory(_) => true,
            BodyHandle::File { file, .. } => file.stream_position().is_ok(),
        }
    }

    /// Size of the underlying resource from handle metadata, without
    /// reading it
    ///
    /// `None` for resources that carry no size (pipes and other
    /// non-regular files).
    pub fn len_hint(&self) -> Option<u64> {
        match self {
            BodyHandle::Memory(cursor) => Some(cursor.get_ref().len() as u64),
            BodyHandle::File { file, .. } => {
                let meta = file.metadata().ok()?;
                meta.is_file().then(|| meta.len())
            }
        }
    }

    /// Mode string for metadata reporting
    pub fn mode_str(&self) -> &str {
        match self {
            BodyHandle::Memory(_) => "r+",
            BodyHandle::File { mode, .. } => mode.as_str(),
        }
    }

    /// Kind of backing resource, as reported through metadata
    pub fn stream_type(&self) -> &'static str {
        match self {
            BodyHandle::Memory(_) => "MEMORY",
            BodyHandle::File { .. } => "STDIO",
        }
    }

    /// Path the handle was opened from, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            BodyHandle::Memory(_) => None,
            BodyHandle::File { path, .. } => path.as_deref(),
        }
    }
}

impl Read for BodyHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BodyHandle::Memory(cursor) => cursor.read(buf),
            BodyHandle::File { file, .. } => file.read(buf),
        }
    }
}

impl Write for BodyHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            BodyHandle::Memory(cursor) => cursor.write(buf),
            BodyHandle::File { file, .. } => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            BodyHandle::Memory(cursor) => cursor.flush(),
            BodyHandle::File { file, .. } => file.flush(),
        }
    }
}

impl Seek for BodyHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            BodyHandle::Memory(cursor) => cursor.seek(pos),
            BodyHandle::File { file, .. } => file.seek(pos),
        }
    }
}
