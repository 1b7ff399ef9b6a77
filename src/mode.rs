//! File access modes
//!
//! Parses fopen-style mode strings ("r", "w+", "ab", ...) into capability
//! flags once, at stream construction time. Operations later branch on the
//! flags instead of re-inspecting the handle.

use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

use crate::errors::{StreamError, StreamResult};

/// Access mode for a file-backed stream
///
/// The capability flags are fixed at parse time and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessMode {
    raw: String,
    read: bool,
    write: bool,
    append: bool,
    truncate: bool,
    create: bool,
    create_new: bool,
}

impl AccessMode {
    /// Parse an fopen-style mode string
    ///
    /// Primaries: `r` (read), `w` (write, truncate), `a` (append),
    /// `x` (write, must create), `c` (write, no truncate). A `+` adds the
    /// missing half of read/write; `b`, `t` and `e` are accepted and
    /// ignored.
    pub fn parse(s: &str) -> StreamResult<Self> {
        let mut chars = s.chars();

        let (read, write, append, truncate, create, create_new) = match chars.next() {
            Some('r') => (true, false, false, false, false, false),
            Some('w') => (false, true, false, true, true, false),
            Some('a') => (false, true, true, false, true, false),
            Some('x') => (false, true, false, false, false, true),
            Some('c') => (false, true, false, false, true, false),
            _ => return Err(StreamError::InvalidMode(s.to_string())),
        };

        let mut mode = AccessMode {
            raw: s.to_string(),
            read,
            write,
            append,
            truncate,
            create,
            create_new,
        };

        for c in chars {
            match c {
                '+' => {
                    mode.read = true;
                    mode.write = true;
                }
                'b' | 't' | 'e' => {}
                _ => return Err(StreamError::InvalidMode(s.to_string())),
            }
        }

        Ok(mode)
    }

    /// Read-only mode (`"r"`)
    pub fn read_only() -> Self {
        Self::parse("r").unwrap()
    }

    /// Read-write mode without truncation (`"r+"`)
    pub fn read_write() -> Self {
        Self::parse("r+").unwrap()
    }

    /// Write-only mode, truncating (`"w"`)
    pub fn write_only() -> Self {
        Self::parse("w").unwrap()
    }

    /// Whether streams opened with this mode can be read
    pub fn is_readable(&self) -> bool {
        self.read
    }

    /// Whether streams opened with this mode can be written
    pub fn is_writable(&self) -> bool {
        self.write
    }

    /// The mode string as given
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Map the mode onto `OpenOptions` for the actual open call
    pub(crate) fn open_options(&self) -> OpenOptions {
        let mut opts = OpenOptions::new();
        opts.read(self.read);
        if self.append {
            opts.append(true);
        } else {
            opts.write(self.write);
        }
        opts.truncate(self.truncate)
            .create(self.create)
            .create_new(self.create_new);
        opts
    }
}

impl Default for AccessMode {
    fn default() -> Self {
        Self::read_only()
    }
}

impl FromStr for AccessMode {
    type Err = StreamError;

    fn from_str(s: &str) -> StreamResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
