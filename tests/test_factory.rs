//! Stream factory tests
mod common;

use std::path::PathBuf;

use tempfile::TempDir;

use bodystream::{AccessMode, BodyHandle, MessageBody, StreamError, StreamFactory};
use common::{fixture_file, init_tracing};

// ============================================================================
// Literal Content
// ============================================================================

#[test]
fn test_create_stream_roundtrip() {
    init_tracing();
    let mut stream = StreamFactory::new().create_stream("hello body").unwrap();

    assert_eq!(stream.tell().unwrap(), 0);
    assert_eq!(stream.size(), Some(10));
    assert_eq!(stream.contents().unwrap().as_ref(), b"hello body");
    stream.rewind().unwrap();
    assert_eq!(stream.contents().unwrap().as_ref(), b"hello body");
}

#[test]
fn test_create_stream_empty() {
    let mut stream = StreamFactory::new().create_stream("").unwrap();

    assert_eq!(stream.size(), Some(0));
    assert!(stream.contents().unwrap().is_empty());
}

#[test]
fn test_create_stream_is_read_write_seekable() {
    let mut stream = StreamFactory::new().create_stream("x").unwrap();

    assert!(stream.is_readable());
    assert!(stream.is_writable());
    assert!(stream.is_seekable());
    assert_eq!(stream.write(b"y").unwrap(), 1);
}

// ============================================================================
// File Paths
// ============================================================================

#[test]
fn test_from_file_read_only() {
    let dir = TempDir::new().unwrap();
    let path = fixture_file(&dir, "body.txt", b"file content");

    let mut stream = StreamFactory::new()
        .create_stream_from_file(&path, AccessMode::read_only(), None)
        .unwrap();

    assert!(stream.is_readable());
    assert!(!stream.is_writable());
    assert!(stream.is_seekable());
    assert_eq!(stream.contents().unwrap().as_ref(), b"file content");
}

#[test]
fn test_from_file_write_mode_creates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.txt");

    let mut stream = StreamFactory::new()
        .create_stream_from_file(&path, AccessMode::write_only(), None)
        .unwrap();
    assert!(!stream.is_readable());
    stream.write(b"written").unwrap();
    stream.close();

    assert_eq!(std::fs::read(&path).unwrap(), b"written");
}

#[test]
fn test_from_file_append_mode() {
    let dir = TempDir::new().unwrap();
    let path = fixture_file(&dir, "log.txt", b"start-");

    let mut stream = StreamFactory::new()
        .create_stream_from_file(&path, AccessMode::parse("a").unwrap(), None)
        .unwrap();
    stream.write(b"end").unwrap();
    stream.close();

    assert_eq!(std::fs::read(&path).unwrap(), b"start-end");
}

#[test]
fn test_from_file_missing_path_carries_context() {
    let err = StreamFactory::new()
        .create_stream_from_file("/nonexistent/path", AccessMode::read_only(), None)
        .unwrap_err();

    match &err {
        StreamError::FileOpen { path, mode, .. } => {
            assert_eq!(path, &PathBuf::from("/nonexistent/path"));
            assert_eq!(mode, "r");
        }
        other => panic!("expected FileOpen, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("/nonexistent/path"));
    assert!(message.contains("mode r"));
}

#[test]
fn test_from_file_exclusive_mode_rejects_existing() {
    let dir = TempDir::new().unwrap();
    let path = fixture_file(&dir, "taken.txt", b"already here");

    let err = StreamFactory::new()
        .create_stream_from_file(&path, AccessMode::parse("x").unwrap(), None)
        .unwrap_err();
    assert!(matches!(err, StreamError::FileOpen { .. }));
}

// ============================================================================
// Raw Handles
// ============================================================================

#[test]
fn test_from_handle_memory() {
    let handle = BodyHandle::from_bytes("in memory");

    let mut stream = StreamFactory::new()
        .create_stream_from_handle(handle, None)
        .unwrap();

    assert_eq!(stream.size(), Some(9));
    assert_eq!(stream.contents().unwrap().as_ref(), b"in memory");
}

#[test]
fn test_from_handle_open_file() {
    let dir = TempDir::new().unwrap();
    let path = fixture_file(&dir, "raw.txt", b"raw handle");
    let file = std::fs::File::open(&path).unwrap();

    let mut stream = StreamFactory::new()
        .create_stream_from_handle(BodyHandle::file(file, AccessMode::read_only()), None)
        .unwrap();

    assert_eq!(stream.contents().unwrap().as_ref(), b"raw handle");
}

#[cfg(unix)]
#[test]
fn test_from_handle_dead_descriptor() {
    use std::fs::File;
    use std::os::fd::FromRawFd;

    // descriptor 997 is not open in this process
    let file = unsafe { File::from_raw_fd(997) };
    let handle = BodyHandle::file(file, AccessMode::read_only());

    let err = StreamFactory::new()
        .create_stream_from_handle(handle, None)
        .unwrap_err();
    assert!(matches!(err, StreamError::InvalidHandle));
}

// ============================================================================
// Cache Streams
// ============================================================================

#[test]
fn test_cache_must_be_seekable_and_writable() {
    let dir = TempDir::new().unwrap();
    let path = fixture_file(&dir, "cache.txt", b"");
    let read_only_cache = StreamFactory::new()
        .create_stream_from_file(&path, AccessMode::read_only(), None)
        .unwrap();

    let err = StreamFactory::new()
        .create_stream_from_handle(BodyHandle::from_bytes("x"), Some(read_only_cache))
        .unwrap_err();
    assert!(matches!(err, StreamError::InvalidCache));
}

#[test]
fn test_cache_serves_consumed_contents() {
    let factory = StreamFactory::new();
    let cache = factory.create_stream("").unwrap();

    let mut stream = factory
        .create_stream_from_handle(BodyHandle::from_bytes("replay me"), Some(cache))
        .unwrap();

    assert_eq!(stream.contents().unwrap().as_ref(), b"replay me");
    // the handle cursor sits at the end; full contents come back anyway
    assert_eq!(stream.to_bytes().as_ref(), b"replay me");
}

#[cfg(unix)]
#[test]
fn test_cache_replays_nonseekable_source() {
    use std::fs::File;
    use std::io::Write;
    use std::os::fd::OwnedFd;

    let (reader, mut writer) = std::io::pipe().unwrap();
    writer.write_all(b"piped").unwrap();
    drop(writer);

    let factory = StreamFactory::new();
    let cache = factory.create_stream("").unwrap();
    let handle = BodyHandle::file(File::from(OwnedFd::from(reader)), AccessMode::read_only());
    let mut stream = factory.create_stream_from_handle(handle, Some(cache)).unwrap();

    assert!(!stream.is_seekable());
    assert_eq!(stream.contents().unwrap().as_ref(), b"piped");
    // a pipe cannot rewind; the cache replays what was already read
    assert_eq!(stream.to_bytes().as_ref(), b"piped");
}
