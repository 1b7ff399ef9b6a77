//! Common test utilities for bodystream integration tests
//!
//! Provides tracing setup and temp-file fixtures shared across the
//! integration suites.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use tempfile::TempDir;

static TRACING: Once = Once::new();

/// Install a fmt subscriber once so `RUST_LOG=debug` surfaces stream logs
/// during test runs
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Write `content` to a fresh file under `dir` and return its path
pub fn fixture_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
