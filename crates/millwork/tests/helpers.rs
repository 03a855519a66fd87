//! Shared test utilities for millwork integration tests.
//!
//! Fixtures are generated into `tempfile::TempDir`s rather than checked in,
//! since most suites need to control modification times.

#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Write a fixture file under `dir`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// Read a produced artifact.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read '{}': {e}", path.display()))
}

pub fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

/// Push a file's mtime into the future so it is unambiguously newer than
/// anything written earlier in the test, regardless of filesystem timestamp
/// granularity.
pub fn bump_mtime(path: &Path, ahead: Duration) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() + ahead)
        .unwrap();
}

/// A glob pattern rooted at an absolute fixture directory.
pub fn pattern(dir: &Path, tail: &str) -> String {
    format!("{}/{}", dir.display(), tail)
}
