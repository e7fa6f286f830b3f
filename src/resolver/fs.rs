//! File system capability used by the cache and module resolution.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use rustc_hash::FxHashMap;

use crate::error::{Result, StylableError};

use super::path::normalize_path;

/// Minimal file system hook supplied by the host.
pub trait FileSystem {
    fn read_file(&self, path: &Path) -> Result<String>;

    /// Last modification time, used as the cache key.
    fn modified(&self, path: &Path) -> Result<SystemTime>;

    fn exists(&self, path: &Path) -> bool;
}

/// The real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_file(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| StylableError::io(path, source))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        std::fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(|source| StylableError::io(path, source))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[derive(Debug, Clone)]
struct MemoryFile {
    content: String,
    modified: SystemTime,
}

/// In-memory file system with a logical clock.
///
/// Every write or [`touch`](Self::touch) advances the clock, so a changed
/// file always reports a newer modification time. Reads are counted.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RefCell<FxHashMap<PathBuf, MemoryFile>>,
    clock: Cell<u64>,
    reads: Cell<usize>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(path, content)` pairs.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<Path>,
        C: Into<String>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.write(path, content);
        }
        fs
    }

    pub fn write(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let modified = self.tick();
        self.files.borrow_mut().insert(
            normalize_path(path.as_ref()),
            MemoryFile {
                content: content.into(),
                modified,
            },
        );
    }

    /// Bump the modification time without changing content.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let modified = self.tick();
        if let Some(file) = self.files.borrow_mut().get_mut(&normalize_path(path.as_ref())) {
            file.modified = modified;
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.borrow_mut().remove(&normalize_path(path.as_ref()));
    }

    /// Number of `read_file` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    fn tick(&self) -> SystemTime {
        let next = self.clock.get() + 1;
        self.clock.set(next);
        SystemTime::UNIX_EPOCH + Duration::from_secs(next)
    }

    fn not_found(path: &Path) -> StylableError {
        StylableError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        )
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> Result<String> {
        self.reads.set(self.reads.get() + 1);
        self.files
            .borrow()
            .get(&normalize_path(path))
            .map(|file| file.content.clone())
            .ok_or_else(|| Self::not_found(path))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        self.files
            .borrow()
            .get(&normalize_path(path))
            .map(|file| file.modified)
            .ok_or_else(|| Self::not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(&normalize_path(path))
    }
}
