//! Memoized read + process of files, keyed by path and modification time.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use rustc_hash::FxHashMap;

use crate::error::Result;

use super::fs::FileSystem;
use super::path::normalize_path;

/// A cached value and the modification time it was produced from.
/// Values seeded through [`FileProcessor::add`] have no modification time
/// and are never invalidated by the file system.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub mtime: Option<SystemTime>,
}

type ProcessFn<T> = Box<dyn Fn(&Path, &str) -> Result<T>>;

/// Reads files through a [`FileSystem`] and memoizes the processed value
/// per absolute path. Entries are replaced when the file's modification
/// time changes and never evicted otherwise.
pub struct FileProcessor<T> {
    fs: Rc<dyn FileSystem>,
    process: ProcessFn<T>,
    cache: RefCell<FxHashMap<PathBuf, CacheEntry<T>>>,
}

impl<T: Clone> FileProcessor<T> {
    pub fn new(fs: Rc<dyn FileSystem>, process: impl Fn(&Path, &str) -> Result<T> + 'static) -> Self {
        Self {
            fs,
            process: Box::new(process),
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Return the processed value of `path`, re-reading and re-processing
    /// only when `ignore_cache` is set or the file changed since cached.
    pub fn process(&self, path: &Path, ignore_cache: bool) -> Result<T> {
        let key = normalize_path(path);

        if !ignore_cache {
            let cached = self.cache.borrow().get(&key).cloned();
            match cached {
                Some(CacheEntry { value, mtime: None }) => {
                    tracing::trace!(path = %key.display(), "cache hit (virtual)");
                    return Ok(value);
                }
                Some(CacheEntry {
                    value,
                    mtime: Some(mtime),
                }) => {
                    if self.fs.modified(&key)? == mtime {
                        tracing::trace!(path = %key.display(), "cache hit");
                        return Ok(value);
                    }
                }
                None => {}
            }
        }

        tracing::debug!(path = %key.display(), ignore_cache, "processing file");
        let mtime = self.fs.modified(&key)?;
        let content = self.fs.read_file(&key)?;
        let value = (self.process)(&key, &content)?;
        self.cache.borrow_mut().insert(
            key,
            CacheEntry {
                value: value.clone(),
                mtime: Some(mtime),
            },
        );
        Ok(value)
    }

    /// Seed the cache without touching the file system.
    pub fn add(&self, path: &Path, value: T) {
        self.cache.borrow_mut().insert(
            normalize_path(path),
            CacheEntry { value, mtime: None },
        );
    }

    pub fn get(&self, path: &Path) -> Option<T> {
        self.cache
            .borrow()
            .get(&normalize_path(path))
            .map(|entry| entry.value.clone())
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}
