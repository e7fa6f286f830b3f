//! Namespace generation.
//!
//! Every stylesheet gets a namespace: a project-wide unique prefix for its
//! scoped names. The [`NamespaceResolver`] strategy maps the local name
//! (declared via `@st-namespace`, else derived from the file name) and the
//! origin path to the final namespace. Strategies must be deterministic:
//! the same inputs give the same namespace in every run.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::base::constants::{CSS_EXTENSION, STYLESHEET_EXTENSION};
use crate::error::{Result, StylableError};

/// Pluggable namespace strategy.
pub trait NamespaceResolver {
    /// Produce the namespace for `local_name` declared by the file at `origin`.
    ///
    /// `source` is the file actually being processed when its origin was
    /// redirected with an `st-namespace-reference` directive.
    fn resolve(&self, local_name: &str, origin: &Path, source: Option<&Path>) -> Result<String>;
}

/// Default strategy: `local_name + murmur3(origin path)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashNamespace;

impl NamespaceResolver for HashNamespace {
    fn resolve(&self, local_name: &str, origin: &Path, _source: Option<&Path>) -> Result<String> {
        let hash = murmur3_32(origin.to_string_lossy().as_bytes(), 0);
        Ok(format!("{local_name}{hash}"))
    }
}

/// Returns the local name unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimNamespace;

impl NamespaceResolver for VerbatimNamespace {
    fn resolve(&self, local_name: &str, _origin: &Path, _source: Option<&Path>) -> Result<String> {
        Ok(local_name.to_string())
    }
}

/// Hashes package identity plus the path relative to the package root, so
/// namespaces are stable across machines and checkout locations.
#[derive(Debug, Clone)]
pub struct PackageNamespace {
    pub package_name: String,
    pub version: String,
    pub package_root: PathBuf,
}

impl PackageNamespace {
    pub fn new(
        package_name: impl Into<String>,
        version: impl Into<String>,
        package_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            version: version.into(),
            package_root: package_root.into(),
        }
    }
}

impl NamespaceResolver for PackageNamespace {
    fn resolve(&self, local_name: &str, origin: &Path, _source: Option<&Path>) -> Result<String> {
        let relative = origin.strip_prefix(&self.package_root).unwrap_or(origin);
        let relative = relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let key = format!("{}@{}/{}", self.package_name, self.version, relative);
        Ok(format!("{local_name}{}", murmur3_32(key.as_bytes(), 0)))
    }
}

/// Wraps a strategy and fails when two different origins map to the same namespace.
#[derive(Debug, Default)]
pub struct CollisionChecked<R> {
    inner: R,
    seen: RefCell<FxHashMap<String, PathBuf>>,
}

impl<R: NamespaceResolver> CollisionChecked<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            seen: RefCell::new(FxHashMap::default()),
        }
    }
}

impl<R: NamespaceResolver> NamespaceResolver for CollisionChecked<R> {
    fn resolve(&self, local_name: &str, origin: &Path, source: Option<&Path>) -> Result<String> {
        let namespace = self.inner.resolve(local_name, origin, source)?;
        let mut seen = self.seen.borrow_mut();
        match seen.get(&namespace) {
            Some(existing) if existing != origin => Err(StylableError::NamespaceCollision {
                namespace,
                existing: existing.clone(),
                incoming: origin.to_path_buf(),
            }),
            Some(_) => Ok(namespace),
            None => {
                seen.insert(namespace.clone(), origin.to_path_buf());
                Ok(namespace)
            }
        }
    }
}

/// Local namespace derived from a file name: `my-button.st.css` → `my-button`.
pub fn local_name_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(STYLESHEET_EXTENSION)
        .or_else(|| file_name.strip_suffix(CSS_EXTENSION))
        .unwrap_or(&file_name);
    let mut name: String = stem
        .chars()
        .map(|ch| if is_namespace_char(ch) { ch } else { '-' })
        .collect();
    if name.chars().next().is_some_and(|ch| ch.is_ascii_digit()) {
        name.insert(0, 'n');
    }
    if name.is_empty() {
        name.push_str("style");
    }
    name
}

/// A namespace must be an identifier: letters, digits, `_` and `-`, not
/// starting with a digit. Non-ASCII identifier characters are accepted.
pub fn is_valid_namespace(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let first_ok = first == '_' || first == '-' || unicode_ident::is_xid_start(first);
    first_ok && chars.all(is_namespace_char)
}

fn is_namespace_char(ch: char) -> bool {
    ch == '-' || ch == '_' || unicode_ident::is_xid_continue(ch)
}

/// MurmurHash3 (x86, 32-bit).
pub fn murmur3_32(key: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut hash = seed;
    let mut chunks = key.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        hash ^= k;
        hash = hash.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (index, byte) in tail.iter().enumerate() {
            k ^= u32::from(*byte) << (8 * index);
        }
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        hash ^= k;
    }

    hash ^= key.len() as u32;
    hash ^= hash >> 16;
    hash = hash.wrapping_mul(0x85eb_ca6b);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0xc2b2_ae35);
    hash ^= hash >> 16;
    hash
}
