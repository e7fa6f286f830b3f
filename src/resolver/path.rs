//! Path normalization for cache keys and import resolution.

use std::path::{Component, Path, PathBuf};

use crate::base::constants::CSS_EXTENSION;

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment. Never touches the file system, so virtual paths
/// normalize the same way as real ones.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Whether a path points at a stylesheet (`.st.css` or plain `.css`).
pub fn is_stylesheet_path(path: &Path) -> bool {
    path.to_string_lossy().ends_with(CSS_EXTENSION)
}

/// Directory a file's relative imports resolve from.
pub fn context_dir(file: &Path) -> PathBuf {
    file.parent().map(Path::to_path_buf).unwrap_or_default()
}
