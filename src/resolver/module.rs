//! Module resolution hook.

use std::path::{Path, PathBuf};

use crate::error::{Result, StylableError};

use super::fs::FileSystem;
use super::path::normalize_path;

/// Maps an import request to an absolute path. Failing to resolve is a
/// hard error, not a diagnostic.
pub trait ModuleResolver {
    fn resolve(&self, context: &Path, request: &str, fs: &dyn FileSystem) -> Result<PathBuf>;
}

/// Relative and absolute paths, then `node_modules` lookup walking up from
/// the importing directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeModuleResolver;

impl ModuleResolver for NodeModuleResolver {
    fn resolve(&self, context: &Path, request: &str, fs: &dyn FileSystem) -> Result<PathBuf> {
        let not_found = || StylableError::module_not_found(request, context);

        if is_path_request(request) {
            let candidate = normalize_path(&context.join(request));
            return fs.exists(&candidate).then_some(candidate).ok_or_else(not_found);
        }

        context
            .ancestors()
            .map(|dir| normalize_path(&dir.join("node_modules").join(request)))
            .find(|candidate| fs.exists(candidate))
            .ok_or_else(not_found)
    }
}

fn is_path_request(request: &str) -> bool {
    request.starts_with("./") || request.starts_with("../") || Path::new(request).is_absolute()
}
