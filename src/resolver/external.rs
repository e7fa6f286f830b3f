//! External (non-stylesheet) modules: JS mixins and formatters.
//!
//! The compiler never executes foreign code itself. The host registers the
//! exports of each external module up front, or installs a loader that
//! produces them on demand (the `requireModule` hook).

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::error::{Result, StylableError};

use super::path::normalize_path;

/// Output of a JS mixin: declarations, or nested rules keyed by a
/// selector relative to the consuming rule (`&:hover`, `& .part`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixinEntry {
    Value(String),
    Nested(Vec<(String, MixinEntry)>),
}

pub type JsMixin = Rc<dyn Fn(&[String]) -> std::result::Result<Vec<(String, MixinEntry)>, String>>;
pub type Formatter = Rc<dyn Fn(&[String]) -> std::result::Result<String, String>>;

#[derive(Clone)]
pub enum ExternalSymbol {
    Mixin(JsMixin),
    Formatter(Formatter),
}

impl fmt::Debug for ExternalSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalSymbol::Mixin(_) => f.write_str("Mixin(..)"),
            ExternalSymbol::Formatter(_) => f.write_str("Formatter(..)"),
        }
    }
}

/// Exports of one external module.
#[derive(Debug, Clone, Default)]
pub struct ExternalModule {
    default: Option<ExternalSymbol>,
    named: IndexMap<String, ExternalSymbol>,
}

impl ExternalModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, symbol: ExternalSymbol) -> Self {
        self.default = Some(symbol);
        self
    }

    pub fn with_mixin(
        mut self,
        name: impl Into<String>,
        mixin: impl Fn(&[String]) -> std::result::Result<Vec<(String, MixinEntry)>, String> + 'static,
    ) -> Self {
        self.named.insert(name.into(), ExternalSymbol::Mixin(Rc::new(mixin)));
        self
    }

    pub fn with_formatter(
        mut self,
        name: impl Into<String>,
        formatter: impl Fn(&[String]) -> std::result::Result<String, String> + 'static,
    ) -> Self {
        self.named
            .insert(name.into(), ExternalSymbol::Formatter(Rc::new(formatter)));
        self
    }

    /// `None` asks for the default export.
    pub fn get(&self, name: Option<&str>) -> Option<&ExternalSymbol> {
        match name {
            None => self.default.as_ref(),
            Some(name) => self.named.get(name),
        }
    }
}

type Loader = Box<dyn Fn(&Path) -> std::result::Result<ExternalModule, String>>;

/// Registry of external modules, keyed by absolute path.
#[derive(Default)]
pub struct ExternalModules {
    modules: RefCell<FxHashMap<PathBuf, Rc<ExternalModule>>>,
    loader: Option<Loader>,
}

impl fmt::Debug for ExternalModules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalModules")
            .field("modules", &self.modules.borrow().len())
            .field("loader", &self.loader.is_some())
            .finish()
    }
}

impl ExternalModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loader(
        mut self,
        loader: impl Fn(&Path) -> std::result::Result<ExternalModule, String> + 'static,
    ) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    pub fn register(&self, path: impl AsRef<Path>, module: ExternalModule) {
        self.modules
            .borrow_mut()
            .insert(normalize_path(path.as_ref()), Rc::new(module));
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.modules.borrow().contains_key(&normalize_path(path))
    }

    /// Load a module, asking the loader once for unregistered paths.
    pub fn require(&self, path: &Path) -> Result<Rc<ExternalModule>> {
        let key = normalize_path(path);
        if let Some(module) = self.modules.borrow().get(&key) {
            return Ok(Rc::clone(module));
        }
        let loader = self.loader.as_ref().ok_or_else(|| StylableError::ExternalModule {
            path: key.clone(),
            message: "module is not registered".to_string(),
        })?;
        let module = Rc::new(loader(&key).map_err(|message| StylableError::ExternalModule {
            path: key.clone(),
            message,
        })?);
        tracing::debug!(path = %key.display(), "loaded external module");
        self.modules.borrow_mut().insert(key, Rc::clone(&module));
        Ok(module)
    }
}
