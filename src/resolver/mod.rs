//! Cross-file resolution.
//!
//! [`StylableResolver`] owns the file cache and answers "where is this
//! symbol really defined": it follows imports, aliases and `-st-extends`
//! hops across stylesheets. Module requests go through the host's
//! [`ModuleResolver`] at most once per `(importing file, request)` edge
//! per pass.
//!
//! Recursion over import edges keeps an explicit active path; a hop that
//! is already on the path ends the walk instead of recursing.

pub mod cache;
pub mod external;
pub mod fs;
pub mod module;
pub mod path;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::error::{Result, StylableError};
use crate::namespace::NamespaceResolver;
use crate::semantic::processor::process;
use crate::semantic::{ImportRef, ImportedName, Meta, Symbol, SymbolNamespace};

pub use cache::{CacheEntry, FileProcessor};
pub use external::{ExternalModule, ExternalModules, ExternalSymbol, Formatter, JsMixin, MixinEntry};
pub use fs::{FileSystem, MemoryFileSystem, RealFileSystem};
pub use module::{ModuleResolver, NodeModuleResolver};

/// What an import request points at.
#[derive(Debug, Clone)]
pub enum ImportTarget {
    Stylesheet(Rc<Meta>),
    /// A non-stylesheet module (JS mixins, formatters).
    External(PathBuf),
}

/// A symbol together with the stylesheet that defines it.
#[derive(Debug, Clone)]
pub struct ResolvedOrigin {
    pub meta: Rc<Meta>,
    pub symbol: Symbol,
}

impl ResolvedOrigin {
    pub fn class(&self) -> Option<&crate::semantic::ClassSymbol> {
        self.symbol.as_class()
    }
}

type OriginKey = (PathBuf, SymbolNamespace, SmolStr);

pub struct StylableResolver {
    files: FileProcessor<Rc<Meta>>,
    namespace_resolver: Rc<dyn NamespaceResolver>,
    module_resolver: Rc<dyn ModuleResolver>,
    external: Rc<ExternalModules>,
    requests: RefCell<FxHashMap<(PathBuf, String), Option<PathBuf>>>,
    origins: RefCell<FxHashMap<OriginKey, Option<ResolvedOrigin>>>,
    symbol_origins: RefCell<FxHashMap<OriginKey, Option<ResolvedOrigin>>>,
}

impl std::fmt::Debug for StylableResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StylableResolver")
            .field("cached_files", &self.files.len())
            .field("requests", &self.requests.borrow().len())
            .finish_non_exhaustive()
    }
}

impl StylableResolver {
    pub fn new(
        file_system: Rc<dyn FileSystem>,
        namespace_resolver: Rc<dyn NamespaceResolver>,
        module_resolver: Rc<dyn ModuleResolver>,
        external: Rc<ExternalModules>,
    ) -> Self {
        let strategy = Rc::clone(&namespace_resolver);
        let files = FileProcessor::new(file_system, move |path: &Path, source: &str| {
            process(path, source, strategy.as_ref()).map(Rc::new)
        });
        Self {
            files,
            namespace_resolver,
            module_resolver,
            external,
            requests: RefCell::new(FxHashMap::default()),
            origins: RefCell::new(FxHashMap::default()),
            symbol_origins: RefCell::new(FxHashMap::default()),
        }
    }

    /// Forget per-pass memos. The file cache is kept.
    pub fn begin_pass(&self) {
        self.requests.borrow_mut().clear();
        self.origins.borrow_mut().clear();
        self.symbol_origins.borrow_mut().clear();
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        self.files.file_system()
    }

    pub fn external_modules(&self) -> &ExternalModules {
        &self.external
    }

    pub fn namespace_resolver(&self) -> &dyn NamespaceResolver {
        self.namespace_resolver.as_ref()
    }

    pub fn files(&self) -> &FileProcessor<Rc<Meta>> {
        &self.files
    }

    /// The cached meta of `path`, reprocessed if the file changed.
    pub fn process(&self, path: &Path) -> Result<Rc<Meta>> {
        self.files.process(path, false)
    }

    pub fn process_ignoring_cache(&self, path: &Path) -> Result<Rc<Meta>> {
        self.files.process(path, true)
    }

    /// Process `source` as if it were stored at `path` and seed the cache.
    pub fn add_virtual(&self, path: &Path, source: &str) -> Result<Rc<Meta>> {
        let path = path::normalize_path(path);
        let meta = Rc::new(process(&path, source, self.namespace_resolver.as_ref())?);
        self.files.add(&path, Rc::clone(&meta));
        Ok(meta)
    }

    /// Run the module hook for `request` made by the file `from` (resolved
    /// relative to `context`), once per edge per pass.
    pub fn resolve_request(&self, from: &Path, context: &Path, request: &str) -> Result<PathBuf> {
        let key = (from.to_path_buf(), request.to_string());
        if let Some(memo) = self.requests.borrow().get(&key) {
            return memo
                .clone()
                .ok_or_else(|| StylableError::module_not_found(request, context));
        }

        let resolved = match self
            .module_resolver
            .resolve(context, request, self.files.file_system())
        {
            Ok(resolved) => Ok(resolved),
            Err(error) => {
                let registered = path::normalize_path(&context.join(request));
                if self.external.contains(&registered) {
                    Ok(registered)
                } else {
                    Err(error)
                }
            }
        };
        tracing::debug!(
            from = %from.display(),
            request,
            resolved = resolved.is_ok(),
            "module request"
        );
        self.requests
            .borrow_mut()
            .insert(key, resolved.as_ref().ok().cloned());
        resolved
    }

    /// Resolve import `index` of `meta`, recording the path on the record.
    pub fn resolve_import(&self, meta: &Meta, index: usize) -> Result<ImportTarget> {
        let record = meta.imports.get(index).ok_or_else(|| {
            StylableError::module_not_found(format!("#{index}"), meta.source.clone())
        })?;
        let resolved = match record.resolved_path() {
            Some(resolved) => resolved.to_path_buf(),
            None => {
                let resolved = self.resolve_request(&meta.source, &record.context, &record.request)?;
                let _ = record.resolved_path.set(resolved.clone());
                resolved
            }
        };
        if path::is_stylesheet_path(&resolved) {
            Ok(ImportTarget::Stylesheet(self.process(&resolved)?))
        } else {
            Ok(ImportTarget::External(resolved))
        }
    }

    /// Resolve `name` in `meta`'s table `namespace`, following import
    /// aliases to the defining stylesheet. `None` when the name is unknown
    /// or a hop lands on a missing symbol or an external module.
    pub fn resolve_symbol(
        &self,
        meta: &Rc<Meta>,
        namespace: SymbolNamespace,
        name: &str,
    ) -> Result<Option<ResolvedOrigin>> {
        let key = (meta.source.clone(), namespace, SmolStr::from(name));
        if let Some(memo) = self.origins.borrow().get(&key) {
            return Ok(memo.clone());
        }
        let mut active = Vec::new();
        let resolved = self.resolve_in(meta, namespace, name, &mut active)?;
        self.origins.borrow_mut().insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Resolve what `reference` (an import of `meta`) points at.
    pub fn resolve_imported(
        &self,
        meta: &Meta,
        reference: &ImportRef,
        namespace: SymbolNamespace,
    ) -> Result<Option<ResolvedOrigin>> {
        let mut active = vec![(meta.source.clone(), namespace, import_key(reference))];
        self.follow_import(meta, reference, namespace, &mut active)
    }

    fn resolve_in(
        &self,
        meta: &Rc<Meta>,
        namespace: SymbolNamespace,
        name: &str,
        active: &mut Vec<OriginKey>,
    ) -> Result<Option<ResolvedOrigin>> {
        let Some(symbol) = meta.symbols.get(namespace, name) else {
            return Ok(None);
        };
        let Some(reference) = symbol.import_ref() else {
            return Ok(Some(ResolvedOrigin {
                meta: Rc::clone(meta),
                symbol: symbol.clone(),
            }));
        };
        let key = (meta.source.clone(), namespace, SmolStr::from(name));
        if active.contains(&key) {
            tracing::warn!(path = %meta.source.display(), name, "circular import alias");
            return Ok(None);
        }
        active.push(key);
        let resolved = self.follow_import(meta, reference, namespace, active);
        active.pop();
        resolved
    }

    fn follow_import(
        &self,
        meta: &Meta,
        reference: &ImportRef,
        namespace: SymbolNamespace,
        active: &mut Vec<OriginKey>,
    ) -> Result<Option<ResolvedOrigin>> {
        let target = match self.resolve_import(meta, reference.import)? {
            ImportTarget::Stylesheet(target) => target,
            ImportTarget::External(_) => return Ok(None),
        };
        match &reference.imported {
            ImportedName::Default => Ok(target.root().map(|root| ResolvedOrigin {
                symbol: Symbol::Class(root.clone()),
                meta: Rc::clone(&target),
            })),
            ImportedName::Named(imported) => {
                // Elements and plain imports look up classes and vars.
                let lookup = match namespace {
                    SymbolNamespace::Element => SymbolNamespace::Main,
                    other => other,
                };
                self.resolve_in(&target, lookup, imported, active)
            }
        }
    }

    /// Follow `symbol`'s `-st-extends` while it points into another
    /// stylesheet, returning the last symbol reached. `None` when a hop
    /// cannot resolve or the chain loops. Every hop visited shares the
    /// result, memoized until the next pass.
    pub fn resolve_symbol_origin(
        &self,
        symbol: &Symbol,
        meta: &Rc<Meta>,
    ) -> Result<Option<ResolvedOrigin>> {
        let mut current = ResolvedOrigin {
            meta: Rc::clone(meta),
            symbol: symbol.clone(),
        };
        let mut active: Vec<OriginKey> = Vec::new();
        let resolved = loop {
            let key = origin_key(&current);
            if let Some(memo) = self.symbol_origins.borrow().get(&key) {
                break memo.clone();
            }
            if active.contains(&key) {
                tracing::warn!(
                    path = %current.meta.source.display(),
                    name = %current.symbol.name(),
                    "circular symbol origin"
                );
                break None;
            }
            active.push(key);

            if let Some(reference) = current.symbol.import_ref().cloned() {
                let namespace = current.symbol.namespace();
                match self.resolve_imported(&current.meta, &reference, namespace)? {
                    Some(next) => current = next,
                    None => break None,
                }
                continue;
            }

            let extends = match &current.symbol {
                Symbol::Class(class) => class.extends.clone(),
                _ => None,
            };
            let imported_extends = extends.and_then(|name| {
                current
                    .meta
                    .symbols
                    .get(SymbolNamespace::Main, &name)
                    .filter(|target| target.import_ref().is_some())
                    .cloned()
            });
            match imported_extends {
                Some(next) => current.symbol = next,
                None => break Some(current),
            }
        };
        let mut memo = self.symbol_origins.borrow_mut();
        for key in active {
            memo.insert(key, resolved.clone());
        }
        Ok(resolved)
    }

    /// The `-st-extends` chain of class `name` in `meta`, starting with the
    /// class itself (resolved through its alias, if any).
    pub fn resolve_extends(&self, meta: &Rc<Meta>, name: &str) -> Result<Vec<ResolvedOrigin>> {
        let mut chain: Vec<ResolvedOrigin> = Vec::new();
        let mut next = self.resolve_symbol(meta, SymbolNamespace::Main, name)?;
        while let Some(origin) = next {
            let Some(class) = origin.class() else {
                break;
            };
            let seen = chain.iter().any(|link| {
                link.meta.source == origin.meta.source && link.symbol.name() == &class.name
            });
            if seen {
                tracing::warn!(
                    path = %origin.meta.source.display(),
                    name = %class.name,
                    "circular extends"
                );
                break;
            }
            next = match &class.extends {
                Some(parent) => self.resolve_symbol(&origin.meta, SymbolNamespace::Main, parent)?,
                None => None,
            };
            chain.push(origin);
        }
        Ok(chain)
    }

    /// Absolute paths of every module `path` imports.
    pub fn dependencies(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let meta = self.process(path)?;
        let mut dependencies = Vec::new();
        for index in 0..meta.imports.len() {
            let resolved = match self.resolve_import(&meta, index)? {
                ImportTarget::Stylesheet(target) => target.source.clone(),
                ImportTarget::External(path) => path,
            };
            if !dependencies.contains(&resolved) {
                dependencies.push(resolved);
            }
        }
        Ok(dependencies)
    }
}

fn origin_key(origin: &ResolvedOrigin) -> OriginKey {
    (
        origin.meta.source.clone(),
        origin.symbol.namespace(),
        origin.symbol.name().clone(),
    )
}

fn import_key(reference: &ImportRef) -> SmolStr {
    match &reference.imported {
        ImportedName::Default => SmolStr::new_static("default"),
        ImportedName::Named(name) => name.clone(),
    }
}
