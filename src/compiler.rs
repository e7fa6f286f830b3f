//! The compiler facade: one resolver and file cache per instance.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::StylableConfig;
use crate::depth::{DepthCalculator, StylesheetGraph};
use crate::error::Result;
use crate::resolver::path::absolutize;
use crate::resolver::{ResolvedOrigin, StylableResolver};
use crate::semantic::{Meta, Symbol};
use crate::transformer::{StylableExports, TransformOptions, transform};

/// Output of [`Stylable::transform`].
#[derive(Debug, Clone)]
pub struct StylableResults {
    /// Carries the output tree, globals and transform diagnostics.
    pub meta: Meta,
    pub exports: StylableExports,
}

impl StylableResults {
    /// The transformed CSS text.
    pub fn css(&self) -> String {
        self.meta
            .output_ast
            .as_ref()
            .map(|ast| ast.to_css())
            .unwrap_or_default()
    }
}

/// Compiles stylesheets of one project.
///
/// Cached metas are reused until their file changes; every call to
/// [`transform`](Self::transform) starts a fresh resolution pass.
#[derive(Debug)]
pub struct Stylable {
    config: StylableConfig,
    resolver: StylableResolver,
    options: TransformOptions,
}

impl Stylable {
    pub fn new(config: StylableConfig) -> Self {
        let resolver = StylableResolver::new(
            Rc::clone(&config.file_system),
            Rc::clone(&config.namespace_resolver),
            Rc::clone(&config.module_resolver),
            Rc::clone(&config.external_modules),
        );
        let options = TransformOptions {
            mode: config.mode,
            delimiter: config.delimiter.clone(),
            custom_values: config.custom_values.clone(),
        };
        Self {
            config,
            resolver,
            options,
        }
    }

    pub fn config(&self) -> &StylableConfig {
        &self.config
    }

    pub fn resolver(&self) -> &StylableResolver {
        &self.resolver
    }

    fn path(&self, path: &Path) -> PathBuf {
        absolutize(&self.config.project_root, path)
    }

    /// Analyze `path`, from the cache when the file is unchanged.
    pub fn process(&self, path: impl AsRef<Path>) -> Result<Rc<Meta>> {
        self.resolver.process(&self.path(path.as_ref()))
    }

    /// Analyze `source` as the content of `path` without touching the file system.
    pub fn add_virtual(&self, path: impl AsRef<Path>, source: &str) -> Result<Rc<Meta>> {
        self.resolver.add_virtual(&self.path(path.as_ref()), source)
    }

    #[tracing::instrument(level = "debug", skip(self), fields(path = %path.as_ref().display()))]
    pub fn transform(&self, path: impl AsRef<Path>) -> Result<StylableResults> {
        let meta = self.process(path)?;
        let result = transform(&self.resolver, meta, &self.options)?;
        Ok(StylableResults {
            meta: result.meta,
            exports: result.exports,
        })
    }

    /// Follow `symbol` of `meta` to the stylesheet that defines it. Each
    /// call is its own pass, so edited files are picked up.
    pub fn resolve_symbol_origin(
        &self,
        symbol: &Symbol,
        meta: &Rc<Meta>,
    ) -> Result<Option<ResolvedOrigin>> {
        self.resolver.begin_pass();
        self.resolver.resolve_symbol_origin(symbol, meta)
    }

    /// Style depth of `path` over the stylesheet import graph.
    pub fn depth(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = self.path(path.as_ref());
        DepthCalculator::new(StylesheetGraph::new(&self.resolver)).depth(&path)
    }
}
