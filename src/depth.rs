//! Style depth: a topological ordering metric over the import graph.
//!
//! `depth(m) = 1 + max(depth(d))` for a stylesheet and `max(depth(d))` for
//! any other module. A stylesheet also folds in the depth of its view, the
//! one non-stylesheet module with the same base path that imports it.
//! A module already on the active path contributes 0, so cycles terminate.

use std::fmt::Debug;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::error::{Result, StylableError};
use crate::resolver::StylableResolver;

/// The graph the calculator walks.
pub trait DependencyGraph {
    type Module: Clone + Eq + Hash + Debug;

    fn dependencies(&self, module: &Self::Module) -> Result<Vec<Self::Module>>;

    /// Modules importing `module`; only consulted for stylesheets.
    fn importers(&self, module: &Self::Module) -> Vec<Self::Module>;

    fn is_stylesheet(&self, module: &Self::Module) -> bool;

    /// Module path without its extension, used to match a stylesheet with its view.
    fn base_path(&self, module: &Self::Module) -> String;
}

/// Memoizing depth calculator over a [`DependencyGraph`].
pub struct DepthCalculator<G: DependencyGraph> {
    graph: G,
    cache: FxHashMap<G::Module, usize>,
}

impl<G: DependencyGraph> DepthCalculator<G> {
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            cache: FxHashMap::default(),
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn depth(&mut self, module: &G::Module) -> Result<usize> {
        let mut path = Vec::new();
        self.depth_in(module, &mut path)
    }

    fn depth_in(&mut self, module: &G::Module, path: &mut Vec<G::Module>) -> Result<usize> {
        if let Some(depth) = self.cache.get(module) {
            return Ok(*depth);
        }
        if path.contains(module) {
            tracing::warn!(module = ?module, "dependency cycle, depth cut off");
            return Ok(0);
        }

        let mut dependencies = self.graph.dependencies(module)?;
        let stylesheet = self.graph.is_stylesheet(module);
        if stylesheet {
            if let Some(view) = self.view_of(module)? {
                dependencies.push(view);
            }
        }

        path.push(module.clone());
        let mut deepest = 0;
        for dependency in &dependencies {
            deepest = deepest.max(self.depth_in(dependency, path)?);
        }
        path.pop();

        let depth = if stylesheet { deepest + 1 } else { deepest };
        self.cache.insert(module.clone(), depth);
        Ok(depth)
    }

    /// The single view module of a stylesheet; more than one is an error.
    fn view_of(&self, stylesheet: &G::Module) -> Result<Option<G::Module>> {
        let base = self.graph.base_path(stylesheet);
        let mut views: Vec<G::Module> = self
            .graph
            .importers(stylesheet)
            .into_iter()
            .filter(|importer| {
                !self.graph.is_stylesheet(importer) && self.graph.base_path(importer) == base
            })
            .collect();
        views.dedup();
        match views.len() {
            0 => Ok(None),
            1 => Ok(views.pop()),
            _ => Err(StylableError::ViewConflict {
                stylesheet: format!("{stylesheet:?}"),
                views: views.iter().map(|view| format!("{view:?}")).collect(),
            }),
        }
    }
}

/// `button.st.css` → `button`, `button.tsx` → `button`.
pub fn module_base_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    for suffix in [".st.css", ".css"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    match path.extension() {
        Some(extension) => text[..text.len() - extension.len() - 1].to_string(),
        None => text.into_owned(),
    }
}

/// Stylesheet imports as seen by the resolver, plus registered view
/// modules and their imports.
pub struct StylesheetGraph<'a> {
    resolver: &'a StylableResolver,
    views: IndexMap<PathBuf, Vec<PathBuf>>,
}

impl<'a> StylesheetGraph<'a> {
    pub fn new(resolver: &'a StylableResolver) -> Self {
        Self {
            resolver,
            views: IndexMap::new(),
        }
    }

    /// Register a non-stylesheet module (a component) and what it imports.
    pub fn with_view(mut self, path: impl Into<PathBuf>, imports: Vec<PathBuf>) -> Self {
        self.views.insert(path.into(), imports);
        self
    }
}

impl DependencyGraph for StylesheetGraph<'_> {
    type Module = PathBuf;

    fn dependencies(&self, module: &PathBuf) -> Result<Vec<PathBuf>> {
        if let Some(imports) = self.views.get(module) {
            return Ok(imports.clone());
        }
        if self.is_stylesheet(module) {
            self.resolver.dependencies(module)
        } else {
            Ok(Vec::new())
        }
    }

    fn importers(&self, module: &PathBuf) -> Vec<PathBuf> {
        self.views
            .iter()
            .filter(|(_, imports)| imports.contains(module))
            .map(|(view, _)| view.clone())
            .collect()
    }

    fn is_stylesheet(&self, module: &PathBuf) -> bool {
        module.extension().is_some_and(|extension| extension == "css")
    }

    fn base_path(&self, module: &PathBuf) -> String {
        module_base_path(module)
    }
}
