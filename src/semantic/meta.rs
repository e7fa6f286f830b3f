//! The per-file compiled representation.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;
use text_size::TextRange;

use crate::base::constants::ROOT_CLASS;
use crate::diagnostics::Diagnostics;
use crate::parser::Stylesheet;
use crate::resolver::path::context_dir;

use super::symbols::{ClassSymbol, Symbol, SymbolTable};

/// One `:import` block or `@st-import` statement.
///
/// Named maps go from local name to imported name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub request: String,
    /// Directory the request resolves from.
    pub context: PathBuf,
    pub default_name: Option<SmolStr>,
    pub named: IndexMap<SmolStr, SmolStr>,
    pub keyframes: IndexMap<SmolStr, SmolStr>,
    pub layers: IndexMap<SmolStr, SmolStr>,
    pub containers: IndexMap<SmolStr, SmolStr>,
    pub custom_properties: IndexMap<SmolStr, SmolStr>,
    pub range: TextRange,
    /// Filled by the resolver the first time the request is resolved.
    pub resolved_path: OnceCell<PathBuf>,
}

impl ImportRecord {
    pub fn new(request: impl Into<String>, context: impl Into<PathBuf>, range: TextRange) -> Self {
        Self {
            request: request.into(),
            context: context.into(),
            default_name: None,
            named: IndexMap::new(),
            keyframes: IndexMap::new(),
            layers: IndexMap::new(),
            containers: IndexMap::new(),
            custom_properties: IndexMap::new(),
            range,
            resolved_path: OnceCell::new(),
        }
    }

    pub fn resolved_path(&self) -> Option<&Path> {
        self.resolved_path.get().map(PathBuf::as_path)
    }
}

/// Symbol table, syntax trees and diagnostics of one stylesheet.
///
/// Built once per file per cache generation; treated as immutable once
/// shared through the cache. Transformation works on a clone and fills in
/// `output_ast`, `globals` and `transform_diagnostics`.
#[derive(Debug, Clone)]
pub struct Meta {
    pub source: PathBuf,
    pub namespace: String,
    /// Namespace before the strategy was applied (declared or from the file name).
    pub local_namespace: String,
    pub ast: Stylesheet,
    pub output_ast: Option<Stylesheet>,
    pub symbols: SymbolTable,
    pub imports: Vec<ImportRecord>,
    /// Class names exempt from scoping.
    pub globals: IndexSet<String>,
    pub diagnostics: Diagnostics,
    pub transform_diagnostics: Diagnostics,
}

impl Meta {
    /// A fresh meta with only the implicit root class.
    pub fn new(source: &Path, source_text: &str, ast: Stylesheet) -> Self {
        let mut symbols = SymbolTable::new();
        symbols.insert(Symbol::Class(ClassSymbol::new(ROOT_CLASS, TextRange::default())));
        Self {
            source: source.to_path_buf(),
            namespace: String::new(),
            local_namespace: String::new(),
            ast,
            output_ast: None,
            symbols,
            imports: Vec::new(),
            globals: IndexSet::new(),
            diagnostics: Diagnostics::for_file(source, source_text),
            transform_diagnostics: Diagnostics::for_file(source, source_text),
        }
    }

    pub fn root(&self) -> Option<&ClassSymbol> {
        self.symbols.class(ROOT_CLASS)
    }

    pub fn context_dir(&self) -> PathBuf {
        context_dir(&self.source)
    }

    /// Every diagnostic reported for this file, analysis first.
    pub fn all_diagnostics(&self) -> impl Iterator<Item = &crate::diagnostics::Diagnostic> {
        self.diagnostics
            .iter()
            .chain(self.transform_diagnostics.iter())
    }
}
