//! # stylable
//!
//! Compiler core for the Stylable CSS dialect: per-file symbol analysis,
//! cross-file resolution with caching, selector scoping and the export map.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! compiler     → Stylable facade (one cache per instance)
//!   ↓
//! transformer  → scoped output tree + StylableExports
//! depth        → style depth over the import graph
//!   ↓
//! resolver     → file cache, module requests, symbol origins
//!   ↓
//! semantic     → Meta: symbols, imports, diagnostics (feature stages)
//!   ↓
//! parser       → Logos lexer, block / selector / value parsers
//!   ↓
//! base         → TextRange, LineIndex, constants
//! ```
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use stylable::{MemoryFileSystem, Stylable, StylableConfig, VerbatimNamespace};
//!
//! let fs = MemoryFileSystem::with_files([("/p/button.st.css", ".root {} .label {}")]);
//! let config = StylableConfig::new("/p")
//!     .with_namespace_resolver(VerbatimNamespace)
//!     .with_file_system(Rc::new(fs));
//! let stylable = Stylable::new(config);
//! let results = stylable.transform("button.st.css").unwrap();
//! assert_eq!(results.exports.classes["label"], "button__label");
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → semantic → resolver → transformer)
// ============================================================================

/// Foundation types: TextRange, LineIndex, constants
pub mod base;

/// Diagnostics collector and the registry of codes
pub mod diagnostics;

/// Hard errors
pub mod error;

/// Parser: Logos lexer, stylesheet, selector and value parsers
pub mod parser;

/// Namespace strategies
pub mod namespace;

/// Boxed compound values (`st-array`, `st-map`, ...)
pub mod custom_values;

/// Semantic model: symbols, Meta and the processor
pub mod semantic;

/// File cache and cross-file resolution
pub mod resolver;

/// Selector scoping, mixins and exports
pub mod transformer;

/// Style depth over the import graph
pub mod depth;

/// Compiler configuration
pub mod config;

/// The compiler facade
pub mod compiler;

// Re-export commonly needed items
pub use base::{LineIndex, Position, Span, TextRange, TextSize};
pub use compiler::{Stylable, StylableResults};
pub use config::{Mode, StylableConfig};
pub use custom_values::{BoxedValue, CustomValue, CustomValueTypes};
pub use depth::{DependencyGraph, DepthCalculator, StylesheetGraph};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Result, StylableError};
pub use namespace::{
    CollisionChecked, HashNamespace, NamespaceResolver, PackageNamespace, VerbatimNamespace,
};
pub use parser::{ParseError, Stylesheet, parse};
pub use resolver::{
    ExternalModule, ExternalModules, FileSystem, MemoryFileSystem, MixinEntry, ModuleResolver,
    NodeModuleResolver, RealFileSystem, StylableResolver,
};
pub use semantic::{Meta, Symbol, SymbolNamespace};
pub use transformer::{StylableExports, TransformOptions, TransformResult, transform};
