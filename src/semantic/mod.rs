//! Semantic model: symbols, per-file metadata and the processor that builds them.
//!
//! ```text
//! Stylesheet (parser)
//!     ↓
//! processor::process → runs every Feature stage in one walk
//!     ↓
//! Meta (symbols, imports, diagnostics)
//! ```

pub mod features;
pub mod meta;
pub mod processor;
pub mod symbols;

pub use meta::{ImportRecord, Meta};
pub use processor::{process, process_ast};
pub use symbols::{
    ClassSymbol, CustomSelectorSymbol, ElementSymbol, ImportRef, ImportSymbol, ImportedName,
    NamedSymbol, StateDef, StateParamType, Symbol, SymbolNamespace, SymbolTable, VarSymbol,
};
