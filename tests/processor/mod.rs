//! Single-file analysis: symbols and diagnostics, no resolution.

pub mod tests_diagnostics;
pub mod tests_symbols;
