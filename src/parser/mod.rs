//! CSS parser for Stylable sources
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind
//!     ↓
//! Block parser → Stylesheet (rules, at-rules, declarations, comments)
//!     ↓
//! Selector / value parsers → structured views of selector and value strings
//!     ↓
//! Processor → Meta (semantic model)
//! ```
//!
//! The parser assigns no Stylable semantics. Malformed input is a fatal
//! [`ParseError`]; no partial tree is ever returned.

pub mod ast;
mod errors;
pub mod lexer;
mod parser;
pub mod selector;
pub mod value;

pub use ast::{AtRule, Comment, Declaration, Node, Rule, Stylesheet};
pub use errors::{ErrorCode, ParseError};
pub use parser::parse;
pub use selector::{
    Combinator, PseudoArgs, Selector, SelectorList, SelectorNode, parse_selector,
    parse_selector_list, stringify_selector_list,
};
pub use value::{ValueNode, parse_value, split_by_comma, stringify_value, unquote};
