//! Foundation types shared by every compiler stage.
//!
//! - [`Position`], [`Span`] - 0-indexed line/column locations
//! - [`LineIndex`] - byte offset → line/column conversion
//! - [`TextRange`], [`TextSize`] - byte offsets (re-exported from `text-size`)
//! - Domain constants (file extensions, delimiters)
//!
//! This module has NO dependencies on other crate modules.

pub mod constants;
mod position;

pub use position::{LineIndex, Position, Span};

pub use text_size::{TextRange, TextSize};
