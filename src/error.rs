//! Hard failures of the compiler.
//!
//! Anything that can be reported and compiled around is a
//! [`Diagnostic`](crate::diagnostics::Diagnostic) instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

pub type Result<T, E = StylableError> = std::result::Result<T, E>;

/// Errors that abort processing of a file or a whole build step.
#[derive(Debug, Error)]
pub enum StylableError {
    /// Source text could not be parsed; no partial tree exists.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// IO error while reading or stat-ing a file.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The module resolution hook could not locate a request.
    #[error("cannot resolve \"{request}\" from {context}")]
    ModuleNotFound { request: String, context: PathBuf },

    /// Two different files produced the same namespace.
    #[error("namespace collision: \"{namespace}\" is generated for both {existing} and {incoming}")]
    NamespaceCollision {
        namespace: String,
        existing: PathBuf,
        incoming: PathBuf,
    },

    /// More than one component module claims the same stylesheet.
    #[error("stylesheet {stylesheet} is owned by more than one view: {}", views.join(", "))]
    ViewConflict { stylesheet: String, views: Vec<String> },

    /// An external (JS mixin / formatter) module could not be loaded.
    #[error("cannot load external module {path}: {message}")]
    ExternalModule { path: PathBuf, message: String },
}

impl StylableError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn module_not_found(request: impl Into<String>, context: impl Into<PathBuf>) -> Self {
        Self::ModuleNotFound {
            request: request.into(),
            context: context.into(),
        }
    }
}
