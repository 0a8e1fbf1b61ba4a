//! Crate-level error types.
//!
//! Mirrors the distinction the lowering pipeline makes internally:
//! recoverable [`SemanticError`](crate::diagnostics::SemanticError)s are
//! accumulated into a `Diagnostics` sink and never reach here directly,
//! while a handful of truly unsupported constructs are fatal and unwind
//! the whole pass immediately.

use thiserror::Error;

use crate::diagnostics::SemanticError;

/// Error produced while lowering a single statement or expression.
///
/// `Semantic` variants are caught at the statement lowerer's boundary and
/// forwarded to the diagnostics sink; `Unsupported` variants are not
/// caught anywhere and propagate out of [`crate::lower::gencode`].
#[derive(Debug, Clone)]
pub enum LowerError {
    Semantic(SemanticError),
    Unsupported(String),
}

impl From<SemanticError> for LowerError {
    fn from(e: SemanticError) -> Self {
        LowerError::Semantic(e)
    }
}

impl std::fmt::Display for LowerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LowerError::Semantic(e) => write!(f, "{e}"),
            LowerError::Unsupported(msg) => write!(f, "unsupported construct: {msg}"),
        }
    }
}

impl std::error::Error for LowerError {}

/// Top-level result of a whole-module code generation run.
#[derive(Debug, Error)]
pub enum GenError {
    /// At least one recoverable semantic error was reported to the
    /// diagnostics sink during this run.
    #[error("errors occurred")]
    SemanticErrors,

    /// A construct not supported by this lowering pipeline was reached;
    /// fatal, no partial module is produced.
    #[error("unsupported construct: {0}")]
    Unsupported(String),
}

impl From<LowerError> for GenError {
    fn from(e: LowerError) -> Self {
        match e {
            LowerError::Semantic(_) => GenError::SemanticErrors,
            LowerError::Unsupported(msg) => GenError::Unsupported(msg),
        }
    }
}
