//! Diagnostics sink consumed by the lowering pipeline.
//!
//! The pipeline never decides how an error is rendered; it only reports
//! `(message, span)` pairs to whatever sink the caller supplies. A frontend,
//! test harness, or language server plugs in its own [`Diagnostics`] impl.

use std::fmt;

/// A source location. Line/column are 1-based; `0` means "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub const fn new(line: u32, column: u32) -> Self {
        Span { line, column }
    }

    pub const fn unknown() -> Self {
        Span { line: 0, column: 0 }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// A recoverable semantic error raised while lowering a single statement or
/// expression. These never unwind the whole pass: the statement lowerer
/// catches them at its boundary and keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub message: String,
    pub span: Span,
}

impl SemanticError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        SemanticError {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

impl std::error::Error for SemanticError {}

/// The sink every semantic error is reported to. Kept intentionally narrow:
/// rendering, deduplication and sorting are a caller concern.
pub trait Diagnostics {
    fn error(&mut self, err: SemanticError);

    fn has_errors(&self) -> bool;
}

/// Reference `Diagnostics` implementation that just collects everything.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticBag {
    errors: Vec<SemanticError>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag::default()
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SemanticError> {
        self.errors
    }
}

impl Diagnostics for DiagnosticBag {
    fn error(&mut self, err: SemanticError) {
        self.errors.push(err);
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
