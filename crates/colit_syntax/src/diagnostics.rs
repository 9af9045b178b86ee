//! Diagnostics and error reporting for colit
//!
//! [`CompileError`] is the value every phase accumulates. Rendering goes through `miette`: a
//! [`SourceDiagnostic`] binds an error to its named source so the fancy handler can draw labelled spans.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, NamedSource, Severity, SourceCode};
use thiserror::Error;

use crate::ast::Span;

/// A compile-time error with location information
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    /// Stable machine-readable code, e.g. `NoBuildersForCollectionLiteralFound`.
    pub code: Option<&'static str>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self::with_kind(message, span, ErrorKind::Error)
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self::with_kind(message, span, ErrorKind::Syntax)
    }

    pub fn type_error(message: String, span: Span) -> Self {
        Self::with_kind(message, span, ErrorKind::Type)
    }

    /// An implementation defect surfaced to the user; aborts the current unit.
    pub fn internal(message: String, span: Span) -> Self {
        Self::with_kind(message, span, ErrorKind::Internal)
    }

    fn with_kind(message: String, span: Span, kind: ErrorKind) -> Self {
        Self {
            message,
            span,
            kind,
            code: None,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Bind this error to the source it points into, for rendering.
    pub fn with_source(self, file_name: &str, source: &str) -> SourceDiagnostic {
        SourceDiagnostic {
            error: self,
            src: NamedSource::new(file_name, source.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Syntax,
    Type,
    Internal,
    Warning,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Type => write!(f, "type error"),
            ErrorKind::Internal => write!(f, "internal error"),
            ErrorKind::Warning => write!(f, "warning"),
        }
    }
}

/// A [`CompileError`] together with its source text.
#[derive(Debug, Error)]
#[error("{}", .error.message)]
pub struct SourceDiagnostic {
    error: CompileError,
    src: NamedSource<String>,
}

impl SourceDiagnostic {
    pub fn error(&self) -> &CompileError {
        &self.error
    }
}

impl Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.error
            .code
            .map(|code| Box::new(format!("colit::{code}")) as Box<dyn fmt::Display + 'a>)
    }

    fn severity(&self) -> Option<Severity> {
        match self.error.kind {
            ErrorKind::Warning => Some(Severity::Warning),
            _ => Some(Severity::Error),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let lines: Vec<String> = self
            .error
            .notes
            .iter()
            .map(|n| format!("note: {n}"))
            .chain(self.error.hints.iter().cloned())
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(Box::new(lines.join("\n")))
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.error.span;
        let len = span.end.saturating_sub(span.start);
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.error.kind.to_string()),
            (span.start, len),
        ))))
    }
}

/// Convert a byte offset into a 1-based `(line, column)` pair.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let col = match before.rfind('\n') {
        Some(nl) => offset - nl,
        None => offset + 1,
    };
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        let src = "val a = 1\nval b = [x]\n";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 10), (2, 1));
        assert_eq!(line_col(src, 18), (2, 9));
    }

    #[test]
    fn builders_accumulate_notes_and_hints() {
        let err = CompileError::type_error("boom".into(), Span::new(1, 2))
            .with_code("Boom")
            .with_note("first")
            .with_hint("try again");
        assert_eq!(err.code, Some("Boom"));
        assert_eq!(err.notes, vec!["first".to_string()]);
        assert_eq!(err.hints, vec!["try again".to_string()]);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn source_diagnostic_exposes_code_and_help() {
        let diag = CompileError::new("bad".into(), Span::new(0, 3))
            .with_code("Bad")
            .with_note("n")
            .with_source("a.colit", "val");
        let code = diag.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("colit::Bad"));
        let help = diag.help().map(|h| h.to_string());
        assert_eq!(help.as_deref(), Some("note: n"));
        assert_eq!(diag.labels().map(|l| l.count()), Some(1));
    }
}
