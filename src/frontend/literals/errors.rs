//! Failures of collection-literal resolution.
//!
//! [`LiteralError`] is user-facing: the literal becomes an error-typed placeholder and checking continues.
//! [`InternalError`] is an invariant violation: it aborts the current compilation unit.

use thiserror::Error;

use super::side_table::LiteralState;
use crate::frontend::ast::{LiteralId, Span};
use crate::frontend::diagnostics::CompileError;
use crate::frontend::inference::ConstraintError;
use crate::frontend::types::ClassId;

/// Diagnostic code for "no builder visible" and "no builder for the expected container".
pub const NO_BUILDERS_CODE: &str = "NoBuildersForCollectionLiteralFound";
/// Diagnostic code for an ambiguous literal.
pub const CANT_CHOOSE_BUILDER_CODE: &str = "CantChooseBuilder";

/// A class named in a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassIdentity {
    pub id: ClassId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiteralError {
    #[error("No builders for collection literal found{}", class_suffix(.class))]
    NoBuilders {
        class: Option<ClassIdentity>,
        notes: Vec<String>,
    },
    #[error("Cannot choose a builder for this collection literal")]
    CantChooseBuilder { notes: Vec<String> },
}

fn class_suffix(class: &Option<ClassIdentity>) -> String {
    class
        .as_ref()
        .map(|c| format!(" for class '{}'", c.name))
        .unwrap_or_default()
}

impl LiteralError {
    pub fn no_builders(class: Option<ClassIdentity>) -> Self {
        LiteralError::NoBuilders {
            class,
            notes: Vec::new(),
        }
    }

    pub fn cant_choose(note: impl Into<String>) -> Self {
        LiteralError::CantChooseBuilder {
            notes: vec![note.into()],
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        match &mut self {
            LiteralError::NoBuilders { notes, .. } | LiteralError::CantChooseBuilder { notes } => {
                notes.push(note.into())
            }
        }
        self
    }

    pub fn code(&self) -> &'static str {
        match self {
            LiteralError::NoBuilders { .. } => NO_BUILDERS_CODE,
            LiteralError::CantChooseBuilder { .. } => CANT_CHOOSE_BUILDER_CODE,
        }
    }

    /// Class identity carried by a `NoBuilders` diagnostic.
    pub fn class(&self) -> Option<ClassId> {
        match self {
            LiteralError::NoBuilders { class, .. } => class.as_ref().map(|c| c.id),
            LiteralError::CantChooseBuilder { .. } => None,
        }
    }

    pub fn into_compile_error(self, span: Span) -> CompileError {
        let mut error = CompileError::type_error(self.to_string(), span).with_code(self.code());
        let notes = match self {
            LiteralError::NoBuilders { notes, .. } | LiteralError::CantChooseBuilder { notes } => notes,
        };
        for note in notes {
            error = error.with_note(note);
        }
        error
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InternalError {
    #[error("collection literal {literal} cannot move from {from} to {to}")]
    IllegalTransition {
        literal: LiteralId,
        from: LiteralState,
        to: LiteralState,
    },
    #[error("collection literal {0} has no side-table entry")]
    MissingEntry(LiteralId),
    #[error("collection literal {literal} was already rewritten for '{previous}'")]
    AlreadyRewritten { literal: LiteralId, previous: String },
    #[error("builder container type '{0}' has no class identity")]
    MissingClassIdentity(String),
    #[error("type argument '{0}' of a synthesized builder call is not fully inferred")]
    UnfixedTypeArgument(String),
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

impl InternalError {
    pub fn into_compile_error(self, span: Span) -> CompileError {
        CompileError::internal(format!("Internal compiler error: {self}"), span)
            .with_note("checking of this compilation unit was aborted")
    }
}
