//! Per-unit side table: literal id to its resolution state and builder candidates.
//!
//! This is the only mutable state shared across the phases of one literal's resolution. It is owned by the
//! [`TypeChecker`](crate::frontend::typechecker::TypeChecker) and cleared when a compilation unit finishes.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use super::errors::InternalError;
use crate::frontend::ast::{Expr, LiteralId, LiteralKind, Span, Spanned};
use crate::frontend::inference::Candidate;
use crate::frontend::types::{ClassId, Ty, TypeVarId};

/// Resolution state of one literal.
///
/// `Parsed → Unified → CandidatesCollected → Validated → Provisional → Deferred → Selected → Rewritten`, or
/// `Error` from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralState {
    Parsed,
    Unified,
    CandidatesCollected,
    Validated,
    Provisional,
    /// Awaiting an expected type from the surrounding resolution.
    Deferred,
    Selected,
    Rewritten,
    Error,
}

impl LiteralState {
    pub fn as_str(self) -> &'static str {
        match self {
            LiteralState::Parsed => "parsed",
            LiteralState::Unified => "unified",
            LiteralState::CandidatesCollected => "candidates-collected",
            LiteralState::Validated => "validated",
            LiteralState::Provisional => "provisional",
            LiteralState::Deferred => "deferred",
            LiteralState::Selected => "selected",
            LiteralState::Rewritten => "rewritten",
            LiteralState::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LiteralState::Rewritten | LiteralState::Error)
    }

    pub fn can_advance_to(self, next: LiteralState) -> bool {
        use LiteralState::*;
        match (self, next) {
            (from, Error) => !from.is_terminal(),
            (Parsed, Unified)
            | (Unified, CandidatesCollected)
            | (CandidatesCollected, Validated)
            | (Validated, Provisional)
            | (Provisional, Deferred)
            | (Deferred, Selected)
            | (Selected, Rewritten) => true,
            _ => false,
        }
    }
}

impl fmt::Display for LiteralState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unification result for one element family (value; or key, value).
#[derive(Debug, Clone, PartialEq)]
pub struct FixedArgument {
    pub variable: TypeVarId,
    pub fixed: Ty,
}

/// A builder that survived validation for one literal.
#[derive(Debug, Clone)]
pub struct LiteralCandidate {
    pub candidate: Candidate,
    /// Class the builder constructs (`X` of `X.Companion.buildFrom`).
    pub class: ClassId,
    /// Instantiated element slots of the builder block receiver, in `add` argument order.
    pub slots: Vec<Ty>,
    /// Container type once fixed; `None` while the candidate is open (empty literal).
    pub container: Option<Ty>,
    /// The type this candidate contributes to the provisional intersection.
    pub alternative: Ty,
}

impl LiteralCandidate {
    pub fn is_open(&self) -> bool {
        self.container.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SideTableEntry {
    pub kind: LiteralKind,
    pub span: Span,
    state: LiteralState,
    pub fixed: Vec<FixedArgument>,
    pub candidates: BTreeMap<ClassId, LiteralCandidate>,
    /// Classes for which more than one builder was recorded.
    pub ambiguous: BTreeSet<ClassId>,
    /// Every recorded container type, in recording order.
    pub alternatives: Vec<Ty>,
    pub provisional: Option<Ty>,
    rewritten: Option<(ClassId, Spanned<Expr>)>,
}

impl SideTableEntry {
    pub fn state(&self) -> LiteralState {
        self.state
    }

    /// The cached rewrite and the class it was made for.
    pub fn rewritten(&self) -> Option<(ClassId, &Spanned<Expr>)> {
        self.rewritten.as_ref().map(|(class, expr)| (*class, expr))
    }

    /// Class chosen by the selector, once rewritten.
    pub fn chosen(&self) -> Option<ClassId> {
        self.rewritten.as_ref().map(|(class, _)| *class)
    }
}

#[derive(Debug, Default)]
pub struct SideTable {
    entries: HashMap<LiteralId, SideTableEntry>,
}

impl SideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: LiteralId) -> Option<&SideTableEntry> {
        self.entries.get(&id)
    }

    pub fn entry(&self, id: LiteralId) -> Result<&SideTableEntry, InternalError> {
        self.entries.get(&id).ok_or(InternalError::MissingEntry(id))
    }

    pub fn entry_mut(&mut self, id: LiteralId) -> Result<&mut SideTableEntry, InternalError> {
        self.entries.get_mut(&id).ok_or(InternalError::MissingEntry(id))
    }

    /// Start tracking a literal in the `Parsed` state. An existing entry is kept as is.
    pub fn insert(&mut self, id: LiteralId, kind: LiteralKind, span: Span) {
        self.entries.entry(id).or_insert_with(|| SideTableEntry {
            kind,
            span,
            state: LiteralState::Parsed,
            fixed: Vec::new(),
            candidates: BTreeMap::new(),
            ambiguous: BTreeSet::new(),
            alternatives: Vec::new(),
            provisional: None,
            rewritten: None,
        });
    }

    pub fn advance(&mut self, id: LiteralId, to: LiteralState) -> Result<(), InternalError> {
        let entry = self.entry_mut(id)?;
        if !entry.state.can_advance_to(to) {
            return Err(InternalError::IllegalTransition {
                literal: id,
                from: entry.state,
                to,
            });
        }
        tracing::trace!(literal = %id, from = %entry.state, to = %to, "literal state");
        entry.state = to;
        Ok(())
    }

    /// Move a literal to `Error` unless it already is there.
    pub fn fail(&mut self, id: LiteralId) -> Result<(), InternalError> {
        match self.entry(id)?.state {
            LiteralState::Error => Ok(()),
            _ => self.advance(id, LiteralState::Error),
        }
    }

    /// Record a validated builder under its container class.
    ///
    /// ## Notes
    /// - A second builder for the same class replaces the first and marks the class ambiguous. The displaced
    ///   builder's alternative leaves `alternatives` unless another recorded builder contributes it too.
    pub fn record(&mut self, id: LiteralId, candidate: LiteralCandidate) -> Result<(), InternalError> {
        let entry = self.entry_mut(id)?;
        let class = candidate.class;
        let alternative = candidate.alternative.clone();
        if let Some(displaced) = entry.candidates.insert(class, candidate) {
            tracing::warn!(literal = %id, class = class.0, "two builders construct the same class; keeping the last");
            entry.ambiguous.insert(class);
            let still_used = entry.candidates.values().any(|c| c.alternative == displaced.alternative);
            if !still_used {
                entry.alternatives.retain(|ty| *ty != displaced.alternative);
            }
        }
        if !entry.alternatives.contains(&alternative) {
            entry.alternatives.push(alternative);
        }
        Ok(())
    }

    /// Store the rewrite made for `class`.
    pub fn cache_rewrite(&mut self, id: LiteralId, class: ClassId, expr: Spanned<Expr>) -> Result<(), InternalError> {
        self.entry_mut(id)?.rewritten = Some((class, expr));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
