//! Collection literal entry points.
//!
//! A literal is first resolved without an expected type: its elements are unified, builders are collected and
//! validated, every survivor is fixed and the literal gets a provisional type. Selection happens later, once the
//! context knows what it wants:
//! - [`TypeChecker::resolve_with_expected_type`] for a declared type or no expectation at all (default container)
//! - [`TypeChecker::resolve_nested_in_outer_candidate`] for an argument of a call whose candidate is chosen
//!
//! Both end in the same place: the chosen candidate is closed if still open, the literal is rewritten into a
//! builder call and the rewrite is cached in the side table.

use colit_core::lang::conventions::literal_info;

use crate::frontend::ast::*;
use crate::frontend::inference::{Candidate, ConstraintSystem, ExprTy};
use crate::frontend::literals::collect::{collect_builders, instantiate_candidates};
use crate::frontend::literals::fixation::{Fixation, close_candidate, fix_candidate, provisional_type};
use crate::frontend::literals::rewrite::rewrite_literal;
use crate::frontend::literals::select::{Target, default_target, target_for_expected};
use crate::frontend::literals::side_table::LiteralCandidate;
use crate::frontend::literals::stages::{BuilderShapeStage, ElementArgumentsStage};
use crate::frontend::literals::unify::unify_family;
use crate::frontend::literals::{InternalError, LiteralError, LiteralState};
use crate::frontend::types::Ty;

use super::super::{Mode, TypeChecker};
use super::LiteralOutcome;

/// Result of selecting a builder for a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The builder call replacing the literal and the container type it builds.
    Rewritten { expr: Spanned<Expr>, container: Ty },
    /// A diagnostic was reported (or the target was already erroneous); the literal becomes an error node.
    Failed,
}

impl TypeChecker {
    pub(super) fn check_collection_literal(
        &mut self,
        literal: &mut CollectionLiteral,
        span: Span,
        mode: &Mode,
    ) -> Result<LiteralOutcome, InternalError> {
        let resolution = match mode {
            Mode::Dependent => {
                let ty = self.resolve_without_expected_type(literal, span)?;
                return Ok(if ty.is_error() {
                    LiteralOutcome::Failed
                } else {
                    LiteralOutcome::Provisional(ty)
                });
            }
            Mode::Expected(expected) => self.resolve_with_expected_type(literal, span, Some(expected))?,
            Mode::Independent => self.resolve_with_expected_type(literal, span, None)?,
        };
        Ok(match resolution {
            Resolution::Rewritten { expr, .. } => LiteralOutcome::Rewritten(expr),
            Resolution::Failed => LiteralOutcome::Failed,
        })
    }

    // ========================================================================
    // Preprocessing
    // ========================================================================

    /// Run every phase up to the provisional type and leave the literal deferred.
    ///
    /// ## Returns
    /// - The provisional type (intersection of every candidate's container type), or the error type if the
    ///   literal failed. Calling this again for the same literal returns the stored result.
    pub fn resolve_without_expected_type(
        &mut self,
        literal: &mut CollectionLiteral,
        span: Span,
    ) -> Result<Ty, InternalError> {
        self.preprocess(literal, span, &[])
    }

    /// [`resolve_without_expected_type`](Self::resolve_without_expected_type) with per-family element hints.
    ///
    /// A hint only steers which container a nested literal element contributes to unification.
    #[tracing::instrument(skip_all, fields(literal = %literal.id, entries = literal.entries.len()))]
    fn preprocess(
        &mut self,
        literal: &mut CollectionLiteral,
        span: Span,
        hints: &[Option<Ty>],
    ) -> Result<Ty, InternalError> {
        let id = literal.id;
        if let Some(entry) = self.literals.get(id) {
            return Ok(match (entry.state(), &entry.provisional) {
                (LiteralState::Error, _) => Ty::Error,
                (_, Some(provisional)) => provisional.clone(),
                (state, None) => {
                    return Err(InternalError::IllegalTransition {
                        literal: id,
                        from: state,
                        to: LiteralState::Deferred,
                    });
                }
            });
        }
        let kind = literal.kind;
        self.literals.insert(id, kind, span);

        // Elements, one family per `add` argument
        let mut families: Vec<Vec<ExprTy>> = (0..kind.family_count()).map(|_| Vec::new()).collect();
        for entry in &mut literal.entries {
            for (index, element) in entry.exprs_mut().into_iter().enumerate() {
                let hint = hints.get(index).cloned().flatten();
                let checked = self.check_element(element, hint.as_ref())?;
                families[index].push(checked);
            }
        }
        let mut fixed = Vec::new();
        for (family, elements) in literal_info(kind).element_families.iter().zip(&families) {
            if let Some(argument) = unify_family(&self.symbols, &mut self.supply, family, elements)? {
                fixed.push(argument);
            }
        }
        self.literals.entry_mut(id)?.fixed = fixed.clone();
        self.literals.advance(id, LiteralState::Unified)?;

        // Builders
        let builders = collect_builders(&self.symbols, kind);
        if builders.is_empty() {
            self.errors.push(LiteralError::no_builders(None).into_compile_error(span));
            self.literals.fail(id)?;
            return Ok(Ty::Error);
        }
        let candidates = instantiate_candidates(&self.symbols, &mut self.supply, &builders);
        self.literals.advance(id, LiteralState::CandidatesCollected)?;

        let mut validated = Vec::new();
        for mut candidate in candidates {
            let checked = BuilderShapeStage.check(&self.symbols, &candidate).and_then(|class| {
                ElementArgumentsStage
                    .check(&self.symbols, kind, &mut candidate, &families)
                    .map(|slots| (class, slots))
            });
            match checked {
                Ok((class, slots)) => validated.push((candidate, class, slots)),
                Err(reason) => {
                    tracing::debug!(builder = %self.signature(candidate.symbol), %reason, "builder dropped");
                }
            }
        }
        self.literals.advance(id, LiteralState::Validated)?;

        for (mut candidate, class, slots) in validated {
            let (container, alternative) = match fix_candidate(&self.symbols, &mut candidate, &slots, &fixed)? {
                Fixation::Fixed(container) => (Some(container.clone()), container),
                Fixation::Open(preview) => (None, preview),
                Fixation::Dropped => {
                    tracing::debug!(builder = %self.signature(candidate.symbol), "builder dropped while fixing");
                    continue;
                }
            };
            self.literals.record(
                id,
                LiteralCandidate {
                    candidate,
                    class,
                    slots,
                    container,
                    alternative,
                },
            )?;
        }

        if self.literals.entry(id)?.candidates.is_empty() {
            self.errors.push(
                LiteralError::no_builders(None)
                    .with_note("no visible builder accepts these elements")
                    .into_compile_error(span),
            );
            self.literals.fail(id)?;
            return Ok(Ty::Error);
        }
        self.literals.advance(id, LiteralState::Provisional)?;
        let provisional = provisional_type(&self.symbols, &self.literals.entry(id)?.alternatives);
        self.literals.entry_mut(id)?.provisional = Some(provisional.clone());
        self.literals.advance(id, LiteralState::Deferred)?;
        tracing::debug!(provisional = %self.symbols.display(&provisional), "literal deferred");
        Ok(provisional)
    }

    /// Check one element in dependent mode.
    ///
    /// A nested literal contributes one container rather than its whole provisional intersection, so
    /// `[[1], [2]]` unifies to `List<Int>`: the one of the hinted class when it has a builder, otherwise the
    /// default container's.
    fn check_element(&mut self, element: &mut Spanned<Expr>, hint: Option<&Ty>) -> Result<ExprTy, InternalError> {
        if let Some(hint) = hint {
            if let Some(slot) = literal_slot(element) {
                let span = slot.span;
                if let Expr::CollectionLiteral(nested) = &mut slot.node {
                    let hints = self.element_hints(nested.kind, Some(hint));
                    self.preprocess(nested, span, &hints)?;
                }
            }
        }
        let mut checked = self.check_expr(element, &Mode::Dependent)?;
        let Some(slot) = literal_slot(element) else {
            return Ok(checked);
        };
        let Expr::CollectionLiteral(nested) = &slot.node else {
            return Ok(checked);
        };
        let Some(entry) = self.literals.get(nested.id) else {
            return Ok(checked);
        };
        let class = hint
            .and_then(Ty::class_identity)
            .filter(|class| entry.candidates.contains_key(class))
            .or_else(|| self.symbols.lookup_class(self.config.default_container(entry.kind)));
        let contributed = class
            .and_then(|class| entry.candidates.get(&class))
            .and_then(|candidate| candidate.container.clone());
        if let Some(container) = contributed {
            checked.ty = container;
        }
        Ok(checked)
    }

    /// Element types an expected container asks for, one per family, read off its view as the kind's element
    /// supertype (`Collection<E>`, `Map<K, V>`).
    fn element_hints(&self, kind: LiteralKind, expected: Option<&Ty>) -> Vec<Option<Ty>> {
        let mut hints = vec![None; kind.family_count()];
        let Some(Ty::Class(class)) = expected else {
            return hints;
        };
        let view = self
            .symbols
            .lookup_class(literal_info(kind).element_view)
            .and_then(|id| self.symbols.supertype_as(class, id));
        if let Some(view) = view {
            for (hint, arg) in hints.iter_mut().zip(view.args) {
                *hint = Some(arg);
            }
        }
        hints
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select a builder from the expected type, or from the configured default container when there is none,
    /// and rewrite the literal.
    #[tracing::instrument(skip_all, fields(literal = %literal.id))]
    pub fn resolve_with_expected_type(
        &mut self,
        literal: &mut CollectionLiteral,
        span: Span,
        expected: Option<&Ty>,
    ) -> Result<Resolution, InternalError> {
        let hints = self.element_hints(literal.kind, expected);
        if self.preprocess(literal, span, &hints)?.is_error() {
            return Ok(Resolution::Failed);
        }
        let entry = self.literals.entry(literal.id)?;
        let target = match expected {
            Some(expected) => target_for_expected(&self.symbols, entry, expected, None)?,
            None => default_target(&self.symbols, entry, self.config.default_container(entry.kind)),
        };
        self.finish_selection(literal, span, target, expected, None)
    }

    /// Select a builder for a literal passed as an argument of `outer`, whose parameter has type `parameter`.
    ///
    /// ## Notes
    /// - When the parameter type is a variable of `outer`, it is fixed in `outer` to the chosen alternative.
    #[tracing::instrument(skip_all, fields(literal = %literal.id))]
    pub fn resolve_nested_in_outer_candidate(
        &mut self,
        outer: &mut Candidate,
        literal: &mut CollectionLiteral,
        span: Span,
        parameter: &Ty,
    ) -> Result<Resolution, InternalError> {
        if self.resolve_without_expected_type(literal, span)?.is_error() {
            return Ok(Resolution::Failed);
        }
        let entry = self.literals.entry(literal.id)?;
        let target = target_for_expected(&self.symbols, entry, parameter, Some(&mut outer.system))?;
        let expected = outer.system.substitute_fixed(parameter);
        self.finish_selection(literal, span, target, Some(&expected), Some(&outer.system))
    }

    fn finish_selection(
        &mut self,
        literal: &CollectionLiteral,
        span: Span,
        target: Target,
        expected: Option<&Ty>,
        outer: Option<&ConstraintSystem>,
    ) -> Result<Resolution, InternalError> {
        let id = literal.id;
        let class = match target {
            Target::Class(class) => class,
            Target::Silent => {
                self.literals.fail(id)?;
                return Ok(Resolution::Failed);
            }
            Target::Failed(error) => {
                self.errors.push(error.into_compile_error(span));
                self.literals.fail(id)?;
                return Ok(Resolution::Failed);
            }
        };

        let entry = self.literals.entry(id)?;
        if let Some((previous, expr)) = entry.rewritten() {
            if previous != class {
                return Err(InternalError::AlreadyRewritten {
                    literal: id,
                    previous: self.symbols.class(previous).name.clone(),
                });
            }
            let container = entry
                .candidates
                .get(&class)
                .and_then(|candidate| candidate.container.clone())
                .unwrap_or(Ty::Error);
            return Ok(Resolution::Rewritten {
                expr: expr.clone(),
                container,
            });
        }
        let mut chosen = entry
            .candidates
            .get(&class)
            .cloned()
            .ok_or_else(|| InternalError::MissingClassIdentity(self.symbols.class(class).name.clone()))?;
        self.literals.advance(id, LiteralState::Selected)?;

        let container = match chosen.container.clone() {
            Some(container) => container,
            None => {
                let container = close_candidate(&self.symbols, &mut chosen.candidate, &chosen.slots, expected, outer)?;
                chosen.container = Some(container.clone());
                container
            }
        };
        let expr = rewrite_literal(&self.symbols, literal, span, &chosen)?;
        tracing::debug!(
            builder = %self.signature(chosen.candidate.symbol),
            container = %self.symbols.display(&container),
            "builder chosen"
        );

        self.literals.entry_mut(id)?.candidates.insert(class, chosen);
        self.literals.cache_rewrite(id, class, expr.clone())?;
        self.literals.advance(id, LiteralState::Rewritten)?;
        self.type_info.literal_choices.insert(id, class);
        Ok(Resolution::Rewritten { expr, container })
    }
}

/// The collection literal an expression consists of, looking through parentheses.
pub(super) fn literal_slot(expr: &mut Spanned<Expr>) -> Option<&mut Spanned<Expr>> {
    if matches!(expr.node, Expr::CollectionLiteral(_)) {
        return Some(expr);
    }
    match &mut expr.node {
        Expr::Paren(inner) => literal_slot(inner),
        _ => None,
    }
}
