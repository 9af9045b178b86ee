//! Check calls: candidate collection by receiver, per-candidate inference and completion.
//!
//! Candidates are grouped in levels tried in order; the first level with an applicable candidate wins:
//! 1. explicit receiver: its members (or companion functions), then extensions
//! 2. implicit receivers of enclosing builder blocks, innermost first: members, then extensions
//! 3. top-level functions
//!
//! Each candidate owns a constraint system. Arguments are first checked in dependent mode so literals stay
//! provisional; once a candidate is chosen, literal arguments are resolved against it, its variables are fixed
//! and every argument is checked again against its final parameter type.

use std::collections::BTreeSet;

use crate::frontend::ast::*;
use crate::frontend::diagnostics::CompileError;
use crate::frontend::inference::{Candidate, ExprTy, FixationMode, constrain_argument};
use crate::frontend::literals::{InternalError, LiteralState};
use crate::frontend::symbols::{FunctionOwner, TypeScope};
use crate::frontend::types::{ClassTy, FunctionId, Ty, TypeVarId, is_subtype};

use super::super::{Mode, TypeChecker};
use super::collections::{Resolution, literal_slot};

/// Where a candidate function was found.
#[derive(Debug, Clone)]
struct Site {
    function: FunctionId,
    /// For members: the receiver viewed as the declaring class.
    member_of: Option<ClassTy>,
    /// For extensions: the receiver the declared extension receiver must accept.
    receiver: Option<Ty>,
}

impl Site {
    fn plain(function: FunctionId) -> Self {
        Self {
            function,
            member_of: None,
            receiver: None,
        }
    }
}

impl TypeChecker {
    /// Resolve a call and return its type.
    #[tracing::instrument(skip_all, fields(name = %call.name.node))]
    pub(in crate::frontend::typechecker::check_expr) fn check_call(
        &mut self,
        call: &mut CallExpr,
        span: Span,
        mode: &Mode,
    ) -> Result<ExprTy, InternalError> {
        let receiver = match call.receiver.as_deref_mut() {
            Some(receiver) => Some(self.check_expr(receiver, &Mode::Independent)?.ty),
            None => None,
        };
        let mut arguments = Vec::with_capacity(call.args.len());
        for arg in &mut call.args {
            arguments.push(self.check_expr(arg, &Mode::Dependent)?);
        }
        let type_args: Vec<Ty> = call
            .type_args
            .iter()
            .map(|ty| self.symbols.resolve_type_expr(ty, &TypeScope::new(), &mut self.errors))
            .collect();

        if receiver.as_ref().is_some_and(Ty::is_error) {
            self.finish_failed_call(call)?;
            return Ok(ExprTy::error());
        }

        let levels = self.candidate_levels(&call.name.node, receiver.as_ref());
        let chosen = self.choose_candidate(
            &call.name,
            levels,
            &arguments,
            &type_args,
            call.block.is_some(),
        );
        match chosen {
            Some(candidate) => self.complete_call(call, span, mode, candidate),
            None => {
                self.finish_failed_call(call)?;
                Ok(ExprTy::error())
            }
        }
    }

    // ========================================================================
    // Candidates
    // ========================================================================

    fn candidate_levels(&self, name: &str, receiver: Option<&Ty>) -> Vec<Vec<Site>> {
        match receiver {
            Some(receiver) => vec![self.members_of(receiver, name), self.extensions_for(receiver, name)],
            None => {
                let mut levels = Vec::new();
                for receiver in self.receivers.iter().rev() {
                    levels.push(self.members_of(receiver, name));
                    levels.push(self.extensions_for(receiver, name));
                }
                levels.push(
                    self.symbols
                        .top_level_functions(name)
                        .into_iter()
                        .map(Site::plain)
                        .collect(),
                );
                levels
            }
        }
    }

    fn members_of(&self, receiver: &Ty, name: &str) -> Vec<Site> {
        match receiver {
            Ty::Class(class) => self
                .symbols
                .member_functions(class.id, name)
                .into_iter()
                .filter_map(|function| {
                    let FunctionOwner::Member(owner) = self.symbols.function(function).owner else {
                        return None;
                    };
                    let view = self.symbols.supertype_as(class, owner)?;
                    Some(Site {
                        function,
                        member_of: Some(view),
                        receiver: None,
                    })
                })
                .collect(),
            Ty::Companion(class) => self
                .symbols
                .companion_functions(*class, name)
                .into_iter()
                .map(Site::plain)
                .collect(),
            Ty::Intersection(members) => {
                let mut seen = BTreeSet::new();
                members
                    .iter()
                    .flat_map(|member| self.members_of(member, name))
                    .filter(|site| seen.insert(site.function))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn extensions_for(&self, receiver: &Ty, name: &str) -> Vec<Site> {
        self.symbols
            .extension_functions(name)
            .into_iter()
            .map(|function| Site {
                function,
                member_of: None,
                receiver: Some(receiver.clone()),
            })
            .collect()
    }

    /// Pick the single applicable candidate of the first level that has one, reporting failures.
    fn choose_candidate(
        &mut self,
        name: &Spanned<Ident>,
        levels: Vec<Vec<Site>>,
        arguments: &[ExprTy],
        type_args: &[Ty],
        has_block: bool,
    ) -> Option<Candidate> {
        let mut rejected: Vec<(FunctionId, String)> = Vec::new();
        for level in levels {
            let mut applicable = Vec::new();
            for site in level {
                match self.try_candidate(&site, arguments, type_args, has_block) {
                    Ok(candidate) => applicable.push(candidate),
                    Err(reason) => {
                        tracing::trace!(function = %self.signature(site.function), %reason, "inapplicable");
                        rejected.push((site.function, reason));
                    }
                }
            }
            match applicable.len() {
                0 => continue,
                1 => return applicable.pop(),
                _ => {
                    let error = applicable.iter().fold(
                        CompileError::type_error("Overload resolution ambiguity".to_string(), name.span),
                        |error, candidate| error.with_note(self.signature(candidate.symbol)),
                    );
                    self.errors.push(error);
                    return None;
                }
            }
        }
        let error = match rejected.as_slice() {
            [] => CompileError::type_error(format!("Unresolved reference '{}'", name.node), name.span),
            [(_, reason)] => CompileError::type_error(reason.clone(), name.span),
            _ => rejected.iter().fold(
                CompileError::type_error("None of the following candidates is applicable".to_string(), name.span),
                |error, (function, reason)| error.with_note(format!("{}: {reason}", self.signature(*function))),
            ),
        };
        self.errors.push(error);
        None
    }

    /// Instantiate one candidate and constrain it by explicit type arguments, receiver and arguments.
    fn try_candidate(
        &mut self,
        site: &Site,
        arguments: &[ExprTy],
        type_args: &[Ty],
        has_block: bool,
    ) -> Result<Candidate, String> {
        let symbols = &self.symbols;
        let info = symbols.function(site.function);
        let mut candidate = Candidate::instantiate(symbols, &mut self.supply, site.function, site.member_of.as_ref());

        if !type_args.is_empty() {
            if type_args.len() != info.type_params.len() {
                return Err(format!(
                    "{} type argument(s) expected, but {} were given",
                    info.type_params.len(),
                    type_args.len()
                ));
            }
            let variables = candidate.type_arguments(symbols);
            for (variable, argument) in variables.iter().zip(type_args) {
                candidate.system.add_equality_constraint(symbols, variable, argument);
            }
        }

        if let Some(receiver) = &site.receiver {
            let Some(declared) = &info.receiver else {
                return Err("not an extension function".to_string());
            };
            let declared = candidate.instantiated(declared);
            if !constrain_argument(symbols, &mut candidate.system, &ExprTy::new(receiver.clone()), &declared) {
                return Err(format!(
                    "Receiver type mismatch: inferred type is {} but {} was expected",
                    symbols.display(receiver),
                    symbols.display(&candidate.system.substitute_fixed(&declared))
                ));
            }
        }

        let value_params = if has_block {
            match info.params.split_last() {
                Some(((_, Ty::Function(_)), rest)) => rest,
                _ => return Err("Function does not accept a trailing block".to_string()),
            }
        } else {
            &info.params[..]
        };
        if value_params.len() != arguments.len() {
            return Err(format!(
                "Expected {} argument(s), but {} were given",
                value_params.len(),
                arguments.len()
            ));
        }
        for ((_, parameter), argument) in value_params.iter().zip(arguments) {
            let parameter = candidate.instantiated(parameter);
            if !constrain_argument(symbols, &mut candidate.system, argument, &parameter) {
                return Err(format!(
                    "Type mismatch: inferred type is {} but {} was expected",
                    symbols.display(&argument.ty),
                    symbols.display(&candidate.system.substitute_fixed(&parameter))
                ));
            }
        }
        if candidate.system.has_contradiction() {
            return Err("Type parameter bounds are not satisfied".to_string());
        }
        Ok(candidate)
    }

    // ========================================================================
    // Completion
    // ========================================================================

    fn complete_call(
        &mut self,
        call: &mut CallExpr,
        span: Span,
        mode: &Mode,
        mut candidate: Candidate,
    ) -> Result<ExprTy, InternalError> {
        let info = self.symbols.function(candidate.symbol).clone();
        let return_type = candidate.instantiated(&info.return_type);
        if let Mode::Expected(expected) = mode {
            candidate
                .system
                .add_subtype_constraint_if_compatible(&self.symbols, &return_type, expected);
        }
        let params: Vec<Ty> = info.params.iter().map(|(_, ty)| candidate.instantiated(ty)).collect();

        if *mode == Mode::Dependent {
            let ty = candidate.system.substitute_fixed(&return_type);
            let pending = ty.contains_var().then(|| candidate.system.clone());
            return Ok(ExprTy { ty, pending });
        }

        // Variables the literal arguments will decide stay open; everything else with a proper bound is fixed
        // first, so a sibling argument like `listOf(1, 2)` contributes `List<Int>` rather than `List<?E>`.
        let mut held = BTreeSet::new();
        for (index, argument) in call.args.iter_mut().enumerate() {
            if let Some(parameter) = params.get(index) {
                if self.deferred_literal(argument).is_some() {
                    parameter.free_vars(&mut held);
                }
            }
        }
        if !held.is_empty() {
            candidate.system.fix_independent(&self.symbols, &held)?;
        }

        for (index, argument) in call.args.iter_mut().enumerate() {
            let Some(parameter) = params.get(index) else {
                continue;
            };
            let Some(slot) = self.deferred_literal(argument) else {
                continue;
            };
            let slot_span = slot.span;
            let Expr::CollectionLiteral(literal) = &mut slot.node else {
                continue;
            };
            match self.resolve_nested_in_outer_candidate(&mut candidate, literal, slot_span, parameter)? {
                Resolution::Rewritten { expr, container } => {
                    candidate
                        .system
                        .add_subtype_constraint_if_compatible(&self.symbols, &container, parameter);
                    *slot = expr;
                }
                Resolution::Failed => slot.node = Expr::Error,
            }
        }

        candidate
            .system
            .fix_all(&self.symbols, FixationMode::Proper)?;
        let own: BTreeSet<TypeVarId> = candidate
            .type_arguments(&self.symbols)
            .iter()
            .filter_map(|ty| match ty {
                Ty::Var(var) => Some(*var),
                _ => None,
            })
            .collect();
        for var in candidate.system.unfixed_variables() {
            if own.contains(&var) {
                let name = candidate
                    .system
                    .variable(var)
                    .map(|v| v.name.clone())
                    .unwrap_or_default();
                self.errors.push(CompileError::type_error(
                    format!("Not enough information to infer type variable '{name}'"),
                    call.name.span,
                ));
                candidate.system.fix_to(&self.symbols, var, Ty::Error)?;
            } else {
                candidate.system.fix_to(&self.symbols, var, self.symbols.any_type())?;
            }
        }
        tracing::debug!(
            function = %self.signature(candidate.symbol),
            span = ?span,
            "call resolved"
        );

        for (argument, parameter) in call.args.iter_mut().zip(&params) {
            let parameter = candidate.system.substitute_fixed(parameter);
            let checked = self.check_expr(argument, &Mode::Expected(parameter.clone()))?;
            if !is_subtype(&self.symbols, &checked.ty, &parameter) {
                self.errors
                    .push(self.type_mismatch(&checked.ty, &parameter, argument.span));
            }
        }

        if let Some(block) = call.block.as_deref_mut() {
            let receiver = match params.last().map(|p| candidate.system.substitute_fixed(p)) {
                Some(Ty::Function(function)) => function.receiver.map(|receiver| *receiver),
                _ => None,
            };
            self.check_block(block, receiver)?;
        }

        Ok(ExprTy::new(candidate.system.substitute_fixed(&return_type)))
    }

    /// The literal slot of an argument whose literal is still waiting for its builder.
    fn deferred_literal<'a>(&self, argument: &'a mut Spanned<Expr>) -> Option<&'a mut Spanned<Expr>> {
        let slot = literal_slot(argument)?;
        let Expr::CollectionLiteral(literal) = &slot.node else {
            return None;
        };
        let deferred = self.literals.get(literal.id).map(|entry| entry.state()) == Some(LiteralState::Deferred);
        deferred.then_some(slot)
    }

    /// Check the statements of a trailing block with `receiver` as the innermost implicit receiver.
    fn check_block(&mut self, block: &mut Spanned<Block>, receiver: Option<Ty>) -> Result<(), InternalError> {
        let pushed = receiver.is_some();
        if let Some(receiver) = receiver {
            self.receivers.push(receiver);
        }
        let mut result = Ok(());
        for statement in &mut block.node.statements {
            if let Err(internal) = self.check_expr(statement, &Mode::Independent) {
                result = Err(internal);
                break;
            }
        }
        if pushed {
            self.receivers.pop();
        }
        result
    }

    /// Finish the arguments of a call that could not be resolved, so literals inside still get a type.
    fn finish_failed_call(&mut self, call: &mut CallExpr) -> Result<(), InternalError> {
        for arg in &mut call.args {
            self.check_expr(arg, &Mode::Independent)?;
        }
        Ok(())
    }

    /// `fun <T> name(p: T): R` rendering of a function, for notes.
    pub(crate) fn signature(&self, function: FunctionId) -> String {
        let info = self.symbols.function(function);
        let type_params = if info.type_params.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = info.type_params.iter().map(|p| p.name.as_str()).collect();
            format!("<{}> ", names.join(", "))
        };
        let receiver = info
            .receiver
            .as_ref()
            .map(|r| format!("{}.", self.symbols.display(r)))
            .unwrap_or_default();
        let params: Vec<String> = info
            .params
            .iter()
            .map(|(name, ty)| format!("{name}: {}", self.symbols.display(ty)))
            .collect();
        format!(
            "fun {type_params}{receiver}{}({}): {}",
            info.name,
            params.join(", "),
            self.symbols.display(&info.return_type)
        )
    }
}
