//! Type checker for colit.
//!
//! Resolves every `val` initializer of a program, desugaring collection literals into builder calls along the
//! way. The checker owns the [`SymbolTable`], the per-unit literal [`SideTable`] and the type variable supply.
//!
//! ## Notes
//!
//! - **Units**: builtin classes, the prelude, extra prelude units and user code are separate compilation units
//!   declared into one symbol table. [`TypeChecker::with_config`] loads everything before user code; the literal
//!   side table is cleared after each unit.
//! - **Two-pass model**: [`TypeChecker::check_program`] first collects class and function declarations, then
//!   checks `val` initializers in source order, mutating the AST where literals are rewritten.
//! - **Error accumulation**: user errors are collected so a single run reports as many as possible. An internal
//!   error (a broken invariant of the literal engine) aborts the unit instead.
//!
//! ## Examples
//!
//! ```rust
//! use colit::frontend::{parser, typechecker::TypeChecker};
//!
//! let mut program = parser::parse_source("val a: Set<Int> = [1, 2, 3]").unwrap();
//! let mut checker = TypeChecker::with_config(Default::default()).unwrap();
//! checker.check_program(&mut program).unwrap();
//! assert_eq!(checker.type_info().val_types[0].0, "a");
//! ```
//!
//! ## See also
//!
//! - [`literals`](super::literals) – the phases of literal resolution
//! - [`inference`](super::inference) – constraint systems and candidates

mod check_decl;
mod check_expr;
mod collect;

pub use check_expr::Resolution;


use std::collections::{BTreeMap, HashSet};

use colit_core::lang::prelude::{PRELUDE_NAME, PRELUDE_SOURCE};
use colit_core::lang::types::builtins;
use thiserror::Error;

use crate::frontend::ast::*;
use crate::frontend::config::CheckConfig;
use crate::frontend::diagnostics::{CompileError, ErrorKind};
use crate::frontend::inference::TypeVarSupply;
use crate::frontend::literals::SideTable;
use crate::frontend::parser;
use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::{ClassId, Ty};

/// Display name of the builtin declarations unit.
pub const BUILTINS_NAME: &str = "<builtins>";

/// Output of checking one program, for the printer and the CLI.
#[derive(Debug, Default, Clone)]
pub struct TypeCheckInfo {
    /// Declared or inferred type of every `val`, in declaration order.
    pub val_types: Vec<(Ident, Ty)>,
    /// Container class chosen for every rewritten literal.
    pub literal_choices: BTreeMap<LiteralId, ClassId>,
}

impl TypeCheckInfo {
    pub fn val_type(&self, name: &str) -> Option<&Ty> {
        self.val_types.iter().find(|(n, _)| n == name).map(|(_, ty)| ty)
    }
}

/// What the context of an expression knows about its type.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// The context requires this type.
    Expected(Ty),
    /// The expression is an argument of a call that is still being resolved: literals stay provisional and
    /// generic calls come back with their constraint system pending.
    Dependent,
    /// Nothing is expected; resolve completely.
    Independent,
}

/// A declaration unit loaded before user code failed to check.
#[derive(Debug, Clone, Error)]
#[error("declarations in '{unit}' failed to check")]
pub struct UnitErrors {
    pub unit: String,
    pub errors: Vec<CompileError>,
}

/// Type checker state.
///
/// Create with [`TypeChecker::with_config`] (builtins, prelude, extra units) or [`TypeChecker::new`] (builtins
/// only), then call [`check_program`](Self::check_program).
pub struct TypeChecker {
    /// Symbol table shared by every unit.
    pub(crate) symbols: SymbolTable,
    pub(crate) config: CheckConfig,
    /// Accumulated compile errors (non-fatal).
    pub(crate) errors: Vec<CompileError>,
    /// Literal state for the unit being checked.
    pub(crate) literals: SideTable,
    pub(crate) supply: TypeVarSupply,
    /// Receivers of the builder blocks being checked, outermost first.
    pub(crate) receivers: Vec<Ty>,
    pub(crate) type_info: TypeCheckInfo,
}

impl TypeChecker {
    /// A checker with the builtin classes declared and nothing else.
    pub fn new() -> Self {
        let mut checker = Self::empty(CheckConfig::default().with_prelude(false));
        checker
            .load_unit(BUILTINS_NAME, &builtins::declarations_source())
            .expect("INVARIANT: builtin declarations check");
        checker
    }

    /// A checker with builtins, the prelude (unless disabled) and every extra prelude unit loaded.
    ///
    /// ## Errors
    /// - [`UnitErrors`] naming the first unit that failed to parse or check.
    pub fn with_config(config: CheckConfig) -> Result<Self, UnitErrors> {
        let mut checker = Self::empty(config.clone());
        let mut units = vec![(BUILTINS_NAME.to_string(), builtins::declarations_source())];
        if config.load_prelude {
            units.push((PRELUDE_NAME.to_string(), PRELUDE_SOURCE.to_string()));
        }
        units.extend(config.extra_prelude.iter().map(|u| (u.name.clone(), u.source.clone())));
        for (unit, source) in units {
            checker
                .load_unit(&unit, &source)
                .map_err(|errors| UnitErrors { unit, errors })?;
        }
        Ok(checker)
    }

    fn empty(config: CheckConfig) -> Self {
        Self {
            symbols: SymbolTable::new(),
            config,
            errors: Vec::new(),
            literals: SideTable::new(),
            supply: TypeVarSupply::new(),
            receivers: Vec::new(),
            type_info: TypeCheckInfo::default(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Output of the last [`check_program`](Self::check_program).
    pub fn type_info(&self) -> &TypeCheckInfo {
        &self.type_info
    }

    /// Parse and check a declaration unit into the shared symbol table.
    #[tracing::instrument(skip(self, source))]
    pub fn load_unit(&mut self, name: &str, source: &str) -> Result<(), Vec<CompileError>> {
        let mut program = parser::parse_source(source)?;
        self.check_program(&mut program)
    }

    /// Check a program and return errors if any.
    ///
    /// Runs the two-pass algorithm:
    /// 1. **Collect**: register classes (then their supertypes), members, companion functions and top-level
    ///    functions.
    /// 2. **Check**: resolve each `val` initializer in order; collection literals are replaced in place by the
    ///    builder call chosen for them, or by an error placeholder.
    ///
    /// ## Returns
    ///
    /// - `Ok(())` if type checking succeeds.
    /// - `Err(Vec<CompileError>)` containing all accumulated errors, deduplicated. After an internal error the
    ///   list ends with that error and the remaining declarations are not checked.
    #[tracing::instrument(skip_all, fields(decl_count = program.declarations.len()))]
    pub fn check_program(&mut self, program: &mut Program) -> Result<(), Vec<CompileError>> {
        self.errors.clear();
        self.literals.clear();
        self.receivers.clear();
        self.type_info = TypeCheckInfo::default();

        // First pass: collect declarations
        self.collect_declarations(program);

        // Second pass: check vals in order
        for decl in &mut program.declarations {
            let span = decl.span;
            if let Declaration::Val(val) = &mut decl.node {
                if let Err(internal) = self.check_val(val, span) {
                    tracing::warn!(error = %internal, "aborting unit");
                    self.errors.push(internal.into_compile_error(span));
                    break;
                }
            }
        }
        self.literals.clear();

        let errors = dedup_errors(std::mem::take(&mut self.errors));
        if errors.iter().any(|e| e.kind != ErrorKind::Warning) {
            Err(errors)
        } else {
            Ok(())
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop repeated reports of the same message at the same place, keeping the first.
///
/// Call arguments are checked twice (dependent, then with the final parameter type), so errors inside them can
/// be reported twice.
fn dedup_errors(errors: Vec<CompileError>) -> Vec<CompileError> {
    let mut seen = HashSet::new();
    errors
        .into_iter()
        .filter(|e| seen.insert((e.message.clone(), e.span)))
        .collect()
}

/// Convenience function: check `source` with the default configuration.
///
/// ## Returns
/// - The rewritten program and its type information.
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn check_source(source: &str) -> Result<(Program, TypeCheckInfo), Vec<CompileError>> {
    let mut program = parser::parse_source(source)?;
    let mut checker = TypeChecker::with_config(CheckConfig::default()).map_err(|e| e.errors)?;
    checker.check_program(&mut program)?;
    Ok((program, checker.type_info))
}
