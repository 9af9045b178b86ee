//! Abstract Syntax Tree definitions for colit
//!
//! This module defines all AST node types: class and function signatures, `val` declarations,
//! expressions (calls, trailing blocks, collection literals) and type expressions.
//!
//! ## Notes
//! - The AST carries no type information. The type checker keeps its own side tables and rewrites
//!   collection literals in place once a builder has been chosen.

use std::fmt;

pub use colit_core::lang::conventions::LiteralKind;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Identifier
pub type Ident = String;

/// Identity of a collection literal node within one parsed unit.
///
/// Assigned by the parser in source order and preserved when the literal is moved (e.g. into the
/// block of a rewritten builder call).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LiteralId(pub u32);

impl fmt::Display for LiteralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A program is a sequence of declarations
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Spanned<Declaration>>,
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    Function(FunctionDecl),
    Val(ValDecl),
}

// ============================================================================
// Declarations
// ============================================================================

/// Declaration-site variance of a class type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variance {
    #[default]
    Invariant,
    Out,
    In,
}

/// `<out T : Bound>`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Ident,
    pub variance: Variance,
    pub bound: Option<Spanned<TypeExpr>>,
    pub span: Span,
}

/// `class Name<...> : Super<...> { members; companion object { ... } }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub supertypes: Vec<Spanned<TypeExpr>>,
    pub members: Vec<Spanned<FunctionDecl>>,
    /// Functions declared inside `companion object { ... }`.
    pub companion: Vec<Spanned<FunctionDecl>>,
}

/// A function signature. Functions have no bodies: they exist to be called.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    /// Extension receiver, e.g. `List.Companion` in `fun List.Companion.buildFrom(...)`.
    pub receiver: Option<Spanned<TypeExpr>>,
    pub params: Vec<Spanned<Param>>,
    pub return_type: Spanned<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: Spanned<TypeExpr>,
}

/// `val name[: Type] = value`
#[derive(Debug, Clone, PartialEq)]
pub struct ValDecl {
    pub name: Ident,
    pub ty: Option<Spanned<TypeExpr>>,
    pub value: Spanned<Expr>,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `Name` or `Name<A, B>`
    Named { name: Ident, args: Vec<Spanned<TypeExpr>> },
    /// `Name.Companion`
    Companion(Ident),
    /// `(A, B) -> R` or `Recv.() -> R`
    Function(FunctionTypeExpr),
    /// `A & B`
    Intersection(Vec<Spanned<TypeExpr>>),
    /// Placeholder for a type that failed to resolve; only produced by the checker.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeExpr {
    pub receiver: Option<Box<Spanned<TypeExpr>>>,
    pub params: Vec<Spanned<TypeExpr>>,
    pub ret: Box<Spanned<TypeExpr>>,
}

impl TypeExpr {
    /// Shorthand for a plain named type without arguments.
    pub fn named(name: impl Into<Ident>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Double(f64),
    String(String),
    Bool(bool),
    Ident(Ident),
    Call(CallExpr),
    Paren(Box<Spanned<Expr>>),
    CollectionLiteral(CollectionLiteral),
    /// Placeholder left behind by failed resolution; typed as the error type.
    Error,
}

/// `receiver.name<TypeArgs>(args) { block }`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub receiver: Option<Box<Spanned<Expr>>>,
    pub name: Spanned<Ident>,
    pub type_args: Vec<Spanned<TypeExpr>>,
    pub args: Vec<Spanned<Expr>>,
    /// Trailing block; its statements run with the block parameter's receiver in scope.
    pub block: Option<Box<Spanned<Block>>>,
}

/// `{ stmt; stmt }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Spanned<Expr>>,
}

/// `[a, b, c]` or `[k: v, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionLiteral {
    pub id: LiteralId,
    pub kind: LiteralKind,
    pub entries: Vec<LiteralEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralEntry {
    Single(Spanned<Expr>),
    Pair(Spanned<Expr>, Spanned<Expr>),
}

impl LiteralEntry {
    /// Expressions of this entry in `add` argument order (key before value).
    pub fn exprs(&self) -> Vec<&Spanned<Expr>> {
        match self {
            LiteralEntry::Single(e) => vec![e],
            LiteralEntry::Pair(k, v) => vec![k, v],
        }
    }

    pub fn exprs_mut(&mut self) -> Vec<&mut Spanned<Expr>> {
        match self {
            LiteralEntry::Single(e) => vec![e],
            LiteralEntry::Pair(k, v) => vec![k, v],
        }
    }
}

impl CollectionLiteral {
    /// Expressions of one element family: `0` is the value (sequence) or key (dictionary), `1` is the value of
    /// a dictionary.
    pub fn family(&self, index: usize) -> Vec<&Spanned<Expr>> {
        self.entries
            .iter()
            .filter_map(|entry| entry.exprs().get(index).copied())
            .collect()
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variance::Invariant => Ok(()),
            Variance::Out => write!(f, "out "),
            Variance::In => write!(f, "in "),
        }
    }
}
