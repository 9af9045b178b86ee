//! Collection literal resolution.
//!
//! A literal `[a, b]` or `[k: v]` has no type of its own: it is resolved against every visible builder
//! (`X.Companion.buildFrom(size, init)`), kept provisional while the context is unknown, and finally rewritten
//! into an explicit call of the chosen builder. The driver entry points live on
//! [`TypeChecker`](crate::frontend::typechecker::TypeChecker); this module holds the phases they run.
//!
//! ## Module Structure
//!
//! - `unify` - element type unification per family (value; or key, value)
//! - `collect` - builder candidate collection
//! - `stages` - candidate validation (builder shape, element arguments)
//! - `fixation` - per-candidate fixation and the provisional intersection
//! - `side_table` - per-unit literal state and recorded candidates
//! - `select` - deferred selection from an expected type, a default container or an outer variable
//! - `rewrite` - desugaring into `X.buildFrom<T>(n) { add(..) }`
//! - `errors` - user-facing [`LiteralError`] and fatal [`InternalError`]
//!
//! ## Notes
//! - Candidates are dropped silently during validation; only the final selection reports.

pub mod collect;
pub mod errors;
pub mod fixation;
pub mod rewrite;
pub mod select;
pub mod side_table;
pub mod stages;
pub mod unify;

pub use errors::{CANT_CHOOSE_BUILDER_CODE, InternalError, LiteralError, NO_BUILDERS_CODE};
pub use side_table::{LiteralState, SideTable};
