//! Builtin type vocabulary.
//!
//! ## Notes
//! - These registries describe names and declarations only. Subtyping and inference live in the frontend.

pub mod builtins;
