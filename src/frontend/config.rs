//! Type checker configuration
//!
//! Controls which declaration units are loaded before user code and which containers literals fall back to when
//! nothing in their context asks for a specific one.

use colit_core::lang::conventions::{LiteralKind, literal_info};

/// An additional declaration unit loaded after the standard prelude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreludeUnit {
    /// Display name used in diagnostics.
    pub name: String,
    pub source: String,
}

/// Configuration for [`TypeChecker::with_config`](crate::frontend::typechecker::TypeChecker::with_config)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Load the standard prelude (builders for `List`, `Set`, `MutableList`, `Map`)
    pub load_prelude: bool,
    /// Class chosen for `[a, b]` with no expected type
    pub default_sequence_container: String,
    /// Class chosen for `[k: v]` with no expected type
    pub default_dictionary_container: String,
    /// Units loaded after the prelude, in order
    pub extra_prelude: Vec<PreludeUnit>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            load_prelude: true,
            default_sequence_container: literal_info(LiteralKind::Sequence).default_container.to_string(),
            default_dictionary_container: literal_info(LiteralKind::Dictionary).default_container.to_string(),
            extra_prelude: Vec::new(),
        }
    }
}

impl CheckConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prelude(mut self, load: bool) -> Self {
        self.load_prelude = load;
        self
    }

    pub fn with_default_sequence_container(mut self, class: impl Into<String>) -> Self {
        self.default_sequence_container = class.into();
        self
    }

    pub fn with_default_dictionary_container(mut self, class: impl Into<String>) -> Self {
        self.default_dictionary_container = class.into();
        self
    }

    /// Append a declaration unit to load after the prelude.
    pub fn with_extra_prelude(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.extra_prelude.push(PreludeUnit {
            name: name.into(),
            source: source.into(),
        });
        self
    }

    /// Default container class name for a literal kind.
    pub fn default_container(&self, kind: LiteralKind) -> &str {
        match kind {
            LiteralKind::Sequence => &self.default_sequence_container,
            LiteralKind::Dictionary => &self.default_dictionary_container,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_literal_conventions() {
        let config = CheckConfig::default();
        assert!(config.load_prelude);
        assert_eq!(config.default_container(LiteralKind::Sequence), "List");
        assert_eq!(config.default_container(LiteralKind::Dictionary), "Map");
        assert!(config.extra_prelude.is_empty());
    }

    #[test]
    fn builders_override_fields() {
        let config = CheckConfig::new()
            .with_prelude(false)
            .with_default_sequence_container("Set")
            .with_default_dictionary_container("SortedMap")
            .with_extra_prelude("extra.colit", "class Deque<E>");
        assert!(!config.load_prelude);
        assert_eq!(config.default_container(LiteralKind::Sequence), "Set");
        assert_eq!(config.default_container(LiteralKind::Dictionary), "SortedMap");
        assert_eq!(config.extra_prelude[0].name, "extra.colit");
    }
}
