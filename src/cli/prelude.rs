//! Checker configuration from command-line flags and the environment
//!
//! Extra declaration units come from two places, loaded in this order after the standard prelude:
//!
//! 1. Every path listed in the `COLIT_PRELUDE` environment variable (platform path-list syntax).
//! 2. Every `--prelude <FILE>` flag, in the order given.

use std::env;
use std::path::{Path, PathBuf};

use super::commands::read_source;
use super::{CheckOptions, CliError, CliResult};
use crate::frontend::config::CheckConfig;
use crate::frontend::typechecker::{TypeChecker, UnitErrors};

/// Environment variable listing extra declaration files.
pub const PRELUDE_ENV: &str = "COLIT_PRELUDE";

/// Paths listed in `COLIT_PRELUDE`, skipping empty entries.
pub fn prelude_paths_from_env() -> Vec<PathBuf> {
    match env::var_os(PRELUDE_ENV) {
        Some(value) => env::split_paths(&value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect(),
        None => Vec::new(),
    }
}

/// Build the checker configuration for `options`, reading every extra declaration file.
///
/// ## Errors
/// - [`CliError::Io`] / [`CliError::TooLarge`] if a declaration file cannot be read.
pub fn build_config(options: &CheckOptions) -> CliResult<CheckConfig> {
    let mut paths = prelude_paths_from_env();
    paths.extend(options.prelude.iter().cloned());
    config_with_units(options, &paths)
}

fn config_with_units(options: &CheckOptions, paths: &[PathBuf]) -> CliResult<CheckConfig> {
    let mut config = CheckConfig::new().with_prelude(!options.no_prelude);
    if let Some(class) = &options.default_sequence {
        config = config.with_default_sequence_container(class.clone());
    }
    if let Some(class) = &options.default_dictionary {
        config = config.with_default_dictionary_container(class.clone());
    }
    for path in paths {
        let source = read_source(path)?;
        tracing::debug!(path = %path.display(), "loading extra declarations");
        config = config.with_extra_prelude(unit_name(path), source);
    }
    Ok(config)
}

fn unit_name(path: &Path) -> String {
    path.display().to_string()
}

/// Create a checker for `config`, rendering the failing unit's errors against that unit's source.
pub fn checker_for(config: CheckConfig) -> CliResult<TypeChecker> {
    let units = config.extra_prelude.clone();
    TypeChecker::with_config(config).map_err(|UnitErrors { unit, errors }| {
        let rendered = match units.iter().find(|u| u.name == unit) {
            Some(u) => super::commands::render_errors(&unit, &u.source, errors),
            None => errors
                .iter()
                .map(|e| format!("{}: {}", e.kind, e.message))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        CliError::Prelude { unit, rendered }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("colit-prelude-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_flags_map_onto_config() {
        let options = CheckOptions {
            no_prelude: true,
            default_sequence: Some("Set".to_string()),
            default_dictionary: Some("SortedMap".to_string()),
            ..CheckOptions::default()
        };
        let config = config_with_units(&options, &[]).unwrap();
        assert!(!config.load_prelude);
        assert_eq!(config.default_sequence_container, "Set");
        assert_eq!(config.default_dictionary_container, "SortedMap");
        assert!(config.extra_prelude.is_empty());
    }

    #[test]
    fn test_extra_units_are_read_in_order() {
        let first = temp_file("first.colit", "class Bag<out E> : Collection<E>\n");
        let second = temp_file("second.colit", "class Deque<E> : Collection<E>\n");
        let config = config_with_units(&CheckOptions::default(), &[first.clone(), second]).unwrap();
        assert_eq!(config.extra_prelude.len(), 2);
        assert_eq!(config.extra_prelude[0].name, first.display().to_string());
        assert!(config.extra_prelude[1].source.contains("Deque"));
    }

    #[test]
    fn test_missing_unit_is_io_error() {
        let missing = env::temp_dir().join("colit-no-such-prelude.colit");
        let err = config_with_units(&CheckOptions::default(), &[missing]).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_broken_unit_names_the_unit() {
        let broken = temp_file("broken.colit", "val x: Nope = 1\n");
        let config = config_with_units(&CheckOptions::default(), &[broken.clone()]).unwrap();
        let Err(err) = checker_for(config) else {
            panic!("expected the unit to fail");
        };
        match err {
            CliError::Prelude { unit, .. } => assert_eq!(unit, broken.display().to_string()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
