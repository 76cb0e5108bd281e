//! # Configuration
//!
//! Query defaults are managed by [`confique`], layered in priority order:
//!
//! 1. **Per-call overrides**: `ParameterFilter::case_sensitive`, `::precision`, ...
//! 2. **Environment variables**: `ELEMQUERY_CASE_SENSITIVE`, `ELEMQUERY_PRECISION`,
//!    `ELEMQUERY_SCOPE_PRECEDENCE`.
//! 3. **Config file**: an optional TOML file passed to [`QueryConfig::load`].
//! 4. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `case_sensitive` | `true` | Case sensitivity of text parameter rules |
//! | `precision` | `0.0013020833333333` | Tolerance of double parameter rules |
//! | `scope_precedence` | `false` | Resolve ambiguous scopes by precedence instead of failing |
//!
//! With `scope_precedence` off, a filter set naming more than one of `view`,
//! `elements` and `element_ids` is rejected. With it on, `view` wins over
//! `elements`, which wins over `element_ids`.

use crate::error::Result;
use crate::rules::{RuleOptions, DEFAULT_CASE_SENSITIVE, DEFAULT_PRECISION};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Query defaults, stored in `elemquery.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueryConfig {
    /// Default case sensitivity for text rules.
    #[config(default = true, env = "ELEMQUERY_CASE_SENSITIVE")]
    pub case_sensitive: bool,

    /// Default tolerance for double rules.
    #[config(default = 0.0013020833333333, env = "ELEMQUERY_PRECISION")]
    pub precision: f64,

    /// Resolve multiple scope filters by precedence (view > elements > element_ids).
    #[config(default = false, env = "ELEMQUERY_SCOPE_PRECEDENCE")]
    pub scope_precedence: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            case_sensitive: DEFAULT_CASE_SENSITIVE,
            precision: DEFAULT_PRECISION,
            scope_precedence: false,
        }
    }
}

impl QueryConfig {
    /// Load from the environment, then `path` if given, then compiled defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = QueryConfig::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    /// The rule defaults as fully-populated options.
    pub fn rule_defaults(&self) -> RuleOptions {
        RuleOptions::default()
            .case_sensitive(self.case_sensitive)
            .precision(self.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = QueryConfig::default();
        assert!(config.case_sensitive);
        assert_eq!(config.precision, 0.0013020833333333);
        assert!(!config.scope_precedence);
    }

    #[test]
    fn test_rule_defaults_are_fully_populated() {
        let config = QueryConfig {
            case_sensitive: false,
            precision: 0.01,
            ..Default::default()
        };
        let options = config.rule_defaults();
        assert_eq!(options.case_sensitive, Some(false));
        assert_eq!(options.precision, Some(0.01));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "case_sensitive = false").unwrap();
        writeln!(file, "scope_precedence = true").unwrap();

        let config = QueryConfig::load(Some(file.path())).unwrap();
        assert!(!config.case_sensitive);
        assert!(config.scope_precedence);
        assert_eq!(config.precision, DEFAULT_PRECISION);
    }

    #[test]
    fn test_serialized_default_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elemquery.toml");
        let config = QueryConfig {
            precision: 0.5,
            ..Default::default()
        };
        std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

        let loaded = QueryConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.precision, 0.5);
        assert!(loaded.case_sensitive);
    }
}
