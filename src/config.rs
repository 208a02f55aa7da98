//! JSON declarations that build an [`ArgumentParser`].

use crate::group::GroupError;
use crate::key::OptionKey;
use crate::option::{OptionDecl, OptionKind, RegisterError, Requirement};
use crate::parser::ArgumentParser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading a declaration or building a parser from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid group '{name}': {source}")]
    InvalidGroup { name: String, source: GroupError },

    #[error("invalid option {key}: {source}")]
    InvalidOption {
        key: OptionKey,
        source: RegisterError,
    },

    #[error("positional_count {count} is smaller than the {names} positional names given")]
    PositionalCount { count: usize, names: usize },
}

/// A mutually exclusive group declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Group name, referenced by options
    pub name: String,
    /// Whether one member has to be set
    #[serde(default)]
    pub mandatory: bool,
}

/// An option declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionConfig {
    /// Short name without the dash (e.g. "v" for -v)
    #[serde(default)]
    pub short: String,
    /// Long name without the dashes (e.g. "verbose" for --verbose)
    #[serde(default)]
    pub long: String,
    /// Value kind: bool, int, hex, float or string
    #[serde(default)]
    pub kind: OptionKind,
    /// optional, required or inherit_group
    #[serde(default)]
    pub requirement: Requirement,
    /// Help text for this option
    #[serde(default)]
    pub help: String,
    /// Name of the group this option belongs to
    pub group: Option<String>,
    /// Default value text
    pub default: Option<String>,
}

impl OptionConfig {
    pub fn key(&self) -> OptionKey {
        OptionKey::new(self.short.clone(), self.long.clone())
    }

    fn to_decl(&self) -> OptionDecl {
        OptionDecl {
            key: self.key(),
            requirement: self.requirement,
            kind: self.kind,
            description: self.help.clone(),
            group: self.group.clone(),
            default: self.default.clone(),
        }
    }
}

/// Top-level declaration of a program's command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Program name shown in usage text
    pub name: Option<String>,
    /// Program description
    #[serde(default)]
    pub description: String,
    /// Literal usage text replacing the generated synopsis
    pub usage: Option<String>,
    /// Mutually exclusive groups, declared before any option
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    /// Options in registration order
    #[serde(default)]
    pub options: Vec<OptionConfig>,
    /// Positional argument names in order
    #[serde(default)]
    pub positionals: Vec<String>,
    /// Number of positional arguments (default: number of names)
    pub positional_count: Option<usize>,
}

impl Config {
    /// Parse a JSON string into a Config.
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Number of positional slots to declare.
    pub fn effective_positional_count(&self) -> usize {
        self.positional_count.unwrap_or(self.positionals.len())
    }

    /// Build a parser: groups first, then options in order, then positionals.
    pub fn build(&self) -> Result<ArgumentParser, ConfigError> {
        let count = self.effective_positional_count();
        if count < self.positionals.len() {
            return Err(ConfigError::PositionalCount {
                count,
                names: self.positionals.len(),
            });
        }

        let mut parser = ArgumentParser::new(self.description.clone());
        if let Some(ref usage) = self.usage {
            parser = parser.with_usage(usage.clone());
        }
        if let Some(ref name) = self.name {
            parser = parser.with_exec_name(name.clone());
        }

        // Groups have to exist before options can join them
        for group in &self.groups {
            parser
                .add_group(&group.name, group.mandatory)
                .map_err(|source| ConfigError::InvalidGroup {
                    name: group.name.clone(),
                    source,
                })?;
        }

        // Register options in declaration order
        for option in &self.options {
            parser
                .register(option.to_decl())
                .map_err(|source| ConfigError::InvalidOption {
                    key: option.key(),
                    source,
                })?;
        }

        parser.register_positional(count, self.positionals.as_slice());
        Ok(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse_config(json: &str) -> Config {
        Config::from_json(json).unwrap()
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config("{}");
        assert_eq!(config, Config::default());
        let parser = config.build().unwrap();
        assert_eq!(parser.options().len(), 1);
        assert!(parser.positionals().is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"{
                "name": "prog",
                "description": "A test program",
                "groups": [{"name": "mode", "mandatory": true}],
                "options": [
                    {"short": "i", "long": "int", "kind": "int", "requirement": "required",
                     "help": "An integer"},
                    {"short": "a", "kind": "bool", "requirement": "inherit_group", "group": "mode"},
                    {"short": "b", "kind": "bool", "group": "mode"},
                    {"long": "mask", "kind": "hex", "default": "ff"}
                ],
                "positionals": ["INPUT"]
            }"#,
        );

        assert_eq!(config.name.as_deref(), Some("prog"));
        assert_eq!(config.options.len(), 4);
        assert_eq!(config.options[0].kind, OptionKind::Int);
        assert_eq!(config.options[0].requirement, Requirement::Required);
        assert_eq!(config.options[1].requirement, Requirement::InheritGroup);
        assert_eq!(config.options[2].requirement, Requirement::Optional);
        assert_eq!(config.options[3].kind, OptionKind::Hex);

        let parser = config.build().unwrap();
        assert_eq!(parser.exec_name(), "prog");
        assert_eq!(parser.description(), "A test program");
        assert!(parser.groups().get("mode").unwrap().is_mandatory());
        assert_eq!(parser.groups().get("mode").unwrap().len(), 2);
        assert_eq!(parser.raw("mask"), "ff");
        assert_eq!(parser.positionals().len(), 1);
    }

    #[test]
    fn test_default_kind_is_string() {
        let config = parse_config(r#"{"options":[{"long":"name"}]}"#);
        assert_eq!(config.options[0].kind, OptionKind::String);
        assert_eq!(config.options[0].requirement, Requirement::Optional);
    }

    #[test]
    fn test_positional_count_adds_placeholders() {
        let config = parse_config(r#"{"positionals":["FIRST"],"positional_count":3}"#);
        let parser = config.build().unwrap();
        let names: Vec<_> = parser.positionals().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["FIRST", "ARG_2", "ARG_3"]);
    }

    #[test]
    fn test_error_positional_count_too_small() {
        let config = parse_config(r#"{"positionals":["A","B"],"positional_count":1}"#);
        assert!(matches!(
            config.build(),
            Err(ConfigError::PositionalCount { count: 1, names: 2 })
        ));
    }

    #[test]
    fn test_error_invalid_json() {
        assert!(matches!(
            Config::from_json("{not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_error_unknown_kind() {
        let result = Config::from_json(r#"{"options":[{"long":"x","kind":"list"}]}"#);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_error_unknown_field() {
        let result = Config::from_json(r#"{"options":[{"long":"x","multiple":true}]}"#);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_error_duplicate_group() {
        let config = parse_config(r#"{"groups":[{"name":"g"},{"name":"g"}]}"#);
        let err = config.build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidGroup {
                source: GroupError::DuplicateGroup(_),
                ..
            }
        ));
    }

    #[test]
    fn test_error_option_in_unknown_group() {
        let config = parse_config(r#"{"options":[{"short":"a","group":"nope"}]}"#);
        let err = config.build().unwrap_err();
        assert_eq!(err.to_string(), "invalid option -a/-: unknown group: nope");
    }

    #[test]
    fn test_error_empty_option_key() {
        let config = parse_config(r#"{"options":[{"kind":"bool"}]}"#);
        assert!(matches!(
            config.build(),
            Err(ConfigError::InvalidOption {
                source: RegisterError::EmptyKey,
                ..
            })
        ));
    }

    #[test]
    fn test_error_duplicate_option() {
        let config = parse_config(r#"{"options":[{"long":"out"},{"short":"o","long":"out"}]}"#);
        assert!(matches!(
            config.build(),
            Err(ConfigError::InvalidOption {
                source: RegisterError::NameTaken { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"name":"fromfile","options":[{{"short":"v","kind":"bool"}}]}}"#)
            .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.name.as_deref(), Some("fromfile"));
        assert_eq!(config.options[0].kind, OptionKind::Bool);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_error_option_name_with_dash() {
        let config = parse_config(r#"{"options":[{"short":"-"}]}"#);
        assert!(matches!(
            config.build(),
            Err(ConfigError::InvalidOption {
                source: RegisterError::InvalidName(_),
                ..
            })
        ));
    }
}
