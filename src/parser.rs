//! Option declaration and argument loading.

use crate::group::{GroupError, GroupRegistry};
use crate::key::OptionKey;
use crate::option::{OptionDecl, OptionKind, OptionRegistry, OptionSpec, RegisterError, Requirement};
use crate::positional::{PositionalRegistry, PositionalSlot};
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Description of the automatically registered help option.
pub const HELP_DESCRIPTION: &str = "Show help text and exit";

/// Errors that can occur while loading arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("positional arguments cannot precede options: {0}")]
    OptionAfterPositional(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("{0}")]
    Missing(MissingReport),

    #[error("{0}")]
    Conflict(ConflictReport),

    #[error("missing positional arguments: expected {expected}, got {found}")]
    MissingPositionals { expected: usize, found: usize },
}

/// A group named in a validation failure, with the members that matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub name: String,
    pub members: Vec<OptionKey>,
}

impl fmt::Display for GroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for key in &self.members {
            write!(f, "\n\t{}", key)?;
        }
        Ok(())
    }
}

/// Mandatory options and mandatory groups left unset after a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingReport {
    pub options: Vec<OptionKey>,
    pub groups: Vec<GroupReport>,
}

impl MissingReport {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.groups.is_empty()
    }
}

impl fmt::Display for MissingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        if !self.options.is_empty() {
            lines.push("Missing required options:".to_string());
            lines.extend(self.options.iter().map(ToString::to_string));
        }
        if !self.groups.is_empty() {
            lines.push("At least one option from these groups must be set:".to_string());
            lines.extend(self.groups.iter().map(ToString::to_string));
        }
        f.write_str(&lines.join("\n"))
    }
}

/// Groups with more than one member set; each report lists the set members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport(pub Vec<GroupReport>);

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Conflicting options used in these groups:")?;
        for group in &self.0 {
            write!(f, "\n{}", group)?;
        }
        Ok(())
    }
}

/// Command-line argument parser.
///
/// Options, groups and positionals are declared first, then [`load`] binds
/// the command line to them and validates the result. Values are read back
/// through the accessors in [`crate::value`].
///
/// [`load`]: ArgumentParser::load
#[derive(Debug, Clone)]
pub struct ArgumentParser {
    description: String,
    usage: Option<String>,
    exec_name: String,
    options: OptionRegistry,
    groups: GroupRegistry,
    positionals: PositionalRegistry,
}

impl Default for ArgumentParser {
    fn default() -> Self {
        Self::new("")
    }
}

impl ArgumentParser {
    /// Create a parser with the `-h/--help` option already registered.
    pub fn new(description: impl Into<String>) -> Self {
        let mut parser = Self {
            description: description.into(),
            usage: None,
            exec_name: String::new(),
            options: OptionRegistry::new(),
            groups: GroupRegistry::new(),
            positionals: PositionalRegistry::new(),
        };
        let help = parser.register_option(
            OptionKey::help(),
            Requirement::Optional,
            OptionKind::Bool,
            HELP_DESCRIPTION,
        );
        debug_assert!(help.is_ok());
        parser
    }

    /// Replace the generated usage synopsis with a fixed text.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Set the program name shown in usage text.
    pub fn with_exec_name(mut self, name: impl Into<String>) -> Self {
        self.exec_name = name.into();
        self
    }

    /// Declare a mutually exclusive group.
    pub fn add_group(&mut self, name: &str, mandatory: bool) -> Result<(), GroupError> {
        self.groups.add_group(name, mandatory)
    }

    /// Register an option described by `decl`.
    pub fn register(&mut self, decl: OptionDecl) -> Result<(), RegisterError> {
        self.options.register(
            &mut self.groups,
            decl.key,
            decl.requirement,
            decl.kind,
            &decl.description,
            decl.group.as_deref(),
            decl.default.as_deref(),
        )
    }

    /// Register an ungrouped option without a default value.
    pub fn register_option(
        &mut self,
        key: impl Into<OptionKey>,
        requirement: Requirement,
        kind: OptionKind,
        description: &str,
    ) -> Result<(), RegisterError> {
        self.register(
            OptionDecl::new(key, kind)
                .requirement(requirement)
                .description(description),
        )
    }

    /// Add an already registered option to the group `name`, with the same
    /// promotion rules as registering it there.
    pub fn insert_into_group(&mut self, name: &str, key: &OptionKey) -> Result<(), RegisterError> {
        self.options.add_to_group(&mut self.groups, name, key)
    }

    /// Declare `count` more positional arguments, named from `names` in order.
    pub fn register_positional<S: AsRef<str>>(&mut self, count: usize, names: &[S]) {
        self.positionals.register(count, names);
    }

    /// Load the process arguments.
    pub fn load_env(&mut self) -> Result<(), LoadError> {
        self.load_from(std::env::args())
    }

    /// Load a full argument vector whose first element is the executable path.
    pub fn load_from<I, S>(&mut self, argv: I) -> Result<(), LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut argv = argv.into_iter();
        if let Some(exe) = argv.next() {
            self.exec_name = display_name(exe.as_ref()).to_string();
        }
        self.load(argv)
    }

    /// Bind `args` to the declared options and positionals, then validate.
    ///
    /// An option token is any token starting with a dash; all leading dashes
    /// are stripped before the lookup. A non-Bool option takes the next
    /// non-option token as its value. Other tokens fill the positional slots
    /// in order, and once the first slot is filled no further option token is
    /// accepted. Validation is skipped when the help option is set.
    pub fn load<I, S>(&mut self, args: I) -> Result<(), LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pending: Option<usize> = None;
        let mut filled = 0usize;

        for arg in args {
            let arg = arg.as_ref();

            if arg.starts_with('-') {
                if filled > 0 {
                    return Err(LoadError::OptionAfterPositional(arg.to_string()));
                }
                let name = arg.trim_start_matches('-');
                let index = self
                    .options
                    .position(name)
                    .ok_or_else(|| LoadError::UnknownOption(arg.to_string()))?;
                if let Some((key, spec)) = self.options.entry_mut(index) {
                    spec.mark_set();
                    pending = spec.kind().takes_value().then_some(index);
                    tracing::debug!(token = arg, key = %key, kind = %spec.kind(), "option set");
                }
            } else if let Some(index) = pending.take() {
                if let Some((key, spec)) = self.options.entry_mut(index) {
                    spec.set_value(arg);
                    tracing::debug!(token = arg, key = %key, "option value bound");
                }
            } else if let Some(slot) = self.positionals.get_mut(filled) {
                slot.value = arg.to_string();
                filled += 1;
                tracing::debug!(token = arg, slot = %slot.name, "positional bound");
            } else {
                tracing::debug!(token = arg, "surplus positional ignored");
            }
        }

        if self.help_requested() {
            tracing::debug!("help requested, skipping validation");
            return Ok(());
        }

        self.validate(filled)
    }

    fn validate(&self, filled: usize) -> Result<(), LoadError> {
        let missing = MissingReport {
            options: self.missing_options(),
            groups: self
                .groups
                .missing_mandatory(|key| self.options.is_key_set(key))
                .into_iter()
                .map(|(name, group)| GroupReport {
                    name: name.to_string(),
                    members: group.members().cloned().collect(),
                })
                .collect(),
        };
        if !missing.is_empty() {
            return Err(LoadError::Missing(missing));
        }

        let conflicts: Vec<GroupReport> = self
            .groups
            .conflicts(|key| self.options.is_key_set(key))
            .into_iter()
            .map(|(name, set)| GroupReport {
                name: name.to_string(),
                members: set.into_iter().cloned().collect(),
            })
            .collect();
        if !conflicts.is_empty() {
            return Err(LoadError::Conflict(ConflictReport(conflicts)));
        }

        if filled < self.positionals.len() {
            return Err(LoadError::MissingPositionals {
                expected: self.positionals.len(),
                found: filled,
            });
        }

        Ok(())
    }

    /// Mandatory options outside any group that are not set, in registration
    /// order. Grouped options are covered by the group checks.
    fn missing_options(&self) -> Vec<OptionKey> {
        self.options
            .iter()
            .filter(|(key, spec)| {
                self.options.is_in_mandatory_set(key)
                    && !self.groups.is_key_in_any_group(key)
                    && !spec.is_set()
            })
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Whether the reserved help option is set.
    pub fn help_requested(&self) -> bool {
        self.options.is_key_set(&OptionKey::help())
    }

    /// Whether `key` has to be set, on its own or through its group.
    pub fn is_mandatory(&self, key: &OptionKey) -> bool {
        self.options.is_in_mandatory_set(key)
            || self
                .groups
                .group_of(key)
                .and_then(|name| self.groups.get(name))
                .is_some_and(|group| group.is_mandatory())
    }

    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.find(name)
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.has(name)
    }

    pub fn option_is_set(&self, name: &str) -> bool {
        self.options.is_set(name)
    }

    /// Program name taken from the executable path, without directories.
    pub fn exec_name(&self) -> &str {
        &self.exec_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The fixed usage text, if one was given.
    pub fn usage_override(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn options(&self) -> &OptionRegistry {
        &self.options
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn positionals(&self) -> &PositionalRegistry {
        &self.positionals
    }

    pub(crate) fn positional(&self, index: usize) -> Option<&PositionalSlot> {
        self.positionals.get(index)
    }
}

fn display_name(exe: &str) -> &str {
    Path::new(exe)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or(exe)
}
