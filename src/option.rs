//! Option declarations and the registry that stores them.

use crate::group::{GroupError, GroupRegistry};
use crate::key::OptionKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while registering an option.
///
/// A failed registration leaves the registries untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("option key must have a short or a long name")]
    EmptyKey,

    #[error("option name '{0}' must not start with a dash")]
    InvalidName(String),

    #[error("option {0} inherits its requirement from a group but names no group")]
    InheritWithoutGroup(OptionKey),

    #[error("duplicate option: {0}")]
    DuplicateKey(OptionKey),

    #[error("name '{name}' of option {key} is already used by {existing}")]
    NameTaken {
        name: String,
        key: OptionKey,
        existing: OptionKey,
    },

    #[error("unknown option: {0}")]
    UnknownKey(OptionKey),

    #[error(transparent)]
    Group(#[from] GroupError),
}

/// The kind of value an option carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Presence flag, takes no value (e.g. --verbose)
    Bool,
    /// Decimal integer
    Int,
    /// Base-16 integer, `0x` prefix optional
    Hex,
    /// Floating point number
    Float,
    /// Arbitrary text
    #[default]
    String,
}

impl OptionKind {
    /// Placeholder shown after the option name in usage text.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::Bool => None,
            Self::Int => Some("<INT>"),
            Self::Hex => Some("[0x]<HEX>"),
            Self::Float => Some("<FLOAT>"),
            Self::String => Some("<STRING>"),
        }
    }

    /// Value name used in help text.
    pub fn value_name(self) -> &'static str {
        match self {
            Self::Bool => "",
            Self::Int => "INT",
            Self::Hex => "HEX",
            Self::Float => "FLOAT",
            Self::String => "STRING",
        }
    }

    /// Whether the option consumes the following token as its value.
    pub fn takes_value(self) -> bool {
        self != Self::Bool
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Hex => "hex",
            Self::Float => "float",
            Self::String => "string",
        };
        f.write_str(name)
    }
}

/// How an option takes part in mandatory validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Never required on its own
    #[default]
    Optional,
    /// Always required; promotes its group to mandatory
    Required,
    /// Required exactly when its group is mandatory
    InheritGroup,
}

/// A declared option and its loaded state.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    value: String,
    kind: OptionKind,
    is_set: bool,
    default: Option<String>,
    description: String,
}

impl OptionSpec {
    fn new(kind: OptionKind, description: &str, default: Option<&str>) -> Self {
        Self {
            value: default.unwrap_or_default().to_string(),
            kind,
            is_set: default.is_some(),
            default: default.map(str::to_string),
            description: description.to_string(),
        }
    }

    /// Raw, unconverted value text.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Set on the command line, or carrying a default value.
    pub fn is_set(&self) -> bool {
        self.is_set
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The default text given at registration.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn mark_set(&mut self) {
        self.is_set = true;
    }

    pub(crate) fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }
}

/// Everything needed to register one option.
///
/// ```
/// use optreg::{OptionDecl, OptionKind};
///
/// let decl = OptionDecl::new(("o", "output"), OptionKind::String)
///     .required()
///     .description("Output file")
///     .default_value("out.txt");
/// assert_eq!(decl.key.long, "output");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecl {
    pub key: OptionKey,
    pub requirement: Requirement,
    pub kind: OptionKind,
    pub description: String,
    pub group: Option<String>,
    pub default: Option<String>,
}

impl OptionDecl {
    pub fn new(key: impl Into<OptionKey>, kind: OptionKind) -> Self {
        Self {
            key: key.into(),
            requirement: Requirement::Optional,
            kind,
            description: String::new(),
            group: None,
            default: None,
        }
    }

    pub fn requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }

    pub fn required(self) -> Self {
        self.requirement(Requirement::Required)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Put the option into the mutually exclusive group `group`.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Default text; the option counts as set before any load.
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Registered options in registration order, with a name index for lookups.
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    entries: Vec<(OptionKey, OptionSpec)>,
    names: HashMap<String, usize>,
    mandatory: BTreeSet<OptionKey>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an option, optionally as a member of the group `group`.
    ///
    /// An empty group name means no group. When the group is or becomes
    /// mandatory the option is added to the mandatory set whatever its own
    /// requirement is.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        &mut self,
        groups: &mut GroupRegistry,
        key: OptionKey,
        requirement: Requirement,
        kind: OptionKind,
        description: &str,
        group: Option<&str>,
        default: Option<&str>,
    ) -> Result<(), RegisterError> {
        let group = group.filter(|g| !g.is_empty());

        if let Err(err) = self.check(groups, &key, requirement, group) {
            tracing::debug!(key = %key, error = %err, "option rejected");
            return Err(err);
        }

        for name in key.names() {
            self.names.insert(name.to_string(), self.entries.len());
        }
        self.entries
            .push((key.clone(), OptionSpec::new(kind, description, default)));

        if requirement == Requirement::Required {
            self.mandatory.insert(key.clone());
        }

        if let Some(name) = group {
            self.add_to_group(groups, name, &key)?;
        }

        tracing::debug!(key = %key, %kind, ?requirement, ?group, "registered option");
        Ok(())
    }

    /// Put the registered option `key` into the group `name`.
    ///
    /// A required option promotes the group to mandatory, and a member of a
    /// mandatory group joins the mandatory set.
    pub fn add_to_group(
        &mut self,
        groups: &mut GroupRegistry,
        name: &str,
        key: &OptionKey,
    ) -> Result<(), RegisterError> {
        if self.get(key).is_none() {
            return Err(RegisterError::UnknownKey(key.clone()));
        }
        groups.insert(name, key)?;

        // Only required options are in the mandatory set before joining a group
        if self.mandatory.contains(key) {
            groups.promote(name)?;
        }
        if groups.get(name).is_some_and(|g| g.is_mandatory()) {
            self.mandatory.insert(key.clone());
        }
        Ok(())
    }

    fn check(
        &self,
        groups: &GroupRegistry,
        key: &OptionKey,
        requirement: Requirement,
        group: Option<&str>,
    ) -> Result<(), RegisterError> {
        if key.is_empty() {
            return Err(RegisterError::EmptyKey);
        }
        if let Some(name) = key.names().find(|n| n.starts_with('-')) {
            return Err(RegisterError::InvalidName(name.to_string()));
        }
        if requirement == Requirement::InheritGroup && group.is_none() {
            return Err(RegisterError::InheritWithoutGroup(key.clone()));
        }
        if self.get(key).is_some() {
            return Err(RegisterError::DuplicateKey(key.clone()));
        }
        for name in key.names() {
            if let Some(existing) = self.find_entry(name).map(|(k, _)| k) {
                return Err(RegisterError::NameTaken {
                    name: name.to_string(),
                    key: key.clone(),
                    existing: existing.clone(),
                });
            }
        }
        if let Some(name) = group {
            groups.check_insert(name, key)?;
        }
        Ok(())
    }

    fn find_entry(&self, name: &str) -> Option<&(OptionKey, OptionSpec)> {
        self.names.get(name).and_then(|&i| self.entries.get(i))
    }

    /// Look up an option by its short or long name.
    pub fn find(&self, name: &str) -> Option<&OptionSpec> {
        self.find_entry(name).map(|(_, spec)| spec)
    }

    /// Look up the key an option name belongs to.
    pub fn find_key(&self, name: &str) -> Option<&OptionKey> {
        self.find_entry(name).map(|(key, _)| key)
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.find(name).is_some_and(OptionSpec::is_set)
    }

    /// Look up an option by its full key.
    pub fn get(&self, key: &OptionKey) -> Option<&OptionSpec> {
        key.names()
            .next()
            .and_then(|name| self.find_entry(name))
            .filter(|(k, _)| k == key)
            .map(|(_, spec)| spec)
    }

    pub fn is_key_set(&self, key: &OptionKey) -> bool {
        self.get(key).is_some_and(OptionSpec::is_set)
    }

    /// Keys that were registered as mandatory, directly or through their group.
    pub fn mandatory(&self) -> impl Iterator<Item = &OptionKey> {
        self.mandatory.iter()
    }

    pub fn is_in_mandatory_set(&self, key: &OptionKey) -> bool {
        self.mandatory.contains(key)
    }

    /// Options in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&OptionKey, &OptionSpec)> {
        self.entries.iter().map(|(key, spec)| (key, spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<(&OptionKey, &mut OptionSpec)> {
        self.entries
            .get_mut(index)
            .map(|(key, spec)| (&*key, spec))
    }
}
