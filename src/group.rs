//! Mutually exclusive option groups.

use crate::key::OptionKey;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Errors that can occur while declaring groups or adding members to them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("duplicate group name: {0}")]
    DuplicateGroup(String),

    #[error("unknown group: {0}")]
    UnknownGroup(String),

    #[error("option {key} already belongs to group '{group}'")]
    AlreadyGrouped { key: OptionKey, group: String },
}

/// A named set of options of which at most one may be set.
///
/// The mandatory flag is a one-way ratchet: it can be promoted to `true`
/// but never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    members: BTreeSet<OptionKey>,
    mandatory: bool,
}

impl Group {
    fn new(mandatory: bool) -> Self {
        Self {
            members: BTreeSet::new(),
            mandatory,
        }
    }

    /// Whether at least one member has to be set after loading.
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Require at least one member to be set. There is no way back.
    pub fn promote(&mut self) {
        self.mandatory = true;
    }

    /// Member keys in key order.
    pub fn members(&self) -> impl Iterator<Item = &OptionKey> {
        self.members.iter()
    }

    pub fn contains(&self, key: &OptionKey) -> bool {
        self.members.contains(key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// All declared groups, iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<String, Group>,
    owners: HashMap<OptionKey, String>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new group.
    pub fn add_group(&mut self, name: &str, mandatory: bool) -> Result<(), GroupError> {
        if self.groups.contains_key(name) {
            return Err(GroupError::DuplicateGroup(name.to_string()));
        }
        self.groups.insert(name.to_string(), Group::new(mandatory));
        tracing::debug!(group = name, mandatory, "registered group");
        Ok(())
    }

    /// Add `key` to the group `name`.
    ///
    /// Inserting a key that is already a member of the same group is a no-op.
    /// A key cannot join a second group.
    pub fn insert(&mut self, name: &str, key: &OptionKey) -> Result<(), GroupError> {
        self.check_insert(name, key)?;
        if let Some(group) = self.groups.get_mut(name) {
            group.members.insert(key.clone());
            self.owners.insert(key.clone(), name.to_string());
        }
        Ok(())
    }

    /// Run the checks of [`GroupRegistry::insert`] without modifying anything.
    pub fn check_insert(&self, name: &str, key: &OptionKey) -> Result<(), GroupError> {
        if !self.groups.contains_key(name) {
            return Err(GroupError::UnknownGroup(name.to_string()));
        }
        match self.owners.get(key) {
            Some(owner) if owner != name => Err(GroupError::AlreadyGrouped {
                key: key.clone(),
                group: owner.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Promote the group `name` to mandatory.
    pub fn promote(&mut self, name: &str) -> Result<(), GroupError> {
        let group = self
            .groups
            .get_mut(name)
            .ok_or_else(|| GroupError::UnknownGroup(name.to_string()))?;
        if !group.mandatory {
            tracing::debug!(group = name, "group promoted to mandatory");
        }
        group.promote();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Name of the group `key` belongs to, if any.
    pub fn group_of(&self, key: &OptionKey) -> Option<&str> {
        self.owners.get(key).map(String::as_str)
    }

    pub fn is_key_in_any_group(&self, key: &OptionKey) -> bool {
        self.owners.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Group)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Mandatory groups in which no member is set.
    pub fn missing_mandatory<F>(&self, is_set: F) -> Vec<(&str, &Group)>
    where
        F: Fn(&OptionKey) -> bool,
    {
        self.iter()
            .filter(|(_, group)| group.mandatory && !group.members.iter().any(|k| is_set(k)))
            .collect()
    }

    /// Groups in which more than one member is set, with the set members.
    pub fn conflicts<F>(&self, is_set: F) -> Vec<(&str, Vec<&OptionKey>)>
    where
        F: Fn(&OptionKey) -> bool,
    {
        self.iter()
            .filter_map(|(name, group)| {
                let set: Vec<&OptionKey> = group.members.iter().filter(|&k| is_set(k)).collect();
                (set.len() > 1).then_some((name, set))
            })
            .collect()
    }
}
