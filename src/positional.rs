//! Positional argument slots.

use serde::Serialize;

/// One positional argument: its display name and loaded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionalSlot {
    pub name: String,
    pub value: String,
}

/// Positional slots in the order they are filled.
#[derive(Debug, Clone, Default)]
pub struct PositionalRegistry {
    slots: Vec<PositionalSlot>,
}

impl PositionalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` empty slots.
    ///
    /// Slot `i` of this call is named `names[i]` when given, `ARG_<i+1>`
    /// otherwise. Repeated calls extend the sequence.
    pub fn register<S: AsRef<str>>(&mut self, count: usize, names: &[S]) {
        self.slots.extend((0..count).map(|i| PositionalSlot {
            name: names
                .get(i)
                .map_or_else(|| format!("ARG_{}", i + 1), |n| n.as_ref().to_string()),
            value: String::new(),
        }));
    }

    pub fn get(&self, index: usize) -> Option<&PositionalSlot> {
        self.slots.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut PositionalSlot> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionalSlot> {
        self.slots.iter()
    }

    /// Number of declared slots, which is the number of positional
    /// arguments a load has to supply.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_named_slots() {
        let mut positionals = PositionalRegistry::new();
        positionals.register(2, &["INPUT", "OUTPUT"]);
        let names: Vec<_> = positionals.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["INPUT", "OUTPUT"]);
        assert!(positionals.iter().all(|p| p.value.is_empty()));
    }

    #[test]
    fn test_register_generates_placeholder_names() {
        let mut positionals = PositionalRegistry::new();
        positionals.register(3, &["FIRST"]);
        let names: Vec<_> = positionals.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["FIRST", "ARG_2", "ARG_3"]);
    }

    #[test]
    fn test_register_is_additive() {
        let mut positionals = PositionalRegistry::new();
        positionals.register::<&str>(1, &[]);
        positionals.register(1, &["SECOND"]);
        assert_eq!(positionals.len(), 2);
        assert_eq!(positionals.get(0).unwrap().name, "ARG_1");
        assert_eq!(positionals.get(1).unwrap().name, "SECOND");
        assert!(positionals.get(2).is_none());
    }

    #[test]
    fn test_extra_names_are_ignored() {
        let mut positionals = PositionalRegistry::new();
        positionals.register(1, &["ONE", "TWO"]);
        assert_eq!(positionals.len(), 1);
    }
}
