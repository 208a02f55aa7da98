//! Option identity.

use serde::Serialize;
use std::fmt;

/// Short name of the automatically registered help option.
pub const HELP_SHORT: &str = "h";
/// Long name of the automatically registered help option.
pub const HELP_LONG: &str = "help";

/// Identity of an option: a short and a long name, either of which may be empty.
///
/// Ordering is lexicographic on `(short, long)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OptionKey {
    /// Short name without the dash (e.g. `v` for `-v`)
    pub short: String,
    /// Long name without the dashes (e.g. `verbose` for `--verbose`)
    pub long: String,
}

impl OptionKey {
    /// Create a key from a short and a long name.
    pub fn new(short: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            long: long.into(),
        }
    }

    /// The reserved key of the help option.
    pub fn help() -> Self {
        Self::new(HELP_SHORT, HELP_LONG)
    }

    /// A key is empty when both names are empty.
    pub fn is_empty(&self) -> bool {
        self.short.is_empty() && self.long.is_empty()
    }

    /// Whether `name` matches the short or the long name exactly.
    pub fn matches(&self, name: &str) -> bool {
        !name.is_empty() && (self.short == name || self.long == name)
    }

    /// The non-empty names of this key.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [self.short.as_str(), self.long.as_str()]
            .into_iter()
            .filter(|n| !n.is_empty())
    }

    /// Whether this is the reserved help key.
    pub fn is_help(&self) -> bool {
        self.short == HELP_SHORT && self.long == HELP_LONG
    }

    /// Command-line label, e.g. `-v, --verbose`.
    pub fn label(&self, separator: &str) -> String {
        match (self.short.is_empty(), self.long.is_empty()) {
            (false, false) => format!("-{}{}--{}", self.short, separator, self.long),
            (false, true) => format!("-{}", self.short),
            (true, false) => format!("--{}", self.long),
            (true, true) => String::new(),
        }
    }
}

/// Renders as `-s/--long`, with `-` standing in for a missing name.
impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.short.is_empty() {
            f.write_str("-")?;
        } else {
            write!(f, "-{}", self.short)?;
        }
        f.write_str("/")?;
        if self.long.is_empty() {
            f.write_str("-")
        } else {
            write!(f, "--{}", self.long)
        }
    }
}

impl<S: Into<String>, L: Into<String>> From<(S, L)> for OptionKey {
    fn from((short, long): (S, L)) -> Self {
        Self::new(short, long)
    }
}
