//! Typed and untyped access to loaded values.

use crate::option::{OptionKind, OptionSpec};
use crate::parser::ArgumentParser;
use thiserror::Error;

/// Errors that can occur while reading values back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("cannot convert value '{text}' of {name} to {target}")]
    Conversion {
        name: String,
        text: String,
        target: &'static str,
    },

    #[error("positional argument index {index} out of range (count: {count})")]
    OutOfRange { index: usize, count: usize },
}

mod sealed {
    pub trait Sealed {}
}

/// Types a stored value can be read as.
///
/// The set is closed: `bool`, `i32`, `i64`, `u32`, `u64`, `f32`, `f64` and
/// `String`. Parsing is strict, surrounding whitespace or trailing garbage
/// fails the conversion.
pub trait FromArg: Sized + Default + sealed::Sealed {
    /// Type name used in conversion errors.
    const TYPE: &'static str;

    /// Convert the presence flag of a Bool option.
    fn from_flag(set: bool) -> Self;

    /// Parse the text of a Hex option.
    fn from_hex(text: &str) -> Option<Self>;

    /// Parse any other text.
    fn from_text(text: &str) -> Option<Self>;
}

/// Parse base-16 text with an optional `0x` prefix.
fn parse_hex(text: &str) -> Option<i128> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.starts_with(['+', '-']) {
        return None;
    }
    i128::from_str_radix(digits, 16).ok()
}

macro_rules! impl_from_arg_int {
    ($($ty:ty),*) => {$(
        impl sealed::Sealed for $ty {}

        impl FromArg for $ty {
            const TYPE: &'static str = stringify!($ty);

            fn from_flag(set: bool) -> Self {
                Self::from(set)
            }

            fn from_hex(text: &str) -> Option<Self> {
                parse_hex(text).and_then(|v| Self::try_from(v).ok())
            }

            fn from_text(text: &str) -> Option<Self> {
                text.parse().ok()
            }
        }
    )*};
}

macro_rules! impl_from_arg_float {
    ($($ty:ty),*) => {$(
        impl sealed::Sealed for $ty {}

        impl FromArg for $ty {
            const TYPE: &'static str = stringify!($ty);

            fn from_flag(set: bool) -> Self {
                Self::from(u8::from(set))
            }

            fn from_hex(text: &str) -> Option<Self> {
                parse_hex(text).map(|v| v as $ty)
            }

            fn from_text(text: &str) -> Option<Self> {
                text.parse().ok()
            }
        }
    )*};
}

impl_from_arg_int!(i32, i64, u32, u64);
impl_from_arg_float!(f32, f64);

impl sealed::Sealed for bool {}

impl FromArg for bool {
    const TYPE: &'static str = "bool";

    fn from_flag(set: bool) -> Self {
        set
    }

    fn from_hex(text: &str) -> Option<Self> {
        parse_hex(text).map(|v| v != 0)
    }

    fn from_text(text: &str) -> Option<Self> {
        text.parse()
            .ok()
            .or_else(|| text.parse::<i64>().ok().map(|v| v != 0))
    }
}

impl sealed::Sealed for String {}

impl FromArg for String {
    const TYPE: &'static str = "String";

    fn from_flag(set: bool) -> Self {
        set.to_string()
    }

    fn from_hex(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn from_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

impl ArgumentParser {
    /// Raw text of the option matched by `name`, empty if there is none.
    pub fn raw(&self, name: &str) -> &str {
        self.find_option(name).map_or("", OptionSpec::value)
    }

    /// Raw text of the positional argument at `index`.
    pub fn raw_positional(&self, index: usize) -> Result<&str, ValueError> {
        self.positional(index)
            .map(|slot| slot.value.as_str())
            .ok_or(ValueError::OutOfRange {
                index,
                count: self.positionals().len(),
            })
    }

    /// Value of the option matched by `name`, converted per its kind.
    ///
    /// A Bool option yields its presence flag. An option that is not set
    /// yields `T::default()`.
    ///
    /// ```
    /// use optreg::{ArgumentParser, OptionKind, Requirement};
    ///
    /// let mut parser = ArgumentParser::default();
    /// parser
    ///     .register_option(("x", "hex"), Requirement::Optional, OptionKind::Hex, "")
    ///     .unwrap();
    /// parser.load(["--hex", "ff"]).unwrap();
    /// assert_eq!(parser.get::<i64>("hex").unwrap(), 255);
    /// ```
    pub fn get<T: FromArg>(&self, name: &str) -> Result<T, ValueError> {
        let spec = self
            .find_option(name)
            .ok_or_else(|| ValueError::UnknownOption(name.to_string()))?;

        if spec.kind() == OptionKind::Bool {
            return Ok(T::from_flag(spec.is_set()));
        }
        if !spec.is_set() {
            return Ok(T::default());
        }

        let text = spec.value();
        let value = match spec.kind() {
            OptionKind::Hex => T::from_hex(text),
            _ => T::from_text(text),
        };
        value.ok_or_else(|| ValueError::Conversion {
            name: name.to_string(),
            text: text.to_string(),
            target: T::TYPE,
        })
    }

    /// Value of the positional argument at `index`, converted to `T`.
    pub fn get_positional<T: FromArg>(&self, index: usize) -> Result<T, ValueError> {
        let slot = self.positional(index).ok_or(ValueError::OutOfRange {
            index,
            count: self.positionals().len(),
        })?;
        T::from_text(&slot.value).ok_or_else(|| ValueError::Conversion {
            name: slot.name.clone(),
            text: slot.value.clone(),
            target: T::TYPE,
        })
    }
}
