//! optreg - declarative command-line option registry.
//!
//! This library lets a program declare named options (short/long), positional
//! arguments and mutually exclusive groups, then loads `argv` into that
//! declaration, enforcing mandatory options, mandatory groups and conflicts.
//! Values are read back raw or converted to a closed set of types.
//!
//! ```
//! use optreg::{ArgumentParser, OptionDecl, OptionKind};
//!
//! let mut parser = ArgumentParser::new("Copy with a block size");
//! parser.add_group("mode", true).unwrap();
//! parser
//!     .register(OptionDecl::new(("b", "block"), OptionKind::Int).default_value("512"))
//!     .unwrap();
//! parser
//!     .register(OptionDecl::new(("f", "fast"), OptionKind::Bool).group("mode"))
//!     .unwrap();
//! parser
//!     .register(OptionDecl::new(("s", "safe"), OptionKind::Bool).group("mode"))
//!     .unwrap();
//! parser.register_positional(2, &["SOURCE", "DEST"]);
//!
//! parser
//!     .load_from(["/usr/bin/copy", "--block", "4096", "-f", "a.img", "b.img"])
//!     .unwrap();
//!
//! assert_eq!(parser.exec_name(), "copy");
//! assert_eq!(parser.get::<u32>("b").unwrap(), 4096);
//! assert!(parser.option_is_set("fast"));
//! assert_eq!(parser.raw_positional(1).unwrap(), "b.img");
//! ```

pub mod config;
pub mod group;
pub mod help;
pub mod key;
pub mod option;
pub mod output;
pub mod parser;
pub mod positional;
pub mod value;

pub use config::{Config, ConfigError};
pub use group::{Group, GroupError, GroupRegistry};
pub use help::{generate_help, generate_usage};
pub use key::OptionKey;
pub use option::{OptionDecl, OptionKind, OptionRegistry, OptionSpec, RegisterError, Requirement};
pub use output::{generate_output_string, Snapshot};
pub use parser::{ArgumentParser, ConflictReport, GroupReport, LoadError, MissingReport};
pub use positional::{PositionalRegistry, PositionalSlot};
pub use value::{FromArg, ValueError};
