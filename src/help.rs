//! Usage and help text generation using Clap.
//!
//! Both renderers only read the registries of an [`ArgumentParser`]. The
//! usage line is always the synopsis built here; Clap lays out the option
//! listing, so requirement flags are not forwarded to it.

use crate::key::OptionKey;
use crate::option::OptionSpec;
use crate::parser::ArgumentParser;
use clap::{Arg, ArgAction, ArgGroup, Command};

/// Program name used when none has been loaded or set.
const FALLBACK_NAME: &str = "program";

fn program_name(parser: &ArgumentParser) -> &str {
    match parser.exec_name() {
        "" => FALLBACK_NAME,
        name => name,
    }
}

/// Build the usage synopsis (everything after `Usage: `).
///
/// Mandatory options come first, bare, followed by the optional ones in
/// brackets and the positional names. The help option is left out.
fn synopsis(parser: &ArgumentParser) -> String {
    let mut parts = vec![program_name(parser).to_string()];

    // A fixed usage text replaces the generated one
    if let Some(usage) = parser.usage_override() {
        parts.push(usage.to_string());
        return parts.join(" ");
    }

    let mut required = Vec::new();
    let mut optional = Vec::new();

    for (key, spec) in parser.options().iter() {
        if key.is_help() {
            continue;
        }

        let mut arg = key.label(" | ");
        if let Some(placeholder) = spec.kind().placeholder() {
            arg.push(' ');
            arg.push_str(placeholder);
        }

        if parser.is_mandatory(key) {
            required.push(arg);
        } else {
            optional.push(format!("[ {} ]", arg));
        }
    }

    parts.extend(required);
    parts.extend(optional);
    parts.extend(parser.positionals().iter().map(|p| p.name.clone()));
    parts.join(" ")
}

/// Clap argument id of an option.
fn arg_id(key: &OptionKey) -> String {
    key.to_string()
}

/// Build a Clap Arg from a registered option.
fn build_arg(key: &OptionKey, spec: &OptionSpec) -> Arg {
    let mut arg = Arg::new(arg_id(key));

    // Loading strips every leading dash, so a multi-character short name
    // works as `--name` too.
    let mut short_chars = key.short.chars();
    match (short_chars.next(), short_chars.next()) {
        (Some(c), None) => arg = arg.short(c),
        (Some(_), Some(_)) if key.long.is_empty() => arg = arg.long(key.short.clone()),
        (Some(_), Some(_)) => arg = arg.visible_alias(key.short.clone()),
        (None, _) => {}
    }
    if !key.long.is_empty() {
        arg = arg.long(key.long.clone());
    }

    let mut help = spec.description().to_string();

    // Value options show their kind and default, flags only note the default
    if spec.kind().takes_value() {
        arg = arg
            .action(ArgAction::Set)
            .value_name(spec.kind().value_name());
        if let Some(default) = spec.default_value() {
            arg = arg.default_value(default.to_string());
        }
    } else {
        arg = arg.action(ArgAction::SetTrue);
        if spec.has_default() {
            help.push_str(" (set by default)");
        }
    }

    if !help.is_empty() {
        arg = arg.help(help);
    }

    arg
}

/// Build a Clap Command from the registries (for help generation).
fn build_command(parser: &ArgumentParser) -> Command {
    let mut cmd = Command::new(program_name(parser).to_string())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .override_usage(synopsis(parser));

    // Set description if provided
    if !parser.description().is_empty() {
        cmd = cmd.about(parser.description().to_string());
    }

    // Add options in registration order
    for (key, spec) in parser.options().iter() {
        cmd = cmd.arg(build_arg(key, spec));
    }

    // Add mutually exclusive groups
    for (name, group) in parser.groups().iter() {
        if group.is_empty() {
            continue;
        }
        cmd = cmd.group(
            ArgGroup::new(name.to_string())
                .args(group.members().map(arg_id))
                .multiple(false),
        );
    }

    // Add positional arguments
    for (index, slot) in parser.positionals().iter().enumerate() {
        cmd = cmd.arg(
            Arg::new(format!("#{}", index + 1))
                .value_name(slot.name.clone())
                .index(index + 1)
                .action(ArgAction::Set)
                .required(true),
        );
    }

    cmd
}

/// Generate the one-line usage text, e.g. `Usage: prog -i | --int <INT> [ -v ] FILE`.
pub fn generate_usage(parser: &ArgumentParser) -> String {
    format!("Usage: {}\n", synopsis(parser))
}

/// Generate the full help text: description, usage line and one entry per
/// option and positional argument.
pub fn generate_help(parser: &ArgumentParser) -> String {
    let mut cmd = build_command(parser);
    cmd.render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{OptionDecl, OptionKind, Requirement};

    fn sample_parser() -> ArgumentParser {
        let mut parser = ArgumentParser::new("My awesome program").with_exec_name("myprog");
        parser.add_group("mode", false).unwrap();
        parser
            .register(
                OptionDecl::new(("i", "int"), OptionKind::Int)
                    .required()
                    .description("An integer"),
            )
            .unwrap();
        parser
            .register(
                OptionDecl::new(("v", "verbose"), OptionKind::Bool)
                    .description("Enable verbose output"),
            )
            .unwrap();
        parser
            .register(
                OptionDecl::new(("", "hex"), OptionKind::Hex)
                    .description("A hex mask\nspanning two lines")
                    .default_value("ff"),
            )
            .unwrap();
        parser
            .register(OptionDecl::new(("x", ""), OptionKind::Bool).group("mode"))
            .unwrap();
        parser
            .register(OptionDecl::new(("y", ""), OptionKind::Float).group("mode"))
            .unwrap();
        parser.register_positional(2, &["SOURCE", "DEST"]);
        parser
    }

    #[test]
    fn test_generate_usage() {
        let usage = generate_usage(&sample_parser());
        assert_eq!(
            usage,
            "Usage: myprog -i | --int <INT> [ -v | --verbose ] [ --hex [0x]<HEX> ] \
             [ -x ] [ -y <FLOAT> ] SOURCE DEST\n"
        );
    }

    #[test]
    fn test_generate_usage_mandatory_group_members_are_bare() {
        let mut parser = ArgumentParser::default().with_exec_name("prog");
        parser.add_group("mode", true).unwrap();
        parser
            .register(
                OptionDecl::new(("a", ""), OptionKind::Bool)
                    .requirement(Requirement::InheritGroup)
                    .group("mode"),
            )
            .unwrap();
        parser
            .register_option(("b", ""), Requirement::Optional, OptionKind::String, "")
            .unwrap();
        assert_eq!(generate_usage(&parser), "Usage: prog -a [ -b <STRING> ]\n");
    }

    #[test]
    fn test_generate_usage_override() {
        let parser = ArgumentParser::new("")
            .with_usage("[options] FILE...")
            .with_exec_name("tool");
        assert_eq!(generate_usage(&parser), "Usage: tool [options] FILE...\n");
    }

    #[test]
    fn test_generate_usage_without_exec_name() {
        let parser = ArgumentParser::default();
        assert_eq!(generate_usage(&parser), "Usage: program\n");
    }

    #[test]
    fn test_generate_help_contents() {
        let help = generate_help(&sample_parser());

        assert!(help.contains("My awesome program"), "{}", help);
        assert!(help.contains("Usage: myprog -i | --int <INT>"), "{}", help);
        assert!(help.contains("--int"), "{}", help);
        assert!(help.contains("An integer"), "{}", help);
        assert!(help.contains("--verbose"), "{}", help);
        assert!(help.contains("--help"), "{}", help);
        assert!(help.contains("Show help text and exit"), "{}", help);
        assert!(help.contains("spanning two lines"), "{}", help);
        assert!(help.contains("ff"), "{}", help);
        assert!(help.contains("SOURCE"), "{}", help);
        assert!(help.contains("DEST"), "{}", help);
    }

    #[test]
    fn test_generate_help_minimal() {
        let help = generate_help(&ArgumentParser::default());
        assert!(help.contains("Usage: program"), "{}", help);
        assert!(help.contains("-h, --help"), "{}", help);
    }

    #[test]
    fn test_generate_help_multi_char_short_name() {
        let mut parser = ArgumentParser::default();
        parser
            .register_option(("ab", ""), Requirement::Optional, OptionKind::Bool, "Two letters")
            .unwrap();
        parser
            .register_option(("cd", "cdrom"), Requirement::Optional, OptionKind::String, "")
            .unwrap();
        let help = generate_help(&parser);
        assert!(help.contains("--ab"), "{}", help);
        assert!(help.contains("--cdrom"), "{}", help);
    }

    #[test]
    fn test_generate_help_with_mandatory_defaulted_group() {
        let mut parser = ArgumentParser::default();
        parser.add_group("mode", true).unwrap();
        parser
            .register(
                OptionDecl::new(("", "level"), OptionKind::Int)
                    .group("mode")
                    .default_value("1"),
            )
            .unwrap();
        let help = generate_help(&parser);
        assert!(help.contains("--level"), "{}", help);
    }

    #[test]
    fn test_generate_help_after_rejected_dash_names() {
        let mut parser = ArgumentParser::default();
        assert!(parser
            .register_option(("-", ""), Requirement::Optional, OptionKind::Bool, "")
            .is_err());
        assert!(parser
            .register_option(("", "-verbose"), Requirement::Optional, OptionKind::Bool, "")
            .is_err());
        let help = generate_help(&parser);
        assert!(help.contains("-h, --help"), "{}", help);
    }
}
