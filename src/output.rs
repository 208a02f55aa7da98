//! JSON snapshot of loaded option and positional values.

use crate::key::OptionKey;
use crate::option::OptionKind;
use crate::parser::ArgumentParser;
use crate::positional::PositionalSlot;
use serde::Serialize;

/// State of one option after loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionState<'a> {
    pub key: &'a OptionKey,
    pub kind: OptionKind,
    pub set: bool,
    pub value: &'a str,
}

/// Everything a load produced, borrowed from the parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<'a> {
    pub program: &'a str,
    pub help: bool,
    pub options: Vec<OptionState<'a>>,
    pub positionals: Vec<&'a PositionalSlot>,
}

impl<'a> Snapshot<'a> {
    /// Capture the state of `parser`, options in registration order.
    pub fn new(parser: &'a ArgumentParser) -> Self {
        Self {
            program: parser.exec_name(),
            help: parser.help_requested(),
            options: parser
                .options()
                .iter()
                .map(|(key, spec)| OptionState {
                    key,
                    kind: spec.kind(),
                    set: spec.is_set(),
                    value: spec.value(),
                })
                .collect(),
            positionals: parser.positionals().iter().collect(),
        }
    }
}

/// Render the loaded state as pretty-printed JSON.
pub fn generate_output_string(parser: &ArgumentParser) -> Result<String, serde_json::Error> {
    let mut output = serde_json::to_string_pretty(&Snapshot::new(parser))?;
    output.push('\n');
    Ok(output)
}
