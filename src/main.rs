//! optreg - load command-line arguments against a JSON declaration.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use optreg::{generate_help, generate_output_string, generate_usage, Config};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Declarative option parsing for scripts and tests.
#[derive(Parser, Debug)]
#[command(name = "optreg", version, about, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the declaration comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ConfigSource {
    /// JSON declaration of the target program
    #[arg(long)]
    config: Option<String>,

    /// Path to a JSON declaration file
    #[arg(long, env = "OPTREG_CONFIG_FILE")]
    config_file: Option<PathBuf>,
}

impl ConfigSource {
    fn load(&self) -> Result<Config> {
        if let Some(ref json) = self.config {
            return Config::from_json(json).context("failed to parse config JSON");
        }
        let path = self
            .config_file
            .as_deref()
            .context("either --config or --config-file is required")?;
        Config::from_file(path)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load arguments and print the resulting values as JSON
    Parse {
        #[command(flatten)]
        source: ConfigSource,

        /// Program name shown in usage text (overrides config)
        #[arg(long)]
        name: Option<String>,

        /// Arguments to load for the target program
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print help text for the target program
    Help {
        #[command(flatten)]
        source: ConfigSource,
    },

    /// Print the usage line of the target program
    Usage {
        #[command(flatten)]
        source: ConfigSource,
    },
}

/// Run a command and return what goes to stdout. Usage text for a failed
/// load is written to `stderr` before the error is returned.
fn execute(command: Commands, stderr: &mut dyn Write) -> Result<String> {
    match command {
        Commands::Parse { source, name, args } => {
            let cfg = source.load()?;
            let mut parser = cfg.build().context("invalid config")?;

            // Command line name wins over the config name
            if let Some(name) = name {
                parser = parser.with_exec_name(name);
            }

            // Load the target arguments, usage goes to stderr on failure
            if let Err(err) = parser.load(&args) {
                tracing::debug!(error = %err, "load failed");
                write!(stderr, "{}", generate_usage(&parser))?;
                return Err(err).context("failed to parse arguments");
            }

            if parser.help_requested() {
                Ok(generate_help(&parser))
            } else {
                generate_output_string(&parser).context("failed to render output")
            }
        }
        Commands::Help { source } => {
            let parser = source.load()?.build().context("invalid config")?;
            Ok(generate_help(&parser))
        }
        Commands::Usage { source } => {
            let parser = source.load()?.build().context("invalid config")?;
            Ok(generate_usage(&parser))
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let cli = Cli::parse();
    let output = execute(cli.command, &mut std::io::stderr())?;
    print!("{}", output);

    Ok(())
}
