//! cmdline - parse arguments against a JSON option table.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cmdline::{ArgValue, CmdOption, Config, ParseOutcome, ParserContext};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Parse arguments against a declarative option table.
#[derive(Parser, Debug)]
#[command(name = "cmdline", version, about, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the option table comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct TableSource {
    /// JSON option table
    #[arg(long)]
    config: Option<String>,

    /// Path to a JSON option table
    #[arg(long)]
    config_file: Option<PathBuf>,
}

impl TableSource {
    fn load(&self) -> Result<Config> {
        match (&self.config, &self.config_file) {
            (Some(json), _) => Config::from_json(json).context("failed to parse config JSON"),
            (None, Some(path)) => Config::from_file(path).context("failed to load config file"),
            (None, None) => anyhow::bail!("no option table given"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse arguments and print the per-option results as JSON
    Parse {
        #[command(flatten)]
        source: TableSource,

        /// Arguments to parse
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print help text for the option table
    Help {
        #[command(flatten)]
        source: TableSource,
    },
}

/// Parse result for one option.
#[derive(Debug, Serialize)]
struct OptionReport {
    name: String,
    present: bool,
    args: Option<Vec<ArgValue>>,
}

impl From<&CmdOption> for OptionReport {
    fn from(option: &CmdOption) -> Self {
        Self {
            name: option.display_name(),
            present: option.is_present(),
            args: option.args().map(|a| a.to_vec()),
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { source, args } => {
            let cfg = source.load()?;
            let mut options = cfg.build_options();
            let mut ctx = ParserContext::register(&mut options)
                .context("invalid option table")?
                .with_empty_input_policy(cfg.empty_input);
            if let Some(program) = cfg.program_info() {
                ctx = ctx.with_program(program);
            }

            let outcome = ctx.parse(&args).context("failed to parse arguments")?;
            if outcome == ParseOutcome::Completed {
                let report: Vec<OptionReport> = ctx.options().iter().map(Into::into).collect();
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            ctx.teardown();
        }
        Commands::Help { source } => {
            let cfg = source.load()?;
            let mut options = cfg.build_options();
            let mut ctx = ParserContext::register(&mut options).context("invalid option table")?;
            if let Some(program) = cfg.program_info() {
                ctx = ctx.with_program(program);
            }
            ctx.print_help().context("failed to write help")?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
