//! Command-line interface.
//!
//! `req run <name> [flags]` runs `.req/<name>.http` or `.req/<name>.flow`.
//! Presentation flags are picked out of the trailing arguments; every other
//! `--key=value`, `--key value` or bare `--key` becomes a variable.

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::load_config;
use crate::executor::{ExecutionConfig, ReqwestTransport};
use crate::flow::{Orchestrator, Outcome, RunError};
use crate::output::{
    render_completion, render_exchange, render_not_found, render_notice, OutputOptions,
};
use crate::variables::VariableLayer;
use crate::workspace::{init, LookupError, Workspace};

#[derive(Debug, Parser)]
#[command(
    name = "req",
    about = "Fast API testing from plain .http files",
    disable_version_flag = true
)]
pub struct Cli {
    /// Print the version
    #[arg(short = 'v', long = "version")]
    version: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a request or flow from .req/
    Run(RunArgs),
    /// Initialize req in the current directory
    Init,
    /// Print the version
    #[command(alias = "v")]
    Version,
}

#[derive(Debug, Args, Clone)]
#[command(after_help = "Flags:\n  \
    --full             Same as --full-response --all-headers\n  \
    --full-response    Do not truncate the response body\n  \
    --all-headers      Show headers that are hidden by default\n  \
    --json             Print the response as one JSON line\n  \
    --<name>=<value>   Set a variable for this run")]
struct RunArgs {
    /// Name of the request or flow, without extension
    #[arg(value_name = "NAME")]
    name: String,

    #[arg(
        value_name = "FLAGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    flags: Vec<String>,
}

/// Output options and invocation variables split out of `req run` flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFlags {
    pub output: OutputOptions,
    pub variables: VariableLayer,
}

/// Splits trailing `req run` arguments into presentation options and
/// variables.
///
/// `--full` turns on both `--full-response` and `--all-headers`. Values of
/// `false`, `0` or `no` turn a presentation flag off. Arguments that do not
/// start with `--` are skipped.
pub fn split_flags(args: &[String]) -> RunFlags {
    let mut output = OutputOptions::default();
    let mut variables = VariableLayer::new();

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        let Some(flag) = arg.strip_prefix("--") else {
            log::warn!("Ignoring argument '{}'", arg);
            continue;
        };

        let (key, value) = match flag.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => {
                let value = match iter.peek() {
                    Some(next) if !next.starts_with("--") => {
                        iter.next().cloned().unwrap_or_default()
                    }
                    _ => "true".to_string(),
                };
                (flag.to_string(), value)
            }
        };

        if key.is_empty() {
            continue;
        }

        match key.as_str() {
            "full" => {
                let on = is_truthy(&value);
                output.full_response = on;
                output.all_headers = on;
            }
            "full-response" => output.full_response = is_truthy(&value),
            "all-headers" => output.all_headers = is_truthy(&value),
            "json" => output.json = is_truthy(&value),
            _ => variables.set(key, value),
        }
    }

    RunFlags { output, variables }
}

fn is_truthy(value: &str) -> bool {
    !matches!(value.to_ascii_lowercase().as_str(), "false" | "0" | "no")
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        if self.version {
            print_version();
            return Ok(ExitCode::SUCCESS);
        }

        let cwd = std::env::current_dir().context("Failed to read the current directory")?;

        match self.command {
            Some(Command::Run(args)) => run_target(&cwd, args).await,
            Some(Command::Init) => {
                println!("Initializing req in current directory...");
                init(&cwd)?;
                println!("Done. Edit .reqrc to configure req.");
                Ok(ExitCode::SUCCESS)
            }
            Some(Command::Version) => {
                print_version();
                Ok(ExitCode::SUCCESS)
            }
            None => {
                Cli::command().print_help()?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn print_version() {
    println!("req v{}", env!("CARGO_PKG_VERSION"));
}

async fn run_target(cwd: &Path, args: RunArgs) -> anyhow::Result<ExitCode> {
    let workspace = Workspace::open(cwd)?;
    let config = load_config(workspace.root())?;

    let RunFlags {
        mut output,
        variables,
    } = split_flags(&args.flags);
    output.color = std::io::stdout().is_terminal();
    let diagnostics = OutputOptions {
        color: std::io::stderr().is_terminal(),
        ..output.clone()
    };

    let transport = ReqwestTransport::new(&ExecutionConfig::from(&config.settings))?;
    let orchestrator = Orchestrator::new(&workspace, &transport)
        .with_config(config.variables)
        .with_invocation(variables);

    match orchestrator.run(&args.name).await {
        Ok(Outcome::Response(exchange)) => {
            for notice in &exchange.notices {
                eprint!("{}", render_notice(notice, &diagnostics));
            }
            print!("{}", render_exchange(&exchange, &output));
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::Completed { value, .. }) => {
            print!("{}", render_completion(&value, &output));
            Ok(ExitCode::SUCCESS)
        }
        Err(RunError::Lookup(LookupError::NotFound { name, suggestions })) => {
            eprint!(
                "{}",
                render_not_found(&name, &suggestions, &workspace.names(), &diagnostics)
            );
            Ok(ExitCode::FAILURE)
        }
        Err(e @ RunError::Transport { .. }) => {
            Err(anyhow::Error::new(e).context("Failed to send request!"))
        }
        Err(e @ RunError::FlowAborted { .. }) => Err(anyhow::Error::new(e).context("Flow error")),
        Err(e) => Err(e.into()),
    }
}
