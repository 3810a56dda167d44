//! req command-line entry point.
//!
//! Logs go to stderr through env_logger (default filter `warn`, override
//! with `RUST_LOG`); stdout only carries response output.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use req::cli::Cli;
use req::output::{render_error, OutputOptions};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    match Cli::parse().run().await {
        Ok(code) => code,
        Err(e) => {
            let options = OutputOptions {
                color: std::io::stderr().is_terminal(),
                ..OutputOptions::default()
            };
            eprint!("{}", render_error(&format!("{:#}", e), &options));
            ExitCode::FAILURE
        }
    }
}
