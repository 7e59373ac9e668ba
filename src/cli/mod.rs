// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for checkrun using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! checkrun [global options] [command]
//! run       (default)
//! list
//! options [--json]
//! inis
//! version
//! ```

pub mod global;


use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand};

/// Containerized Rust CI checks.
#[derive(Debug, Parser)]
#[command(
    name = "checkrun",
    author,
    version,
    about = "Runs cargo fmt, clippy and test in a Rust container",
    long_about = "Runs cargo fmt --check, cargo clippy (warnings as errors) and\n\
                  cargo test inside a rust:latest container with the current\n\
                  directory mounted at /src. Stops at the first failing check\n\
                  and exits 1; exits 0 when every check passes.",
    after_help = "CONFIG FILES:\n\n\
                  checkrun loads `checkrun.toml` from the current directory if it\n\
                  exists, then every --config file in order, then CHECKRUN_*\n\
                  environment variables (CHECKRUN_CONTAINER__IMAGE=rust:1.85).\n\
                  Use --no-default-config to skip `checkrun.toml`."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs the check chain.
    Run,

    /// Lists the checks in the order they run.
    List,

    /// Lists all options and their resolved values.
    Options(OptionsArgs),

    /// Lists the configuration files that were loaded.
    Inis,

    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,
}

/// Arguments for the `options` command.
#[derive(Debug, Clone, Default, Args)]
pub struct OptionsArgs {
    /// Print the resolved configuration as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

/// Process exit code for a parse outcome: 0 for help and version, 1 for usage errors.
#[must_use]
pub fn parse_exit_code(err: &clap::Error) -> u8 {
    u8::from(err.use_stderr())
}
