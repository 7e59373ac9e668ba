// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::try_parse() --> Logging --> Config --> Command Dispatch
//!   Run (default) | List | Options | Inis | Version
//! ```

use std::process::ExitCode;

use checkrun::cli::global::GlobalOptions;
use checkrun::cli::{self, Command};
use checkrun::cmd::config::{run_inis_command, run_options_command};
use checkrun::cmd::list::run_list_command;
use checkrun::cmd::run::run_checks_command;
use checkrun::config::Config;
use checkrun::config::loader::ConfigLoader;
use checkrun::logging::init_logging;
use checkrun::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Config file picked up from the working directory.
const DEFAULT_CONFIG_FILE: &str = "checkrun.toml";

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "CHECKRUN";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(cli::parse_exit_code(&e));
        }
    };

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Inis) => build_config_loader(&cli.global).map(|loader| {
            run_inis_command(&loader.format_loaded_files());
            ExitCode::SUCCESS
        }),
        Some(Command::List) => load_config(&cli.global).map(|config| {
            run_list_command(&config);
            ExitCode::SUCCESS
        }),
        Some(Command::Options(args)) => load_config(&cli.global)
            .and_then(|config| run_options_command(args, &config))
            .map(|()| ExitCode::SUCCESS),
        Some(Command::Run) | None => match load_config(&cli.global) {
            Ok(config) => run_checks_command(&config, cli.global.dry).await,
            Err(e) => Err(e),
        },
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        ExitCode::FAILURE
    })
}

fn build_config_loader(global: &GlobalOptions) -> checkrun::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(key, value)?;
    }
    Ok(loader)
}

fn load_config(global: &GlobalOptions) -> checkrun::error::Result<Config> {
    build_config_loader(global)?.build()
}
