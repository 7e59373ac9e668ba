// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use std::path::PathBuf;

use checkrun::cli::{Cli, Command};
use checkrun::config::types::BackendKind;
use clap::Parser;

#[test]
fn cli_no_args_runs_checks() {
    let cli = Cli::try_parse_from(["checkrun"]).unwrap();
    assert!(cli.command.is_none());
    assert!(!cli.global.dry);
    assert!(cli.global.to_config_overrides().is_empty());
}

#[test]
fn cli_repeated_config_files_keep_order() {
    let cli = Cli::try_parse_from([
        "checkrun",
        "-c",
        "ci/base.toml",
        "--config",
        "ci/local.toml",
        "--no-default-config",
        "list",
    ])
    .unwrap();
    assert!(matches!(cli.command, Some(Command::List)));
    assert!(cli.global.no_default_config);
    assert_eq!(
        cli.global.configs,
        [PathBuf::from("ci/base.toml"), PathBuf::from("ci/local.toml")]
    );
}

#[test]
fn cli_container_overrides() {
    let cli = Cli::try_parse_from([
        "checkrun",
        "--backend",
        "dagger",
        "--image",
        "rust:1.85-slim",
        "--source",
        "crates/app",
        "run",
    ])
    .unwrap();
    assert_eq!(cli.global.backend, Some(BackendKind::Dagger));
    assert_eq!(
        cli.global.to_config_overrides(),
        [
            ("backend.kind", "dagger".to_string()),
            ("container.image", "rust:1.85-slim".to_string()),
            ("container.source", "crates/app".to_string()),
        ]
    );
}

#[test]
fn cli_logging_options() {
    let cli = Cli::try_parse_from([
        "checkrun",
        "-l",
        "4",
        "--file-log-level",
        "5",
        "--log-file",
        "target/checkrun.log",
    ])
    .unwrap();
    assert_eq!(cli.global.log_level, Some(4));
    assert_eq!(cli.global.file_log_level, Some(5));
    assert_eq!(
        cli.global.log_file,
        Some(PathBuf::from("target/checkrun.log"))
    );
}

#[test]
fn cli_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["checkrun", "deploy"]).is_err());
}
