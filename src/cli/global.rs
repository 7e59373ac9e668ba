// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! --dry             ← In-memory backend, nothing is executed
//! --log-level N     ← Console verbosity (0-6)
//! --file-log-level  ← File verbosity (defaults to --log-level)
//! --backend KIND    ← backend.kind override
//! --image TAG       ← container.image override
//! --source DIR      ← container.source override
//!
//! Precedence: CLI flags > CHECKRUN_* env > --config > checkrun.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::types::BackendKind;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Do not load `checkrun.toml` from the current directory.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,

    /// Runs the chain against the in-memory backend; no container is started
    /// and every check passes. Useful to inspect the resolved chain.
    #[arg(long)]
    pub dry: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Container backend (dagger, docker, memory).
    #[arg(short = 'b', long = "backend", value_name = "KIND")]
    pub backend: Option<BackendKind>,

    /// Base image for the check container.
    #[arg(long = "image", value_name = "IMAGE")]
    pub image: Option<String>,

    /// Host directory mounted into the container.
    #[arg(long = "source", value_name = "DIR")]
    pub source: Option<PathBuf>,
}

impl GlobalOptions {
    /// Converts command-line options to `(key, value)` configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();

        if let Some(kind) = self.backend {
            overrides.push(("backend.kind", kind.to_string()));
        }

        if let Some(ref image) = self.image {
            overrides.push(("container.image", image.clone()));
        }

        if let Some(ref source) = self.source {
            overrides.push(("container.source", source.display().to_string()));
        }

        overrides
    }
}
