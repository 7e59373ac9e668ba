// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for checkrun.
//!
//! ```text
//! Config
//!   backend    BackendConfig   { kind: dagger | docker | memory }
//!   container  ContainerConfig { image, source, mount_path, workdir }
//!   checks     [CheckConfig]   { name, label, failure, command }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Base image used when none is configured. The tag floats on purpose.
pub const DEFAULT_IMAGE: &str = "rust:latest";

/// In-container path the project is mounted at.
pub const DEFAULT_MOUNT_PATH: &str = "/src";

/// Container backend implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Dagger engine via `dagger-sdk`.
    #[default]
    Dagger,
    /// Local `docker` CLI.
    Docker,
    /// In-memory backend, every command succeeds.
    Memory,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dagger => "dagger",
            Self::Docker => "docker",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dagger" => Ok(Self::Dagger),
            "docker" => Ok(Self::Docker),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue {
                section: "backend".to_string(),
                key: "kind".to_string(),
                message: format!("expected 'dagger', 'docker', or 'memory', got '{s}'"),
            }),
        }
    }
}

/// Backend selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    pub kind: BackendKind,
}

/// Container the checks run in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Base image reference.
    pub image: String,
    /// Host directory mounted into the container.
    pub source: PathBuf,
    /// Absolute in-container mount point.
    pub mount_path: String,
    /// Working directory for every command; defaults to `mount_path`.
    pub workdir: Option<String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            source: PathBuf::from("."),
            mount_path: DEFAULT_MOUNT_PATH.to_string(),
            workdir: None,
        }
    }
}

impl ContainerConfig {
    /// Working directory, falling back to the mount path.
    #[must_use]
    pub fn effective_workdir(&self) -> &str {
        self.workdir.as_deref().unwrap_or(&self.mount_path)
    }
}

/// One entry of the check chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    /// Short identifier (`fmt`, `clippy`, `test`).
    pub name: String,
    /// Announced as `Running <label>...`.
    pub label: String,
    /// Prefix of the failure line.
    pub failure: String,
    /// Command argv run in the container.
    pub command: Vec<String>,
}

impl CheckConfig {
    fn new(name: &str, label: &str, failure: &str, command: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            failure: failure.to_string(),
            command: command.iter().map(ToString::to_string).collect(),
        }
    }
}

/// The fmt, clippy, test chain.
#[must_use]
pub fn default_checks() -> Vec<CheckConfig> {
    vec![
        CheckConfig::new(
            "fmt",
            "cargo fmt",
            "Formatting check failed",
            &["cargo", "fmt", "--check"],
        ),
        CheckConfig::new(
            "clippy",
            "cargo clippy",
            "Linting failed",
            &[
                "cargo",
                "clippy",
                "--all-targets",
                "--all-features",
                "--",
                "-D",
                "warnings",
            ],
        ),
        CheckConfig::new("test", "cargo test", "Tests failed", &["cargo", "test"]),
    ]
}
