// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for checkrun.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults (rust:latest, . mounted at /src, fmt/clippy/test)
//! 2. checkrun.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. CHECKRUN_* env vars
//! 5. CLI overrides (--backend, --image, --source)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! CHECKRUN_BACKEND__KIND=docker        → backend.kind = "docker"
//! CHECKRUN_CONTAINER__IMAGE=rust:1.85  → container.image = "rust:1.85"
//! CHECKRUN_CONTAINER__MOUNT_PATH=/work → container.mount_path = "/work"
//! ```
//!
//! # Custom Check Chain
//!
//! ```toml
//! [[checks]]
//! name = "fmt"
//! label = "cargo fmt"
//! failure = "Formatting check failed"
//! command = ["cargo", "fmt", "--check"]
//! ```
//!
//! A `[[checks]]` list replaces the default chain entirely.

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{BackendConfig, CheckConfig, ContainerConfig, default_checks};

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backend selection.
    pub backend: BackendConfig,
    /// Container description.
    pub container: ContainerConfig,
    /// Ordered check chain.
    pub checks: Vec<CheckConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            container: ContainerConfig::default(),
            checks: default_checks(),
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use checkrun::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("checkrun.toml")
    ///     .with_env_prefix("CHECKRUN")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check that the container is fully specified and the chain is runnable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |section: &str, key: &str, message: String| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message,
        };

        if self.container.image.trim().is_empty() {
            return Err(invalid("container", "image", "must not be empty".into()));
        }
        if !self.container.mount_path.starts_with('/') {
            return Err(invalid(
                "container",
                "mount_path",
                format!("must be absolute, got '{}'", self.container.mount_path),
            ));
        }
        if self.container.effective_workdir().trim().is_empty() {
            return Err(invalid("container", "workdir", "must not be empty".into()));
        }
        if self.checks.is_empty() {
            return Err(invalid("checks", "checks", "at least one check is required".into()));
        }

        let mut seen = BTreeSet::new();
        for check in &self.checks {
            if check.command.is_empty() || check.command[0].trim().is_empty() {
                return Err(invalid(
                    "checks",
                    "command",
                    format!("check '{}' has an empty command", check.name),
                ));
            }
            if !seen.insert(check.name.as_str()) {
                return Err(invalid(
                    "checks",
                    "name",
                    format!("duplicate check name '{}'", check.name),
                ));
            }
        }

        Ok(())
    }

    /// Format configuration options for display, one `key = value` per line.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        options.insert("backend.kind".to_string(), self.backend.kind.to_string());
        options.insert("container.image".to_string(), self.container.image.clone());
        options.insert(
            "container.source".to_string(),
            self.container.source.display().to_string(),
        );
        options.insert(
            "container.mount_path".to_string(),
            self.container.mount_path.clone(),
        );
        options.insert(
            "container.workdir".to_string(),
            self.container.effective_workdir().to_string(),
        );
        for (index, check) in self.checks.iter().enumerate() {
            options.insert(
                format!("checks.{index}.{}", check.name),
                check.command.join(" "),
            );
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
