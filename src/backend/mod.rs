// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Container-execution backends.
//!
//! ```text
//!   Backend::connect()  ──>  Connection
//!                              │ execute(&ContainerSpec, argv) -> stdout
//!                              │ execute(...)
//!                              └ release(self)       (consumes, runs once)
//!
//!   dagger   Dagger engine session on a background task
//!   docker   `docker run --rm -v src:mount -w workdir image argv`
//!   memory   scripted results + journal, no engine
//! ```
//!
//! Building the container description is pure, so it lives in
//! [`ContainerSpec`] and each `execute` derives a fresh container from it.

pub mod dagger;
pub mod docker;
pub mod memory;

#[cfg(test)]
mod tests;

use bon::Builder;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::config::types::ContainerConfig;
use crate::error::{ConnectionError, ExecError};

pub use dagger::DaggerBackend;
pub use docker::DockerBackend;
pub use memory::MemoryBackend;

/// Immutable description of the container every check runs in.
///
/// All four fields are required by the builder, so a spec can never be
/// executed half-specified.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ContainerSpec {
    #[builder(into)]
    image: String,
    #[builder(into)]
    source: PathBuf,
    #[builder(into)]
    mount_path: String,
    #[builder(into)]
    workdir: String,
}

impl ContainerSpec {
    /// Base image reference.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Host directory mounted into the container.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn mount_path(&self) -> &str {
        &self.mount_path
    }

    #[must_use]
    pub fn workdir(&self) -> &str {
        &self.workdir
    }
}

impl From<&ContainerConfig> for ContainerSpec {
    fn from(config: &ContainerConfig) -> Self {
        Self::builder()
            .image(config.image.as_str())
            .source(config.source.as_path())
            .mount_path(config.mount_path.as_str())
            .workdir(config.effective_workdir())
            .build()
    }
}

/// Entry point to a container-execution service.
pub trait Backend {
    type Connection: Connection;

    /// Short backend name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Acquire a connection.
    ///
    /// # Errors
    ///
    /// Returns a `ConnectionError` if the service is unreachable or a host
    /// tool it needs is missing.
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, ConnectionError>>;
}

/// A live session with a backend.
pub trait Connection {
    /// Run `argv` in a fresh container derived from `spec`, returning stdout.
    ///
    /// # Errors
    ///
    /// Returns an `ExecError` if the command exits non-zero or the engine
    /// cannot run it.
    fn execute(
        &self,
        spec: &ContainerSpec,
        argv: &[String],
    ) -> impl Future<Output = Result<String, ExecError>>;

    /// Tear the session down. Consumes the connection.
    fn release(self) -> impl Future<Output = ()>;
}

/// Last `max` lines of `text`, used to keep failure details short.
pub(crate) fn tail_lines(text: &str, max: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(max);
    lines[start..].join("\n")
}
