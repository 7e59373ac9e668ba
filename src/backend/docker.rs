// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Docker CLI backend.
//!
//! ```text
//! connect()  which docker && docker version --format {{.Server.Version}}
//! execute()  docker run --rm -v <abs source>:<mount> -w <workdir> <image> <argv...>
//! release()  nothing to tear down, containers are --rm
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Backend, Connection, ContainerSpec, tail_lines};
use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::{ConnectionError, ExecError};

const BACKEND: &str = "docker";

/// Lines of stderr kept in a failure detail.
const STDERR_TAIL: usize = 20;

/// Runs checks with the local `docker` CLI.
#[derive(Debug, Clone)]
pub struct DockerBackend {
    program: String,
}

impl Default for DockerBackend {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
        }
    }
}

impl DockerBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a docker-compatible CLI other than `docker` (e.g. `podman`).
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Backend for DockerBackend {
    type Connection = DockerConnection;

    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn connect(&self) -> Result<DockerConnection, ConnectionError> {
        let docker = ProcessBuilder::find(&self.program).ok_or_else(|| {
            ConnectionError::ToolNotFound {
                name: self.program.clone(),
            }
        })?;

        let output = ProcessBuilder::new(&docker)
            .args(["version", "--format", "{{.Server.Version}}"])
            .capture_output()
            .run()
            .await
            .map_err(|e| ConnectionError::Unreachable {
                backend: BACKEND,
                message: e.to_string(),
            })?;

        info!(server = output.stdout().trim(), "connected to docker daemon");
        Ok(DockerConnection { docker })
    }
}

/// Resolved docker CLI, ready to run containers.
#[derive(Debug)]
pub struct DockerConnection {
    docker: PathBuf,
}

impl Connection for DockerConnection {
    async fn execute(&self, spec: &ContainerSpec, argv: &[String]) -> Result<String, ExecError> {
        let source = tokio::fs::canonicalize(spec.source())
            .await
            .map_err(|source| ExecError::Io {
                path: spec.source().display().to_string(),
                source,
            })?;

        let output = ProcessBuilder::new(&self.docker)
            .name("docker")
            .args(run_args(spec, &source, argv))
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE)
            .run()
            .await
            .map_err(|e| ExecError::Engine(e.to_string()))?;

        if !output.success() {
            return Err(ExecError::NonZeroExit {
                code: output.exit_code(),
                detail: tail_lines(output.stderr(), STDERR_TAIL),
            });
        }
        Ok(output.stdout().to_string())
    }

    async fn release(self) {
        debug!(backend = BACKEND, "nothing to release");
    }
}

/// Arguments for `docker run` executing `argv` in a container from `spec`.
#[must_use]
pub fn run_args(spec: &ContainerSpec, source: &Path, argv: &[String]) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{}:{}", source.display(), spec.mount_path()),
        "-w".to_string(),
        spec.workdir().to_string(),
        spec.image().to_string(),
    ];
    args.extend(argv.iter().cloned());
    args
}
