// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Run command implementation for checkrun.
//!
//! ```text
//! Config ──> ContainerSpec
//!        ──> backend.kind (memory when --dry)
//!                 |
//!                 v
//!        CheckRunner::run(stdout)
//!                 |
//!   Ok ──> SUCCESS    Connection/Check ──> FAILURE (already reported)
//!                     anything else    ──> Err
//! ```

use std::io::Write;
use std::process::ExitCode;

use tracing::debug;

use crate::backend::{Backend, ContainerSpec, DaggerBackend, DockerBackend, MemoryBackend};
use crate::check::{CheckRunner, RunSummary};
use crate::config::Config;
use crate::config::types::BackendKind;
use crate::error::{CheckrunResult, Result};

/// Main handler for the run command.
///
/// Connection and check failures have already been printed by the runner
/// and map to `ExitCode::FAILURE` here.
///
/// # Errors
///
/// Returns an error for failures the runner did not report, such as a
/// broken stdout.
pub async fn run_checks_command(config: &Config, dry: bool) -> Result<ExitCode> {
    let kind = if dry {
        BackendKind::Memory
    } else {
        config.backend.kind
    };
    debug!(backend = %kind, dry, "selected backend");

    let mut stdout = std::io::stdout();
    let result = run_with_kind(kind, config, &mut stdout).await;

    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_connection() || e.failed_check().is_some() => {
            debug!(error = %e, "run failed");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the configured chain against the backend named by `kind`.
///
/// # Errors
///
/// See [`CheckRunner::run`].
pub async fn run_with_kind<W: Write>(
    kind: BackendKind,
    config: &Config,
    out: &mut W,
) -> CheckrunResult<RunSummary> {
    match kind {
        BackendKind::Dagger => run_with(&DaggerBackend::new(), config, out).await,
        BackendKind::Docker => run_with(&DockerBackend::new(), config, out).await,
        BackendKind::Memory => run_with(&MemoryBackend::new(), config, out).await,
    }
}

async fn run_with<B: Backend, W: Write>(
    backend: &B,
    config: &Config,
    out: &mut W,
) -> CheckrunResult<RunSummary> {
    let spec = ContainerSpec::from(&config.container);
    CheckRunner::new(backend, spec, &config.checks)
        .run(out)
        .await
}
