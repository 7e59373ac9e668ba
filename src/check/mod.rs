// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The check chain.
//!
//! ```text
//! CheckRunner::run(out)
//!   connect ──✗──> "Failed to connect to <backend>: ..."  ──> Err(Connection)
//!      │
//!      v
//!   for check in chain            (stops at first failure)
//!      "Running <label>..."
//!      execute ──✗──> "❌ <failure>: ..."  ──┐
//!      │                                     │
//!      v                                     v
//!   release (exactly once, every path after connect)
//!      │                                     │
//!      v                                     v
//!   "✅ All checks passed!"              Err(Check)
//! ```

#[cfg(test)]
mod tests;

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::backend::{Backend, Connection, ContainerSpec};
use crate::config::types::CheckConfig;
use crate::error::{CheckFailure, CheckrunResult};

/// Printed after every check in the chain has passed.
pub const SUCCESS_LINE: &str = "✅ All checks passed!";

/// Timing of one passed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub name: String,
    pub elapsed: Duration,
}

/// Result of a fully successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub checks: Vec<CheckReport>,
}

impl RunSummary {
    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        self.checks.iter().map(|c| c.elapsed).sum()
    }
}

/// Runs an ordered check chain against one backend connection.
pub struct CheckRunner<'a, B: Backend> {
    backend: &'a B,
    spec: ContainerSpec,
    checks: &'a [CheckConfig],
}

impl<'a, B: Backend> CheckRunner<'a, B> {
    pub const fn new(backend: &'a B, spec: ContainerSpec, checks: &'a [CheckConfig]) -> Self {
        Self {
            backend,
            spec,
            checks,
        }
    }

    /// Connect, run every check in order, release, and report to `out`.
    ///
    /// Progress, the single failure line and the success line are written to
    /// `out`. The connection is released exactly once whenever connect
    /// succeeded, whatever happens afterwards.
    ///
    /// # Errors
    ///
    /// - `CheckrunError::Connection` if the backend cannot be reached; no
    ///   check runs.
    /// - `CheckrunError::Check` for the first failing check; later checks do
    ///   not run.
    /// - `CheckrunError::Io` if writing to `out` fails.
    pub async fn run<W: Write>(&self, out: &mut W) -> CheckrunResult<RunSummary> {
        let backend = self.backend.name();
        let connection = match self.backend.connect().await {
            Ok(connection) => connection,
            Err(e) => {
                writeln!(out, "Failed to connect to {backend}: {e}")?;
                return Err(e.into());
            }
        };
        debug!(backend, image = self.spec.image(), "connected");

        let outcome = self.run_chain(&connection, out).await;

        connection.release().await;
        debug!(backend, "connection released");

        let summary = outcome?;
        writeln!(out, "{SUCCESS_LINE}")?;
        info!(
            checks = summary.checks.len(),
            elapsed = ?summary.total_elapsed(),
            "all checks passed"
        );
        Ok(summary)
    }

    async fn run_chain<W: Write>(
        &self,
        connection: &B::Connection,
        out: &mut W,
    ) -> CheckrunResult<RunSummary> {
        let mut summary = RunSummary::default();

        for check in self.checks {
            writeln!(out, "Running {}...", check.label)?;
            out.flush()?;

            let started = Instant::now();
            match connection.execute(&self.spec, &check.command).await {
                Ok(stdout) => {
                    for line in stdout.lines() {
                        trace!(check = %check.name, line, "output");
                    }
                    let elapsed = started.elapsed();
                    debug!(check = %check.name, ?elapsed, "passed");
                    summary.checks.push(CheckReport {
                        name: check.name.clone(),
                        elapsed,
                    });
                }
                Err(source) => {
                    let failure = CheckFailure {
                        check: check.name.clone(),
                        failure: check.failure.clone(),
                        source,
                    };
                    writeln!(out, "❌ {failure}")?;
                    return Err(failure.into());
                }
            }
        }

        Ok(summary)
    }
}
