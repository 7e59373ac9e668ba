// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory backend.
//!
//! Backs `--dry` runs and the test suite. Every command succeeds unless a
//! scripted failure matches its argv prefix. Connects, executions and
//! releases are written to a shared [`Journal`].

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use super::{Backend, Connection, ContainerSpec};
use crate::error::{ConnectionError, ExecError};

const BACKEND: &str = "memory";

/// What happened against a [`MemoryBackend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    pub connects: usize,
    pub releases: usize,
    /// Argv of every executed command, in order.
    pub executed: Vec<Vec<String>>,
    /// Image of every executed command, in order.
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Exit { code: i32, stderr: String },
    Engine(String),
}

#[derive(Debug, Clone)]
struct Rule {
    prefix: Vec<String>,
    result: Scripted,
}

impl Rule {
    fn matches(&self, argv: &[String]) -> bool {
        argv.starts_with(&self.prefix)
    }
}

/// Scripted, engine-free backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    unreachable: Option<String>,
    rules: Arc<Vec<Rule>>,
    journal: Arc<Mutex<Journal>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `connect` fail with the given message.
    #[must_use]
    pub fn unreachable(mut self, message: impl Into<String>) -> Self {
        self.unreachable = Some(message.into());
        self
    }

    /// Commands starting with `prefix` exit with `code`.
    #[must_use]
    pub fn fail_when(self, prefix: &[&str], code: i32, stderr: impl Into<String>) -> Self {
        self.push_rule(
            prefix,
            Scripted::Exit {
                code,
                stderr: stderr.into(),
            },
        )
    }

    /// Commands starting with `prefix` fail inside the engine.
    #[must_use]
    pub fn engine_error_when(self, prefix: &[&str], message: impl Into<String>) -> Self {
        self.push_rule(prefix, Scripted::Engine(message.into()))
    }

    fn push_rule(mut self, prefix: &[&str], result: Scripted) -> Self {
        Arc::make_mut(&mut self.rules).push(Rule {
            prefix: prefix.iter().map(ToString::to_string).collect(),
            result,
        });
        self
    }

    /// Snapshot of the journal so far.
    #[must_use]
    pub fn journal(&self) -> Journal {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, update: impl FnOnce(&mut Journal)) {
        update(&mut self.journal.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl Backend for MemoryBackend {
    type Connection = MemoryConnection;

    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn connect(&self) -> Result<MemoryConnection, ConnectionError> {
        if let Some(message) = &self.unreachable {
            return Err(ConnectionError::Unreachable {
                backend: BACKEND,
                message: message.clone(),
            });
        }
        self.record(|j| j.connects += 1);
        Ok(MemoryConnection {
            backend: self.clone(),
        })
    }
}

/// Connection handed out by [`MemoryBackend`].
#[derive(Debug)]
pub struct MemoryConnection {
    backend: MemoryBackend,
}

impl Connection for MemoryConnection {
    async fn execute(&self, spec: &ContainerSpec, argv: &[String]) -> Result<String, ExecError> {
        self.backend.record(|j| {
            j.executed.push(argv.to_vec());
            j.images.push(spec.image().to_string());
        });
        info!(image = spec.image(), workdir = spec.workdir(), cmd = %argv.join(" "), "memory exec");

        match self.backend.rules.iter().find(|rule| rule.matches(argv)) {
            None => Ok(String::new()),
            Some(Rule {
                result: Scripted::Exit { code, stderr },
                ..
            }) => Err(ExecError::NonZeroExit {
                code: *code,
                detail: stderr.clone(),
            }),
            Some(Rule {
                result: Scripted::Engine(message),
                ..
            }) => Err(ExecError::Engine(message.clone())),
        }
    }

    async fn release(self) {
        self.backend.record(|j| j.releases += 1);
    }
}
