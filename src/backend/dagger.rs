// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dagger engine backend.
//!
//! `dagger_sdk::connect_opts` only hands out a client inside its closure and
//! tears the engine down when the closure returns. The session therefore
//! runs on a background task:
//!
//! ```text
//! connect()
//!   spawn ── connect_opts(|client| {
//!              ready_tx.send(client)      ──> DaggerConnection { client }
//!              release_rx.recv()          <── release() / drop
//!            })
//! ```
//!
//! If the engine fails before a client is handed out, `ready_rx` disconnects
//! and the task's `ConnectError` becomes the `ConnectionError`.

use std::sync::Arc;

use dagger_sdk::logging::StdLogger;
use dagger_sdk::{Config as EngineConfig, Query};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{Backend, Connection, ContainerSpec};
use crate::error::{ConnectionError, ExecError};

const BACKEND: &str = "dagger";

type EngineTask = JoinHandle<Result<(), String>>;

/// Runs checks through a Dagger engine session.
#[derive(Debug, Clone, Copy, Default)]
pub struct DaggerBackend;

impl DaggerBackend {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Backend for DaggerBackend {
    type Connection = DaggerConnection;

    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn connect(&self) -> Result<DaggerConnection, ConnectionError> {
        let (ready_tx, ready_rx) = flume::bounded::<Query>(1);
        let (release_tx, release_rx) = flume::bounded::<()>(1);

        let engine_config = engine_config();

        let engine: EngineTask = tokio::spawn(async move {
            dagger_sdk::connect_opts(engine_config, |client| async move {
                ready_tx
                    .send_async(client)
                    .await
                    .map_err(|_| eyre::eyre!("session handle dropped before connect finished"))?;
                // Hold the session open until released or dropped.
                let _ = release_rx.recv_async().await;
                Ok(())
            })
            .await
            .map_err(|e| e.to_string())
        });

        match ready_rx.recv_async().await {
            Ok(client) => {
                debug!(backend = BACKEND, "engine session ready");
                Ok(DaggerConnection {
                    client,
                    release_tx,
                    engine,
                })
            }
            Err(_) => {
                let message = match engine.await {
                    Ok(Err(message)) => message,
                    Ok(Ok(())) => "engine session ended before it was ready".to_string(),
                    Err(join) => join.to_string(),
                };
                Err(ConnectionError::Unreachable {
                    backend: BACKEND,
                    message,
                })
            }
        }
    }
}

/// Session config that writes engine diagnostics to stdout.
pub(crate) fn engine_config() -> EngineConfig {
    EngineConfig {
        logger: Some(Arc::new(StdLogger::default())),
        ..Default::default()
    }
}

/// Live Dagger session.
pub struct DaggerConnection {
    client: Query,
    release_tx: flume::Sender<()>,
    engine: EngineTask,
}

impl Connection for DaggerConnection {
    async fn execute(&self, spec: &ContainerSpec, argv: &[String]) -> Result<String, ExecError> {
        let source = self
            .client
            .host()
            .directory(spec.source().to_string_lossy());

        self.client
            .container()
            .from(spec.image())
            .with_mounted_directory(spec.mount_path(), source)
            .with_workdir(spec.workdir())
            .with_exec(argv.to_vec())
            .stdout()
            .await
            .map_err(|e| ExecError::Engine(e.to_string()))
    }

    async fn release(self) {
        let _ = self.release_tx.send_async(()).await;
        match self.engine.await {
            Ok(Ok(())) => debug!(backend = BACKEND, "engine session closed"),
            Ok(Err(message)) => warn!(backend = BACKEND, error = %message, "engine session closed with error"),
            Err(join) => warn!(backend = BACKEND, error = %join, "engine task failed"),
        }
    }
}
