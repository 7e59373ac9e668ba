// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Spawning and waiting.
//!
//! ```text
//! run()
//!   spawn (stdin null, stdout/stderr piped, kill_on_drop)
//!     ├─ stdout reader task ─┐
//!     └─ stderr reader task ─┤ trace and/or keep lines
//!   wait                     │
//!   join readers <───────────┘
//!   exit 0 or ALLOW_FAILURE -> ProcessOutput
//!   otherwise               -> ProcessError::NonZeroExit
//! ```

use std::fmt::Write as _;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
use crate::error::ProcessError;

impl ProcessBuilder {
    /// Program and arguments as a shell-like line, quoting arguments with spaces.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program().display().to_string();
        for arg in self.arg_list() {
            if arg.contains(' ') {
                let _ = write!(line, " \"{arg}\"");
            } else {
                let _ = write!(line, " {arg}");
            }
        }
        line
    }

    /// Spawn the command and wait for it.
    ///
    /// # Errors
    ///
    /// - `ProcessError::SpawnFailed` if the program cannot be started.
    /// - `ProcessError::OutputError` if waiting on the child fails.
    /// - `ProcessError::NonZeroExit` for a non-zero exit without `ALLOW_FAILURE`.
    pub async fn run(self) -> Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let line = self.command_line();
        let (stdout_flags, stderr_flags) = self.stream_flags();
        debug!(cmd = %line, "exec");

        let mut child = Command::new(self.program())
            .args(self.arg_list())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: line.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .map(|s| read_lines(s, stdout_flags, name.clone(), "stdout"));
        let stderr = child
            .stderr
            .take()
            .map(|s| read_lines(s, stderr_flags, name.clone(), "stderr"));

        let status = child
            .wait()
            .await
            .map_err(|e| ProcessError::OutputError {
                command: line.clone(),
                message: e.to_string(),
            })?;

        let output = ProcessOutput::new(
            status.code().unwrap_or(-1),
            join_lines(stdout).await,
            join_lines(stderr).await,
        );
        trace!(process = %name, exit_code = output.exit_code(), "finished");

        if !output.success() && !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) {
            return Err(ProcessError::NonZeroExit {
                command: line,
                code: output.exit_code(),
                stderr: output.stderr().to_string(),
            });
        }
        Ok(output)
    }
}

fn read_lines<R>(
    reader: R,
    flags: StreamFlags,
    process: String,
    stream: &'static str,
) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut kept = Vec::new();
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                        trace!(process = %process, stream, line = %line, "output");
                    }
                    if flags.contains(StreamFlags::KEEP_IN_STRING) {
                        kept.push(line);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(process = %process, stream, error = %e, "stream read failed");
                    break;
                }
            }
        }
        kept
    })
}

async fn join_lines(reader: Option<JoinHandle<Vec<String>>>) -> String {
    match reader {
        Some(handle) => handle.await.unwrap_or_default().join("\n"),
        None => String::new(),
    }
}
