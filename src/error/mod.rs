// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          CheckrunError (~24 bytes)
//!                   |
//!   +-------+-------+-------+-------+
//!   |       |       |       |       |
//!   v       v       v       v       v
//! Connect Check   Config  Process  Io
//!   Box    Box     Box     Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Connection  Unreachable, ToolNotFound
//!   Check       { check, failure, ExecError }
//!   Exec        NonZeroExit, Engine, Io
//!   Config      ParseError, InvalidValue
//!   Process     SpawnFailed, NonZeroExit, OutputError
//!
//! All variants boxed => CheckrunError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`CheckrunError`].
pub type CheckrunResult<T> = std::result::Result<T, CheckrunError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum CheckrunError {
    /// The container backend could not be reached.
    #[error("connection error: {0}")]
    Connection(#[from] Box<ConnectionError>),

    /// One of the checks failed.
    #[error("check failed: {0}")]
    Check(#[from] Box<CheckFailure>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Host process error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl CheckrunError {
    /// Returns true if this error came from the backend connection step.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the failed check, if this error is a check failure.
    #[must_use]
    pub fn failed_check(&self) -> Option<&CheckFailure> {
        match self {
            Self::Check(failure) => Some(failure),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for CheckrunError {
                fn from(err: $error) -> Self {
                    CheckrunError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConnectionError => Connection,
    CheckFailure => Check,
    ConfigError => Config,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Connection Errors ---

/// Failures while acquiring a backend connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The backend did not answer or refused the session.
    #[error("{backend} backend unreachable: {message}")]
    Unreachable {
        backend: &'static str,
        message: String,
    },

    /// A host tool the backend needs is missing.
    #[error("executable not found: '{name}' (not in PATH)")]
    ToolNotFound { name: String },
}

// --- Exec Errors ---

/// Failure of a single command execution inside the container.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The command ran and exited with a non-zero status.
    #[error("exit code {code}{}", detail_suffix(.detail))]
    NonZeroExit { code: i32, detail: String },

    /// The engine could not run the command at all.
    #[error("{0}")]
    Engine(String),

    /// Host-side I/O failure while preparing the execution.
    #[error("io error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn detail_suffix(detail: &str) -> String {
    let detail = detail.trim();
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

// --- Check Failures ---

/// A check in the chain failed, stopping the run.
#[derive(Debug, Error)]
#[error("{failure}: {source}")]
pub struct CheckFailure {
    /// Short check name (`fmt`, `clippy`, `test`).
    pub check: String,
    /// Human-readable failure label printed to the operator.
    pub failure: String,
    #[source]
    pub source: ExecError,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Host process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited non-zero.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Waiting on or reading from the process failed.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}
