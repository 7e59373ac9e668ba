// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async host process spawning, used by the `docker` backend.
//!
//! ```text
//! ProcessBuilder::find("docker")
//!   .args() .capture_output()
//!   .run()
//!       --> tokio::process::Command
//!           stream stdout/stderr
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod runner;
