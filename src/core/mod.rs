// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Host-side plumbing.
//!
//! ```text
//!   core
//!    |
//!    v
//! process   ProcessBuilder, ProcessOutput
//! ```

pub mod process;
