// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! List command implementation for checkrun.

use crate::config::Config;

/// One line per check, in run order: `1. fmt: cargo fmt --check`.
#[must_use]
pub fn format_check_list(config: &Config) -> Vec<String> {
    config
        .checks
        .iter()
        .enumerate()
        .map(|(i, check)| format!("{}. {}: {}", i + 1, check.name, check.command.join(" ")))
        .collect()
}

/// Main handler for list command.
pub fn run_list_command(config: &Config) {
    for line in format_check_list(config) {
        println!("{line}");
    }
}
