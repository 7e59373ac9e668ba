// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{CheckRunner, SUCCESS_LINE};
use crate::backend::{ContainerSpec, MemoryBackend};
use crate::config::types::{ContainerConfig, default_checks};
use crate::error::CheckrunResult;

fn spec() -> ContainerSpec {
    ContainerSpec::from(&ContainerConfig::default())
}

async fn run(backend: &MemoryBackend) -> (CheckrunResult<super::RunSummary>, Vec<String>) {
    let checks = default_checks();
    let mut out = Vec::new();
    let result = CheckRunner::new(backend, spec(), &checks).run(&mut out).await;
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    (result, lines)
}

fn executed_names(backend: &MemoryBackend) -> Vec<String> {
    backend
        .journal()
        .executed
        .iter()
        .map(|argv| argv[1].clone())
        .collect()
}

#[tokio::test]
async fn test_all_checks_pass() {
    let backend = MemoryBackend::new();
    let (result, lines) = run(&backend).await;

    let summary = result.unwrap();
    assert_eq!(summary.checks.len(), 3);
    insta::assert_debug_snapshot!(lines, @r#"
    [
        "Running cargo fmt...",
        "Running cargo clippy...",
        "Running cargo test...",
        "✅ All checks passed!",
    ]
    "#);
    assert_eq!(lines.last().map(String::as_str), Some(SUCCESS_LINE));
    assert_eq!(executed_names(&backend), ["fmt", "clippy", "test"]);
    assert_eq!(backend.journal().releases, 1);
}

#[tokio::test]
async fn test_connection_failure_runs_nothing() {
    let backend = MemoryBackend::new().unreachable("engine not running");
    let (result, lines) = run(&backend).await;

    let err = result.unwrap_err();
    assert!(err.is_connection());
    assert_eq!(
        lines,
        ["Failed to connect to memory: memory backend unreachable: engine not running"]
    );
    let journal = backend.journal();
    assert!(journal.executed.is_empty());
    assert_eq!(journal.releases, 0);
}

#[tokio::test]
async fn test_fmt_failure_stops_chain() {
    let backend = MemoryBackend::new().fail_when(&["cargo", "fmt"], 1, "Diff in src/main.rs");
    let (result, lines) = run(&backend).await;

    let err = result.unwrap_err();
    assert_eq!(err.failed_check().map(|f| f.check.as_str()), Some("fmt"));
    assert_eq!(
        lines,
        [
            "Running cargo fmt...",
            "❌ Formatting check failed: exit code 1: Diff in src/main.rs",
        ]
    );
    assert_eq!(executed_names(&backend), ["fmt"]);
    assert_eq!(backend.journal().releases, 1);
}

#[tokio::test]
async fn test_clippy_failure_skips_tests() {
    let backend = MemoryBackend::new().fail_when(&["cargo", "clippy"], 101, "");
    let (result, lines) = run(&backend).await;

    assert_eq!(
        result.unwrap_err().failed_check().map(|f| f.check.as_str()),
        Some("clippy")
    );
    assert_eq!(lines.last().map(String::as_str), Some("❌ Linting failed: exit code 101"));
    assert_eq!(executed_names(&backend), ["fmt", "clippy"]);
    assert_eq!(backend.journal().releases, 1);
}

#[tokio::test]
async fn test_test_failure_is_reported() {
    let backend = MemoryBackend::new().engine_error_when(&["cargo", "test"], "exec failed");
    let (result, lines) = run(&backend).await;

    assert_eq!(
        result.unwrap_err().failed_check().map(|f| f.check.as_str()),
        Some("test")
    );
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3], "❌ Tests failed: exec failed");
    assert!(!lines.iter().any(|l| l == SUCCESS_LINE));
    assert_eq!(backend.journal().releases, 1);
}

#[tokio::test]
async fn test_runs_are_idempotent() {
    let backend = MemoryBackend::new().fail_when(&["cargo", "clippy"], 1, "warning: unused");
    let (first, first_lines) = run(&backend).await;
    let (second, second_lines) = run(&backend).await;

    assert_eq!(first.is_ok(), second.is_ok());
    assert_eq!(first_lines, second_lines);

    let journal = backend.journal();
    assert_eq!(journal.connects, 2);
    assert_eq!(journal.releases, 2);
}

#[tokio::test]
async fn test_custom_chain_uses_spec_image() {
    let backend = MemoryBackend::new();
    let config = ContainerConfig {
        image: "rust:1.85".to_string(),
        ..ContainerConfig::default()
    };
    let checks = &default_checks()[..1];
    let mut out = Vec::new();

    CheckRunner::new(&backend, ContainerSpec::from(&config), checks)
        .run(&mut out)
        .await
        .unwrap();

    assert_eq!(backend.journal().images, ["rust:1.85"]);
}
