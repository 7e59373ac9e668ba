// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the check chain.
//!
//! Drives `CheckRunner` through the public API against the in-memory backend.

use checkrun::backend::{ContainerSpec, MemoryBackend};
use checkrun::check::{CheckRunner, SUCCESS_LINE};
use checkrun::cmd::run::run_with_kind;
use checkrun::config::Config;
use checkrun::config::types::BackendKind;

fn output_lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Full chain
// =============================================================================

#[tokio::test]
async fn clean_tree_prints_progress_then_success() {
    let config = Config::default();
    let backend = MemoryBackend::new();
    let mut out = Vec::new();

    CheckRunner::new(&backend, ContainerSpec::from(&config.container), &config.checks)
        .run(&mut out)
        .await
        .unwrap();

    assert_eq!(
        output_lines(out),
        [
            "Running cargo fmt...",
            "Running cargo clippy...",
            "Running cargo test...",
            SUCCESS_LINE,
        ]
    );
    assert_eq!(
        backend.journal().executed,
        config
            .checks
            .iter()
            .map(|c| c.command.clone())
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn dry_run_kind_passes_every_check() {
    let config = Config::default();
    let mut out = Vec::new();

    let summary = run_with_kind(BackendKind::Memory, &config, &mut out)
        .await
        .unwrap();

    let names: Vec<_> = summary.checks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["fmt", "clippy", "test"]);
}

// =============================================================================
// Short-circuiting
// =============================================================================

#[tokio::test]
async fn each_failure_point_stops_the_chain_and_releases() {
    let cases = [
        (&["cargo", "fmt"][..], 1_usize, "❌ Formatting check failed"),
        (&["cargo", "clippy"][..], 2, "❌ Linting failed"),
        (&["cargo", "test"][..], 3, "❌ Tests failed"),
    ];

    for (prefix, executed, failure_line) in cases {
        let config = Config::default();
        let backend = MemoryBackend::new().fail_when(prefix, 1, "");
        let mut out = Vec::new();

        let err = CheckRunner::new(&backend, ContainerSpec::from(&config.container), &config.checks)
            .run(&mut out)
            .await
            .unwrap_err();

        let lines = output_lines(out);
        let journal = backend.journal();
        assert!(err.failed_check().is_some(), "{prefix:?}: {err}");
        assert_eq!(journal.executed.len(), executed, "{prefix:?}");
        assert_eq!(journal.releases, 1, "{prefix:?}");
        assert_eq!(
            lines.iter().filter(|l| l.starts_with('❌')).count(),
            1,
            "{prefix:?}"
        );
        assert!(
            lines.last().is_some_and(|l| l.starts_with(failure_line)),
            "{prefix:?}: {lines:?}"
        );
    }
}

#[tokio::test]
async fn unreachable_backend_attempts_no_check() {
    let config = Config::default();
    let backend = MemoryBackend::new().unreachable("connection refused");
    let mut out = Vec::new();

    let err = CheckRunner::new(&backend, ContainerSpec::from(&config.container), &config.checks)
        .run(&mut out)
        .await
        .unwrap_err();

    assert!(err.is_connection());
    let lines = output_lines(out);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Failed to connect to memory"));
    assert!(backend.journal().executed.is_empty());
}

// =============================================================================
// Custom chains
// =============================================================================

#[tokio::test]
async fn custom_chain_from_toml_runs_in_order() {
    let config = Config::parse(
        r#"
[container]
image = "rust:1.85"

[[checks]]
name = "check"
label = "cargo check"
failure = "Compile check failed"
command = ["cargo", "check", "--workspace"]

[[checks]]
name = "doc"
label = "cargo doc"
failure = "Docs failed"
command = ["cargo", "doc", "--no-deps"]
"#,
    )
    .unwrap();
    let backend = MemoryBackend::new().fail_when(&["cargo", "doc"], 101, "unresolved link");
    let mut out = Vec::new();

    let err = CheckRunner::new(&backend, ContainerSpec::from(&config.container), &config.checks)
        .run(&mut out)
        .await
        .unwrap_err();

    insta::assert_debug_snapshot!(output_lines(out), @r#"
    [
        "Running cargo check...",
        "Running cargo doc...",
        "❌ Docs failed: exit code 101: unresolved link",
    ]
    "#);
    assert_eq!(err.failed_check().map(|f| f.check.as_str()), Some("doc"));
    assert_eq!(backend.journal().images, ["rust:1.85", "rust:1.85"]);
}
