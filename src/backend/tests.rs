// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::dagger::engine_config;
use super::docker::run_args;
use super::{Backend, Connection, ContainerSpec, MemoryBackend, tail_lines};
use crate::config::types::ContainerConfig;
use crate::error::{ConnectionError, ExecError};

fn spec() -> ContainerSpec {
    ContainerSpec::builder()
        .image("rust:latest")
        .source(".")
        .mount_path("/src")
        .workdir("/src")
        .build()
}

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(ToString::to_string).collect()
}

#[test]
fn test_spec_from_default_config() {
    assert_eq!(ContainerSpec::from(&ContainerConfig::default()), spec());
}

#[test]
fn test_spec_workdir_override() {
    let config = ContainerConfig {
        workdir: Some("/src/crates/app".to_string()),
        ..ContainerConfig::default()
    };
    let spec = ContainerSpec::from(&config);
    assert_eq!(spec.mount_path(), "/src");
    assert_eq!(spec.workdir(), "/src/crates/app");
}

#[test]
fn test_docker_run_args() {
    let args = run_args(
        &spec(),
        Path::new("/home/ci/project"),
        &argv(&["cargo", "fmt", "--check"]),
    );
    insta::assert_snapshot!(
        args.join(" "),
        @"run --rm -v /home/ci/project:/src -w /src rust:latest cargo fmt --check"
    );
}

#[test]
fn test_dagger_engine_output_has_a_logger() {
    assert!(engine_config().logger.is_some());
}

#[test]
fn test_tail_lines() {
    assert_eq!(tail_lines("a\nb\nc\nd", 2), "c\nd");
    assert_eq!(tail_lines("only", 5), "only");
    assert_eq!(tail_lines("", 3), "");
}

#[tokio::test]
async fn test_memory_backend_scripted_results() {
    let backend = MemoryBackend::new()
        .fail_when(&["cargo", "test"], 101, "test result: FAILED")
        .engine_error_when(&["cargo", "clippy"], "image pull failed");

    let conn = backend.connect().await.unwrap();
    let spec = spec();

    assert!(conn.execute(&spec, &argv(&["cargo", "fmt", "--check"])).await.is_ok());
    assert!(matches!(
        conn.execute(&spec, &argv(&["cargo", "clippy", "--all-targets"])).await,
        Err(ExecError::Engine(_))
    ));
    assert!(matches!(
        conn.execute(&spec, &argv(&["cargo", "test"])).await,
        Err(ExecError::NonZeroExit { code: 101, .. })
    ));
    conn.release().await;

    let journal = backend.journal();
    assert_eq!(journal.connects, 1);
    assert_eq!(journal.releases, 1);
    assert_eq!(journal.executed.len(), 3);
    assert!(journal.images.iter().all(|image| image == "rust:latest"));
}

#[tokio::test]
async fn test_memory_backend_unreachable() {
    let backend = MemoryBackend::new().unreachable("no engine");
    let err = backend.connect().await.unwrap_err();
    assert!(matches!(err, ConnectionError::Unreachable { backend: "memory", .. }));
    assert_eq!(backend.journal().connects, 0);
}

#[tokio::test]
async fn test_docker_backend_missing_cli() {
    use super::DockerBackend;

    let backend = DockerBackend::with_program("checkrun-no-such-docker");
    let err = backend.connect().await.unwrap_err();
    assert!(matches!(err, ConnectionError::ToolNotFound { .. }), "{err}");
}
