// checkrun: containerized Rust CI checks
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML files on disk.

use std::io::Write;

use checkrun::cmd::list::format_check_list;
use checkrun::config::Config;
use checkrun::config::loader::ConfigLoader;
use checkrun::config::types::BackendKind;

fn write_toml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn config_from_file() {
    let file = write_toml(
        r#"
[backend]
kind = "docker"

[container]
source = "/srv/project"
workdir = "/src/app"
"#,
    );
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.backend.kind, BackendKind::Docker);
    assert_eq!(config.container.source.to_string_lossy(), "/srv/project");
    assert_eq!(config.container.mount_path, "/src");
    assert_eq!(config.container.effective_workdir(), "/src/app");
}

#[test]
fn later_files_override_earlier_ones() {
    let base = write_toml("[container]\nimage = \"rust:1.80\"\nmount_path = \"/work\"\n");
    let local = write_toml("[container]\nimage = \"rust:1.85\"\n");

    let loader = ConfigLoader::new()
        .add_toml_file(base.path())
        .add_toml_file(local.path());
    assert_eq!(loader.loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.container.image, "rust:1.85");
    assert_eq!(config.container.mount_path, "/work");
}

#[test]
fn cli_override_beats_files() {
    let file = write_toml("[backend]\nkind = \"docker\"\n");
    let config = ConfigLoader::new()
        .add_toml_file(file.path())
        .set("backend.kind", "memory")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.backend.kind, BackendKind::Memory);
}

#[test]
fn invalid_file_is_rejected() {
    let file = write_toml("[container]\nmount_path = \"relative\"\n");
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("must be absolute"), "{err:#}");
}

#[test]
fn malformed_toml_names_the_file() {
    let file = write_toml("[container\nimage = ");
    let err = Config::from_file(file.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(
        message.contains(&file.path().display().to_string()),
        "{message}"
    );
}

// =============================================================================
// Listing
// =============================================================================

#[test]
fn default_check_list() {
    insta::assert_debug_snapshot!(format_check_list(&Config::default()), @r#"
    [
        "1. fmt: cargo fmt --check",
        "2. clippy: cargo clippy --all-targets --all-features -- -D warnings",
        "3. test: cargo test",
    ]
    "#);
}

#[test]
fn options_serialize_to_json() {
    let json = serde_json::to_value(Config::default()).unwrap();
    assert_eq!(json["backend"]["kind"], "dagger");
    assert_eq!(json["container"]["image"], "rust:latest");
    assert_eq!(json["checks"].as_array().map(Vec::len), Some(3));
}
