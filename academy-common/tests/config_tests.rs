//! Tests for configuration and root folder resolution
//!
//! Tests that touch ACADEMY_ROOT_FOLDER are marked #[serial] so they do not
//! race on the process environment.

use academy_common::config::{
    CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new("test-module").resolve();

    assert_eq!(root_folder, CompiledDefaults::for_current_platform().root_folder);
}

#[test]
#[serial]
fn test_cli_argument_beats_environment() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/academy-from-env");

    let root_folder = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/academy-from-cli")))
        .resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/academy-from-cli"));
    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_environment_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/academy-from-env");
    let toml: TomlConfig = toml::from_str(r#"root_folder = "/tmp/academy-from-toml""#).unwrap();

    let root_folder = RootFolderResolver::new("test-module").with_toml(&toml).resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/academy-from-env"));
    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_when_nothing_else_set() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml: TomlConfig = toml::from_str(r#"root_folder = "/tmp/academy-from-toml""#).unwrap();

    let root_folder = RootFolderResolver::new("test-module").with_toml(&toml).resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/academy-from-toml"));
}

#[test]
fn test_initializer_creates_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("a").join("b");

    let init = RootFolderInitializer::new(root.clone());
    init.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(init.database_path(), root.join("academy.db"));
}

#[test]
fn test_from_file_reports_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("academy-portal.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    assert!(TomlConfig::from_file(&path).is_err());
}

#[test]
fn test_from_file_reads_payments() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("academy-portal.toml");
    std::fs::write(
        &path,
        r#"
        admin_shared_secret = 42

        [logging]
        level = "debug"

        [payments]
        stripe_secret_key = "sk_test_abc"
        currency = "cad"
        "#,
    )
    .unwrap();

    let config = TomlConfig::from_file(&path).unwrap();
    assert_eq!(config.admin_shared_secret, Some(42));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.payments.currency, "cad");
}
