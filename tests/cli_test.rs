use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

use host_cleanup::common::permissions;

fn hostcleanup() -> Command {
    let mut cmd = Command::cargo_bin("hostcleanup").unwrap();
    cmd.env_remove("HOSTCLEANUP_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Agent config that keeps every host path inside `root`
fn write_config(root: &Path) -> std::path::PathBuf {
    let config = root.join("agent.toml");
    let text = format!(
        "prefix = \"{root}/data\"\n\
         cache_dir = \"{root}/cache\"\n\
         os_family = \"debian\"\n\n\
         [layout]\n\
         owned_file_folders = []\n\
         additional_dir_roots = [\"{root}/tmp\"]\n\
         select_marker = \"{root}/data/marker\"\n\
         rhel_repo_dir = \"{root}/yum\"\n\
         suse_repo_dir = \"{root}/zypp\"\n",
        root = root.display()
    );
    std::fs::write(&config, text).unwrap();
    config
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    hostcleanup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip"))
        .stdout(predicate::str::contains("--silent"))
        .stdout(predicate::str::contains("--file"))
        .stdout(predicate::str::contains("--out"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_version_flag() {
    hostcleanup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hostcleanup"));
}

#[test]
fn test_unknown_skip_section() {
    hostcleanup()
        .args(["--skip", "packages,kernels"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown section 'kernels'"));
}

#[test]
fn test_malformed_config_fails() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("agent.toml");
    std::fs::write(&config, "prefix = [").unwrap();

    hostcleanup()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

// ─── Full run ────────────────────────────────────────────────────────────────

#[test]
fn test_directory_cleanup_run() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let config = write_config(root);

    std::fs::create_dir_all(root.join("data")).unwrap();
    std::fs::create_dir_all(root.join("victim/conf")).unwrap();
    std::fs::create_dir_all(root.join("tmp/hadoop-yarn")).unwrap();
    std::fs::create_dir_all(root.join("cache/alerts")).unwrap();
    std::fs::write(root.join("cache/alerts/definitions.json"), "{}").unwrap();

    let check = root.join("data/hostcheck.result");
    let custom = root.join("data/hostcheck_custom_actions.result");
    std::fs::write(
        &check,
        format!("[directories]\ndir_list = {}\n", root.join("victim").display()),
    )
    .unwrap();
    std::fs::write(&custom, "").unwrap();

    let out = root.join("data/hostcleanup.result");
    std::fs::write(&out, "old log").unwrap();

    let assert = hostcleanup()
        .arg("--config")
        .arg(&config)
        .args(["--silent", "--format", "json"])
        .assert();

    if permissions::is_root() {
        assert
            .success()
            .stdout(predicate::str::contains("\"records\""))
            .stdout(predicate::str::contains("additional_directories"));
        assert!(!root.join("victim").exists());
        assert!(!root.join("tmp/hadoop-yarn").exists());
        assert!(!root.join("cache/alerts/definitions.json").exists());
        let log = std::fs::read_to_string(&out).unwrap();
        assert!(log.contains("Clean-up completed"));
    } else {
        assert
            .failure()
            .stderr(predicate::str::contains("run as root"));
        assert!(root.join("victim").exists());
    }

    // The previous log is always preserved
    let backups = std::fs::read_dir(root.join("data"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("hostcleanup.result.")
        })
        .count();
    assert_eq!(backups, 1);
}

#[test]
fn test_missing_manifest_is_not_fatal() {
    if !permissions::is_root() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let config = write_config(root);

    hostcleanup()
        .arg("--config")
        .arg(&config)
        .arg("--file")
        .arg(root.join("absent.result"))
        .args(["--silent", "--format", "quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0  0"))
        .stderr(predicate::str::contains("Host check result not found"));
}
