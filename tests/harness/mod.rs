//! Test harness utilities for rejar integration tests.
//!
//! Each test gets an isolated home directory (so `~/.rejar` is
//! sandboxed) and a private bin directory that is prepended to PATH for
//! stub JDK tools. No process-global state is mutated, so tests run in
//! parallel safely.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use std::process::Output;
use tempfile::TempDir;

pub const MASTER: &str = "correct-horse-battery";

/// Test environment with isolated temp directories.
pub struct TestEnv {
    /// Working directory for jars and fixtures
    pub dir: TempDir,
    /// Temporary home directory (holds `.rejar/`)
    pub home: TempDir,
    /// Directory for stub tools, prepended to PATH
    pub bin: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
            home: TempDir::new().expect("failed to create temp home"),
            bin: TempDir::new().expect("failed to create temp bin"),
        }
    }

    /// A rejar command wired to the sandbox.
    pub fn cmd(&self) -> Command {
        let path = format!(
            "{}:{}",
            self.bin.path().display(),
            std::env::var("PATH").unwrap_or_default()
        );
        let mut cmd = Command::cargo_bin("rejar").expect("failed to find rejar binary");
        cmd.env("HOME", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env("PATH", path);
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Path to the persisted config document.
    pub fn config_path(&self) -> PathBuf {
        self.home.path().join(".rejar").join("rejar-config.json")
    }

    /// Write an executable stub tool into the PATH sandbox (unix).
    #[cfg(unix)]
    pub fn stub_tool(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.bin.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod stub");
        path
    }

    /// Save a profile through the CLI, setting the master password on
    /// first run. Piped stdin feeds the password prompts: master
    /// password, then storepass, then keypass.
    pub fn save_profile(&self, name: &str, extra_args: &[&str]) -> Output {
        self.cmd()
            .args(["profile", "save", name])
            .args(extra_args)
            .write_stdin(format!("{}\nsp-secret\nkp-secret\n", MASTER))
            .output()
            .expect("failed to run rejar profile save")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success\nstdout: {}\nstderr: {}",
        stdout(output),
        stderr(output)
    );
}

pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "expected failure\nstdout: {}",
        stdout(output)
    );
}
