//! Tests for `rejar sign` against stub JDK tools.

#![cfg(unix)]

mod harness;
use harness::{assert_failure, assert_success, stderr, stdout, TestEnv, MASTER};

/// Stub jarsigner that records its argv and succeeds.
fn recording_jarsigner(env: &TestEnv) -> std::path::PathBuf {
    let record = env.dir.path().join("jarsigner-argv.txt");
    env.stub_tool(
        "jarsigner",
        &format!(r#"printf '%s\n' "$@" > {}"#, record.display()),
    );
    record
}

/// A jar stub is resolved up front even on copy-only runs.
fn noop_jar(env: &TestEnv) {
    env.stub_tool("jar", "exit 0");
}

#[test]
fn test_sign_single_copy_mode_invokes_jarsigner() {
    let env = TestEnv::new();
    noop_jar(&env);
    let record = recording_jarsigner(&env);

    let source = env.dir.path().join("app.jar");
    let target = env.dir.path().join("app-signed.jar");
    std::fs::write(&source, "fake jar bytes").unwrap();

    assert_success(&env.save_profile(
        "Release",
        &[
            "--source", source.to_str().unwrap(),
            "--target", target.to_str().unwrap(),
            "--keystore", "/tmp/mykeystore",
            "--alias", "business1",
            "--keep-signatures",
        ],
    ));

    let output = env
        .cmd()
        .args(["sign", "Release"])
        .write_stdin(format!("{}\n", MASTER))
        .output()
        .unwrap();
    assert_success(&output);
    assert!(stdout(&output).contains("signed"));

    // copy-only mode leaves the payload intact
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "fake jar bytes");

    let argv = std::fs::read_to_string(&record).unwrap();
    assert!(argv.contains("-keystore"));
    assert!(argv.contains("/tmp/mykeystore"));
    assert!(argv.contains("-storepass"));
    assert!(argv.contains("sp-secret"));
    assert!(argv.contains("-tsa"));
    assert!(argv.contains("http://timestamp.digicert.com"));
    assert!(argv.contains("business1"));
    assert!(!argv.contains("-verbose"));
}

#[test]
fn test_sign_verbose_profile_passes_verbose_flag() {
    let env = TestEnv::new();
    noop_jar(&env);
    let record = recording_jarsigner(&env);

    let source = env.dir.path().join("app.jar");
    std::fs::write(&source, "x").unwrap();

    assert_success(&env.save_profile(
        "V",
        &[
            "--source", source.to_str().unwrap(),
            "--target", env.dir.path().join("out.jar").to_str().unwrap(),
            "--keystore", "ks",
            "--alias", "a",
            "--keep-signatures",
            "--verbose-signing",
        ],
    ));

    let output = env
        .cmd()
        .arg("sign")
        .write_stdin(format!("{}\n", MASTER)) // defaults to the active profile
        .output()
        .unwrap();
    assert_success(&output);

    assert!(std::fs::read_to_string(&record).unwrap().contains("-verbose"));
}

#[test]
fn test_sign_surfaces_jarsigner_error_line() {
    let env = TestEnv::new();
    noop_jar(&env);
    env.stub_tool(
        "jarsigner",
        "echo 'jarsigner error: keystore password was incorrect'; exit 1",
    );

    let source = env.dir.path().join("app.jar");
    std::fs::write(&source, "x").unwrap();

    assert_success(&env.save_profile(
        "P",
        &[
            "--source", source.to_str().unwrap(),
            "--target", env.dir.path().join("out.jar").to_str().unwrap(),
            "--keystore", "ks",
            "--alias", "a",
            "--keep-signatures",
        ],
    ));

    let output = env
        .cmd()
        .args(["sign", "P"])
        .write_stdin(format!("{}\n", MASTER))
        .output()
        .unwrap();
    assert_failure(&output);
    assert!(stderr(&output).contains("password was incorrect"));
}

#[test]
fn test_sign_relative_paths_resolve_against_cwd() {
    let env = TestEnv::new();
    noop_jar(&env);
    let record = recording_jarsigner(&env);

    std::fs::write(env.dir.path().join("app.jar"), "payload").unwrap();

    assert_success(&env.save_profile(
        "Rel",
        &[
            "--source", "app.jar",
            "--target", "out.jar",
            "--keystore", "ks",
            "--alias", "a",
            "--keep-signatures",
        ],
    ));

    let output = env
        .cmd()
        .args(["sign", "Rel"])
        .write_stdin(format!("{}\n", MASTER))
        .output()
        .unwrap();
    assert_success(&output);

    let target = env.dir.path().join("out.jar");
    assert!(target.exists(), "relative target must resolve against the caller's cwd");
    assert!(!env.home.path().join(".rejar").join("out.jar").exists());

    // jarsigner runs from the scratch dir, so it must have received the
    // absolute target path
    let argv = std::fs::read_to_string(&record).unwrap();
    assert!(argv.contains(target.to_str().unwrap()));
}

#[test]
fn test_sign_batch_signs_every_archive() {
    let env = TestEnv::new();
    noop_jar(&env);
    recording_jarsigner(&env);

    let source_dir = env.dir.path().join("in");
    let target_dir = env.dir.path().join("out");
    std::fs::create_dir_all(&source_dir).unwrap();
    std::fs::create_dir_all(&target_dir).unwrap();
    std::fs::write(source_dir.join("a.jar"), "a").unwrap();
    std::fs::write(source_dir.join("b.jar"), "b").unwrap();
    std::fs::write(source_dir.join("notes.txt"), "skip me").unwrap();

    assert_success(&env.save_profile(
        "Batch",
        &[
            "--source", source_dir.to_str().unwrap(),
            "--target", target_dir.to_str().unwrap(),
            "--keystore", "ks",
            "--alias", "a",
            "--folder",
            "--keep-signatures",
        ],
    ));

    let output = env
        .cmd()
        .args(["sign", "Batch"])
        .write_stdin(format!("{}\n", MASTER))
        .output()
        .unwrap();
    assert_success(&output);
    assert!(stdout(&output).contains("signed 2 archives"));

    assert!(target_dir.join("a.jar").exists());
    assert!(target_dir.join("b.jar").exists());
    assert!(!target_dir.join("notes.txt").exists());
}

#[test]
fn test_sign_batch_empty_directory_is_not_an_error() {
    let env = TestEnv::new();
    noop_jar(&env);
    recording_jarsigner(&env);

    let source_dir = env.dir.path().join("in");
    std::fs::create_dir_all(&source_dir).unwrap();
    let target_dir = env.dir.path().join("out");
    std::fs::create_dir_all(&target_dir).unwrap();

    assert_success(&env.save_profile(
        "Empty",
        &[
            "--source", source_dir.to_str().unwrap(),
            "--target", target_dir.to_str().unwrap(),
            "--keystore", "ks",
            "--alias", "a",
            "--folder",
            "--keep-signatures",
        ],
    ));

    let output = env
        .cmd()
        .args(["sign", "Empty"])
        .write_stdin(format!("{}\n", MASTER))
        .output()
        .unwrap();
    assert_success(&output);
    assert!(stdout(&output).contains("nothing to sign"));
}

#[test]
fn test_sign_without_profile_or_active_fails() {
    let env = TestEnv::new();

    // secure the store but save no profile: unlock via new-password path
    let output = env
        .cmd()
        .arg("sign")
        .write_stdin(format!("{}\n", MASTER))
        .output()
        .unwrap();
    assert_failure(&output);
    assert!(stderr(&output).contains("profile") || stdout(&output).contains("no active profile"));
}
