//! End-to-end unsign test with a stub `jar` tool.
//!
//! The stub fakes unpacking (drops a signed META-INF into the scratch
//! dir) and repacking (copies the edited manifest out as the "archive"),
//! which lets the test see exactly what the pipeline changed.

#![cfg(unix)]

mod harness;
use harness::{assert_failure, assert_success, stderr, TestEnv};

const SIGNED_MANIFEST: &str = "\
Manifest-Version: 1.0\n\
Created-By: 1.8.0_40 (Oracle Corporation)\n\
Name: com/example/App.class\n\
SHA-256-Digest: abc123==\n\
SHA-256-Digest-Manifest: def456==\n\
SHA-256-Digest-Manifest-Main-Attributes: ghi789==\n\
Main-Class: com.example.App\n";

fn stub_jar(env: &TestEnv) {
    let manifest = env.dir.path().join("fixture-manifest.mf");
    std::fs::write(&manifest, SIGNED_MANIFEST).unwrap();

    // xf runs inside the pipeline's temp dir; cMf repacks it. The repack
    // copies only the manifest so the test can inspect the edit.
    env.stub_tool(
        "jar",
        &format!(
            r#"case "$1" in
xf)
  mkdir -p META-INF
  cp {manifest} META-INF/MANIFEST.MF
  : > META-INF/SIGNER.SF
  : > META-INF/SIGNER.RSA
  ;;
cMf)
  cp "$4/META-INF/MANIFEST.MF" "$2"
  ;;
esac
exit 0"#,
            manifest = manifest.display()
        ),
    );
}

#[test]
fn test_unsign_strips_digest_lines_and_signature_files() {
    let env = TestEnv::new();
    stub_jar(&env);
    env.stub_tool("jarsigner", "exit 0");

    let source = env.dir.path().join("app.jar");
    let target = env.dir.path().join("app-unsigned.jar");
    std::fs::write(&source, "fake signed jar").unwrap();

    let output = env
        .cmd()
        .args([
            "unsign",
            source.to_str().unwrap(),
            target.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert_success(&output);

    let repacked = std::fs::read_to_string(&target).unwrap();
    assert!(!repacked.contains("Digest"));
    assert!(repacked.contains("Manifest-Version: 1.0"));
    assert!(repacked.contains("Main-Class: com.example.App"));
}

#[test]
fn test_unsign_relative_target_lands_in_invocation_cwd() {
    let env = TestEnv::new();
    stub_jar(&env);
    env.stub_tool("jarsigner", "exit 0");
    std::fs::write(env.dir.path().join("app.jar"), "fake signed jar").unwrap();

    // both paths relative to the invocation directory
    let output = env
        .cmd()
        .args(["unsign", "app.jar", "out.jar"])
        .output()
        .unwrap();
    assert_success(&output);

    let target = env.dir.path().join("out.jar");
    assert!(target.exists(), "relative target must resolve against the caller's cwd");
    assert!(
        !env.home.path().join(".rejar").join("out.jar").exists(),
        "nothing may land in the scratch dir"
    );
    assert!(std::fs::read_to_string(&target)
        .unwrap()
        .contains("Manifest-Version: 1.0"));
}

#[test]
fn test_unsign_missing_source_fails() {
    let env = TestEnv::new();
    stub_jar(&env);
    env.stub_tool("jarsigner", "exit 0");

    let output = env
        .cmd()
        .args(["unsign", "absent.jar", "out.jar"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert!(stderr(&output).contains("does not exist"));
}
