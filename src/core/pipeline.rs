//! Archive re-signing pipeline.
//!
//! Two independently invokable operations: `unsign` (unpack, strip
//! signature artifacts, edit the manifest, repack) and `sign` (invoke
//! jarsigner), plus a batch driver over a directory of archives.
//!
//! Operations are idempotent at the file level but must not run
//! concurrently against the same source/target pair.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::constants::{ARCHIVE_EXT, JARSIGNER_TIMEOUT, JAR_TIMEOUT, TSA_URL};
use crate::core::progress::{CancelToken, ProgressSink};
use crate::core::runner::CommandRunner;
use crate::error::{Error, PipelineError, Result, ValidationError};

// Phase labels reported to the progress sink. Also the `phase` field of
// PipelineError::Step, so failures name the step that died.
const PHASE_VERIFY: &str = "Verifying source JAR";
const PHASE_TEMP_DIR: &str = "Creating temp dir";
const PHASE_COPY_IN: &str = "Copying JAR";
const PHASE_UNPACK: &str = "Unpacking JAR";
const PHASE_DELETE_WORKING: &str = "Deleting working JAR file";
const PHASE_REMOVE_SIGS: &str = "Removing old signature blocks";
const PHASE_EDIT_MANIFEST: &str = "Editing MANIFEST.MF";
const PHASE_REPACK: &str = "Repacking JAR";
const PHASE_SIGN: &str = "Running jarsigner command";

/// Manifest lines containing any of these are dropped during unsign.
/// Exactly these three, case-sensitive.
const DIGEST_PATTERNS: [&str; 3] = ["Digest:", "Digest-Manifest:", "Digest-Manifest-Main-Attributes:"];

/// Cleartext signing arguments for one run. Built by the caller from an
/// unlocked profile; never persisted.
#[derive(Debug, Clone)]
pub struct SignSpec {
    pub keystore: String,
    pub storepass: String,
    pub alias: String,
    pub keypass: String,
    pub verbose: bool,
}

/// Terminal states of a sign run as observed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Cancelled,
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The source directory held no archives; not an error.
    Empty,
    Completed { signed: usize },
    Cancelled { signed: usize },
}

/// Callback seam for destructive-step confirmation. The pipeline waits
/// on the answer before overwriting anything.
pub trait OverwriteConfirmer {
    /// `existing` lists exactly the target files that already exist.
    fn confirm_overwrite(&mut self, existing: &[PathBuf]) -> Result<bool>;
}

/// Confirmer that always proceeds (non-interactive callers).
pub struct AlwaysConfirm;

impl OverwriteConfirmer for AlwaysConfirm {
    fn confirm_overwrite(&mut self, _existing: &[PathBuf]) -> Result<bool> {
        Ok(true)
    }
}

/// Orchestrates unsign/copy/sign runs through external JDK tools.
#[derive(Debug)]
pub struct ResignPipeline {
    jar_tool: PathBuf,
    jarsigner_tool: PathBuf,
    /// Private scratch area for temp dirs and captured tool output.
    scratch_dir: PathBuf,
}

impl ResignPipeline {
    pub fn new(
        jar_tool: impl Into<PathBuf>,
        jarsigner_tool: impl Into<PathBuf>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            jar_tool: jar_tool.into(),
            jarsigner_tool: jarsigner_tool.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    // --- Unsign ---

    /// Strip every signature artifact from `source` and write the
    /// unsigned archive to `target`.
    ///
    /// The scratch temp directory is a scoped guard, removed on every
    /// exit path including step failures.
    pub fn unsign(&self, source: &Path, target: &Path, sink: &dyn ProgressSink) -> Result<()> {
        // External tools run with the scratch dir (not the caller's cwd)
        // as their working directory, so relative paths must be pinned
        // down before they reach an argv.
        let source = absolutize(source)?;
        let target = absolutize(target)?;
        let (source, target) = (source.as_path(), target.as_path());
        debug!(source = %source.display(), target = %target.display(), "unsign");

        sink.phase(PHASE_VERIFY);
        if !source.exists() {
            return Err(PipelineError::SourceMissing(source.to_path_buf()).into());
        }

        sink.phase(PHASE_TEMP_DIR);
        let temp_dir = tempfile::Builder::new()
            .prefix("unsign-")
            .tempdir_in(&self.scratch_dir)
            .map_err(|e| PipelineError::step(PHASE_TEMP_DIR, Error::Io(e)))?;

        sink.phase(PHASE_COPY_IN);
        let file_name = source
            .file_name()
            .ok_or_else(|| PipelineError::SourceMissing(source.to_path_buf()))?;
        let working_jar = temp_dir.path().join(file_name);
        std::fs::copy(source, &working_jar)
            .map_err(|e| PipelineError::step(PHASE_COPY_IN, Error::Io(e)))?;

        sink.phase(PHASE_UNPACK);
        let argv = vec![
            self.jar_tool.display().to_string(),
            "xf".to_string(),
            working_jar.display().to_string(),
        ];
        // capture output outside the temp dir so it is not repacked
        CommandRunner::new(temp_dir.path(), JAR_TIMEOUT)
            .output_dir(&self.scratch_dir)
            .run(&argv)
            .map_err(|e| PipelineError::step(PHASE_UNPACK, e))?;

        sink.phase(PHASE_DELETE_WORKING);
        std::fs::remove_file(&working_jar)
            .map_err(|e| PipelineError::step(PHASE_DELETE_WORKING, Error::Io(e)))?;

        let meta_inf = temp_dir.path().join("META-INF");

        sink.phase(PHASE_REMOVE_SIGS);
        remove_signatures(&meta_inf).map_err(|e| PipelineError::step(PHASE_REMOVE_SIGS, e))?;

        sink.phase(PHASE_EDIT_MANIFEST);
        edit_manifest(&meta_inf).map_err(|e| PipelineError::step(PHASE_EDIT_MANIFEST, e))?;

        sink.phase(PHASE_REPACK);
        let argv = vec![
            self.jar_tool.display().to_string(),
            "cMf".to_string(),
            target.display().to_string(),
            "-C".to_string(),
            temp_dir.path().display().to_string(),
            ".".to_string(),
        ];
        CommandRunner::new(&self.scratch_dir, JAR_TIMEOUT)
            .run(&argv)
            .map_err(|e| PipelineError::step(PHASE_REPACK, e))?;

        Ok(())
    }

    /// Copy `source` to `target` untouched (sign-only runs).
    pub fn copy_jar(&self, source: &Path, target: &Path, sink: &dyn ProgressSink) -> Result<()> {
        sink.phase(PHASE_COPY_IN);
        if !source.exists() {
            return Err(PipelineError::SourceMissing(source.to_path_buf()).into());
        }
        std::fs::copy(source, target)
            .map_err(|e| PipelineError::step(PHASE_COPY_IN, Error::Io(e)))?;
        Ok(())
    }

    // --- Sign ---

    /// Sign `target` in place with jarsigner.
    ///
    /// Each missing input is a distinct reported error, checked before
    /// the tool is invoked.
    pub fn sign(&self, target: &Path, spec: &SignSpec, sink: &dyn ProgressSink) -> Result<()> {
        validate_spec(spec)?;
        // jarsigner runs from the scratch dir, so the target it receives
        // must be absolute.
        let target = absolutize(target)?;
        let target = target.as_path();
        if !target.exists() {
            return Err(PipelineError::TargetMissing(target.to_path_buf()).into());
        }

        sink.phase(PHASE_SIGN);

        let mut argv = vec![
            self.jarsigner_tool.display().to_string(),
            "-keystore".to_string(),
            spec.keystore.clone(),
            "-storepass".to_string(),
            spec.storepass.clone(),
            "-keypass".to_string(),
            spec.keypass.clone(),
        ];
        if spec.verbose {
            argv.push("-verbose".to_string());
        }
        argv.push("-tsa".to_string());
        argv.push(TSA_URL.to_string());
        argv.push(target.display().to_string());
        argv.push(spec.alias.clone());

        CommandRunner::new(&self.scratch_dir, JARSIGNER_TIMEOUT)
            .run(&argv)
            .map_err(|e| PipelineError::step(PHASE_SIGN, e))?;

        sink.phase("Finished");
        Ok(())
    }

    // --- Single run ---

    /// One full run over a single archive: validate, then unsign or
    /// copy, then sign.
    ///
    /// Cancellation is honored only at the boundary between the
    /// unsign/copy phase and the sign phase; a request arriving
    /// mid-unsign still completes that phase before tearing down.
    pub fn run_single(
        &self,
        source: &Path,
        target: &Path,
        replace_signatures: bool,
        spec: &SignSpec,
        sink: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<RunStatus> {
        validate_spec(spec)?;
        sink.fraction(0.1);

        if replace_signatures {
            self.unsign(source, target, sink)?;
        } else {
            self.copy_jar(source, target, sink)?;
        }
        sink.fraction(0.5);

        if cancel.is_cancelled() {
            warn!("sign run cancelled before signing phase");
            return Ok(RunStatus::Cancelled);
        }

        self.sign(target, spec, sink)?;
        sink.fraction(1.0);
        Ok(RunStatus::Succeeded)
    }

    // --- Batch ---

    /// Run over every archive directly inside `source_dir`, writing
    /// results of the same name into `target_dir`.
    ///
    /// Before anything is overwritten the confirmer is shown exactly
    /// the subset of target files that already exist. Overall progress
    /// accrues `1 / (2 x count)` per sub-step and is monotonic.
    pub fn run_batch(
        &self,
        source_dir: &Path,
        target_dir: &Path,
        replace_signatures: bool,
        spec: &SignSpec,
        sink: &dyn ProgressSink,
        cancel: &CancelToken,
        confirmer: &mut dyn OverwriteConfirmer,
    ) -> Result<BatchOutcome> {
        validate_spec(spec)?;
        let source_dir = absolutize(source_dir)?;
        let target_dir = absolutize(target_dir)?;
        let target_dir = target_dir.as_path();

        let archives = list_archives(&source_dir)?;
        if archives.is_empty() {
            sink.console("No archives found in source directory");
            return Ok(BatchOutcome::Empty);
        }

        let targets: Vec<PathBuf> = archives
            .iter()
            .filter_map(|a| a.file_name().map(|name| target_dir.join(name)))
            .collect();

        let existing: Vec<PathBuf> = targets.iter().filter(|t| t.exists()).cloned().collect();
        if !existing.is_empty() && !confirmer.confirm_overwrite(&existing)? {
            return Ok(BatchOutcome::Cancelled { signed: 0 });
        }

        let unit = 1.0 / (2.0 * archives.len() as f64);
        let mut accrued = 0.0;
        let mut signed = 0;

        for (archive, target) in archives.iter().zip(&targets) {
            sink.console(&format!("Processing {}", archive.display()));

            if replace_signatures {
                self.unsign(archive, target, sink)?;
            } else {
                self.copy_jar(archive, target, sink)?;
            }
            accrued += unit;
            sink.fraction(accrued);

            if cancel.is_cancelled() {
                warn!(signed, "batch cancelled between phases");
                return Ok(BatchOutcome::Cancelled { signed });
            }

            self.sign(target, spec, sink)?;
            accrued += unit;
            sink.fraction(accrued);
            signed += 1;
        }

        Ok(BatchOutcome::Completed { signed })
    }
}

/// Resolve a relative path against the caller's cwd. The pipeline's
/// external tools run from the scratch dir, so every path handed to
/// them must already be absolute.
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Immediate children of `dir` whose name ends in the archive
/// extension, case-insensitive, in stable name order.
fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_archive_ext(path))
        .collect();
    archives.sort();
    Ok(archives)
}

fn has_archive_ext(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(ARCHIVE_EXT))
        .unwrap_or(false)
}

fn validate_spec(spec: &SignSpec) -> Result<()> {
    if spec.storepass.is_empty() {
        return Err(ValidationError::MissingField("storepass").into());
    }
    if spec.keypass.is_empty() {
        return Err(ValidationError::MissingField("keypass").into());
    }
    if spec.alias.is_empty() {
        return Err(ValidationError::MissingField("alias").into());
    }
    if spec.keystore.is_empty() {
        return Err(ValidationError::MissingField("keystore").into());
    }
    Ok(())
}

/// Delete every `.SF` file under `META-INF` along with each sibling
/// sharing its base name but not ending in `.SF` (`.RSA`/`.DSA`/vendor
/// signature blocks).
pub(crate) fn remove_signatures(meta_inf: &Path) -> Result<()> {
    if !meta_inf.is_dir() {
        warn!(dir = %meta_inf.display(), "no META-INF directory; nothing to strip");
        return Ok(());
    }

    let names: Vec<String> = std::fs::read_dir(meta_inf)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();

    for sf in names.iter().filter(|n| n.ends_with(".SF")) {
        let base = sf.trim_end_matches(".SF");
        for sibling in names
            .iter()
            .filter(|n| n.starts_with(base) && !n.ends_with(".SF"))
        {
            debug!(file = %sibling, "deleting signature block");
            std::fs::remove_file(meta_inf.join(sibling))?;
        }
        debug!(file = %sf, "deleting signature file");
        std::fs::remove_file(meta_inf.join(sf))?;
    }

    Ok(())
}

/// Rewrite `MANIFEST.MF` dropping digest lines, atomically (uniquely
/// suffixed temp file, then rename over the original).
pub(crate) fn edit_manifest(meta_inf: &Path) -> Result<()> {
    let manifest = meta_inf.join("MANIFEST.MF");
    if !manifest.exists() {
        warn!(file = %manifest.display(), "no MANIFEST.MF; nothing to edit");
        return Ok(());
    }

    let contents = std::fs::read_to_string(&manifest)?;
    let mut kept = String::new();
    for line in contents.lines() {
        if DIGEST_PATTERNS.iter().any(|p| line.contains(p)) {
            continue;
        }
        kept.push_str(line);
        kept.push('\n');
    }

    let tmp = tempfile::Builder::new()
        .prefix("MANIFEST.MF-")
        .tempfile_in(meta_inf)?;
    std::fs::write(tmp.path(), kept)?;
    tmp.persist(&manifest)
        .map_err(|e| Error::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::NullSink;
    use tempfile::TempDir;

    fn spec() -> SignSpec {
        SignSpec {
            keystore: "/tmp/mykeystore".to_string(),
            storepass: "sp".to_string(),
            alias: "business1".to_string(),
            keypass: "kp".to_string(),
            verbose: false,
        }
    }

    fn touch(path: &Path) {
        std::fs::write(path, "x").unwrap();
    }

    // --- signature removal ---

    #[test]
    fn test_remove_signatures_deletes_sf_and_siblings() {
        let tmp = TempDir::new().unwrap();
        let meta_inf = tmp.path().join("META-INF");
        std::fs::create_dir(&meta_inf).unwrap();
        for name in ["VENDOR.SF", "VENDOR.RSA", "VENDOR.DSA", "MANIFEST.MF", "LICENSE.txt"] {
            touch(&meta_inf.join(name));
        }

        remove_signatures(&meta_inf).unwrap();

        let mut left: Vec<String> = std::fs::read_dir(&meta_inf)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        left.sort();
        assert_eq!(left, vec!["LICENSE.txt", "MANIFEST.MF"]);
    }

    #[test]
    fn test_remove_signatures_missing_meta_inf_is_ok() {
        let tmp = TempDir::new().unwrap();
        remove_signatures(&tmp.path().join("META-INF")).unwrap();
    }

    // --- manifest editing ---

    const SIGNED_MANIFEST: &str = "\
Manifest-Version: 1.0
Created-By: 1.8.0_40 (Oracle Corporation)

Name: com/example/App.class
SHA-256-Digest: abc123==

Name: com/example/Util.class
SHA-256-Digest: def456==
";

    #[test]
    fn test_edit_manifest_strips_digest_lines_only() {
        let tmp = TempDir::new().unwrap();
        let meta_inf = tmp.path().join("META-INF");
        std::fs::create_dir(&meta_inf).unwrap();
        std::fs::write(meta_inf.join("MANIFEST.MF"), SIGNED_MANIFEST).unwrap();

        edit_manifest(&meta_inf).unwrap();

        let edited = std::fs::read_to_string(meta_inf.join("MANIFEST.MF")).unwrap();
        assert!(!edited.contains("Digest:"));
        assert!(edited.contains("Manifest-Version: 1.0"));
        assert!(edited.contains("Name: com/example/App.class"));
    }

    #[test]
    fn test_edit_manifest_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let meta_inf = tmp.path().join("META-INF");
        std::fs::create_dir(&meta_inf).unwrap();
        std::fs::write(meta_inf.join("MANIFEST.MF"), SIGNED_MANIFEST).unwrap();

        edit_manifest(&meta_inf).unwrap();
        let once = std::fs::read_to_string(meta_inf.join("MANIFEST.MF")).unwrap();
        edit_manifest(&meta_inf).unwrap();
        let twice = std::fs::read_to_string(meta_inf.join("MANIFEST.MF")).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_edit_manifest_strips_all_three_patterns() {
        let tmp = TempDir::new().unwrap();
        let meta_inf = tmp.path().join("META-INF");
        std::fs::create_dir(&meta_inf).unwrap();
        std::fs::write(
            meta_inf.join("MANIFEST.MF"),
            "Manifest-Version: 1.0\n\
             SHA-256-Digest: a==\n\
             SHA-256-Digest-Manifest: b==\n\
             SHA-256-Digest-Manifest-Main-Attributes: c==\n\
             Main-Class: com.example.App\n",
        )
        .unwrap();

        edit_manifest(&meta_inf).unwrap();

        let edited = std::fs::read_to_string(meta_inf.join("MANIFEST.MF")).unwrap();
        assert_eq!(edited, "Manifest-Version: 1.0\nMain-Class: com.example.App\n");
    }

    // --- validation ---

    #[test]
    fn test_sign_reports_each_missing_field() {
        let tmp = TempDir::new().unwrap();
        let pipeline = ResignPipeline::new("jar", "jarsigner", tmp.path());
        let target = tmp.path().join("out.jar");
        touch(&target);

        for field in ["storepass", "keypass", "alias", "keystore"] {
            let mut s = spec();
            match field {
                "storepass" => s.storepass.clear(),
                "keypass" => s.keypass.clear(),
                "alias" => s.alias.clear(),
                _ => s.keystore.clear(),
            }
            let err = pipeline.sign(&target, &s, &NullSink).unwrap_err();
            assert!(err.to_string().contains(field), "expected {} in: {}", field, err);
        }
    }

    #[test]
    fn test_sign_missing_target() {
        let tmp = TempDir::new().unwrap();
        let pipeline = ResignPipeline::new("jar", "jarsigner", tmp.path());
        let err = pipeline
            .sign(&tmp.path().join("absent.jar"), &spec(), &NullSink)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Pipeline(PipelineError::TargetMissing(_))
        ));
    }

    #[test]
    fn test_unsign_missing_source() {
        let tmp = TempDir::new().unwrap();
        let pipeline = ResignPipeline::new("jar", "jarsigner", tmp.path());
        let err = pipeline
            .unsign(&tmp.path().join("absent.jar"), &tmp.path().join("out.jar"), &NullSink)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Pipeline(PipelineError::SourceMissing(_))
        ));
    }

    // --- batch enumeration ---

    #[test]
    fn test_list_archives_case_insensitive_immediate_children() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jar"));
        touch(&tmp.path().join("B.JAR"));
        touch(&tmp.path().join("notes.txt"));
        std::fs::create_dir(tmp.path().join("nested.jar")).unwrap(); // a dir, not a file
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        touch(&tmp.path().join("sub/deep.jar")); // not an immediate child

        let archives = list_archives(tmp.path()).unwrap();
        let names: Vec<_> = archives
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["B.JAR", "a.jar"]);
    }

    #[test]
    fn test_absolutize_pins_relative_paths_to_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolutize(Path::new("out.jar")).unwrap(), cwd.join("out.jar"));

        let abs = cwd.join("a.jar");
        assert_eq!(absolutize(&abs).unwrap(), abs);
    }

    // --- cancellation safe point ---

    #[test]
    fn test_run_single_cancelled_skips_sign_phase() {
        let tmp = TempDir::new().unwrap();
        // a sign attempt would fail loudly against this path
        let pipeline = ResignPipeline::new("jar", "/nonexistent/jarsigner", tmp.path());

        let source = tmp.path().join("app.jar");
        let target = tmp.path().join("out.jar");
        touch(&source);

        let cancel = CancelToken::new();
        cancel.cancel();

        let status = pipeline
            .run_single(&source, &target, false, &spec(), &NullSink, &cancel)
            .unwrap();

        assert_eq!(status, RunStatus::Cancelled);
        assert!(target.exists(), "copy phase completes before the cancel point");
    }

    /// Sink that requests cancellation as soon as the first sub-step
    /// reports progress, i.e. right at the safe point.
    struct CancelOnFirstFraction {
        token: CancelToken,
    }

    impl ProgressSink for CancelOnFirstFraction {
        fn phase(&self, _label: &str) {}
        fn fraction(&self, _value: f64) {
            self.token.cancel();
        }
        fn console(&self, _line: &str) {}
    }

    #[test]
    fn test_batch_cancel_honored_between_phases() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        let target = tmp.path().join("dst");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        touch(&source.join("a.jar"));
        touch(&source.join("b.jar"));

        let pipeline = ResignPipeline::new("jar", "/nonexistent/jarsigner", tmp.path());
        let cancel = CancelToken::new();
        let sink = CancelOnFirstFraction {
            token: cancel.clone(),
        };

        let outcome = pipeline
            .run_batch(
                &source,
                &target,
                false,
                &spec(),
                &sink,
                &cancel,
                &mut AlwaysConfirm,
            )
            .unwrap();

        assert_eq!(outcome, BatchOutcome::Cancelled { signed: 0 });
        assert!(target.join("a.jar").exists(), "first copy completes");
        assert!(!target.join("b.jar").exists(), "run stops at the safe point");
    }

    struct Recording {
        asked: Option<Vec<PathBuf>>,
        answer: bool,
    }

    impl OverwriteConfirmer for Recording {
        fn confirm_overwrite(&mut self, existing: &[PathBuf]) -> Result<bool> {
            self.asked = Some(existing.to_vec());
            Ok(self.answer)
        }
    }

    #[test]
    fn test_batch_empty_source_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        let target = tmp.path().join("dst");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&target).unwrap();

        let pipeline = ResignPipeline::new("jar", "jarsigner", tmp.path());
        let mut confirmer = Recording { asked: None, answer: true };
        let outcome = pipeline
            .run_batch(
                &source,
                &target,
                false,
                &spec(),
                &NullSink,
                &CancelToken::new(),
                &mut confirmer,
            )
            .unwrap();

        assert_eq!(outcome, BatchOutcome::Empty);
        assert!(confirmer.asked.is_none(), "no overwrite prompt for empty batch");
    }

    #[test]
    fn test_batch_overwrite_prompt_lists_exactly_existing_targets() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        let target = tmp.path().join("dst");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        touch(&source.join("a.jar"));
        touch(&source.join("b.jar"));
        touch(&target.join("b.jar")); // only b already exists

        let pipeline = ResignPipeline::new("jar", "jarsigner", tmp.path());
        let mut confirmer = Recording { asked: None, answer: false };
        let outcome = pipeline
            .run_batch(
                &source,
                &target,
                false,
                &spec(),
                &NullSink,
                &CancelToken::new(),
                &mut confirmer,
            )
            .unwrap();

        assert_eq!(outcome, BatchOutcome::Cancelled { signed: 0 });
        assert_eq!(confirmer.asked.unwrap(), vec![target.join("b.jar")]);
    }
}
