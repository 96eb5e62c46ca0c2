//! Sign command: unsign/copy then re-sign, single archive or a whole
//! directory, driven by a stored profile.
//!
//! The pipeline runs on a worker thread; progress events flow back over
//! an mpsc channel and render here. The store is only touched on this
//! thread, before the worker starts and after it finishes.
//!
//! The cancel token passed to the worker is never triggered from this
//! command (there is no interrupt handler); declining the batch
//! overwrite prompt is the one interactive way to stop a run early.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use dialoguer::Confirm;
use tracing::info;

use crate::cli::output;
use crate::cli::session;
use crate::core::pipeline::{
    BatchOutcome, OverwriteConfirmer, ResignPipeline, RunStatus, SignSpec,
};
use crate::core::progress::{CancelToken, ChannelSink, ProgressEvent};
use crate::core::store::{ProfileStore, SigningMode};
use crate::core::tools;
use crate::error::{Error, Result, ValidationError};

enum Outcome {
    Single(RunStatus),
    Batch(BatchOutcome),
}

/// Confirms overwrites at the terminal; piped runs proceed.
struct PromptConfirmer;

impl OverwriteConfirmer for PromptConfirmer {
    fn confirm_overwrite(&mut self, existing: &[PathBuf]) -> Result<bool> {
        if !io::stdin().is_terminal() {
            return Ok(true);
        }
        output::warn("these target files already exist:");
        for path in existing {
            output::list_item(&path.display().to_string());
        }
        Ok(Confirm::new()
            .with_prompt("Overwrite them?")
            .default(false)
            .interact()?)
    }
}

pub fn execute(
    profile_name: Option<&str>,
    source_override: Option<PathBuf>,
    target_override: Option<PathBuf>,
) -> Result<()> {
    let mut session = match session::open_unlocked()? {
        Some(s) => s,
        None => return Ok(()),
    };

    let name = match profile_name {
        Some(n) => n.to_string(),
        None => {
            let active = session.store.document.active_profile.clone();
            if active.is_empty() {
                output::error("no active profile");
                output::hint(&format!(
                    "pass a profile name or create one with {}",
                    output::cmd("rejar profile save NAME")
                ));
                return Err(ValidationError::MissingField("profile").into());
            }
            active
        }
    };

    let profile = session.store.load_profile(&name)?.clone();
    info!("signing with profile: {}", profile.name);

    let source = source_override
        .or_else(|| profile.source_path().map(PathBuf::from))
        .ok_or(ValidationError::MissingField("source"))?;
    let target = target_override
        .or_else(|| profile.target_path().map(PathBuf::from))
        .ok_or(ValidationError::MissingField("target"))?;

    let signer = profile
        .signer
        .clone()
        .ok_or(ValidationError::MissingField("keystore"))?;
    let spec = SignSpec {
        keystore: signer.keystore.clone(),
        storepass: signer.storepass.to_string(),
        alias: signer.alias.clone(),
        keypass: signer.keypass.to_string(),
        verbose: signer.verbose,
    };

    let jdk_home = session.store.document.jdk_home.clone();
    let jar = tools::find_tool(&jdk_home, tools::JAR)?;
    let jarsigner = tools::find_tool(&jdk_home, tools::JARSIGNER)?;
    let scratch = ProfileStore::data_dir()?;

    let pipeline = ResignPipeline::new(jar, jarsigner, scratch);
    let cancel = CancelToken::new();

    let outcome = run_on_worker(
        pipeline,
        profile.mode,
        source,
        target,
        profile.replace_signatures,
        spec,
        cancel,
    )?;

    match outcome {
        Outcome::Single(RunStatus::Succeeded) => {
            output::success(&format!("signed with {}", output::name(&profile.name)));
        }
        Outcome::Single(RunStatus::Cancelled) => {
            output::warn("cancelled before signing");
            return Ok(());
        }
        Outcome::Batch(BatchOutcome::Empty) => {
            output::dimmed("nothing to sign");
            return Ok(());
        }
        Outcome::Batch(BatchOutcome::Completed { signed }) => {
            output::success(&format!(
                "signed {} archive{} with {}",
                signed,
                if signed == 1 { "" } else { "s" },
                output::name(&profile.name)
            ));
        }
        Outcome::Batch(BatchOutcome::Cancelled { signed }) => {
            output::warn(&format!("cancelled after {} signed", signed));
            return Ok(());
        }
    }

    // Record the successful run.
    session.store.document.active_profile = profile.name.clone();
    session.store.push_recent(&profile.name);
    session.save()?;
    Ok(())
}

/// Spawn the pipeline on a worker thread and drain its progress events
/// until it finishes.
fn run_on_worker(
    pipeline: ResignPipeline,
    mode: SigningMode,
    source: PathBuf,
    target: PathBuf,
    replace_signatures: bool,
    spec: SignSpec,
    cancel: CancelToken,
) -> Result<Outcome> {
    let (tx, rx) = mpsc::channel();

    let worker = thread::spawn(move || -> Result<Outcome> {
        let sink = ChannelSink::new(tx);
        match mode {
            SigningMode::Jar => pipeline
                .run_single(&source, &target, replace_signatures, &spec, &sink, &cancel)
                .map(Outcome::Single),
            SigningMode::Folder => pipeline
                .run_batch(
                    &source,
                    &target,
                    replace_signatures,
                    &spec,
                    &sink,
                    &cancel,
                    &mut PromptConfirmer,
                )
                .map(Outcome::Batch),
        }
    });

    // Sender is moved into the worker, so this loop ends when it does.
    for event in rx {
        render(&event);
    }

    worker.join().unwrap_or_else(|_| {
        Err(Error::Io(io::Error::new(
            io::ErrorKind::Other,
            "sign worker panicked",
        )))
    })
}

fn render(event: &ProgressEvent) {
    match event {
        ProgressEvent::Phase(label) => output::dimmed(label),
        ProgressEvent::Fraction(f) => {
            info!("progress: {:.0}%", f * 100.0);
        }
        ProgressEvent::Console(line) => println!("{}", line),
    }
}
