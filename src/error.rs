//! Error types for rejar.
//!
//! Errors are layered: each subsystem has its own enum, and all of them
//! fold into the top-level [`Error`] via `#[from]`. Callers that care
//! about a specific failure match on the inner enum; everything else
//! bubbles up to `main` for display.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Failures from the external-process layer.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The process could not be started, or I/O around it failed.
    #[error("error invoking command {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited non-zero. Carries the first line of
    /// captured output, which is usually the tool's own error message.
    #[error("command '{program}' failed to run\n{first_line}")]
    NonZeroExit { program: String, first_line: String },

    /// The process did not exit within the configured timeout.
    #[error("command '{program}' timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    /// An empty argv was passed to the runner.
    #[error("argv cannot be empty")]
    EmptyArgv,

    /// A required external tool was not found on jdkHome or PATH.
    #[error("tool '{0}' not found; set jdkHome or add it to PATH")]
    ToolNotFound(String),
}

/// Failures from the archive re-signing pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("source jar file {0} does not exist")]
    SourceMissing(PathBuf),

    #[error("target jar file {0} does not exist")]
    TargetMissing(PathBuf),

    /// A pipeline step failed; remaining steps were not attempted.
    #[error("{phase} failed: {source}")]
    Step {
        phase: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl PipelineError {
    pub fn step(phase: &'static str, source: impl Into<Error>) -> Self {
        Self::Step {
            phase,
            source: Box::new(source.into()),
        }
    }
}

/// Failures from the profile store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("profile not found: {0}")]
    NotFound(String),

    #[error("profile name already in use: {0}")]
    NameInUse(String),

    #[error("{0} exists as a file and must be a directory; delete the file and restart")]
    DataDirCollision(PathBuf),

    #[error("unable to determine home directory")]
    NoHomeDir,

    #[error("config read failed: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("config write failed: {0}")]
    WriteFile(#[source] std::io::Error),

    #[error("config parse failed: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("master password not accepted; store remains locked")]
    Locked,
}

/// Failures from the secret cipher.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

/// Pre-flight validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("profile name cannot be empty")]
    EmptyProfileName,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("passwords do not match")]
    PasswordMismatch,
}

pub type Result<T> = std::result::Result<T, Error>;
