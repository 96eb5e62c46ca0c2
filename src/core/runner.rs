//! External process execution.
//!
//! Runs an argv vector as a child process with a working directory, a
//! timeout, and captured stdout. The capture goes through a uniquely
//! named temp file in the output directory (some tools re-open their
//! own output), which is removed on every exit path.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::error::CommandError;

/// How often the runner polls a child that has not exited yet.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a completed command.
///
/// Transient: consumed immediately by the calling pipeline step, never
/// persisted.
#[derive(Debug)]
pub struct CommandOutput {
    /// Captured stdout, one element per line.
    pub lines: Vec<String>,
    /// Wall-clock time the command took.
    pub elapsed: Duration,
}

impl CommandOutput {
    /// First line of captured output, or an empty string.
    pub fn first_line(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or("")
    }
}

/// Executes an OS command as a child process.
#[derive(Debug)]
pub struct CommandRunner {
    working_dir: PathBuf,
    output_dir: Option<PathBuf>,
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(working_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            working_dir: working_dir.into(),
            output_dir: None,
            timeout,
        }
    }

    /// Capture output under `dir` instead of the working directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Run `argv` to completion.
    ///
    /// # Errors
    ///
    /// - [`CommandError::EmptyArgv`] if `argv` is empty
    /// - [`CommandError::Launch`] if the process could not start or I/O failed
    /// - [`CommandError::NonZeroExit`] carrying the first captured output line
    /// - [`CommandError::Timeout`] if the child outlived the configured timeout
    pub fn run(&self, argv: &[String]) -> Result<CommandOutput, CommandError> {
        let program = match argv.first() {
            Some(p) => p.clone(),
            None => {
                error!("argv must contain at least one item");
                return Err(CommandError::EmptyArgv);
            }
        };

        let launch = |source| CommandError::Launch {
            program: program.clone(),
            source,
        };

        let capture_dir = self.output_dir.as_deref().unwrap_or(&self.working_dir);

        // NamedTempFile unlinks on drop, so the capture file is gone on
        // every exit path, including errors below.
        let capture = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile_in(capture_dir)
            .map_err(&launch)?;

        let stdout = capture.as_file().try_clone().map_err(&launch)?;

        debug!(program = %program, args = argv.len() - 1, dir = %self.working_dir.display(), "spawning");

        let started = Instant::now();
        let mut child = std::process::Command::new(&program)
            .args(&argv[1..])
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(stdout)
            .spawn()
            .map_err(&launch)?;

        let status = loop {
            match child.try_wait().map_err(&launch)? {
                Some(status) => break status,
                None => {
                    if started.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        error!(program = %program, timeout = ?self.timeout, "command timed out");
                        return Err(CommandError::Timeout {
                            program,
                            timeout: self.timeout,
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        };

        let lines = read_lines(capture.path()).map_err(&launch)?;
        dump_output(&program, &lines);

        if status.success() {
            debug!(program = %program, "command executed successfully");
            Ok(CommandOutput {
                lines,
                elapsed: started.elapsed(),
            })
        } else {
            let first_line = lines.first().cloned().unwrap_or_default();
            error!(program = %program, first_line = %first_line, "command exited non-zero");
            Err(CommandError::NonZeroExit {
                program,
                first_line,
            })
        }
    }
}

fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_string).collect())
}

/// Replay captured output at debug level, line-numbered. Diagnostic
/// only, never part of the control-flow contract.
fn dump_output(program: &str, lines: &[String]) {
    if !lines.is_empty() {
        debug!(program = %program, "output from command");
        for (n, line) in lines.iter().enumerate() {
            debug!("{} {}", n + 1, line);
        }
    }
}
