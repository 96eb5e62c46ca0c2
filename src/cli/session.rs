//! Interactive master-password prompts.
//!
//! Implements the unlock seam with dialoguer prompts, falling back to
//! plain line reads when stdin is a pipe. Commands that need decrypted
//! secrets go through [`open_unlocked`].

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, Password};
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::session::{PromptReply, Session, UnlockOutcome, UnlockPrompt};
use crate::core::store::ProfileStore;
use crate::error::{Result, StoreError};

/// Terminal-backed unlock prompt.
pub struct TermPrompt;

/// Read one line from piped stdin; EOF means the caller gave up.
fn read_piped_line() -> Result<Option<Zeroizing<String>>> {
    let mut input = String::new();
    let n = io::stdin().read_line(&mut input)?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(Zeroizing::new(input.trim_end().to_string())))
}

impl UnlockPrompt for TermPrompt {
    fn existing_password(&mut self, attempt: u32, max: u32) -> Result<PromptReply> {
        if !io::stdin().is_terminal() {
            return Ok(match read_piped_line()? {
                Some(pw) => PromptReply::Password(pw),
                None => PromptReply::Cancelled,
            });
        }

        let label = if attempt == 1 {
            "Master password".to_string()
        } else {
            format!("Master password ({} of {})", attempt, max)
        };
        let entered = Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()?;

        // Empty entry opens the forgot-password escape hatch.
        if entered.is_empty() {
            let forgot = Confirm::new()
                .with_prompt("Forgot the master password? This deletes every stored profile")
                .default(false)
                .interact()?;
            return Ok(if forgot {
                PromptReply::ForgotPassword
            } else {
                PromptReply::Cancelled
            });
        }

        Ok(PromptReply::Password(Zeroizing::new(entered)))
    }

    fn new_password(&mut self) -> Result<Option<(Zeroizing<String>, Zeroizing<String>)>> {
        if !io::stdin().is_terminal() {
            // Piped input: one line, confirmed against itself.
            return Ok(read_piped_line()?.map(|pw| (pw.clone(), pw)));
        }

        output::dimmed("No master password set yet; choose one to secure your profiles.");
        let password = Password::new()
            .with_prompt("New master password")
            .allow_empty_password(true)
            .interact()?;
        if password.is_empty() {
            return Ok(None);
        }
        let confirmation = Password::new()
            .with_prompt("Confirm master password")
            .allow_empty_password(true)
            .interact()?;

        Ok(Some((
            Zeroizing::new(password),
            Zeroizing::new(confirmation),
        )))
    }

    fn reject_new_password(&mut self, reason: &str) {
        output::warn(reason);
    }
}

/// Prompt for a single hidden value (storepass/keypass entry).
pub fn prompt_secret(label: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        return Ok(read_piped_line()?.unwrap_or_default());
    }
    let entered = Password::new()
        .with_prompt(label)
        .allow_empty_password(true)
        .interact()?;
    Ok(Zeroizing::new(entered))
}

/// Open the store and run the unlock flow.
///
/// `Ok(None)` means the user backed out (cancel or reset); the caller
/// prints nothing further and exits cleanly. Exhausting every password
/// attempt is an error.
pub fn open_unlocked() -> Result<Option<Session>> {
    let store = ProfileStore::open()?;
    let mut session = Session::new(store);

    match session.unlock(&mut TermPrompt)? {
        UnlockOutcome::Unlocked => Ok(Some(session)),
        UnlockOutcome::Cancelled => {
            output::warn("cancelled");
            Ok(None)
        }
        UnlockOutcome::Reset => {
            output::warn("profile store deleted; the next run starts fresh");
            Ok(None)
        }
        UnlockOutcome::MaxRetriesExceeded => Err(StoreError::Locked.into()),
    }
}
