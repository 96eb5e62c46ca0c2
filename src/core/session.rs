//! Session state and the master-password unlock flow.
//!
//! A [`Session`] owns the loaded store, the in-memory master password,
//! and a dirty flag for unsaved edits. It is owned by the interactive
//! context; background workers copy what they need at operation start
//! instead of sharing it.
//!
//! Unlock is a small state machine with four terminal outcomes, and
//! those are the only states callers branch on.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::constants::{MAX_PASSWORD_RETRIES, MIN_PASSWORD_LENGTH};
use crate::core::crypto;
use crate::core::store::ProfileStore;
use crate::error::{Result, ValidationError};

/// Terminal outcomes of an unlock attempt.
///
/// `MaxRetriesExceeded` and `Cancelled` are fatal to the current
/// session (no secrets available); `Reset` is fatal plus destructive
/// (the persisted document is discarded, so the next launch starts
/// unsecured).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked,
    MaxRetriesExceeded,
    Cancelled,
    Reset,
}

/// What the user did at a password prompt.
pub enum PromptReply {
    Password(Zeroizing<String>),
    Cancelled,
    ForgotPassword,
}

/// Seam between the unlock machine and whatever collects passwords.
///
/// The CLI implements this with dialoguer; tests drive the machine with
/// scripted replies.
pub trait UnlockPrompt {
    /// Ask for the existing master password. `attempt` is 1-based.
    fn existing_password(&mut self, attempt: u32, max: u32) -> Result<PromptReply>;

    /// Ask for a brand-new master password plus its confirmation.
    /// `None` means the user backed out.
    fn new_password(&mut self) -> Result<Option<(Zeroizing<String>, Zeroizing<String>)>>;

    /// Report why a new-password candidate was rejected before the
    /// prompt is shown again.
    fn reject_new_password(&mut self, reason: &str);
}

/// In-memory session: the store, the unlocked master password, and a
/// dirty flag for unsaved edits.
pub struct Session {
    pub store: ProfileStore,
    master_password: Option<Zeroizing<String>>,
    pub dirty: bool,
}

impl Session {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store,
            master_password: None,
            dirty: false,
        }
    }

    /// The session master password, once unlocked.
    pub fn passphrase(&self) -> Option<&str> {
        self.master_password.as_deref().map(String::as_str)
    }

    pub fn is_unlocked(&self) -> bool {
        self.master_password.is_some()
    }

    /// Persist the store, re-encrypting secrets under the session
    /// password, and clear the dirty flag.
    pub fn save(&mut self) -> Result<()> {
        let passphrase = self.master_password.clone();
        self.store.save(passphrase.as_deref().map(String::as_str))?;
        self.dirty = false;
        Ok(())
    }

    /// Run the unlock state machine.
    ///
    /// Unsecured store: collect a new password (minimum length and
    /// confirmation enforced), store its hash, keep the cleartext for
    /// the session, persist.
    ///
    /// Secured store: up to [`MAX_PASSWORD_RETRIES`] candidate
    /// passwords are hash-compared; a match decrypts every profile's
    /// secrets into memory. The retry counter lives here, so it resets
    /// exactly when an unlock flow starts and never mid-session.
    pub fn unlock(&mut self, prompt: &mut dyn UnlockPrompt) -> Result<UnlockOutcome> {
        if !self.store.is_secured() {
            return self.set_initial_password(prompt);
        }

        for attempt in 1..=MAX_PASSWORD_RETRIES {
            match prompt.existing_password(attempt, MAX_PASSWORD_RETRIES)? {
                PromptReply::Cancelled => {
                    debug!("unlock cancelled");
                    return Ok(UnlockOutcome::Cancelled);
                }
                PromptReply::ForgotPassword => {
                    warn!("forgot-password reset requested; discarding data file");
                    self.store.delete_data_file()?;
                    return Ok(UnlockOutcome::Reset);
                }
                PromptReply::Password(candidate) => {
                    let digest = crypto::hash(&candidate);
                    if digest.eq_ignore_ascii_case(&self.store.document.hashed_password) {
                        debug!(attempt, "password matches");
                        self.store.decrypt_all(&candidate);
                        self.master_password = Some(candidate);
                        return Ok(UnlockOutcome::Unlocked);
                    }
                    debug!(attempt, "password does not match");
                }
            }
        }

        warn!("max password retries exceeded");
        Ok(UnlockOutcome::MaxRetriesExceeded)
    }

    fn set_initial_password(&mut self, prompt: &mut dyn UnlockPrompt) -> Result<UnlockOutcome> {
        loop {
            let (password, confirmation) = match prompt.new_password()? {
                Some(pair) => pair,
                None => return Ok(UnlockOutcome::Cancelled),
            };

            if password.len() < MIN_PASSWORD_LENGTH {
                let reason = ValidationError::PasswordTooShort {
                    min: MIN_PASSWORD_LENGTH,
                };
                prompt.reject_new_password(&reason.to_string());
                continue;
            }
            if *password != *confirmation {
                prompt.reject_new_password(&ValidationError::PasswordMismatch.to_string());
                continue;
            }

            self.store.document.hashed_password = crypto::hash(&password);
            self.master_password = Some(password);
            self.save()?;
            debug!("initial master password set");
            return Ok(UnlockOutcome::Unlocked);
        }
    }
}
