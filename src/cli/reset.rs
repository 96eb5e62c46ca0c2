//! Forgot-password reset: delete the profile store.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;
use tracing::warn;

use crate::cli::output;
use crate::core::store::ProfileStore;
use crate::error::Result;

/// Destroy the data file. Everything in it is unrecoverable without
/// the master password anyway.
pub fn execute(force: bool) -> Result<()> {
    let store = ProfileStore::open()?;

    if !store.is_secured() && store.document.profiles.is_empty() {
        output::dimmed("nothing to reset");
        return Ok(());
    }

    if !force && io::stdin().is_terminal() {
        let confirmed = Confirm::new()
            .with_prompt("Delete every stored profile and the master password?")
            .default(false)
            .interact()?;
        if !confirmed {
            output::warn("cancelled");
            return Ok(());
        }
    }

    warn!("resetting profile store");
    store.delete_data_file()?;
    output::success("profile store deleted; the next run starts fresh");
    Ok(())
}
