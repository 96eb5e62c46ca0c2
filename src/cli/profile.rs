//! Profile management commands.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::Confirm;
use tracing::info;

use crate::cli::output;
use crate::cli::session::{self, prompt_secret};
use crate::core::store::{FileRef, Profile, SigningMode};
use crate::error::{Result, ValidationError};

/// Arguments to `profile save`, gathered by clap.
pub struct SaveArgs {
    pub name: String,
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub keystore: Option<String>,
    pub alias: Option<String>,
    pub folder: bool,
    pub keep_signatures: bool,
    pub verbose_signing: bool,
}

/// Create or update a profile.
///
/// An existing name requires confirmation; declining prints a free
/// alternative instead of failing.
pub fn save(args: SaveArgs) -> Result<()> {
    if args.name.trim().is_empty() {
        return Err(ValidationError::EmptyProfileName.into());
    }

    let mut session = match session::open_unlocked()? {
        Some(s) => s,
        None => return Ok(()),
    };

    if session.store.profile_exists(&args.name) {
        output::warn(&format!("{} already exists", output::name(&args.name)));
        let overwrite = if io::stdin().is_terminal() {
            Confirm::new()
                .with_prompt("Overwrite?")
                .default(false)
                .interact()?
        } else {
            true
        };
        if !overwrite {
            let free = session.store.suggest_unique_name(&args.name);
            output::hint(&format!("{} is available", output::name(&free)));
            return Ok(());
        }
    }

    info!("saving profile: {}", args.name);

    // Start from the stored profile so unspecified flags keep their
    // previous values.
    let mut profile = session
        .store
        .load_profile(&args.name)
        .cloned()
        .unwrap_or_else(|_| Profile::new(&args.name));
    profile.name = args.name.clone();

    if let Some(source) = &args.source {
        profile.source = Some(FileRef::new(source.display().to_string()));
    }
    if let Some(target) = &args.target {
        profile.target = Some(FileRef::new(target.display().to_string()));
    }
    if args.folder {
        profile.mode = SigningMode::Folder;
    }
    profile.replace_signatures = !args.keep_signatures;

    let mut signer = profile.signer.take().unwrap_or_default();
    if let Some(keystore) = args.keystore {
        signer.keystore = keystore;
    }
    if let Some(alias) = args.alias {
        signer.alias = alias;
    }
    signer.verbose = args.verbose_signing;

    let storepass = prompt_secret("Keystore password (blank keeps current)")?;
    if !storepass.is_empty() {
        signer.storepass = storepass;
    }
    let keypass = prompt_secret("Key password (blank keeps current)")?;
    if !keypass.is_empty() {
        signer.keypass = keypass;
    }
    profile.signer = Some(signer);

    let passphrase = session.passphrase().map(str::to_string);
    session
        .store
        .save_profile(profile, passphrase.as_deref())?;

    output::success(&format!("saved {}", output::name(&args.name)));
    Ok(())
}

/// List profile names, marking the active one.
pub fn list() -> Result<()> {
    let session = match session::open_unlocked()? {
        Some(s) => s,
        None => return Ok(()),
    };

    if session.store.document.profiles.is_empty() {
        output::dimmed("no profiles stored");
        output::hint(&format!(
            "create one with {}",
            output::cmd("rejar profile save NAME")
        ));
        return Ok(());
    }

    let active = session.store.document.active_profile.clone();
    for profile in &session.store.document.profiles {
        if profile.name.eq_ignore_ascii_case(&active) {
            output::list_item(&format!("{} (active)", profile.name));
        } else {
            output::list_item(&profile.name);
        }
    }
    Ok(())
}

/// Show one profile's settings. Passwords are reported as set/unset,
/// never echoed.
pub fn show(name: Option<&str>) -> Result<()> {
    let session = match session::open_unlocked()? {
        Some(s) => s,
        None => return Ok(()),
    };

    let name = match name {
        Some(n) => n.to_string(),
        None => {
            let active = session.store.document.active_profile.clone();
            if active.is_empty() {
                output::dimmed("no active profile; pass a name");
                return Ok(());
            }
            active
        }
    };

    let profile = session.store.load_profile(&name)?;

    output::section(&profile.name);
    output::kv("mode", format!("{:?}", profile.mode));
    output::kv("replace signatures", profile.replace_signatures);
    output::kv("source", profile.source_path().unwrap_or("-"));
    output::kv("target", profile.target_path().unwrap_or("-"));

    match &profile.signer {
        Some(signer) => {
            output::kv(
                "keystore",
                if signer.keystore.is_empty() { "-" } else { signer.keystore.as_str() },
            );
            output::kv(
                "alias",
                if signer.alias.is_empty() { "-" } else { signer.alias.as_str() },
            );
            output::kv(
                "storepass",
                if signer.storepass.is_empty() { "unset" } else { "set" },
            );
            output::kv(
                "keypass",
                if signer.keypass.is_empty() { "unset" } else { "set" },
            );
            output::kv("verbose signing", signer.verbose);
        }
        None => output::kv("signer", "-"),
    }
    Ok(())
}

/// Remove a profile after confirmation.
pub fn rm(name: &str, force: bool) -> Result<()> {
    let mut session = match session::open_unlocked()? {
        Some(s) => s,
        None => return Ok(()),
    };

    // Surface NotFound before prompting.
    session.store.load_profile(name)?;

    if !force && io::stdin().is_terminal() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete profile {}?", name))
            .default(false)
            .interact()?;
        if !confirmed {
            output::warn("cancelled");
            return Ok(());
        }
    }

    let passphrase = session.passphrase().map(str::to_string);
    session.store.delete_profile(name, passphrase.as_deref())?;
    output::success(&format!("deleted {}", output::name(name)));
    Ok(())
}

/// Rename a profile, rewriting the active and recent references too.
pub fn rename(old: &str, new: &str) -> Result<()> {
    if new.trim().is_empty() {
        return Err(ValidationError::EmptyProfileName.into());
    }

    let mut session = match session::open_unlocked()? {
        Some(s) => s,
        None => return Ok(()),
    };

    let passphrase = session.passphrase().map(str::to_string);
    session
        .store
        .rename_profile(old, new, passphrase.as_deref())?;

    output::success(&format!(
        "renamed {} to {}",
        output::name(old),
        output::name(new)
    ));
    Ok(())
}
