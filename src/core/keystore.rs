//! Keystore alias discovery.
//!
//! Composes the command runner and the listing parser: run
//! `keytool -list` against a keystore, parse the stdout listing, and
//! project the entries the caller asked for.

use std::path::Path;

use crate::core::constants::KEYTOOL_TIMEOUT;
use crate::core::listing::{self, KeystoreEntry};
use crate::core::runner::CommandRunner;
use crate::error::Result;

/// List the full entries of a keystore.
///
/// Runner failures propagate unchanged; a bad store password surfaces
/// as `NonZeroExit` carrying keytool's own error text as the first
/// output line.
pub fn find_entries(
    keytool: &Path,
    keystore: &str,
    storepass: &str,
    scratch_dir: &Path,
) -> Result<Vec<KeystoreEntry>> {
    let argv = vec![
        keytool.display().to_string(),
        "-keystore".to_string(),
        keystore.to_string(),
        "-storepass".to_string(),
        storepass.to_string(),
        "-list".to_string(),
    ];

    let output = CommandRunner::new(scratch_dir, KEYTOOL_TIMEOUT).run(&argv)?;

    Ok(listing::parse_listing(&output.lines.join("\n")))
}

/// List just the aliases of a keystore, preserving listing order.
pub fn find_aliases(
    keytool: &Path,
    keystore: &str,
    storepass: &str,
    scratch_dir: &Path,
) -> Result<Vec<String>> {
    Ok(find_entries(keytool, keystore, storepass, scratch_dir)?
        .into_iter()
        .map(|entry| entry.alias)
        .collect())
}
