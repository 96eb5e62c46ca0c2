//! Keystore alias listing command.

use crate::cli::output;
use crate::cli::session::prompt_secret;
use crate::core::keystore;
use crate::core::store::ProfileStore;
use crate::core::tools;
use crate::error::Result;

/// List the aliases in a keystore. The store password is prompted
/// hidden and never persisted here.
pub fn execute(keystore_path: &str) -> Result<()> {
    let store = ProfileStore::open()?;
    let keytool = tools::find_tool(&store.document.jdk_home, tools::KEYTOOL)?;
    let scratch = ProfileStore::data_dir()?;

    let storepass = prompt_secret("Keystore password")?;

    let entries = keystore::find_entries(&keytool, keystore_path, &storepass, &scratch)?;
    if entries.is_empty() {
        output::dimmed("keystore contains no entries");
        return Ok(());
    }

    for entry in &entries {
        output::list_item(&format!(
            "{}  {}  ({})",
            output::name(&entry.alias),
            entry.creation_date,
            entry.entry_type
        ));
    }
    Ok(())
}
