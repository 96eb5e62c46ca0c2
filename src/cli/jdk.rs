//! Show or set the JDK home used for tool resolution.

use std::path::PathBuf;

use crate::cli::output;
use crate::core::store::ProfileStore;
use crate::error::{Result, ValidationError};

pub fn execute(path: Option<PathBuf>, clear: bool) -> Result<()> {
    let mut store = ProfileStore::open()?;

    if clear {
        store.document.jdk_home.clear();
        store.save(None)?;
        output::success("cleared jdk home; tools are discovered on PATH");
        return Ok(());
    }

    match path {
        None => {
            let current = &store.document.jdk_home;
            if current.is_empty() {
                output::dimmed("no jdk home set; tools are discovered on PATH");
            } else {
                output::kv("jdk home", current);
            }
        }
        Some(path) => {
            if !path.join("bin").is_dir() {
                output::error(&format!("{} has no bin directory", path.display()));
                return Err(ValidationError::MissingField("jdk home bin directory").into());
            }
            store.document.jdk_home = path.display().to_string();
            store.save(None)?;
            output::success(&format!("jdk home set to {}", output::path(&path.display().to_string())));
        }
    }
    Ok(())
}
