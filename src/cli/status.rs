//! Quick status overview command.
//!
//! Reads the document without unlocking; secrets stay encrypted and
//! nothing here needs them.

use crate::cli::output;
use crate::core::store::ProfileStore;
use crate::core::tools;
use crate::error::Result;

pub fn execute() -> Result<()> {
    let store = ProfileStore::open()?;

    output::section("Rejar Status");

    output::kv("config", store.path().display());
    output::kv(
        "secured",
        if store.is_secured() { "yes" } else { "no master password set" },
    );

    let count = store.document.profiles.len();
    output::kv(
        "profiles",
        format!("{} stored", if count == 0 { "none".to_string() } else { count.to_string() }),
    );

    let active = &store.document.active_profile;
    output::kv("active", if active.is_empty() { "-" } else { active.as_str() });

    if !store.document.recent_profiles.is_empty() {
        output::kv("recent", store.document.recent_profiles.join(", "));
    }

    let jdk_home = &store.document.jdk_home;
    output::kv(
        "jdk home",
        if jdk_home.is_empty() { "(PATH discovery)" } else { jdk_home.as_str() },
    );

    // Tool resolution check
    for tool in [tools::JAR, tools::JARSIGNER, tools::KEYTOOL] {
        match tools::find_tool(jdk_home, tool) {
            Ok(path) => output::kv(tool, path.display()),
            Err(_) => output::kv(tool, "not found"),
        }
    }

    if count == 0 {
        println!();
        output::hint(&format!(
            "create your first profile with {}",
            output::cmd("rejar profile save NAME")
        ));
    }
    Ok(())
}
