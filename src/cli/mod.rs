//! Command-line interface.

pub mod aliases;
pub mod completions;
pub mod jdk;
pub mod output;
pub mod profile;
pub mod reset;
pub mod session;
pub mod sign;
pub mod status;
pub mod unsign;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Rejar - strip and re-apply JAR signatures with reusable profiles.
#[derive(Parser)]
#[command(
    name = "rejar",
    about = "Strip and re-apply JAR signatures with reusable, encrypted signing profiles",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose logging (overridden by REJAR_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Unsign and re-sign using a stored profile
    Sign {
        /// Profile name (defaults to the active profile)
        profile: Option<String>,
        /// Override the profile's source path
        #[arg(long)]
        source: Option<PathBuf>,
        /// Override the profile's target path
        #[arg(long)]
        target: Option<PathBuf>,
    },

    /// Strip signatures from a JAR without re-signing
    Unsign {
        /// Signed input JAR
        source: PathBuf,
        /// Where to write the unsigned JAR
        target: PathBuf,
    },

    /// Manage signing profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// List the aliases in a keystore
    Aliases {
        /// Keystore path
        keystore: String,
    },

    /// Show store overview
    Status,

    /// Show or set the JDK home used to locate jar/jarsigner/keytool
    Jdk {
        /// New JDK home (omit to show the current setting)
        path: Option<PathBuf>,
        /// Clear the setting and fall back to PATH discovery
        #[arg(long, conflicts_with = "path")]
        clear: bool,
    },

    /// Delete the profile store (forgot master password)
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Profile subcommands.
#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create or update a profile (prompts for passwords)
    Save {
        /// Profile name
        name: String,
        /// Source JAR or directory of JARs
        #[arg(long)]
        source: Option<PathBuf>,
        /// Target JAR or directory
        #[arg(long)]
        target: Option<PathBuf>,
        /// Keystore path for jarsigner
        #[arg(long)]
        keystore: Option<String>,
        /// Key alias inside the keystore
        #[arg(long)]
        alias: Option<String>,
        /// Treat source/target as directories of JARs
        #[arg(long)]
        folder: bool,
        /// Keep existing signatures instead of stripping them first
        #[arg(long)]
        keep_signatures: bool,
        /// Pass -verbose to jarsigner
        #[arg(long)]
        verbose_signing: bool,
    },

    /// List profile names
    List,

    /// Show a profile's settings
    Show {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
    },

    /// Remove a profile
    Rm {
        /// Profile name
        name: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Rename a profile
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Sign {
            profile,
            source,
            target,
        } => sign::execute(profile.as_deref(), source, target),
        Unsign { source, target } => unsign::execute(&source, &target),
        Profile { action } => match action {
            ProfileAction::Save {
                name,
                source,
                target,
                keystore,
                alias,
                folder,
                keep_signatures,
                verbose_signing,
            } => profile::save(profile::SaveArgs {
                name,
                source,
                target,
                keystore,
                alias,
                folder,
                keep_signatures,
                verbose_signing,
            }),
            ProfileAction::List => profile::list(),
            ProfileAction::Show { name } => profile::show(name.as_deref()),
            ProfileAction::Rm { name, force } => profile::rm(&name, force),
            ProfileAction::Rename { old, new } => profile::rename(&old, &new),
        },
        Aliases { keystore } => aliases::execute(&keystore),
        Status => status::execute(),
        Jdk { path, clear } => jdk::execute(path, clear),
        Reset { force } => reset::execute(force),
        Completions { shell } => completions::execute(shell),
    }
}
