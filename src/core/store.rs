//! Encrypted profile store.
//!
//! A single JSON document under `~/.rejar` holds every signing profile,
//! the recent-profile ring, and the master-password hash. Keystore and
//! key passwords are persisted only as encrypted tokens; cleartext
//! lives in memory for the session and is re-derived on save.
//!
//! The document is loaded fully into memory on startup and mutated only
//! through store operations; every save writes the whole file
//! atomically (temp file + rename).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::{constants, crypto};
use crate::error::{Result, StoreError};

/// How a profile's source/target paths are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SigningMode {
    /// Source and target are single archives.
    #[default]
    Jar,
    /// Source and target are directories of archives.
    Folder,
}

/// A file or directory locator inside a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(rename = "fileName", default)]
    pub file_name: String,
}

impl FileRef {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

/// jarsigner arguments for a profile.
///
/// `storepass`/`keypass` on disk hold encrypted tokens; the cleartext
/// twins are `serde(skip)` and exist only in memory after an unlock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignerConfig {
    #[serde(default)]
    pub alias: String,
    #[serde(rename = "storepass", default)]
    pub encrypted_storepass: String,
    #[serde(rename = "keypass", default)]
    pub encrypted_keypass: String,
    #[serde(default)]
    pub keystore: String,
    #[serde(default)]
    pub verbose: bool,

    #[serde(skip)]
    pub storepass: Zeroizing<String>,
    #[serde(skip)]
    pub keypass: Zeroizing<String>,
}

/// A named, reusable signing configuration.
///
/// At most one profile with a given case-insensitive name exists in the
/// store at any time; callers confirm overwrites before saving over an
/// existing name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "profileName")]
    pub name: String,
    #[serde(rename = "replaceSignatures", default)]
    pub replace_signatures: bool,
    #[serde(rename = "argsType", default)]
    pub mode: SigningMode,
    #[serde(rename = "sourceFile", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<FileRef>,
    #[serde(rename = "targetFile", default, skip_serializing_if = "Option::is_none")]
    pub target: Option<FileRef>,
    #[serde(rename = "jarsignerConfig", default, skip_serializing_if = "Option::is_none")]
    pub signer: Option<SignerConfig>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn source_path(&self) -> Option<&str> {
        self.source.as_ref().map(|f| f.file_name.as_str())
    }

    pub fn target_path(&self) -> Option<&str> {
        self.target.as_ref().map(|f| f.file_name.as_str())
    }
}

/// The persisted root document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "activeProfile", default)]
    pub active_profile: String,
    #[serde(rename = "jdkHome", default)]
    pub jdk_home: String,
    #[serde(rename = "recentProfiles", default)]
    pub recent_profiles: Vec<String>,
    #[serde(rename = "hashedPassword", default)]
    pub hashed_password: String,
    #[serde(rename = "lastUpdatedDate", default)]
    pub last_updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

/// Owns the on-disk configuration document.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    pub document: Document,
}

impl ProfileStore {
    /// The per-user data directory (`~/.rejar`), created on demand.
    ///
    /// # Errors
    ///
    /// A plain file squatting on the directory path is a fatal startup
    /// error ([`StoreError::DataDirCollision`]).
    pub fn data_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        let dir = home.join(constants::DATA_DIR);

        if dir.exists() && !dir.is_dir() {
            return Err(StoreError::DataDirCollision(dir).into());
        }
        if !dir.exists() {
            debug!(dir = %dir.display(), "creating data directory");
            std::fs::create_dir_all(&dir).map_err(StoreError::WriteFile)?;
        }
        Ok(dir)
    }

    /// Open the store at the default location, creating an empty
    /// document on first run.
    pub fn open() -> Result<Self> {
        let path = Self::data_dir()?.join(constants::CONFIG_FILE);
        Self::open_at(path)
    }

    /// Open the store at an explicit path. First run writes an empty
    /// document so the location is verified writable immediately.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            debug!(path = %path.display(), "first run; writing empty document");
            let mut store = Self {
                path,
                document: Document {
                    last_updated_date: Some(Utc::now()),
                    ..Default::default()
                },
            };
            store.save(None)?;
            return Ok(store);
        }

        debug!(path = %path.display(), "loading document");
        let contents = std::fs::read_to_string(&path).map_err(StoreError::ReadFile)?;
        let document: Document = serde_json::from_str(&contents).map_err(StoreError::Parse)?;

        debug!(
            profiles = document.profiles.len(),
            recent = document.recent_profiles.len(),
            secured = !document.hashed_password.trim().is_empty(),
            "document loaded"
        );

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff a non-blank master-password hash is stored.
    pub fn is_secured(&self) -> bool {
        !self.document.hashed_password.trim().is_empty()
    }

    // --- Persistence ---

    /// Persist the document atomically.
    ///
    /// With a passphrase, encrypted storepass/keypass tokens are
    /// recomputed from the in-memory cleartext first; cleartext fields
    /// themselves are never serialized. Without one (startup, reset)
    /// the existing tokens are written back untouched.
    pub fn save(&mut self, passphrase: Option<&str>) -> Result<()> {
        if let Some(pw) = passphrase {
            self.encrypt_all(pw);
        }

        self.document.last_updated_date = Some(Utc::now());

        let contents = serde_json::to_string_pretty(&self.document)?;

        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let tmp = tempfile::NamedTempFile::new_in(parent).map_err(StoreError::WriteFile)?;
        std::fs::write(tmp.path(), contents).map_err(StoreError::WriteFile)?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::WriteFile(e.error))?;

        debug!(path = %self.path.display(), "document saved");
        Ok(())
    }

    /// Recompute encrypted fields from in-memory cleartext.
    fn encrypt_all(&mut self, passphrase: &str) {
        for profile in &mut self.document.profiles {
            if let Some(signer) = &mut profile.signer {
                if !signer.storepass.trim().is_empty() {
                    match crypto::encrypt(&signer.storepass, passphrase) {
                        Ok(token) => signer.encrypted_storepass = token,
                        Err(e) => warn!(profile = %profile.name, "storepass encryption failed: {}", e),
                    }
                }
                if !signer.keypass.trim().is_empty() {
                    match crypto::encrypt(&signer.keypass, passphrase) {
                        Ok(token) => signer.encrypted_keypass = token,
                        Err(e) => warn!(profile = %profile.name, "keypass encryption failed: {}", e),
                    }
                }
            }
        }
    }

    /// Decrypt every profile's secrets into memory.
    ///
    /// Best-effort per field: an unintelligible token stays put (the
    /// cleartext twin receives the token itself), so one bad field
    /// cannot abort the whole load.
    pub fn decrypt_all(&mut self, passphrase: &str) {
        for profile in &mut self.document.profiles {
            if let Some(signer) = &mut profile.signer {
                if !signer.encrypted_storepass.trim().is_empty() {
                    if let Ok(cleartext) = crypto::decrypt(&signer.encrypted_storepass, passphrase)
                    {
                        signer.storepass = Zeroizing::new(cleartext);
                    }
                }
                if !signer.encrypted_keypass.trim().is_empty() {
                    if let Ok(cleartext) = crypto::decrypt(&signer.encrypted_keypass, passphrase) {
                        signer.keypass = Zeroizing::new(cleartext);
                    }
                }
            }
        }
    }

    /// Discard the persisted document (forgot-password reset).
    pub fn delete_data_file(&self) -> Result<()> {
        warn!(path = %self.path.display(), "deleting data file");
        std::fs::remove_file(&self.path).map_err(StoreError::WriteFile)?;
        Ok(())
    }

    // --- Profiles ---

    /// Find a profile by case-insensitive name.
    pub fn load_profile(&self, name: &str) -> Result<&Profile> {
        self.document
            .profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| StoreError::NotFound(name.to_string()).into())
    }

    /// True if a profile with this case-insensitive name exists.
    pub fn profile_exists(&self, name: &str) -> bool {
        self.document
            .profiles
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Save (insert or replace) a profile, make it active, record it in
    /// the recent ring, and persist. Replacement is by case-insensitive
    /// name; callers confirm overwrites beforehand.
    pub fn save_profile(&mut self, profile: Profile, passphrase: Option<&str>) -> Result<()> {
        let name = profile.name.clone();

        self.document
            .profiles
            .retain(|p| !p.name.eq_ignore_ascii_case(&name));
        self.document.profiles.push(profile);

        self.document.active_profile = name.clone();
        self.push_recent(&name);

        self.save(passphrase)
    }

    /// Delete a profile and its recent-ring entry, then persist.
    pub fn delete_profile(&mut self, name: &str, passphrase: Option<&str>) -> Result<()> {
        if !self.profile_exists(name) {
            return Err(StoreError::NotFound(name.to_string()).into());
        }

        debug!(profile = %name, "deleting profile");
        self.document
            .profiles
            .retain(|p| !p.name.eq_ignore_ascii_case(name));
        self.document
            .recent_profiles
            .retain(|n| !n.eq_ignore_ascii_case(name));
        if self.document.active_profile.eq_ignore_ascii_case(name) {
            self.document.active_profile.clear();
        }

        self.save(passphrase)
    }

    /// Rename a profile, rewriting the name wherever it appears (recent
    /// ring, active-profile reference), in one persisted transaction.
    ///
    /// # Errors
    ///
    /// [`StoreError::NameInUse`] if another profile already holds the
    /// new name (case-insensitive); [`StoreError::NotFound`] if the old
    /// name does not exist.
    pub fn rename_profile(
        &mut self,
        old_name: &str,
        new_name: &str,
        passphrase: Option<&str>,
    ) -> Result<()> {
        if !self.profile_exists(old_name) {
            return Err(StoreError::NotFound(old_name.to_string()).into());
        }
        if !old_name.eq_ignore_ascii_case(new_name) && self.profile_exists(new_name) {
            return Err(StoreError::NameInUse(new_name.to_string()).into());
        }

        debug!(old = %old_name, new = %new_name, "renaming profile");

        for profile in &mut self.document.profiles {
            if profile.name.eq_ignore_ascii_case(old_name) {
                profile.name = new_name.to_string();
            }
        }
        for recent in &mut self.document.recent_profiles {
            if recent.eq_ignore_ascii_case(old_name) {
                *recent = new_name.to_string();
            }
        }
        if self.document.active_profile.eq_ignore_ascii_case(old_name) {
            self.document.active_profile = new_name.to_string();
        }

        self.save(passphrase)
    }

    /// Suggest `base-2`, `base-3`, ... until a free name is found.
    pub fn suggest_unique_name(&self, base: &str) -> String {
        let mut counter = 2;
        loop {
            let candidate = format!("{}-{}", base, counter);
            if !self.profile_exists(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Record `name` as most recently used.
    ///
    /// Duplicates are removed before insertion, the ring is truncated to
    /// its capacity, and names that no longer exist as profiles are
    /// pruned opportunistically.
    pub fn push_recent(&mut self, name: &str) {
        self.document
            .recent_profiles
            .retain(|n| !n.eq_ignore_ascii_case(name));
        self.document.recent_profiles.insert(0, name.to_string());

        let profiles = &self.document.profiles;
        self.document
            .recent_profiles
            .retain(|n| profiles.iter().any(|p| p.name.eq_ignore_ascii_case(n)));

        self.document
            .recent_profiles
            .truncate(constants::NUM_RECENT_PROFILES);
    }
}
