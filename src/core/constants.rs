//! Constants used throughout rejar.
//!
//! Centralizes magic strings and configuration values.

use std::time::Duration;

/// Data directory relative to HOME (~/.rejar).
pub const DATA_DIR: &str = ".rejar";

/// Configuration document file name inside the data directory.
pub const CONFIG_FILE: &str = "rejar-config.json";

/// Bound on the recent-profiles ring.
pub const NUM_RECENT_PROFILES: usize = 4;

/// Master-password attempts allowed before the unlock fails.
pub const MAX_PASSWORD_RETRIES: u32 = 3;

/// Minimum master-password length on first-run setup.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Archive extension recognized in folder mode.
pub const ARCHIVE_EXT: &str = "jar";

/// Timestamp authority passed to jarsigner.
pub const TSA_URL: &str = "http://timestamp.digicert.com";

/// Timeout for jar unpack/repack invocations.
pub const JAR_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for keytool listing invocations.
pub const KEYTOOL_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for jarsigner invocations (network TSA round-trip included).
pub const JARSIGNER_TIMEOUT: Duration = Duration::from_secs(1000);
