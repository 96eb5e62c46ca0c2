//! Rejar - strip and re-apply JAR signatures with reusable signing profiles.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── sign          # Single and batch unsign+sign runs
//! │   ├── unsign        # Signature stripping only
//! │   ├── aliases       # Keystore alias discovery
//! │   ├── profile       # Profile CRUD
//! │   ├── status        # Store overview
//! │   ├── jdk           # JDK home setting
//! │   ├── reset         # Forgot-password reset
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── runner        # External process execution with timeouts
//!     ├── listing       # keytool -list output parser
//!     ├── crypto        # Master-password hash + field encryption
//!     ├── store         # Encrypted profile store (JSON document)
//!     ├── session       # Unlock state machine, in-memory secrets
//!     ├── pipeline      # Unsign/copy/sign pipeline, batch mode
//!     ├── keystore      # Alias discovery (runner + listing)
//!     ├── progress      # Progress events and cancellation
//!     └── tools         # jar/jarsigner/keytool resolution
//! ```
//!
//! # Features
//!
//! - Surgical signature removal: `.SF`/signature-block files and
//!   manifest digest lines, nothing else
//! - Reusable signing profiles with field-level encrypted passwords
//! - Master-password gate with bounded retries
//! - External tools treated as opaque executables with documented
//!   exit-code and stdout contracts

pub mod cli;
pub mod core;
pub mod error;
