//! Parser for `keytool -list` output.
//!
//! A strict line-oriented state machine. keytool writes nothing useful
//! to stderr, so all information comes from the stdout listing: a
//! banner ("Your keystore contains N entries"), then for each entry a
//! comma-separated summary line followed by a fingerprint line.
//!
//! Malformed input truncates parsing at that point; it never panics.

use tracing::warn;

/// A parsed keystore alias record.
///
/// Produced only by [`parse_listing`]; immutable after construction and
/// never persisted. Equality and hashing are by `alias` alone.
#[derive(Debug, Clone)]
pub struct KeystoreEntry {
    pub alias: String,
    pub creation_date: String,
    pub entry_type: String,
    pub fingerprint: String,
}

impl PartialEq for KeystoreEntry {
    fn eq(&self, other: &Self) -> bool {
        self.alias == other.alias
    }
}

impl Eq for KeystoreEntry {}

impl std::hash::Hash for KeystoreEntry {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.alias.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Header,
    Entry,
    Fingerprint,
    End,
    ErrorEnd,
}

/// An entry summary line split out, waiting for its fingerprint line.
#[derive(Debug)]
struct PartialEntry {
    alias: String,
    creation_date: String,
    entry_type: String,
}

/// Parse a keystore listing into entries, preserving input order.
pub fn parse_listing(listing: &str) -> Vec<KeystoreEntry> {
    let mut entries = Vec::new();
    let mut lines = listing.lines();
    let mut state = ParseState::Header;
    let mut current: Option<PartialEntry> = None;
    let mut fingerprint_line = "";

    while state != ParseState::End && state != ParseState::ErrorEnd {
        match state {
            ParseState::Header => match lines.next() {
                Some(line) if line.starts_with("Your keystore") => {
                    state = ParseState::Entry;
                }
                Some(_) => {}
                None => {
                    warn!("listing ended before the keystore banner");
                    state = ParseState::ErrorEnd;
                }
            },
            ParseState::Entry => match lines.next() {
                Some(line) if line.starts_with("Certificate fingerprint") => {
                    fingerprint_line = line;
                    state = ParseState::Fingerprint;
                }
                Some(line) if !line.is_empty() => {
                    let fields: Vec<&str> = line.split(',').collect();
                    if fields.len() >= 4 {
                        current = Some(PartialEntry {
                            alias: fields[0].trim().to_string(),
                            creation_date: format!("{}{}", fields[1], fields[2])
                                .trim()
                                .to_string(),
                            entry_type: fields[3].trim().to_string(),
                        });
                    } else {
                        warn!(line = %line, "entry line has fewer than 4 fields");
                        state = ParseState::ErrorEnd;
                    }
                }
                Some(_) => {} // blank lines between entries
                None => state = ParseState::End,
            },
            ParseState::Fingerprint => {
                // "Certificate fingerprint (SHA-256): AB:CD:..." - the
                // fingerprint is the second token when split on ": "
                let toks: Vec<&str> = fingerprint_line.split(": ").collect();
                match (current.take(), toks.get(1)) {
                    (Some(partial), Some(fp)) => {
                        entries.push(KeystoreEntry {
                            alias: partial.alias,
                            creation_date: partial.creation_date,
                            entry_type: partial.entry_type,
                            fingerprint: fp.trim().to_string(),
                        });
                    }
                    _ => {
                        warn!(line = %fingerprint_line, "fingerprint line without a pending entry");
                    }
                }
                state = ParseState::Entry;
            }
            ParseState::End | ParseState::ErrorEnd => unreachable!(),
        }
    }

    entries
}
