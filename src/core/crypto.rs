//! Master-password hashing and field-level secret encryption.
//!
//! Reversible secrets (storepass/keypass) are encrypted with a
//! passphrase-derived key (age scrypt) and carried as a base64 token,
//! so the value embeds in the JSON document with no line breaks. The
//! master password itself is never stored reversibly; only its SHA-512
//! digest is kept for the unlock gate.
//!
//! Intended for small amounts of data; no compression is applied.

use std::io::{Read, Write};

use age::secrecy::SecretString;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha512};
use tracing::{trace, warn};

use crate::error::{CipherError, Result, ValidationError};

/// One-way hash for master-password verification.
///
/// Deterministic SHA-512, base64-encoded. Never used for reversible
/// secrets.
pub fn hash(cleartext: &str) -> String {
    let digest = Sha512::digest(cleartext.as_bytes());
    BASE64.encode(digest)
}

/// Encrypt `cleartext` under `passphrase` into a single-line token.
///
/// # Errors
///
/// Rejects blank cleartext or passphrase; returns `CipherError` if the
/// underlying encryption fails.
pub fn encrypt(cleartext: &str, passphrase: &str) -> Result<String> {
    if cleartext.trim().is_empty() {
        return Err(ValidationError::MissingField("cleartext").into());
    }
    if passphrase.trim().is_empty() {
        return Err(ValidationError::MissingField("passphrase").into());
    }

    trace!(cleartext_len = cleartext.len(), "encrypting field");

    let encryptor =
        age::Encryptor::with_user_passphrase(SecretString::from(passphrase.to_string()));

    let mut ciphertext = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut ciphertext)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
    writer.write_all(cleartext.as_bytes())?;
    writer
        .finish()
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    trace!(ciphertext_len = ciphertext.len(), "encrypted field");

    Ok(BASE64.encode(ciphertext))
}

/// Decrypt a token produced by [`encrypt`].
///
/// Best-effort by design: a token that fails to decode or fails
/// authentication under `passphrase` is returned unchanged with a
/// warning, so a foreign-edited or legacy field degrades to an opaque
/// value instead of aborting the whole load.
///
/// # Errors
///
/// Rejects blank token or passphrase.
pub fn decrypt(token: &str, passphrase: &str) -> Result<String> {
    if token.trim().is_empty() {
        return Err(ValidationError::MissingField("encrypted text").into());
    }
    if passphrase.trim().is_empty() {
        return Err(ValidationError::MissingField("passphrase").into());
    }

    let ciphertext = match BASE64.decode(token) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!("field could not be decoded (config file modified outside the app?); leaving it as-is");
            return Ok(token.to_string());
        }
    };

    let identity = age::scrypt::Identity::new(SecretString::from(passphrase.to_string()));

    let cleartext = age::Decryptor::new(&ciphertext[..])
        .map_err(|e| e.to_string())
        .and_then(|decryptor| {
            decryptor
                .decrypt(std::iter::once(&identity as &dyn age::Identity))
                .map_err(|e| e.to_string())
        })
        .and_then(|mut reader| {
            let mut cleartext = Vec::new();
            reader
                .read_to_end(&mut cleartext)
                .map_err(|e| e.to_string())?;
            Ok(cleartext)
        });

    match cleartext {
        Ok(bytes) => String::from_utf8(bytes)
            .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {}", e)).into()),
        Err(reason) => {
            warn!(reason = %reason, "field could not be decrypted (config file modified outside the app?); leaving it as-is");
            Ok(token.to_string())
        }
    }
}
