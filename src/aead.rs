//! AES-256-GCM authenticated encryption
//!
//! The sealed output is the ciphertext followed by the 16-byte GCM tag; the
//! token codec treats it as one opaque run of bytes.

use crate::config::{KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::error::{ErrorCategory, ErrorKind, MizuencError, Result};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};

/// Message reported for every failed open, whatever was altered.
const AUTH_FAILURE_MSG: &str = "corrupt input or tampered-with data";

fn cipher(key: &[u8], nonce: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != KEY_LEN || nonce.len() != NONCE_LEN {
        return Err(MizuencError::new(
            ErrorCategory::Internal,
            ErrorKind::InternalInvariant,
            format!(
                "AES-256-GCM requires a {}-byte key and {}-byte nonce, got {} and {}",
                KEY_LEN,
                NONCE_LEN,
                key.len(),
                nonce.len()
            ),
        ));
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| {
        MizuencError::new(
            ErrorCategory::Internal,
            ErrorKind::InternalInvariant,
            "failed to initialize AES-256-GCM",
        )
    })
}

/// Encrypt and authenticate `plaintext`, binding `aad` into the tag.
pub fn seal(key: &[u8], nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher(key, nonce)?;
    cipher
        .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|_| {
            MizuencError::new(
                ErrorCategory::Internal,
                ErrorKind::InternalInvariant,
                "AES-256-GCM encryption failed",
            )
        })
}

/// Verify and decrypt `sealed`.
///
/// Any mismatch in key, nonce, ciphertext, tag or `aad` yields the same
/// `AuthenticationFailure` with the same message.
pub fn open(key: &[u8], nonce: &[u8], sealed: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher(key, nonce)?;
    if sealed.len() < TAG_LEN {
        return Err(auth_failure());
    }
    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: sealed, aad })
        .map_err(|_| auth_failure())
}

fn auth_failure() -> MizuencError {
    MizuencError::new(
        ErrorCategory::User,
        ErrorKind::AuthenticationFailure,
        AUTH_FAILURE_MSG,
    )
}
