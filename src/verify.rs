//! Decode-time verification pipeline
//!
//! Each check takes the bytes that survived the previous one and either
//! narrows them further or rejects the token. The first failure wins:
//!
//! 1. length floor: blob holds at least a signature
//! 2. signature suffix: blob ends with the configured signature, which is stripped
//! 3. length floor: body holds version tag, salt, nonce and one ciphertext byte
//! 4. version tag: body starts with the configured tag
//! 5. split: the rest is sliced into salt, nonce and sealed output
//!
//! Authenticated decryption of the resulting [`TokenParts`] happens in the
//! token codec.

use crate::config::Config;
use crate::error::{ErrorCategory, ErrorKind, MizuencError, Result};

/// Borrowed views into a verified blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    pub version_tag: &'a [u8],
    pub salt: &'a [u8],
    pub nonce: &'a [u8],
    /// Ciphertext followed by the GCM tag.
    pub sealed: &'a [u8],
}

/// Run every structural check against a decoded blob.
pub fn verify<'a>(config: &Config, blob: &'a [u8]) -> Result<TokenParts<'a>> {
    check_signature_floor(config, blob)?;
    let body = strip_signature(config, blob)?;
    check_body_floor(config, body)?;
    let rest = strip_version_tag(config, body)?;
    Ok(split_fields(config, &body[..config.version_tag().len()], rest))
}

pub fn check_signature_floor(config: &Config, blob: &[u8]) -> Result<()> {
    if blob.len() < config.signature_len() {
        return Err(too_short(blob.len(), config.signature_len()));
    }
    Ok(())
}

/// Returns the blob without its trailing signature.
///
/// This is a format check on static bytes, not a cryptographic one: it
/// rejects tokens produced under another configuration and truncated tokens.
pub fn strip_signature<'a>(config: &Config, blob: &'a [u8]) -> Result<&'a [u8]> {
    blob.strip_suffix(config.signature()).ok_or_else(|| {
        MizuencError::new(
            ErrorCategory::User,
            ErrorKind::SignatureMismatch,
            "signature mismatch",
        )
    })
}

pub fn check_body_floor(config: &Config, body: &[u8]) -> Result<()> {
    if body.len() < config.min_body_len() {
        return Err(too_short(body.len(), config.min_body_len()));
    }
    Ok(())
}

/// Returns the body without its leading version tag.
pub fn strip_version_tag<'a>(config: &Config, body: &'a [u8]) -> Result<&'a [u8]> {
    body.strip_prefix(config.version_tag()).ok_or_else(|| {
        MizuencError::new(
            ErrorCategory::User,
            ErrorKind::VersionMismatch,
            "version tag mismatch",
        )
    })
}

/// Slices salt, nonce and sealed output. `rest` must already satisfy the body floor.
pub fn split_fields<'a>(config: &Config, version_tag: &'a [u8], rest: &'a [u8]) -> TokenParts<'a> {
    let (salt, rest) = rest.split_at(config.salt_len());
    let (nonce, sealed) = rest.split_at(config.nonce_len());
    TokenParts {
        version_tag,
        salt,
        nonce,
        sealed,
    }
}

fn too_short(got: usize, want: usize) -> MizuencError {
    MizuencError::new(
        ErrorCategory::User,
        ErrorKind::TooShort,
        format!("token is too short ({} bytes, need at least {})", got, want),
    )
}
