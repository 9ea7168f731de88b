//! Immutable encryption configuration
//!
//! A `Config` fixes every parameter that shapes a token: the passphrase
//! identifier, the version tag, field lengths and the PBKDF2 iteration count.
//! The human-readable signature appended to every token is derived from these
//! values once, at construction, and never changes afterwards.

use crate::error::{ErrorCategory, ErrorKind, MizuencError, Result};

/// Passphrase identifier the keys are derived from
pub const DEFAULT_PASSPHRASE: &str = "xuruiyuan";

/// Version tag prefixed to every blob and authenticated as associated data
pub const DEFAULT_VERSION_TAG: &str = "v1.0.0";

/// Length of salt in bytes
pub const SALT_LEN: usize = 16;

/// Length of nonce in bytes (AES-GCM standard nonce)
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Length of derived key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 iteration count
pub const ITERATIONS: u32 = 100_000;

const SIGNATURE_PREAMBLE: &str =
    "This message is encrypted by Mizu-encrypt, using AES-256-GCM algorithm with args as follows: ";

const SIGNATURE_DELIMITER: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    passphrase: String,
    version_tag: String,
    salt_len: usize,
    iterations: u32,
    signature: String,
}

impl Config {
    /// Builds a validated configuration.
    ///
    /// Nonce and key lengths are dictated by AES-256-GCM and cannot be chosen.
    pub fn new(
        passphrase: impl Into<String>,
        version_tag: impl Into<String>,
        salt_len: usize,
        iterations: u32,
    ) -> Result<Self> {
        let passphrase = passphrase.into();
        let version_tag = version_tag.into();

        if version_tag.is_empty() {
            return Err(invalid("version tag must not be empty"));
        }
        if salt_len == 0 {
            return Err(invalid("salt length must be non-zero"));
        }
        if iterations == 0 {
            return Err(invalid("iteration count must be non-zero"));
        }

        let signature = build_signature(&passphrase, &version_tag, salt_len, iterations);

        Ok(Self {
            passphrase,
            version_tag,
            salt_len,
            iterations,
            signature,
        })
    }

    pub fn passphrase(&self) -> &[u8] {
        self.passphrase.as_bytes()
    }

    pub fn version_tag(&self) -> &[u8] {
        self.version_tag.as_bytes()
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }

    pub fn nonce_len(&self) -> usize {
        NONCE_LEN
    }

    pub fn key_len(&self) -> usize {
        KEY_LEN
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Signature bytes appended to every blob.
    pub fn signature(&self) -> &[u8] {
        self.signature.as_bytes()
    }

    pub fn signature_len(&self) -> usize {
        self.signature.len()
    }

    /// Minimum blob length once the signature has been stripped: version tag,
    /// salt, nonce and at least one ciphertext byte.
    pub fn min_body_len(&self) -> usize {
        self.version_tag.len() + self.salt_len + NONCE_LEN + 1
    }

    /// Minimum length of a complete decoded blob.
    #[cfg(test)]
    pub(crate) fn min_blob_len(&self) -> usize {
        self.min_body_len() + self.signature_len()
    }
}

impl Default for Config {
    fn default() -> Self {
        let signature = build_signature(DEFAULT_PASSPHRASE, DEFAULT_VERSION_TAG, SALT_LEN, ITERATIONS);
        Self {
            passphrase: DEFAULT_PASSPHRASE.to_string(),
            version_tag: DEFAULT_VERSION_TAG.to_string(),
            salt_len: SALT_LEN,
            iterations: ITERATIONS,
            signature,
        }
    }
}

fn build_signature(passphrase: &str, version_tag: &str, salt_len: usize, iterations: u32) -> String {
    let fields = [
        passphrase.to_string(),
        version_tag.to_string(),
        salt_len.to_string(),
        NONCE_LEN.to_string(),
        iterations.to_string(),
        KEY_LEN.to_string(),
    ];

    let mut signature = String::from(SIGNATURE_PREAMBLE);
    for field in &fields {
        signature.push_str(field);
        signature.push(SIGNATURE_DELIMITER);
    }
    signature
}

fn invalid(msg: &str) -> MizuencError {
    MizuencError::new(ErrorCategory::User, ErrorKind::InvalidConfig, msg)
}
