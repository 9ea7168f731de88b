//! Token encoding and decoding
//!
//! This module implements passphrase-based encryption using:
//! - PBKDF2-HMAC-SHA256 for key derivation from the passphrase
//! - AES-256-GCM for authenticated encryption, with the version tag as
//!   associated data
//!
//! The binary blob is:
//! - version tag: UTF-8 bytes of the configured tag
//! - salt: 16 bytes
//! - nonce: 12 bytes
//! - sealed output: plaintext length + 16-byte GCM tag
//! - signature: UTF-8 bytes of the configured signature
//!
//! and the token is that blob in unpadded base64url.

use crate::aead;
use crate::armor;
use crate::config::{Config, NONCE_LEN};
use crate::error::{ErrorCategory, ErrorKind, MizuencError, Result};
use crate::kdf;
use crate::verify;
use rand::{CryptoRng, RngCore};
use rand::rngs::OsRng;
use tracing::{debug, error, warn};

/// Encrypt plaintext into a token using random salt and nonce
pub fn encrypt(config: &Config, plaintext: &[u8]) -> Result<String> {
    encrypt_with_rng(config, &mut OsRng, plaintext)
}

/// Encrypt plaintext into a token drawing salt and nonce from `rng`
///
/// Failures are reported under "encryption failed" with the cause kept as
/// source and the original kind preserved.
pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
    config: &Config,
    rng: &mut R,
    plaintext: &[u8],
) -> Result<String> {
    seal_fresh(config, rng, plaintext).map_err(|e| e.with_context("encryption failed"))
}

fn seal_fresh<R: RngCore + CryptoRng>(
    config: &Config,
    rng: &mut R,
    plaintext: &[u8],
) -> Result<String> {
    let mut salt = vec![0u8; config.salt_len()];
    fill_random(rng, &mut salt, "salt")?;

    let mut nonce = [0u8; NONCE_LEN];
    fill_random(rng, &mut nonce, "nonce")?;

    encrypt_deterministic(config, plaintext, &salt, &nonce)
}

/// Encrypt plaintext into a token using provided salt and nonce
///
/// This function is ONLY for testing purposes to generate deterministic output.
/// NEVER use this in production - always use `encrypt()` which generates random salt/nonce.
pub fn encrypt_deterministic(
    config: &Config,
    plaintext: &[u8],
    salt: &[u8],
    nonce: &[u8; NONCE_LEN],
) -> Result<String> {
    if salt.len() != config.salt_len() {
        return Err(MizuencError::new(
            ErrorCategory::Internal,
            ErrorKind::InternalInvariant,
            format!(
                "salt must be {} bytes, got {}",
                config.salt_len(),
                salt.len()
            ),
        ));
    }

    let key = kdf::derive_key(config.passphrase(), salt, config.iterations())?;
    let sealed = aead::seal(&key[..], nonce, plaintext, config.version_tag())?;

    let version_tag = config.version_tag();
    let mut blob = Vec::with_capacity(
        version_tag.len() + salt.len() + nonce.len() + sealed.len() + config.signature_len(),
    );
    blob.extend_from_slice(version_tag);
    blob.extend_from_slice(salt);
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(&sealed);
    blob.extend_from_slice(config.signature());

    debug!(
        plaintext_len = plaintext.len(),
        blob_len = blob.len(),
        "sealed token"
    );

    Ok(armor::wrap(&blob))
}

/// Decrypt a token back into the original plaintext
pub fn decrypt(config: &Config, token: &str) -> Result<Vec<u8>> {
    open_token(config, token).inspect_err(|e| {
        warn!(kind = ?e.kind, "rejected token");
    })
}

fn open_token(config: &Config, token: &str) -> Result<Vec<u8>> {
    let blob = armor::unwrap(token)?;
    let parts = verify::verify(config, &blob)?;

    debug!(
        blob_len = blob.len(),
        sealed_len = parts.sealed.len(),
        "token passed structural checks"
    );

    let key = kdf::derive_key(config.passphrase(), parts.salt, config.iterations())?;
    aead::open(&key[..], parts.nonce, parts.sealed, parts.version_tag)
}

fn fill_random<R: RngCore + CryptoRng>(rng: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    rng.try_fill_bytes(buf).map_err(|e| {
        error!(error = %e, "random source failed while generating {}", what);
        MizuencError::with_source(
            ErrorCategory::Internal,
            ErrorKind::RandomnessUnavailable,
            format!("failed to generate {}", what),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SALT_LEN, TAG_LEN};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::error::Error as _;
    use std::io;

    /// Random source that always refuses to produce bytes.
    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            unreachable!("only try_fill_bytes is used")
        }

        fn next_u64(&mut self) -> u64 {
            unreachable!("only try_fill_bytes is used")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unreachable!("only try_fill_bytes is used")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new(io::Error::other("entropy pool closed")))
        }
    }

    impl CryptoRng for BrokenRng {}

    fn fast_config() -> Config {
        Config::new("xuruiyuan", "v1.0.0", SALT_LEN, 1).unwrap()
    }

    fn blob_of(token: &str) -> Vec<u8> {
        armor::unwrap(token).unwrap()
    }

    #[test]
    fn test_round_trip_default_config() {
        let config = Config::default();
        let token = encrypt(&config, b"hello mizuenc").unwrap();
        assert_eq!(decrypt(&config, &token).unwrap(), b"hello mizuenc");
    }

    #[test]
    fn test_randomness_unavailable() {
        let config = fast_config();
        let err = encrypt_with_rng(&config, &mut BrokenRng, b"hello").unwrap_err();

        assert_eq!(err.kind, ErrorKind::RandomnessUnavailable);
        assert_eq!(err.category, ErrorCategory::Internal);
        assert_eq!(err.message(), "encryption failed");

        let cause = err.source_error().expect("cause should be kept");
        assert_eq!(cause.to_string(), "failed to generate salt");
        let os_error = cause.source().expect("rng error should be kept");
        assert!(os_error.to_string().contains("entropy pool closed"));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = fast_config();
        let t1 = encrypt_with_rng(&config, &mut StdRng::seed_from_u64(7), b"hello").unwrap();
        let t2 = encrypt_with_rng(&config, &mut StdRng::seed_from_u64(7), b"hello").unwrap();
        let t3 = encrypt_with_rng(&config, &mut StdRng::seed_from_u64(8), b"hello").unwrap();

        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
        assert_eq!(decrypt(&config, &t3).unwrap(), b"hello");
    }

    #[test]
    fn test_empty_plaintext() {
        let config = fast_config();
        let token = encrypt(&config, b"").unwrap();
        assert!(decrypt(&config, &token).unwrap().is_empty());
        assert_eq!(blob_of(&token).len(), config.min_blob_len() - 1 + TAG_LEN);
    }

    #[test]
    fn test_layout() {
        let config = fast_config();
        let salt = [0x42u8; SALT_LEN];
        let nonce = [0x24u8; NONCE_LEN];
        let token = encrypt_deterministic(&config, b"hello", &salt, &nonce).unwrap();
        let blob = blob_of(&token);

        assert!(blob.starts_with(b"v1.0.0"));
        assert_eq!(&blob[6..6 + SALT_LEN], &salt);
        assert_eq!(&blob[6 + SALT_LEN..6 + SALT_LEN + NONCE_LEN], &nonce);
        assert!(blob.ends_with(config.signature()));
        assert_eq!(
            blob.len(),
            6 + SALT_LEN + NONCE_LEN + 5 + TAG_LEN + config.signature_len()
        );
    }

    #[test]
    fn test_deterministic_encryption() {
        let config = fast_config();
        let salt = [1u8; SALT_LEN];
        let nonce = [2u8; NONCE_LEN];

        let t1 = encrypt_deterministic(&config, b"hello world", &salt, &nonce).unwrap();
        let t2 = encrypt_deterministic(&config, b"hello world", &salt, &nonce).unwrap();
        assert_eq!(t1, t2);
        assert_eq!(decrypt(&config, &t1).unwrap(), b"hello world");
    }

    #[test]
    fn test_different_nonce_different_token() {
        let config = fast_config();
        let salt = [1u8; SALT_LEN];

        let t1 = encrypt_deterministic(&config, b"hello world", &salt, &[2u8; NONCE_LEN]).unwrap();
        let t2 = encrypt_deterministic(&config, b"hello world", &salt, &[3u8; NONCE_LEN]).unwrap();
        assert_ne!(t1, t2);
        assert_eq!(decrypt(&config, &t1).unwrap(), b"hello world");
        assert_eq!(decrypt(&config, &t2).unwrap(), b"hello world");
    }

    #[test]
    fn test_wrong_salt_length() {
        let config = fast_config();
        let err = encrypt_deterministic(&config, b"x", &[0u8; 3], &[0u8; NONCE_LEN]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InternalInvariant);
    }

    #[test]
    fn test_salt_tamper_fails_authentication() {
        let config = fast_config();
        let token = encrypt(&config, b"hello").unwrap();
        let mut blob = blob_of(&token);
        blob[6] ^= 0x01;
        let err = decrypt(&config, &armor::wrap(&blob)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn test_nonce_tamper_fails_authentication() {
        let config = fast_config();
        let token = encrypt(&config, b"hello").unwrap();
        let mut blob = blob_of(&token);
        blob[6 + SALT_LEN] ^= 0x01;
        let err = decrypt(&config, &armor::wrap(&blob)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn test_truncated_sealed_output() {
        let config = fast_config();
        let token = encrypt(&config, b"hello").unwrap();
        let blob = blob_of(&token);

        // Drop one byte of the GCM tag while keeping the signature intact.
        let sig_start = blob.len() - config.signature_len();
        let mut shortened = blob[..sig_start - 1].to_vec();
        shortened.extend_from_slice(config.signature());

        let err = decrypt(&config, &armor::wrap(&shortened)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn test_other_build_rejected() {
        let ours = fast_config();
        let theirs = Config::new("xuruiyuan", "v1.0.0", SALT_LEN, 2).unwrap();
        let token = encrypt(&theirs, b"hello").unwrap();
        let err = decrypt(&ours, &token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SignatureMismatch);
    }

    #[test]
    fn test_all_byte_values() {
        let config = fast_config();
        let plaintext: Vec<u8> = (0..=255).collect();
        let token = encrypt(&config, &plaintext).unwrap();
        assert_eq!(decrypt(&config, &token).unwrap(), plaintext);
    }

    #[test]
    fn test_large_plaintext() {
        let config = fast_config();
        let plaintext = vec![0x42u8; 128 * 1024]; // 128KB
        let token = encrypt(&config, &plaintext).unwrap();
        assert_eq!(decrypt(&config, &token).unwrap(), plaintext);
    }
}
