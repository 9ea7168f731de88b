//! Passphrase-to-key derivation using PBKDF2-HMAC-SHA256

use crate::config::KEY_LEN;
use crate::error::{ErrorCategory, ErrorKind, MizuencError, Result};
use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Derive a 32-byte key from a passphrase and salt.
///
/// Pure and deterministic: the same inputs always produce the same key. The
/// key is wiped from memory when the returned buffer is dropped.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    if iterations == 0 {
        return Err(MizuencError::new(
            ErrorCategory::Internal,
            ErrorKind::KeyDerivation,
            "PBKDF2 iteration count must be non-zero",
        ));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(passphrase, salt, iterations, &mut key[..]).map_err(|_| {
        MizuencError::new(
            ErrorCategory::Internal,
            ErrorKind::KeyDerivation,
            "PBKDF2 key derivation failed",
        )
    })?;

    Ok(key)
}
