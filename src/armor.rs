//! Token text encoding
//!
//! Tokens are the binary blob rendered as base64url without padding. The
//! resulting text is:
//! - Free of whitespace (including newlines)
//! - Safe to embed in URLs
//! - Safe to pass unescaped in a POSIX shell
//!
//! Decoding is lenient in two ways so that tokens which went through a
//! terminal or mail client still open: line breaks (`\r`, `\n`) anywhere in
//! the text are ignored, and non-zero unused bits in the final character are
//! accepted.

use crate::error::{ErrorCategory, ErrorKind, MizuencError, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// Unpadded base64url that tolerates trailing bits on decode.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Render a blob as token text
pub fn wrap(blob: &[u8]) -> String {
    TOKEN_ENGINE.encode(blob)
}

/// Decode token text back into the blob
pub fn unwrap(token: &str) -> Result<Vec<u8>> {
    let compact: String = token.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    TOKEN_ENGINE.decode(compact).map_err(|e| {
        MizuencError::with_source(
            ErrorCategory::User,
            ErrorKind::MalformedToken,
            "token is not valid base64url",
            e,
        )
    })
}
