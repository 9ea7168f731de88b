use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to the caller's
    /// input, such as the operating system refusing to hand out random bytes.
    Internal,

    /// The caller provided a token or configuration that cannot be accepted.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
///
/// Decoding stops at the first failed check, so exactly one kind is reported
/// per rejected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The token text is not valid unpadded base64url.
    MalformedToken,
    /// The decoded blob is shorter than the layout requires.
    TooShort,
    /// The decoded blob does not end with the configured signature.
    SignatureMismatch,
    /// The leading version tag differs from the configured one.
    VersionMismatch,
    /// AEAD verification failed. Deliberately carries no detail about which
    /// part of the token was altered.
    AuthenticationFailure,
    /// The operating system random source could not supply salt or nonce bytes.
    RandomnessUnavailable,
    /// Configuration parameters were rejected at construction time.
    InvalidConfig,
    /// PBKDF2 refused its parameters.
    KeyDerivation,
    /// Unexpected state reached within mizuenc logic.
    InternalInvariant,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct MizuencError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Specific condition tag, always provided.
    pub kind: ErrorKind,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl MizuencError {
    /// Creates a new error tagged with a category and kind.
    pub fn new(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also retains the originating source error.
    pub fn with_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind,
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MizuencError>;
