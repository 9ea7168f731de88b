//! Operation surface shared by the library and the command-line tool

use crate::config::Config;
use crate::error::Result;
use crate::token;
use std::sync::LazyLock;

/// Turns plaintext into tokens and back.
pub trait Encrypter {
    /// Encrypt `plaintext` into a fresh token. Two calls on the same input
    /// produce different tokens.
    fn encrypt(&self, plaintext: &[u8]) -> Result<String>;

    /// Recover the plaintext from a token, or report the first failed check.
    fn decrypt(&self, token: &str) -> Result<Vec<u8>>;
}

/// AES-256-GCM encrypter bound to one immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct Mizuenc {
    config: Config,
}

impl Mizuenc {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Encrypter for Mizuenc {
    fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        token::encrypt(&self.config, plaintext)
    }

    fn decrypt(&self, token: &str) -> Result<Vec<u8>> {
        token::decrypt(&self.config, token)
    }
}

static DEFAULT_ENCRYPTER: LazyLock<Mizuenc> = LazyLock::new(Mizuenc::default);

/// Process-wide encrypter using the built-in configuration.
///
/// Initialized on first use and never mutated, so it can be shared freely
/// across threads.
pub fn default_encrypter() -> &'static Mizuenc {
    &DEFAULT_ENCRYPTER
}
