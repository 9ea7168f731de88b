//! Mizuenc - Password-based AES-256-GCM encryption into copy-pasteable tokens

#![forbid(unsafe_code)]

pub mod aead;
pub mod armor;
pub mod config;
pub mod encrypter;
pub mod error;
pub mod kdf;
pub mod token;
pub mod verify;

pub use config::Config;
pub use encrypter::{Encrypter, Mizuenc, default_encrypter};
pub use error::{ErrorCategory, ErrorKind, MizuencError, Result};
