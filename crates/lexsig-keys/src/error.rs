//! Error types for key handling and key pair persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while generating, decoding, or using keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("invalid key encoding: {0}")]
    InvalidEncoding(String),

    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("signature rejected")]
    BadSignature,

    #[error("key pair fields disagree: {0}")]
    Mismatch(&'static str),
}

/// Errors produced by the key pair persistence adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse key pair at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize key pair: {0}")]
    Serialize(#[from] serde_json::Error),
}
