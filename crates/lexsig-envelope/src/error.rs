//! Envelope errors.

use lexsig_keys::KeyError;
use thiserror::Error;

/// Errors that can occur while producing canonical bytes.
#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record must serialize to a JSON object")]
    NotAnObject,
}

/// Errors that can occur while parsing a JSON record.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record must be a JSON object")]
    NotAnObject,
}

/// Errors that can occur while signing a record.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("private key is missing")]
    NilKey,

    #[error(transparent)]
    Canonicalization(#[from] CanonicalError),

    #[error("signing primitive failed: {0}")]
    Primitive(#[from] KeyError),
}

/// Errors that can occur while verifying a record.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("public key is missing")]
    NilKey,

    #[error("cannot verify unsigned record")]
    MissingSignature,

    #[error("signature is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error(transparent)]
    Canonicalization(#[from] CanonicalError),

    #[error("signature does not match record")]
    SignatureMismatch,
}
