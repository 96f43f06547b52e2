//! Private and public key capabilities.
//!
//! Keys are tagged by algorithm so the signing envelope never needs to know
//! which curve it is working with.

use crate::codec::{self, KeyRole, KeyType, DID_KEY_PREFIX, PRIVATE_KEY_LEN};
use crate::KeyError;
use ed25519_dalek::{Signer as _, Verifier as _};
use p256::ecdsa::signature::{Signer as _, Verifier as _};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Upper bound on redraws when a random scalar falls outside the curve order.
const MAX_SCALAR_ATTEMPTS: usize = 8;

/// Generate a fresh private key of the given type from the OS random source.
///
/// Entropy failures are returned as [`KeyError::KeyGeneration`]; there is no
/// fallback to a weaker source.
pub fn generate(key_type: KeyType) -> Result<PrivateKey, KeyError> {
    for _ in 0..MAX_SCALAR_ATTEMPTS {
        let mut secret = [0u8; PRIVATE_KEY_LEN];
        getrandom::fill(&mut secret)
            .map_err(|e| KeyError::KeyGeneration(format!("OS random source failed: {e}")))?;

        match PrivateKey::from_bytes(key_type, &secret) {
            Ok(key) => {
                debug!(%key_type, "generated private key");
                return Ok(key);
            }
            // Zero or >= curve order; draw again from the same source.
            Err(KeyError::InvalidEncoding(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(KeyError::KeyGeneration(format!(
        "no valid {key_type} scalar after {MAX_SCALAR_ATTEMPTS} attempts"
    )))
}

/// A signing key.
#[derive(Clone)]
pub enum PrivateKey {
    P256(p256::ecdsa::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl PrivateKey {
    /// Build a key from a raw 32-byte scalar (ECDSA) or seed (Ed25519).
    pub fn from_bytes(key_type: KeyType, bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(KeyError::InvalidEncoding(format!(
                "private key must be {PRIVATE_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let invalid = |_| KeyError::InvalidEncoding(format!("not a valid {key_type} scalar"));
        match key_type {
            KeyType::P256 => p256::ecdsa::SigningKey::from_slice(bytes)
                .map(PrivateKey::P256)
                .map_err(invalid),
            KeyType::Secp256k1 => k256::ecdsa::SigningKey::from_slice(bytes)
                .map(PrivateKey::Secp256k1)
                .map_err(invalid),
            KeyType::Ed25519 => {
                let mut seed = [0u8; PRIVATE_KEY_LEN];
                seed.copy_from_slice(bytes);
                Ok(PrivateKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed)))
            }
        }
    }

    /// Parse a multibase-encoded private key.
    pub fn from_multibase(encoded: &str) -> Result<Self, KeyError> {
        let (key_type, bytes) = codec::decode_multibase(encoded, KeyRole::Private)?;
        Self::from_bytes(key_type, &bytes)
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            PrivateKey::P256(_) => KeyType::P256,
            PrivateKey::Secp256k1(_) => KeyType::Secp256k1,
            PrivateKey::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::P256(k) => PublicKey::P256(*k.verifying_key()),
            PrivateKey::Secp256k1(k) => PublicKey::Secp256k1(*k.verifying_key()),
            PrivateKey::Ed25519(k) => PublicKey::Ed25519(k.verifying_key()),
        }
    }

    /// Encode as a self-describing multibase string. This exposes secret material.
    pub fn multibase(&self) -> String {
        codec::encode_multibase(self.key_type(), KeyRole::Private, &self.secret_bytes())
    }

    /// Hash `message` and sign the digest.
    ///
    /// ECDSA signatures are 64-byte `r || s` with `s` normalized to the low half
    /// of the curve order; Ed25519 signatures are the standard 64 bytes.
    pub fn hash_and_sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        let signing_failed = |e: p256::ecdsa::Error| KeyError::Signing(e.to_string());
        match self {
            PrivateKey::P256(k) => {
                let sig: p256::ecdsa::Signature = k.try_sign(message).map_err(signing_failed)?;
                let sig = sig.normalize_s().unwrap_or(sig);
                Ok(sig.to_bytes().to_vec())
            }
            PrivateKey::Secp256k1(k) => {
                let sig: k256::ecdsa::Signature = k.try_sign(message).map_err(signing_failed)?;
                let sig = sig.normalize_s().unwrap_or(sig);
                Ok(sig.to_bytes().to_vec())
            }
            PrivateKey::Ed25519(k) => Ok(k.sign(message).to_bytes().to_vec()),
        }
    }

    fn secret_bytes(&self) -> Vec<u8> {
        match self {
            PrivateKey::P256(k) => k.to_bytes().to_vec(),
            PrivateKey::Secp256k1(k) => k.to_bytes().to_vec(),
            PrivateKey::Ed25519(k) => k.to_bytes().to_vec(),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key_type", &self.key_type())
            .field("public_key", &self.public_key().multibase())
            .finish_non_exhaustive()
    }
}

/// A verifying key.
#[derive(Clone, PartialEq, Eq)]
pub enum PublicKey {
    P256(p256::ecdsa::VerifyingKey),
    Secp256k1(k256::ecdsa::VerifyingKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    /// Build a key from compressed SEC1 bytes (ECDSA) or the 32-byte Ed25519 point.
    pub fn from_bytes(key_type: KeyType, bytes: &[u8]) -> Result<Self, KeyError> {
        let expected = key_type.public_key_len();
        if bytes.len() != expected {
            return Err(KeyError::InvalidEncoding(format!(
                "{key_type} public key must be {expected} bytes, got {}",
                bytes.len()
            )));
        }
        let off_curve = |_| KeyError::InvalidEncoding(format!("not a valid {key_type} point"));
        match key_type {
            KeyType::P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                .map(PublicKey::P256)
                .map_err(off_curve),
            KeyType::Secp256k1 => k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                .map(PublicKey::Secp256k1)
                .map_err(off_curve),
            KeyType::Ed25519 => {
                let mut point = [0u8; 32];
                point.copy_from_slice(bytes);
                ed25519_dalek::VerifyingKey::from_bytes(&point)
                    .map(PublicKey::Ed25519)
                    .map_err(|_| KeyError::InvalidEncoding("not a valid Ed25519 point".into()))
            }
        }
    }

    /// Parse a multibase-encoded public key.
    pub fn from_multibase(encoded: &str) -> Result<Self, KeyError> {
        let (key_type, bytes) = codec::decode_multibase(encoded, KeyRole::Public)?;
        Self::from_bytes(key_type, &bytes)
    }

    /// Parse a `did:key:` identifier.
    pub fn from_did_key(did: &str) -> Result<Self, KeyError> {
        Self::from_multibase(codec::strip_did_key(did)?)
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            PublicKey::P256(_) => KeyType::P256,
            PublicKey::Secp256k1(_) => KeyType::Secp256k1,
            PublicKey::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// Compressed SEC1 encoding for ECDSA curves, raw point for Ed25519.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::P256(k) => k.to_encoded_point(true).as_bytes().to_vec(),
            PublicKey::Secp256k1(k) => k.to_encoded_point(true).as_bytes().to_vec(),
            PublicKey::Ed25519(k) => k.to_bytes().to_vec(),
        }
    }

    pub fn multibase(&self) -> String {
        codec::encode_multibase(self.key_type(), KeyRole::Public, &self.to_bytes())
    }

    pub fn did_key(&self) -> String {
        format!("{DID_KEY_PREFIX}{}", self.multibase())
    }

    /// Hash `message` and check `signature` against the digest.
    ///
    /// Every rejection, including a signature of the wrong length or an ECDSA
    /// signature with a high `s`, is [`KeyError::BadSignature`].
    pub fn hash_and_verify(&self, message: &[u8], signature: &[u8]) -> Result<(), KeyError> {
        match self {
            PublicKey::P256(k) => {
                let sig = p256::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| KeyError::BadSignature)?;
                if sig.normalize_s().is_some() {
                    return Err(KeyError::BadSignature);
                }
                k.verify(message, &sig).map_err(|_| KeyError::BadSignature)
            }
            PublicKey::Secp256k1(k) => {
                let sig = k256::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| KeyError::BadSignature)?;
                if sig.normalize_s().is_some() {
                    return Err(KeyError::BadSignature);
                }
                k.verify(message, &sig).map_err(|_| KeyError::BadSignature)
            }
            PublicKey::Ed25519(k) => {
                let sig = ed25519_dalek::Signature::from_slice(signature)
                    .map_err(|_| KeyError::BadSignature)?;
                k.verify_strict(message, &sig)
                    .map_err(|_| KeyError::BadSignature)
            }
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.multibase()).finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.did_key())
    }
}

/// Accepts either a `did:key:` identifier or a bare multibase key.
impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(DID_KEY_PREFIX) {
            Self::from_did_key(s)
        } else {
            Self::from_multibase(s)
        }
    }
}
