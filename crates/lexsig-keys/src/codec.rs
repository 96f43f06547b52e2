//! Multicodec-tagged multibase and `did:key` text encodings.
//!
//! Every encoded key is `z<base58btc(multicodec_tag + key_bytes)>`, where the
//! tag is the unsigned-varint form of the multicodec code for the algorithm and
//! role (public or private). See <https://github.com/multiformats/multicodec>.

use crate::KeyError;
use std::fmt;
use std::str::FromStr;

/// Method prefix for DID-key identifiers.
pub const DID_KEY_PREFIX: &str = "did:key:";

/// Multibase prefix for base58btc.
const BASE58BTC_PREFIX: char = 'z';

/// Length of every supported private key (scalar or seed).
pub const PRIVATE_KEY_LEN: usize = 32;

// Varint-encoded multicodec tags.
const P256_PUB: [u8; 2] = [0x80, 0x24]; // 0x1200
const P256_PRIV: [u8; 2] = [0x86, 0x26]; // 0x1306
const SECP256K1_PUB: [u8; 2] = [0xe7, 0x01]; // 0xe7
const SECP256K1_PRIV: [u8; 2] = [0x81, 0x26]; // 0x1301
const ED25519_PUB: [u8; 2] = [0xed, 0x01]; // 0xed
const ED25519_PRIV: [u8; 2] = [0x80, 0x26]; // 0x1300

/// Signature algorithm (and curve) a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyType {
    /// NIST P-256 with ECDSA over SHA-256.
    #[default]
    P256,
    /// secp256k1 with ECDSA over SHA-256.
    Secp256k1,
    /// Ed25519.
    Ed25519,
}

impl KeyType {
    pub const ALL: [KeyType; 3] = [KeyType::P256, KeyType::Secp256k1, KeyType::Ed25519];

    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::P256 => "P-256",
            KeyType::Secp256k1 => "secp256k1",
            KeyType::Ed25519 => "Ed25519",
        }
    }

    /// Length in bytes of the encoded public key (compressed SEC1 for ECDSA curves).
    pub fn public_key_len(self) -> usize {
        match self {
            KeyType::P256 | KeyType::Secp256k1 => 33,
            KeyType::Ed25519 => 32,
        }
    }

    fn tag(self, role: KeyRole) -> [u8; 2] {
        match (self, role) {
            (KeyType::P256, KeyRole::Public) => P256_PUB,
            (KeyType::P256, KeyRole::Private) => P256_PRIV,
            (KeyType::Secp256k1, KeyRole::Public) => SECP256K1_PUB,
            (KeyType::Secp256k1, KeyRole::Private) => SECP256K1_PRIV,
            (KeyType::Ed25519, KeyRole::Public) => ED25519_PUB,
            (KeyType::Ed25519, KeyRole::Private) => ED25519_PRIV,
        }
    }

    fn from_tag(tag: [u8; 2], role: KeyRole) -> Option<Self> {
        Self::ALL.into_iter().find(|kt| kt.tag(role) == tag)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "p256" | "p-256" | "es256" => Ok(KeyType::P256),
            "secp256k1" | "k256" | "es256k" => Ok(KeyType::Secp256k1),
            "ed25519" | "eddsa" => Ok(KeyType::Ed25519),
            other => Err(KeyError::UnsupportedKeyType(other.to_string())),
        }
    }
}

/// Which half of a key pair an encoding carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyRole {
    Public,
    Private,
}

impl KeyRole {
    fn expected_len(self, key_type: KeyType) -> usize {
        match self {
            KeyRole::Public => key_type.public_key_len(),
            KeyRole::Private => PRIVATE_KEY_LEN,
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Public => f.write_str("public"),
            KeyRole::Private => f.write_str("private"),
        }
    }
}

/// Encode raw key bytes as a tagged base58btc multibase string.
pub(crate) fn encode_multibase(key_type: KeyType, role: KeyRole, key_bytes: &[u8]) -> String {
    let tag = key_type.tag(role);
    let mut bytes = Vec::with_capacity(tag.len() + key_bytes.len());
    bytes.extend_from_slice(&tag);
    bytes.extend_from_slice(key_bytes);
    format!("{}{}", BASE58BTC_PREFIX, bs58::encode(&bytes).into_string())
}

/// Decode a tagged multibase string into its key type and raw key bytes.
///
/// The key bytes are only length-checked here; curve validation happens when the
/// caller builds a key object from them.
pub(crate) fn decode_multibase(encoded: &str, role: KeyRole) -> Result<(KeyType, Vec<u8>), KeyError> {
    let body = encoded.strip_prefix(BASE58BTC_PREFIX).ok_or_else(|| {
        KeyError::InvalidEncoding("multibase key must use base58btc ('z' prefix)".into())
    })?;
    if body.is_empty() {
        return Err(KeyError::InvalidEncoding("empty multibase payload".into()));
    }

    let bytes = bs58::decode(body)
        .into_vec()
        .map_err(|e| KeyError::InvalidEncoding(format!("invalid base58btc: {e}")))?;
    if bytes.len() < 2 {
        return Err(KeyError::InvalidEncoding("missing multicodec tag".into()));
    }

    let tag = [bytes[0], bytes[1]];
    let key_type = KeyType::from_tag(tag, role).ok_or_else(|| {
        KeyError::UnsupportedKeyType(format!(
            "multicodec prefix {:02x}{:02x} is not a recognized {role} key tag",
            tag[0], tag[1]
        ))
    })?;

    let key_bytes = bytes[2..].to_vec();
    let expected = role.expected_len(key_type);
    if key_bytes.len() != expected {
        return Err(KeyError::InvalidEncoding(format!(
            "{key_type} {role} key must be {expected} bytes, got {}",
            key_bytes.len()
        )));
    }
    Ok((key_type, key_bytes))
}

/// Strip the `did:key:` method prefix, leaving the multibase key portion.
pub(crate) fn strip_did_key(did: &str) -> Result<&str, KeyError> {
    did.strip_prefix(DID_KEY_PREFIX)
        .ok_or_else(|| KeyError::InvalidEncoding(format!("DID must start with '{DID_KEY_PREFIX}'")))
}
