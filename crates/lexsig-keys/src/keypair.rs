//! At-rest key pair representation.

use crate::{generate, KeyError, KeyType, PrivateKey, PublicKey};
use serde::{Deserialize, Serialize};

/// The three text encodings of one key, as stored on disk.
///
/// All fields denote the same key material; [`KeyPair::check`] confirms it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    /// Multibase-encoded private key.
    pub private_key: String,
    /// Multibase-encoded public key.
    pub public_key: String,
    /// `did:key:` form of the public key.
    pub did_key: String,
}

impl KeyPair {
    /// Generate a fresh key of `key_type` and encode it.
    pub fn generate(key_type: KeyType) -> Result<Self, KeyError> {
        Ok(Self::build(&generate(key_type)?))
    }

    /// Encode a private key together with its derived public key.
    pub fn build(private_key: &PrivateKey) -> Self {
        Self::from_parts(private_key, &private_key.public_key())
    }

    /// Encode a private key and a public key as given.
    ///
    /// Passing a public key that does not belong to `private_key` produces a
    /// pair that fails [`KeyPair::check`].
    pub fn from_parts(private_key: &PrivateKey, public_key: &PublicKey) -> Self {
        Self {
            private_key: private_key.multibase(),
            public_key: public_key.multibase(),
            did_key: public_key.did_key(),
        }
    }

    pub fn private_key(&self) -> Result<PrivateKey, KeyError> {
        PrivateKey::from_multibase(&self.private_key)
    }

    pub fn public_key(&self) -> Result<PublicKey, KeyError> {
        PublicKey::from_multibase(&self.public_key)
    }

    /// The public key as decoded from the `didKey` field.
    pub fn did_public_key(&self) -> Result<PublicKey, KeyError> {
        PublicKey::from_did_key(&self.did_key)
    }

    /// Decode every field and confirm they describe the same key.
    pub fn check(&self) -> Result<(), KeyError> {
        let derived = self.private_key()?.public_key();
        let public = self.public_key()?;
        let from_did = self.did_public_key()?;

        if derived != public {
            return Err(KeyError::Mismatch(
                "public key does not match the private key",
            ));
        }
        if from_did != public {
            return Err(KeyError::Mismatch("DID key does not match the public key"));
        }
        Ok(())
    }
}
