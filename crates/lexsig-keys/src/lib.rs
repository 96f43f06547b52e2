//! Key generation and text encodings for record signing.
//!
//! Keys are carried in three interchangeable text forms:
//! - a multibase private key (`z` + base58btc of a multicodec-tagged scalar),
//! - a multibase public key (compressed point, same scheme),
//! - a `did:key:` identifier wrapping the public multibase.
//!
//! # Example
//!
//! ```
//! use lexsig_keys::{KeyPair, KeyType, PrivateKey, PublicKey};
//!
//! let pair = KeyPair::generate(KeyType::P256).unwrap();
//! let private = PrivateKey::from_multibase(&pair.private_key).unwrap();
//! let public = PublicKey::from_did_key(&pair.did_key).unwrap();
//!
//! let sig = private.hash_and_sign(b"payload").unwrap();
//! public.hash_and_verify(b"payload", &sig).unwrap();
//! ```

mod codec;
mod error;
mod keypair;
mod keys;
pub mod store;

pub use codec::{KeyType, DID_KEY_PREFIX, PRIVATE_KEY_LEN};
pub use error::{KeyError, StoreError};
pub use keypair::KeyPair;
pub use keys::{generate, PrivateKey, PublicKey};
