//! Deterministic signing envelope for structured records.
//!
//! A record is reduced to canonical bytes (signature field removed, keys sorted,
//! compact JSON), signed with a [`lexsig_keys::PrivateKey`], and the signature is
//! stored back in the record as unpadded standard base64.
//!
//! # Example
//!
//! ```
//! use lexsig_envelope::{LexiconRecord, RecordSigning, VerifyError};
//! use lexsig_keys::{generate, KeyType};
//!
//! let key = generate(KeyType::P256).unwrap();
//! let mut record = LexiconRecord::new(
//!     "app.bsky.feed.post",
//!     "Hello!",
//!     "2023-04-10T12:00:00Z",
//!     "did:plc:example123",
//! );
//!
//! record.sign_with(&key).unwrap();
//! record.verify_with(&key.public_key()).unwrap();
//!
//! record.text = "Tampered".to_string();
//! assert!(matches!(
//!     record.verify_with(&key.public_key()),
//!     Err(VerifyError::SignatureMismatch)
//! ));
//! ```

mod canonical;
mod envelope;
mod error;
mod record;

pub use canonical::canonicalize;
pub use envelope::{sign, verify, RecordSigning};
pub use error::{CanonicalError, ParseError, SignError, VerifyError};
pub use record::{parse_json_record, LexiconRecord, Record};
