//! Signing and verification of records.

use crate::canonical::canonicalize;
use crate::{CanonicalError, Record, SignError, VerifyError};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use lexsig_keys::{PrivateKey, PublicKey};
use tracing::debug;

/// Sign `record` in place.
///
/// The canonical bytes are hashed and signed, and the unpadded base64 signature
/// is written into the record's signature field. On error the record is left
/// untouched.
pub fn sign<R: Record + ?Sized>(record: &mut R, key: Option<&PrivateKey>) -> Result<(), SignError> {
    let key = key.ok_or(SignError::NilKey)?;
    let canonical = canonicalize(&*record)?;
    let signature = key.hash_and_sign(&canonical)?;

    debug!(
        key_type = %key.key_type(),
        canonical_len = canonical.len(),
        "signed record"
    );
    record.set_signature(STANDARD_NO_PAD.encode(signature));
    Ok(())
}

/// Verify the signature embedded in `record`.
///
/// Fails with [`VerifyError::InvalidEncoding`] when the stored signature is
/// not base64 and with [`VerifyError::SignatureMismatch`] when it is well
/// formed but does not match the record under `key`.
pub fn verify<R: Record + ?Sized>(record: &R, key: Option<&PublicKey>) -> Result<(), VerifyError> {
    let key = key.ok_or(VerifyError::NilKey)?;
    let encoded = record.signature().ok_or(VerifyError::MissingSignature)?;
    let signature = STANDARD_NO_PAD.decode(encoded)?;
    let canonical = canonicalize(record)?;

    match key.hash_and_verify(&canonical, &signature) {
        Ok(()) => {
            debug!(key_type = %key.key_type(), canonical_len = canonical.len(), "verified record");
            Ok(())
        }
        Err(e) => {
            debug!(key_type = %key.key_type(), error = %e, "record signature rejected");
            Err(VerifyError::SignatureMismatch)
        }
    }
}

/// Method-style signing for every [`Record`].
pub trait RecordSigning: Record {
    fn sign_with(&mut self, key: &PrivateKey) -> Result<(), SignError> {
        sign(self, Some(key))
    }

    fn verify_with(&self, key: &PublicKey) -> Result<(), VerifyError> {
        verify(self, Some(key))
    }

    fn canonical_bytes(&self) -> Result<Vec<u8>, CanonicalError> {
        canonicalize(self)
    }
}

impl<R: Record + ?Sized> RecordSigning for R {}
