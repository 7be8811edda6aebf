// backend.rs — ECDSA P-256 / SHA-256 capability interface
//
// The orchestrator only needs two operations from a crypto provider: turn
// validated point bytes into a verification key, and check a raw r||s
// signature over a message. P256Backend implements both with RustCrypto.

use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::EncodedPoint;

use crate::hash;
use crate::trust::der::RawSignature;
use crate::trust::error::{Result, TrustError};
use crate::trust::key::PublicKeyMaterial;

pub trait EcdsaP256 {
    /// Verification-only key handle.
    type Key;

    fn import_public_key(&self, material: &PublicKeyMaterial) -> Result<Self::Key>;

    /// Verify `signature` over SHA-256(`message`). `Ok(false)` means the
    /// signature is well-formed but does not match.
    fn verify_sha256(
        &self,
        key: &Self::Key,
        signature: &RawSignature,
        message: &[u8],
    ) -> Result<bool>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct P256Backend;

impl EcdsaP256 for P256Backend {
    type Key = VerifyingKey;

    fn import_public_key(&self, material: &PublicKeyMaterial) -> Result<VerifyingKey> {
        let point = EncodedPoint::from_bytes(material.as_bytes())
            .map_err(|e| TrustError::KeyImportFailure(format!("invalid SEC1 encoding: {}", e)))?;
        VerifyingKey::from_encoded_point(&point)
            .map_err(|e| TrustError::KeyImportFailure(format!("point is not on P-256: {}", e)))
    }

    fn verify_sha256(
        &self,
        key: &VerifyingKey,
        signature: &RawSignature,
        message: &[u8],
    ) -> Result<bool> {
        // Zero scalars and scalars >= n are rejected here.
        let signature = Signature::from_slice(signature.as_bytes()).map_err(|e| {
            TrustError::MalformedSignature(format!("r or s out of range: {}", e))
        })?;
        let digest = hash::sha256(message);
        Ok(key.verify_prehash(&digest, &signature).is_ok())
    }
}
