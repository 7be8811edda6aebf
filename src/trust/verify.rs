// verify.rs — Signed configuration verification
//
// decode signature → import key → reconstruct signed message → canonical
// encode → SHA-256 → ECDSA P-256 verify.
//
// The outcome is binary. Callers of `verify` never learn which stage failed;
// the reason is only logged locally. `evaluate` additionally reports a missing
// public key as an error because that is a deployment fault, not an attack.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use tracing::{debug, warn};

use crate::trust::backend::{EcdsaP256, P256Backend};
use crate::trust::canonical;
use crate::trust::der;
use crate::trust::error::{Result, TrustError};
use crate::trust::key::{self, PublicKeyMaterial};
use crate::trust::model::{ConfigResponse, SignedEnvelope, UiSettings};
use crate::trust::payload;

/// Result of gating a fetched configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum TrustDecision {
    Trusted(UiSettings),
    Untrusted,
}

impl TrustDecision {
    pub fn is_trusted(&self) -> bool {
        matches!(self, TrustDecision::Trusted(_))
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigVerifier<B = P256Backend> {
    backend: B,
}

impl ConfigVerifier<P256Backend> {
    pub fn new() -> Self {
        Self::with_backend(P256Backend)
    }
}

impl<B: EcdsaP256> ConfigVerifier<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Verify that `envelope.signature` covers the allow-listed fields of
    /// `envelope.payload` under the issuer key `public_key` (65 raw bytes).
    ///
    /// Never fails: any problem at any stage yields `false`.
    pub fn verify(&self, envelope: &SignedEnvelope, public_key: &[u8]) -> bool {
        match self.check(envelope, public_key) {
            Ok(()) => {
                debug!("configuration signature verified");
                true
            }
            Err(err) => {
                warn!(reason = %err, "configuration signature rejected");
                false
            }
        }
    }

    fn check(&self, envelope: &SignedEnvelope, public_key: &[u8]) -> Result<()> {
        let signature_der = B64.decode(&envelope.signature).map_err(|e| {
            TrustError::MalformedSignature(format!("signature is not valid base64: {}", e))
        })?;
        let signature = der::decode_der_signature(&signature_der)?;

        let material = PublicKeyMaterial::from_bytes(public_key)?;
        let key = self.backend.import_public_key(&material)?;

        let message = canonical::canonical_bytes(&payload::signed_message(&envelope.payload));
        debug!(message_len = message.len(), "reconstructed signed message");

        if self.backend.verify_sha256(&key, &signature, &message)? {
            Ok(())
        } else {
            Err(TrustError::VerificationMismatch)
        }
    }

    /// Gate a raw `GET /config/{botId}` body.
    ///
    /// `public_key_b64` is the process-wide issuer key (base64 or base64url).
    /// Returns `Err(MissingKeyConfiguration)` when it is absent or empty; every
    /// other failure is `Ok(TrustDecision::Untrusted)`.
    pub fn evaluate(&self, body: &[u8], public_key_b64: Option<&str>) -> Result<TrustDecision> {
        let public_key_b64 = match public_key_b64 {
            Some(k) if !k.is_empty() => k,
            _ => return Err(TrustError::MissingKeyConfiguration),
        };

        match self.evaluate_inner(body, public_key_b64) {
            Ok(decision) => Ok(decision),
            Err(err) => {
                warn!(reason = %err, "configuration response rejected");
                Ok(TrustDecision::Untrusted)
            }
        }
    }

    fn evaluate_inner(&self, body: &[u8], public_key_b64: &str) -> Result<TrustDecision> {
        let envelope = ConfigResponse::parse(body)?.into_envelope()?;
        let settings = UiSettings::from_signed_fields(&payload::filter_signed_fields(&envelope.payload))?;
        let key_bytes = key::decode_key_base64(public_key_b64)?;

        if self.verify(&envelope, &key_bytes) {
            Ok(TrustDecision::Trusted(settings))
        } else {
            Ok(TrustDecision::Untrusted)
        }
    }
}
