use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::trust::error::{Result, TrustError};

/// 0x04 || X(32) || Y(32)
pub const PUBLIC_KEY_LEN: usize = 65;
pub const UNCOMPRESSED_POINT_PREFIX: u8 = 0x04;

/// Structurally valid uncompressed P-256 point bytes.
///
/// Curve membership is not checked here; that is the job of
/// `EcdsaP256::import_public_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial([u8; PUBLIC_KEY_LEN]);

impl PublicKeyMaterial {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| {
            TrustError::InvalidKeyFormat(format!(
                "public key must be {} bytes, got {}",
                PUBLIC_KEY_LEN,
                bytes.len()
            ))
        })?;
        if array[0] != UNCOMPRESSED_POINT_PREFIX {
            return Err(TrustError::InvalidKeyFormat(format!(
                "public key must start with 0x04 (uncompressed point), found 0x{:02x}",
                array[0]
            )));
        }
        Ok(Self(array))
    }

    /// Parse a base64 or base64url key value, padding optional.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        Self::from_bytes(&decode_key_base64(encoded)?)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub fn x(&self) -> &[u8] {
        &self.0[1..33]
    }

    pub fn y(&self) -> &[u8] {
        &self.0[33..]
    }
}

/// Decode a key published as standard base64 or base64url.
///
/// `-` becomes `+`, `_` becomes `/`, and `=` is appended up to a multiple of
/// four. Nothing else is normalised.
pub fn decode_key_base64(encoded: &str) -> Result<Vec<u8>> {
    let mut normalized = encoded.replace('-', "+").replace('_', "/");
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }
    B64.decode(&normalized)
        .map_err(|e| TrustError::InvalidKeyFormat(format!("public key is not valid base64: {}", e)))
}
