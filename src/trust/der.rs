// der.rs — ASN.1 DER ECDSA signature decoding
//
// SEQUENCE { INTEGER r, INTEGER s } → r(32) || s(32), big-endian, zero-padded.
// Every read is bounds-checked; a length octet that points past the end of
// the buffer is a MalformedSignature, never a panic.

use std::fmt;

use crate::hash::hex_encode;
use crate::trust::error::{Result, TrustError};

/// Byte width of one P-256 scalar.
pub const SCALAR_LEN: usize = 32;
pub const RAW_SIGNATURE_LEN: usize = 2 * SCALAR_LEN;

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;
const MIN_DER_LEN: usize = 8;

/// Fixed-width `r || s` signature as consumed by the verification primitive.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawSignature([u8; RAW_SIGNATURE_LEN]);

impl RawSignature {
    pub fn as_bytes(&self) -> &[u8; RAW_SIGNATURE_LEN] {
        &self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..SCALAR_LEN]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[SCALAR_LEN..]
    }
}

impl fmt::Debug for RawSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSignature")
            .field("r", &hex_encode(self.r()))
            .field("s", &hex_encode(self.s()))
            .finish()
    }
}

/// Decode a DER `SEQUENCE{INTEGER r, INTEGER s}` into a 64-byte raw signature.
///
/// The outer length must cover exactly the two INTEGERs; otherwise a flipped
/// length bit or appended bytes would still decode to the same `r || s`.
pub fn decode_der_signature(der: &[u8]) -> Result<RawSignature> {
    if der.len() < MIN_DER_LEN {
        return Err(malformed(format!(
            "DER signature is {} bytes, need at least {}",
            der.len(),
            MIN_DER_LEN
        )));
    }
    if der[0] != SEQUENCE_TAG {
        return Err(malformed(format!(
            "expected SEQUENCE tag 0x30, found 0x{:02x}",
            der[0]
        )));
    }

    // Tag and short-form length.
    let mut cursor = 2;
    let r = read_integer(der, &mut cursor, "r")?;
    let s = read_integer(der, &mut cursor, "s")?;
    if cursor != der.len() {
        return Err(malformed(format!(
            "{} trailing bytes after s",
            der.len() - cursor
        )));
    }
    if der[1] as usize != der.len() - 2 {
        return Err(malformed(format!(
            "SEQUENCE length {} does not match {} content bytes",
            der[1],
            der.len() - 2
        )));
    }

    let mut raw = [0u8; RAW_SIGNATURE_LEN];
    left_pad_into(strip_sign_byte(r), &mut raw[..SCALAR_LEN], "r")?;
    left_pad_into(strip_sign_byte(s), &mut raw[SCALAR_LEN..], "s")?;
    Ok(RawSignature(raw))
}

fn read_integer<'a>(der: &'a [u8], cursor: &mut usize, name: &str) -> Result<&'a [u8]> {
    let tag = *der
        .get(*cursor)
        .ok_or_else(|| malformed(format!("missing INTEGER tag for {}", name)))?;
    if tag != INTEGER_TAG {
        return Err(malformed(format!(
            "expected INTEGER tag 0x02 for {}, found 0x{:02x}",
            name, tag
        )));
    }
    let len = *der
        .get(*cursor + 1)
        .ok_or_else(|| malformed(format!("missing length octet for {}", name)))?
        as usize;

    let start = *cursor + 2;
    let end = start + len;
    let bytes = der.get(start..end).ok_or_else(|| {
        malformed(format!(
            "{} claims {} bytes but only {} remain",
            name,
            len,
            der.len().saturating_sub(start)
        ))
    })?;
    *cursor = end;
    Ok(bytes)
}

/// Drop the single 0x00 DER prepends to keep a high-bit integer positive.
fn strip_sign_byte(bytes: &[u8]) -> &[u8] {
    match bytes {
        [0x00, rest @ ..] if !rest.is_empty() => rest,
        _ => bytes,
    }
}

fn left_pad_into(magnitude: &[u8], out: &mut [u8], name: &str) -> Result<()> {
    if magnitude.len() > out.len() {
        return Err(malformed(format!(
            "{} is {} bytes, exceeds {}",
            name,
            magnitude.len(),
            out.len()
        )));
    }
    let offset = out.len() - magnitude.len();
    out[offset..].copy_from_slice(magnitude);
    Ok(())
}

fn malformed(reason: String) -> TrustError {
    TrustError::MalformedSignature(reason)
}
