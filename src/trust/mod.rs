// trust/ — signed UI configuration verification
//
// canonical.rs — deterministic JSON encoding of the signed message
// der.rs       — DER ECDSA signature to fixed-width r || s
// key.rs       — uncompressed P-256 public key material
// backend.rs   — ECDSA P-256 / SHA-256 capability trait and RustCrypto impl
// payload.rs   — allow-list reconstruction of what the issuer signed
// model.rs     — fetch response and typed settings (serde)
// verify.rs    — orchestration and the trust decision
// error.rs     — error taxonomy

pub mod backend;
pub mod canonical;
pub mod der;
pub mod error;
pub mod key;
pub mod model;
pub mod payload;
pub mod verify;

pub use backend::{EcdsaP256, P256Backend};
pub use der::RawSignature;
pub use error::TrustError;
pub use key::PublicKeyMaterial;
pub use model::{ConfigResponse, Nullable, SignedEnvelope, UiSettings, WidgetPosition};
pub use verify::{ConfigVerifier, TrustDecision};
