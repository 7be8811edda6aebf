use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between receiving a configuration response
/// and deciding whether to trust it.
///
/// `ConfigVerifier::verify` collapses every variant into `false`. Only
/// `MissingKeyConfiguration` is ever handed back to a caller, because it is a
/// deployment problem rather than a verification outcome.
#[derive(Debug, Error)]
pub enum TrustError {
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("invalid public key format: {0}")]
    InvalidKeyFormat(String),

    #[error("public key import failed: {0}")]
    KeyImportFailure(String),

    #[error("signature does not match the signed configuration")]
    VerificationMismatch,

    #[error("no configuration public key is configured")]
    MissingKeyConfiguration,

    #[error("malformed configuration response: {0}")]
    MalformedResponse(String),

    #[error("signed settings do not match the settings schema: {0}")]
    InvalidSettings(String),

    #[error("reading public key file {}: {source}", path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TrustError>;
