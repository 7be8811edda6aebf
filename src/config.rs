use std::path::Path;

use tracing::debug;

use crate::trust::error::{Result, TrustError};

/// Environment variable carrying the issuer's P-256 public key (base64 or
/// base64url of the 65-byte uncompressed point).
pub const PUBLIC_KEY_ENV: &str = "WIDGET_TRUST_P256_PUBLIC_KEY";

/// Resolve the issuer public key from an explicit value, the environment
/// variable, or a key file, in that order.
pub fn load_public_key(explicit: Option<&str>, keyfile: Option<&Path>) -> Result<String> {
    resolve_public_key(explicit, std::env::var(PUBLIC_KEY_ENV).ok(), keyfile)
}

fn resolve_public_key(
    explicit: Option<&str>,
    from_env: Option<String>,
    keyfile: Option<&Path>,
) -> Result<String> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        debug!("using public key from command line");
        return Ok(key.to_string());
    }

    if let Some(key) = from_env.filter(|k| !k.is_empty()) {
        debug!(var = PUBLIC_KEY_ENV, "using public key from environment");
        return Ok(key);
    }

    if let Some(path) = keyfile {
        let contents = std::fs::read_to_string(path).map_err(|source| TrustError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
        let key = contents.trim();
        if !key.is_empty() {
            debug!(path = %path.display(), "using public key from file");
            return Ok(key.to_string());
        }
    }

    Err(TrustError::MissingKeyConfiguration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_value_wins() {
        let key = resolve_public_key(Some("AAA"), Some("BBB".into()), None).unwrap();
        assert_eq!(key, "AAA");
    }

    #[test]
    fn environment_used_when_no_explicit_value() {
        let key = resolve_public_key(Some(""), Some("BBB".into()), None).unwrap();
        assert_eq!(key, "BBB");
    }

    #[test]
    fn keyfile_contents_are_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  BFFcPW65  ").unwrap();
        let key = resolve_public_key(None, Some(String::new()), Some(file.path())).unwrap();
        assert_eq!(key, "BFFcPW65");
    }

    #[test]
    fn nothing_configured_is_missing_key() {
        assert!(matches!(
            resolve_public_key(None, None, None),
            Err(TrustError::MissingKeyConfiguration)
        ));

        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            resolve_public_key(None, None, Some(file.path())),
            Err(TrustError::MissingKeyConfiguration)
        ));
    }

    #[test]
    fn unreadable_keyfile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("issuer.pub");
        assert!(matches!(
            resolve_public_key(None, None, Some(&missing)),
            Err(TrustError::KeyFile { .. })
        ));
    }
}
