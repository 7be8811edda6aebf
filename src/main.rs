// main.rs — widget-trust CLI entry point
//
// Operator tooling around the verification library: check a saved response,
// produce canonical vectors for the issuer, inspect signatures and keys.

mod cli;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use clap::Parser;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

use cli::{Cli, Commands, KeyArgs};
use widget_trust::config;
use widget_trust::hash;
use widget_trust::trust::{
    canonical, der, payload, ConfigVerifier, EcdsaP256, P256Backend, PublicKeyMaterial,
    TrustDecision,
};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Verify { response, key } => {
            if cmd_verify(&response, &key)? {
                Ok(())
            } else {
                std::process::exit(1)
            }
        }
        Commands::Canonical {
            input,
            signed_message,
        } => cmd_canonical(&input, signed_message),
        Commands::DecodeSig { signature } => cmd_decode_sig(&signature),
        Commands::CheckKey { key } => cmd_check_key(&key),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_key(args: &KeyArgs) -> Result<String> {
    config::load_public_key(args.public_key.as_deref(), args.keyfile.as_deref()).with_context(
        || {
            format!(
                "resolving issuer public key (--public-key, --keyfile, or {})",
                config::PUBLIC_KEY_ENV
            )
        },
    )
}

fn cmd_verify(response: &Path, key: &KeyArgs) -> Result<bool> {
    let public_key = resolve_key(key)?;
    let body = fs::read(response).with_context(|| format!("reading {}", response.display()))?;
    info!(path = %response.display(), bytes = body.len(), "verifying configuration response");

    let decision = ConfigVerifier::new().evaluate(&body, Some(&public_key))?;
    match &decision {
        TrustDecision::Trusted(settings) => {
            println!("TRUSTED");
            println!("  chatbot_name: {}", settings.chatbot_name);
            println!("  theme:        {}", settings.theme);
            println!("  position:     {:?}", settings.position);
            println!("  quick_questions: {}", settings.quick_questions.len());
        }
        TrustDecision::Untrusted => println!("UNTRUSTED"),
    }
    Ok(decision.is_trusted())
}

fn cmd_canonical(input: &Path, signed_message: bool) -> Result<()> {
    let data = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let value: Value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", input.display()))?;

    let value = if signed_message {
        payload::signed_message(&settings_object(value)?)
    } else {
        value
    };

    let bytes = canonical::canonical_bytes(&value);
    println!("{}", String::from_utf8_lossy(&bytes));
    println!("sha256: {}", hash::sha256_hex(&bytes));
    Ok(())
}

/// Accept either a full response body or a bare ui_settings object.
fn settings_object(value: Value) -> Result<Map<String, Value>> {
    let Value::Object(mut map) = value else {
        bail!("expected a JSON object");
    };
    match map.remove(payload::SIGNED_WRAPPER_KEY) {
        Some(Value::Object(settings)) => Ok(settings),
        Some(_) => bail!("{} must be an object", payload::SIGNED_WRAPPER_KEY),
        None => Ok(map),
    }
}

fn cmd_decode_sig(signature: &str) -> Result<()> {
    let der_bytes = B64.decode(signature).context("decoding signature base64")?;
    let raw = der::decode_der_signature(&der_bytes)?;
    println!("r: {}", hash::hex_encode(raw.r()));
    println!("s: {}", hash::hex_encode(raw.s()));
    Ok(())
}

fn cmd_check_key(args: &KeyArgs) -> Result<()> {
    let public_key = resolve_key(args)?;
    let material = PublicKeyMaterial::from_base64(&public_key)?;
    P256Backend.import_public_key(&material)?;
    println!("OK: uncompressed P-256 point");
    println!("  x: {}", hash::hex_encode(material.x()));
    println!("  y: {}", hash::hex_encode(material.y()));
    Ok(())
}
