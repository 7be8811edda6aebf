// cli.rs — Command-line interface definitions (clap derive)
//
//   widget-trust verify      — gate a saved /config/{botId} response
//   widget-trust canonical   — print canonical bytes and their SHA-256
//   widget-trust decode-sig  — split a DER signature into r and s
//   widget-trust check-key   — validate the configured issuer key

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "widget-trust")]
#[command(about = "Verify signed chat-widget UI configuration")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a saved configuration response against the issuer key
    Verify {
        /// JSON body returned by GET /config/{botId}
        #[arg(long)]
        response: PathBuf,

        #[command(flatten)]
        key: KeyArgs,
    },

    /// Print the canonical encoding of a JSON document
    Canonical {
        /// JSON file to encode
        #[arg(long)]
        input: PathBuf,

        /// Treat input as a response or ui_settings object and encode the
        /// filtered, wrapped message the issuer signs
        #[arg(long)]
        signed_message: bool,
    },

    /// Decode a base64 DER ECDSA signature into r and s
    DecodeSig {
        /// Standard base64 of the DER signature
        signature: String,
    },

    /// Validate the configured issuer public key
    CheckKey {
        #[command(flatten)]
        key: KeyArgs,
    },
}

#[derive(clap::Args)]
pub struct KeyArgs {
    /// Issuer public key, base64 or base64url (overrides the environment)
    #[arg(long)]
    pub public_key: Option<String>,

    /// File containing the issuer public key
    #[arg(long)]
    pub keyfile: Option<PathBuf>,
}
