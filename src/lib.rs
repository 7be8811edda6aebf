// lib.rs — widget-trust
//
// Lets an embedded chat widget confirm that the bot UI configuration it
// fetched was signed by the configuration issuer (ECDSA P-256 over canonical
// JSON) before rendering any of it.

pub mod config;
pub mod hash;
pub mod trust;
