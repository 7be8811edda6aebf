use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::trust::error::{Result, TrustError};

// ── Wire ────────────────────────────────────────────────────────────────────

/// Body of `GET /config/{botId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigResponse {
    pub ui_settings: Map<String, Value>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// Received settings plus the base64 DER signature that claims to cover them.
#[derive(Debug, Clone)]
pub struct SignedEnvelope {
    pub payload: Map<String, Value>,
    pub signature: String,
}

impl ConfigResponse {
    pub fn parse(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| TrustError::MalformedResponse(e.to_string()))
    }

    /// A response without a usable signature is a malformed signature, not a
    /// separate failure class.
    pub fn into_envelope(self) -> Result<SignedEnvelope> {
        match self.signature {
            Some(signature) if !signature.is_empty() => Ok(SignedEnvelope {
                payload: self.ui_settings,
                signature,
            }),
            _ => Err(TrustError::MalformedSignature(
                "response carries no signature".to_string(),
            )),
        }
    }
}

// ── Settings ────────────────────────────────────────────────────────────────

/// A field that can be missing, explicitly `null`, or set.
///
/// `Absent` and `Null` encode differently, so they are kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Nullable<T> {
    #[default]
    Absent,
    Null,
    Present(T),
}

impl<T> Nullable<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Nullable::Absent)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Nullable::Present(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Nullable::Present(v) => v.serialize(serializer),
            // Absent is skipped by the containing struct.
            Nullable::Absent | Nullable::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // Only called when the key is present; `#[serde(default)]` covers Absent.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Nullable::Present(v),
            None => Nullable::Null,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

/// Typed view of the signed fields, used for rendering once trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiSettings {
    pub theme: String,
    pub chatbot_name: String,
    pub welcome_message: String,
    #[serde(default)]
    pub quick_questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub support_info: Nullable<String>,
    pub position: WidgetPosition,
    #[serde(default)]
    pub auto_open_delay_ms: u64,
    #[serde(default)]
    pub auto_greet_on_open: bool,
    #[serde(default)]
    pub ask_email_before_chat: bool,
    #[serde(default)]
    pub persist_chat: bool,
    #[serde(default)]
    pub show_timestamps: bool,
}

impl UiSettings {
    /// Parse-or-fail over an already filtered settings map.
    pub fn from_signed_fields(fields: &Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(fields.clone()))
            .map_err(|e| TrustError::InvalidSettings(e.to_string()))
    }
}
