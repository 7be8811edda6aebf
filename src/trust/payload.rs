// payload.rs — Reconstruction of exactly what the issuer signed
//
// The configuration endpoint returns the signed fields together with storage
// metadata. Only the allow-listed fields, wrapped as {"ui_settings": {...}},
// were hashed by the issuer.

use serde_json::{Map, Value};

/// Fields covered by the issuer signature. Must match the signer exactly.
pub const ALLOWED_FIELDS: [&str; 11] = [
    "theme",
    "chatbot_name",
    "welcome_message",
    "quick_questions",
    "support_info",
    "position",
    "auto_open_delay_ms",
    "auto_greet_on_open",
    "ask_email_before_chat",
    "persist_chat",
    "show_timestamps",
];

/// Storage metadata that is never part of the signed message.
pub const STORAGE_FIELDS: [&str; 2] = ["id", "created_at"];

/// Key the issuer wraps the filtered settings under before signing.
pub const SIGNED_WRAPPER_KEY: &str = "ui_settings";

pub fn is_signed_field(key: &str) -> bool {
    ALLOWED_FIELDS.contains(&key) && !STORAGE_FIELDS.contains(&key)
}

/// Copy of `raw` restricted to the signed fields.
pub fn filter_signed_fields(raw: &Map<String, Value>) -> Map<String, Value> {
    raw.iter()
        .filter(|(key, _)| is_signed_field(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// The exact value tree the issuer canonicalised and signed.
pub fn signed_message(raw: &Map<String, Value>) -> Value {
    let mut wrapper = Map::new();
    wrapper.insert(
        SIGNED_WRAPPER_KEY.to_string(),
        Value::Object(filter_signed_fields(raw)),
    );
    Value::Object(wrapper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn drops_storage_metadata_and_unknown_keys() {
        let raw = as_map(json!({
            "id": 7,
            "created_at": "2026-01-15T09:30:00Z",
            "updated_at": "2026-02-01T00:00:00Z",
            "theme": "dark",
            "chatbot_name": "Helper",
            "tracking_pixel": "https://evil.example/x.gif"
        }));
        let filtered = filter_signed_fields(&raw);
        let mut keys: Vec<&str> = filtered.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["chatbot_name", "theme"]);
    }

    #[test]
    fn keeps_every_allowed_field_including_nulls() {
        let raw = as_map(json!({
            "theme": "ocean",
            "chatbot_name": "Harbor",
            "welcome_message": "Hi",
            "quick_questions": [],
            "support_info": null,
            "position": "bottom-left",
            "auto_open_delay_ms": 0,
            "auto_greet_on_open": false,
            "ask_email_before_chat": true,
            "persist_chat": false,
            "show_timestamps": true
        }));
        let filtered = filter_signed_fields(&raw);
        assert_eq!(filtered.len(), ALLOWED_FIELDS.len());
        assert_eq!(filtered.get("support_info"), Some(&Value::Null));
    }

    #[test]
    fn storage_fields_are_never_signed() {
        for field in STORAGE_FIELDS {
            assert!(!is_signed_field(field));
        }
        for field in ALLOWED_FIELDS {
            assert!(is_signed_field(field));
        }
    }

    #[test]
    fn signed_message_wraps_filtered_settings() {
        let raw = as_map(json!({ "id": 1, "theme": "dark" }));
        assert_eq!(signed_message(&raw), json!({ "ui_settings": { "theme": "dark" } }));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let raw = as_map(json!({ "theme": "dark" }));
        let message = signed_message(&raw);
        assert!(message["ui_settings"].get("support_info").is_none());
    }
}
