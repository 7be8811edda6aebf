// canonical.rs — Deterministic JSON encoding of the signed configuration
//
// Sorted object keys (byte-wise), compact output with no whitespace, arrays in
// original order. Scalars follow the widget-side JSON encoder: numbers per
// ECMAScript Number::toString (integers beyond 2^53 lose precision exactly as
// they do in JSON.parse), JSON.stringify escaping.
//
// RULE: the issuer signs the SHA-256 of canonical_bytes(signed_message(..)).
// Any change here must be mirrored on the signer or every signature breaks.

use serde_json::{Number, Value};

/// Produce canonical JSON bytes (UTF-8) for a value tree.
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    canonical_json(value).into_bytes()
}

/// Produce canonical JSON from a serde_json::Value.
///
/// - Objects: keys sorted by byte order, no whitespace
/// - Arrays: elements in order, no whitespace
/// - Strings: JSON.stringify escaping
/// - Numbers: ECMAScript shortest form; integers up to 2^53 print verbatim
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(n, out),
        Value::String(s) => write_string(s, out),
        Value::Array(arr) => {
            out.push('[');
            for (i, v) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(v, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            // serde_json::Map iteration order depends on the preserve_order
            // feature, so sort explicitly.
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push('{');
            for (i, (key, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(v, out);
            }
            out.push('}');
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Every integer up to 2^53 in magnitude is exact as an IEEE double.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

fn write_number(n: &Number, out: &mut String) {
    if let Some(i) = n.as_i64() {
        if i.unsigned_abs() <= MAX_EXACT_INTEGER {
            out.push_str(&i.to_string());
        } else {
            out.push_str(&format_f64(i as f64));
        }
    } else if let Some(u) = n.as_u64() {
        if u <= MAX_EXACT_INTEGER {
            out.push_str(&u.to_string());
        } else {
            out.push_str(&format_f64(u as f64));
        }
    } else if let Some(f) = n.as_f64() {
        out.push_str(&format_f64(f));
    }
}

/// ECMAScript Number::toString for finite values.
fn format_f64(v: f64) -> String {
    if v == 0.0 {
        // Covers -0.0 as well.
        return "0".to_string();
    }
    if !v.is_finite() {
        return "null".to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e3".
    let sci = format!("{:e}", v.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    let k = digits.len() as i32;
    let n = exp + 1;
    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let sign = if e < 0 { '-' } else { '+' };
        let mantissa = if k == 1 {
            digits
        } else {
            let (lead, rest) = digits.split_at(1);
            format!("{}.{}", lead, rest)
        };
        format!("{}e{}{}", mantissa, sign, e.abs())
    };

    if v < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash;
    use serde_json::json;

    fn canon(json_str: &str) -> String {
        let value: Value = serde_json::from_str(json_str).unwrap();
        canonical_json(&value)
    }

    #[test]
    fn canonical_sorts_object_keys() {
        assert_eq!(canon(r#"{"b":1,"a":2}"#), r#"{"a":2,"b":1}"#);
        assert_eq!(canon(r#"{"a":2,"b":1}"#), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn canonical_handles_nested_objects() {
        assert_eq!(
            canon(r#"{"b":{"z":1,"a":2},"a":true}"#),
            r#"{"a":true,"b":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn canonical_preserves_array_order() {
        assert_eq!(canon(r#"[3,1,2]"#), r#"[3,1,2]"#);
        assert_eq!(
            canon(r#"[{"y":1,"x":2},null]"#),
            r#"[{"x":2,"y":1},null]"#
        );
    }

    #[test]
    fn canonical_strips_whitespace() {
        let pretty = "{\n  \"theme\" : \"dark\",\n  \"list\" : [ 1 , 2 ]\n}";
        assert_eq!(canon(pretty), r#"{"list":[1,2],"theme":"dark"}"#);
    }

    #[test]
    fn canonical_sort_is_bytewise_not_case_insensitive() {
        // 'Z' (0x5a) sorts before '_' (0x5f) before 'a' (0x61).
        assert_eq!(
            canon(r#"{"a":1,"_":2,"Z":3}"#),
            r#"{"Z":3,"_":2,"a":1}"#
        );
    }

    #[test]
    fn canonical_escapes_strings() {
        assert_eq!(
            canon(r#"{"key":"hello \"world\"\nnewline\\"}"#),
            r#"{"key":"hello \"world\"\nnewline\\"}"#
        );
        let value = json!("tab\there\u{0001}\u{0008}\u{000c}/é");
        assert_eq!(canonical_json(&value), "\"tab\\there\\u0001\\b\\f/é\"");
    }

    #[test]
    fn canonical_escapes_keys() {
        let value = json!({ "quo\"te": 1 });
        assert_eq!(canonical_json(&value), r#"{"quo\"te":1}"#);
    }

    #[test]
    fn integers_print_verbatim_up_to_2_pow_53() {
        assert_eq!(canon("[0,-7,3000]"), "[0,-7,3000]");
        assert_eq!(
            canon("[9007199254740992,-9007199254740992]"),
            "[9007199254740992,-9007199254740992]"
        );
    }

    #[test]
    fn large_integers_round_like_json_parse() {
        assert_eq!(
            canon("[9007199254740993,-9007199254740993,18446744073709551615]"),
            "[9007199254740992,-9007199254740992,18446744073709552000]"
        );
    }

    #[test]
    fn floats_use_shortest_ecmascript_form() {
        assert_eq!(canon("[1.5,3000.0,-0.0,0.1,100.25]"), "[1.5,3000,0,0.1,100.25]");
        assert_eq!(canon("[1e21,1.5e-7,0.000001,123e18]"), "[1e+21,1.5e-7,0.000001,123000000000000000000]");
        assert_eq!(canon("[-2.5e-9]"), "[-2.5e-9]");
    }

    #[test]
    fn full_precision_floats_survive_parsing() {
        // 17 significant digits; needs an exact decimal-to-double parse.
        assert_eq!(canon("[1.0715660391465826e-75]"), "[1.0715660391465826e-75]");
        assert_eq!(canon("[0.30000000000000004]"), "[0.30000000000000004]");
        assert_eq!(canon("[-1.7976931348623157e308]"), "[-1.7976931348623157e+308]");
    }

    #[test]
    fn reordered_objects_encode_identically() {
        let a = json!({
            "theme": "ocean",
            "quick_questions": ["a", "b"],
            "support_info": null,
            "auto_open_delay_ms": 1500
        });
        let b: Value = serde_json::from_str(
            r#"{"auto_open_delay_ms":1500,"support_info":null,"quick_questions":["a","b"],"theme":"ocean"}"#,
        )
        .unwrap();
        assert_eq!(canonical_bytes(&a), canonical_bytes(&b));
    }

    #[test]
    fn canonical_signed_message_golden_hash() {
        // Golden vector shared with the issuer. If this changes, the signer
        // must change in lockstep.
        let message = json!({
            "ui_settings": {
                "theme": "ocean",
                "chatbot_name": "Harbor Assistant",
                "welcome_message": "Hi there 👋 How can I help?",
                "quick_questions": ["What are your hours?", "Where are you located?"],
                "support_info": "support@example.com",
                "position": "bottom-right",
                "auto_open_delay_ms": 3000,
                "auto_greet_on_open": true,
                "ask_email_before_chat": false,
                "persist_chat": true,
                "show_timestamps": false
            }
        });
        let expected = concat!(
            r#"{"ui_settings":{"ask_email_before_chat":false,"auto_greet_on_open":true,"#,
            r#""auto_open_delay_ms":3000,"chatbot_name":"Harbor Assistant","persist_chat":true,"#,
            r#""position":"bottom-right","quick_questions":["What are your hours?","Where are you located?"],"#,
            r#""show_timestamps":false,"support_info":"support@example.com","theme":"ocean","#,
            r#""welcome_message":"Hi there 👋 How can I help?"}}"#
        );
        let bytes = canonical_bytes(&message);
        assert_eq!(String::from_utf8(bytes.clone()).unwrap(), expected);
        assert_eq!(
            hash::sha256_hex(&bytes),
            "3e7c686fb5d15ff5a70708f8a8c766162e512651dc4825ac0ef41dcfb6c170fa"
        );
    }
}
