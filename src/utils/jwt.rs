//! Bearer token inspection.
//!
//! Tokens are issued elsewhere; this side only reads the payload segment to
//! learn the subject and expiry. Signatures are never verified here.

use crate::errors::{AppError, AppResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, deserialize_with = "string_or_number")]
    pub sub: Option<String>,
    /// Unix seconds; issuers may send a fractional value.
    pub exp: Option<f64>,
    pub name: Option<String>,
    #[serde(rename = "vehicleTagId", alias = "vehicle_tag_id")]
    pub vehicle_tag_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Decode the payload segment of a `header.payload.signature` token.
/// Base64url with or without trailing padding is accepted.
pub fn decode_claims(token: &str) -> AppResult<Claims> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(AppError::Token(format!(
            "expected 3 segments, found {}",
            parts.len()
        )));
    }

    let payload = parts[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AppError::Token(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes).map_err(|e| AppError::Token(format!("payload is not JSON: {e}")))
}

/// True when the token carries an `exp` claim later than `now` (unix seconds).
pub fn is_unexpired(token: &str, now: i64) -> bool {
    match decode_claims(token) {
        Ok(Claims { exp: Some(exp), .. }) => exp > now as f64,
        _ => false,
    }
}

/// Build an unsigned token around the given claims. Used by tests and the
/// demo seed; nothing in the crate relies on the signature segment.
pub fn encode_unsigned(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;
    use serde_json::json;

    #[test]
    fn reads_subject_and_expiry() {
        let token = encode_unsigned(&json!({"sub": "INS001", "exp": 2_000_000_000}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("INS001"));
        assert_eq!(claims.exp, Some(2_000_000_000.0));
    }

    #[test]
    fn padded_payload_is_accepted() {
        // 16 bytes of JSON -> padded encoding ends with "=="
        let payload = URL_SAFE.encode(br#"{"exp":12345678}"#);
        assert!(payload.ends_with('='));
        let token = format!("e30.{payload}.sig");
        assert_eq!(decode_claims(&token).unwrap().exp, Some(12_345_678.0));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(decode_claims("abc").is_err());
        assert!(decode_claims("a.b").is_err());
        assert!(decode_claims("e30.!!!.x").is_err());
        let not_json = URL_SAFE_NO_PAD.encode("hello");
        assert!(decode_claims(&format!("e30.{not_json}.x")).is_err());
    }

    #[test]
    fn expiry_is_compared_with_now() {
        let token = encode_unsigned(&json!({"exp": 1000}));
        assert!(is_unexpired(&token, 999));
        assert!(!is_unexpired(&token, 1000));
        let no_exp = encode_unsigned(&json!({"sub": "x"}));
        assert!(!is_unexpired(&no_exp, 0));
    }

    #[test]
    fn fractional_expiry_and_numeric_subject() {
        let token = encode_unsigned(&json!({"sub": 42, "exp": 1_999_999_999.5}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.exp, Some(1_999_999_999.5));
        assert!(is_unexpired(&token, 1_999_999_999));
        assert!(!is_unexpired(&token, 2_000_000_000));
    }
}
