//! Webhook signature verification and payload parsing.
//!
//! Verifies that an inbound delivery was signed by the shared webhook secret
//! and is recent enough to not be a replay, then parses the body into a
//! [`WebhookPayload`].

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::error::WebhookError;
use super::payload::{WebhookHeaders, WebhookPayload};
use crate::error::Result;

type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// Wire constants
// ============================================================================

/// Header carrying the HMAC-SHA256 signature (hex digest, optionally
/// prefixed with [`SIGNATURE_PREFIX`]).
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";
/// Header carrying the signing timestamp (decimal Unix seconds).
pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";
/// Optional header naming the event type. Informational only.
pub const EVENT_HEADER: &str = "x-webhook-event";
/// Optional header carrying the delivery ID.
pub const DELIVERY_ID_HEADER: &str = "x-webhook-delivery-id";

/// Prefix the service puts in front of the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Default replay window, in seconds.
pub const DEFAULT_MAX_AGE_SECONDS: i64 = 300;

// ============================================================================
// Verifier
// ============================================================================

/// Verifies and parses EZUnsub webhook deliveries.
///
/// The secret is held as a [`SecretString`] and never appears in logs or
/// debug output. The verifier is stateless apart from its configuration, so
/// one instance can be shared across threads and concurrent requests freely.
///
/// # Example
///
/// ```rust,no_run
/// use ezunsub::WebhookVerifier;
///
/// let verifier = WebhookVerifier::new("your-webhook-secret");
///
/// # fn handle(verifier: &WebhookVerifier, headers: &std::collections::HashMap<String, String>, body: &str) -> ezunsub::Result<()> {
/// let extracted = WebhookVerifier::extract_headers(headers)?;
/// let payload = verifier.verify_and_parse(
///     &extracted.signature,
///     &extracted.timestamp,
///     body,
///     &extracted.delivery_id,
/// )?;
///
/// match payload.event() {
///     "contact.created" => println!("new contact: {:?}", payload.email_hash()),
///     "contact.updated" => println!("updated: {:?}", payload.contact_id()),
///     _ => {}
/// }
/// # Ok(())
/// # }
/// ```
pub struct WebhookVerifier {
    secret: SecretString,
    max_age_seconds: i64,
}

impl WebhookVerifier {
    /// Create a verifier with the default replay window of
    /// [`DEFAULT_MAX_AGE_SECONDS`].
    #[must_use]
    pub fn new(secret: impl Into<SecretString>) -> Self {
        Self::with_max_age(secret, DEFAULT_MAX_AGE_SECONDS)
    }

    /// Create a verifier with a custom replay window.
    #[must_use]
    pub fn with_max_age(secret: impl Into<SecretString>, max_age_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            max_age_seconds,
        }
    }

    /// The configured replay window, in seconds.
    #[must_use]
    pub fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }

    /// Verify a webhook signature against the raw request body.
    ///
    /// `body` must be the exact bytes received on the wire: re-serializing
    /// the JSON changes whitespace and key order and invalidates the
    /// signature.
    ///
    /// Returns `false` when the timestamp falls outside the replay window,
    /// when the hex digest cannot be decoded, or when the digest does not
    /// match. The digest comparison is constant time.
    #[must_use]
    pub fn verify_signature(&self, signature: &str, timestamp: i64, body: &[u8]) -> bool {
        self.verify_signature_at(signature, timestamp, body, unix_now())
    }

    /// Verification against an explicit clock reading. The clock is read
    /// exactly once per verification so the age check cannot straddle a
    /// second boundary.
    fn verify_signature_at(&self, signature: &str, timestamp: i64, body: &[u8], now: i64) -> bool {
        // Reject stale or far-future timestamps before any HMAC work.
        if (now - timestamp).abs() > self.max_age_seconds {
            tracing::debug!(
                target: "ezunsub::webhook",
                age_seconds = (now - timestamp).abs(),
                max_age_seconds = self.max_age_seconds,
                "webhook timestamp outside replay window"
            );
            return false;
        }

        let expected = compute_signature(&self.secret, timestamp, body);

        let digest = signature.strip_prefix(SIGNATURE_PREFIX).unwrap_or(signature);
        let provided = match hex::decode(digest) {
            Ok(bytes) => bytes,
            Err(_) => {
                tracing::debug!(
                    target: "ezunsub::webhook",
                    "webhook signature is not a valid hex digest"
                );
                return false;
            }
        };

        if provided.len() != expected.len() {
            return false;
        }

        expected.ct_eq(&provided).into()
    }

    /// Verify the signature, then parse and structurally validate the body.
    ///
    /// `timestamp` is the raw header value; it is parsed to an integer here
    /// so a garbled header surfaces as [`WebhookError::MalformedTimestamp`]
    /// instead of an opaque failure. `delivery_id` comes from the
    /// `X-Webhook-Delivery-Id` header (pass `""` when absent); it is never
    /// read from the body.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::MalformedTimestamp`]: timestamp is not an integer.
    /// - [`WebhookError::InvalidSignature`]: authenticity check failed; the
    ///   body is not parsed in this case.
    /// - [`WebhookError::MalformedPayload`]: body is not a JSON object.
    /// - [`WebhookError::MissingField`]: a required top-level field
    ///   (`event`, `timestamp`, `data`, checked in that order) is absent.
    pub fn verify_and_parse(
        &self,
        signature: &str,
        timestamp: &str,
        body: &str,
        delivery_id: &str,
    ) -> Result<WebhookPayload> {
        let ts: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookError::MalformedTimestamp {
                value: timestamp.to_string(),
            })?;

        if !self.verify_signature(signature, ts, body.as_bytes()) {
            return Err(WebhookError::InvalidSignature.into());
        }

        let parsed: serde_json::Value =
            serde_json::from_str(body).map_err(|e| WebhookError::MalformedPayload {
                message: e.to_string(),
            })?;
        let object = parsed
            .as_object()
            .ok_or_else(|| WebhookError::MalformedPayload {
                message: "payload is not a JSON object".to_string(),
            })?;

        // Report the first missing field; the order is part of the contract.
        for field in ["event", "timestamp", "data"] {
            if !object.contains_key(field) {
                return Err(WebhookError::MissingField { field }.into());
            }
        }

        let event = object["event"]
            .as_str()
            .ok_or_else(|| WebhookError::MalformedPayload {
                message: "'event' field is not a string".to_string(),
            })?
            .to_string();
        let event_timestamp = object["timestamp"]
            .as_str()
            .ok_or_else(|| WebhookError::MalformedPayload {
                message: "'timestamp' field is not a string".to_string(),
            })?
            .to_string();
        let data = object["data"]
            .as_object()
            .ok_or_else(|| WebhookError::MalformedPayload {
                message: "'data' field is not an object".to_string(),
            })?
            .clone();

        Ok(WebhookPayload::new(
            event,
            event_timestamp,
            data,
            delivery_id.to_string(),
        ))
    }

    /// Extract the webhook headers from a request's header map.
    ///
    /// Header names are matched case-insensitively, per HTTP. The signature
    /// and timestamp headers are required; an absent or empty value is a
    /// [`WebhookError::MissingHeader`] naming the missing header. The event
    /// and delivery-id headers default to the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MissingHeader`] when `x-webhook-signature` or
    /// `x-webhook-timestamp` is absent.
    pub fn extract_headers(headers: &HashMap<String, String>) -> Result<WebhookHeaders> {
        let mut signature = None;
        let mut timestamp = None;
        let mut event = None;
        let mut delivery_id = None;

        for (name, value) in headers {
            match name.to_ascii_lowercase().as_str() {
                SIGNATURE_HEADER => signature = Some(value.clone()),
                TIMESTAMP_HEADER => timestamp = Some(value.clone()),
                EVENT_HEADER => event = Some(value.clone()),
                DELIVERY_ID_HEADER => delivery_id = Some(value.clone()),
                _ => {}
            }
        }

        let signature = signature.filter(|v| !v.is_empty()).ok_or(
            WebhookError::MissingHeader {
                header: "X-Webhook-Signature",
            },
        )?;
        let timestamp = timestamp.filter(|v| !v.is_empty()).ok_or(
            WebhookError::MissingHeader {
                header: "X-Webhook-Timestamp",
            },
        )?;

        Ok(WebhookHeaders {
            signature,
            timestamp,
            event: event.unwrap_or_default(),
            delivery_id: delivery_id.unwrap_or_default(),
        })
    }
}

// Debug implementation that doesn't expose the secret.
impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("max_age_seconds", &self.max_age_seconds)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Signing helpers
// ============================================================================

/// HMAC-SHA256 over `"{timestamp}.{body}"`, returned as raw digest bytes.
fn compute_signature(secret: &SecretString, timestamp: i64, body: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    mac.finalize().into_bytes().to_vec()
}

/// Current Unix time in seconds.
fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EzunsubError;

    const SECRET: &str = "test-secret-123";

    /// Hex signature the service would send for (secret, timestamp, body).
    fn sign(secret: &str, timestamp: i64, body: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(format!("{}.{}", timestamp, body).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn assert_webhook_err(result: Result<WebhookPayload>, expected: &WebhookError) {
        match result {
            Err(EzunsubError::Webhook(err)) => assert_eq!(&err, expected),
            other => panic!("expected webhook error {:?}, got {:?}", expected, other),
        }
    }

    // ============ verify_signature ============

    #[test]
    fn test_valid_signature_verifies() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = r#"{"event":"contact.created","timestamp":"2024-01-15T10:00:00Z","data":{}}"#;
        let signature = sign(SECRET, now, body);

        assert!(verifier.verify_signature(&signature, now, body.as_bytes()));
    }

    #[test]
    fn test_sha256_prefix_is_accepted() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = r#"{"event":"test","timestamp":"t","data":{}}"#;
        let signature = format!("sha256={}", sign(SECRET, now, body));

        assert!(verifier.verify_signature(&signature, now, body.as_bytes()));
    }

    #[test]
    fn test_invalid_hex_signature_fails() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();

        assert!(!verifier.verify_signature("sha256=invalid", now, b"{}"));
        assert!(!verifier.verify_signature("", now, b"{}"));
    }

    #[test]
    fn test_wrong_length_digest_fails() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();

        // Valid hex, wrong digest length.
        assert!(!verifier.verify_signature("deadbeef", now, b"{}"));
    }

    #[test]
    fn test_tampered_body_fails() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let signature = sign(SECRET, now, r#"{"event":"test"}"#);

        assert!(!verifier.verify_signature(&signature, now, br#"{"event":"Test"}"#));
    }

    #[test]
    fn test_tampered_timestamp_fails() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = r#"{"event":"test"}"#;
        let signature = sign(SECRET, now, body);

        assert!(!verifier.verify_signature(&signature, now + 1, body.as_bytes()));
    }

    #[test]
    fn test_tampered_signature_fails() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = r#"{"event":"test"}"#;
        let mut signature = sign(SECRET, now, body).into_bytes();
        // Flip one hex character.
        signature[0] = if signature[0] == b'0' { b'1' } else { b'0' };
        let signature = String::from_utf8(signature).unwrap();

        assert!(!verifier.verify_signature(&signature, now, body.as_bytes()));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let verifier = WebhookVerifier::new("other-secret");
        let now = unix_now();
        let body = r#"{"event":"test"}"#;
        let signature = sign(SECRET, now, body);

        assert!(!verifier.verify_signature(&signature, now, body.as_bytes()));
    }

    // ============ replay window ============

    #[test]
    fn test_expired_timestamp_fails_even_with_valid_signature() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = 1_700_000_000;
        let stale = now - 600;
        let body = r#"{"event":"test"}"#;
        let signature = sign(SECRET, stale, body);

        assert!(!verifier.verify_signature_at(&signature, stale, body.as_bytes(), now));
    }

    #[test]
    fn test_future_timestamp_outside_window_fails() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = 1_700_000_000;
        let future = now + 600;
        let body = r#"{"event":"test"}"#;
        let signature = sign(SECRET, future, body);

        assert!(!verifier.verify_signature_at(&signature, future, body.as_bytes(), now));
    }

    #[test]
    fn test_replay_window_boundary() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = 1_700_000_000;
        let body = r#"{"event":"test"}"#;

        // Age exactly equal to the window passes.
        let at_boundary = now - DEFAULT_MAX_AGE_SECONDS;
        let signature = sign(SECRET, at_boundary, body);
        assert!(verifier.verify_signature_at(&signature, at_boundary, body.as_bytes(), now));

        // One second older fails.
        let past_boundary = at_boundary - 1;
        let signature = sign(SECRET, past_boundary, body);
        assert!(!verifier.verify_signature_at(&signature, past_boundary, body.as_bytes(), now));
    }

    #[test]
    fn test_custom_max_age() {
        let verifier = WebhookVerifier::with_max_age(SECRET, 10);
        assert_eq!(verifier.max_age_seconds(), 10);

        let now = 1_700_000_000;
        let body = "{}";
        let ts = now - 11;
        let signature = sign(SECRET, ts, body);
        assert!(!verifier.verify_signature_at(&signature, ts, body.as_bytes(), now));
    }

    // ============ verify_and_parse ============

    #[test]
    fn test_verify_and_parse_valid_payload() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = r#"{"event":"contact.created","timestamp":"2024-01-15T10:00:00Z","data":{"contactId":"abc123","emailHash":"sha1hash"}}"#;
        let signature = sign(SECRET, now, body);

        let payload = verifier
            .verify_and_parse(&signature, &now.to_string(), body, "delivery-123")
            .unwrap();

        assert_eq!(payload.event(), "contact.created");
        assert_eq!(payload.timestamp(), "2024-01-15T10:00:00Z");
        assert_eq!(payload.contact_id(), Some("abc123"));
        assert_eq!(payload.email_hash(), Some("sha1hash"));
        assert_eq!(payload.delivery_id(), "delivery-123");
    }

    #[test]
    fn test_verify_and_parse_is_idempotent() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = r#"{"event":"test","timestamp":"2024-01-15T10:00:00Z","data":{}}"#;
        let signature = sign(SECRET, now, body);
        let ts = now.to_string();

        let first = verifier.verify_and_parse(&signature, &ts, body, "d-1").unwrap();
        let second = verifier.verify_and_parse(&signature, &ts, body, "d-1").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_and_parse_rejects_bad_signature_before_parsing() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();

        // Body is not even JSON; the signature failure must win.
        let result =
            verifier.verify_and_parse("sha256=invalid", &now.to_string(), "not valid json", "");
        assert_webhook_err(result, &WebhookError::InvalidSignature);
    }

    #[test]
    fn test_verify_and_parse_malformed_timestamp() {
        let verifier = WebhookVerifier::new(SECRET);

        let result = verifier.verify_and_parse("sig", "not-a-number", "{}", "");
        assert_webhook_err(
            result,
            &WebhookError::MalformedTimestamp {
                value: "not-a-number".to_string(),
            },
        );
    }

    #[test]
    fn test_verify_and_parse_invalid_json_body() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = "not valid json";
        let signature = sign(SECRET, now, body);

        let result = verifier.verify_and_parse(&signature, &now.to_string(), body, "");
        match result {
            Err(EzunsubError::Webhook(WebhookError::MalformedPayload { message })) => {
                assert!(!message.is_empty(), "parse diagnostic should be carried");
            }
            other => panic!("expected malformed payload error, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_and_parse_non_object_body() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = r#"["event"]"#;
        let signature = sign(SECRET, now, body);

        let result = verifier.verify_and_parse(&signature, &now.to_string(), body, "");
        assert_webhook_err(
            result,
            &WebhookError::MalformedPayload {
                message: "payload is not a JSON object".to_string(),
            },
        );
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let ts = now.to_string();

        let cases = [
            (r#"{}"#, "event"),
            (r#"{"event":"test"}"#, "timestamp"),
            (r#"{"event":"test","timestamp":"t"}"#, "data"),
            // All three absent: `event` is reported first.
            (r#"{"data":{}}"#, "event"),
        ];

        for (body, expected_field) in cases {
            let signature = sign(SECRET, now, body);
            let result = verifier.verify_and_parse(&signature, &ts, body, "");
            assert_webhook_err(
                result,
                &WebhookError::MissingField {
                    field: expected_field,
                },
            );
        }
    }

    #[test]
    fn test_delivery_id_not_taken_from_body() {
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = r#"{"event":"test","timestamp":"t","data":{},"deliveryId":"from-body"}"#;
        let signature = sign(SECRET, now, body);

        let payload = verifier
            .verify_and_parse(&signature, &now.to_string(), body, "from-header")
            .unwrap();
        assert_eq!(payload.delivery_id(), "from-header");
    }

    // ============ extract_headers ============

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_headers_mixed_case() {
        let map = headers(&[
            ("X-Webhook-Signature", "sha256=abc"),
            ("X-WEBHOOK-TIMESTAMP", "1700000000"),
            ("x-webhook-event", "contact.created"),
            ("X-Webhook-Delivery-Id", "d-42"),
        ]);

        let extracted = WebhookVerifier::extract_headers(&map).unwrap();
        assert_eq!(extracted.signature, "sha256=abc");
        assert_eq!(extracted.timestamp, "1700000000");
        assert_eq!(extracted.event, "contact.created");
        assert_eq!(extracted.delivery_id, "d-42");
    }

    #[test]
    fn test_extract_headers_optional_default_to_empty() {
        let map = headers(&[
            ("x-webhook-signature", "abc"),
            ("x-webhook-timestamp", "1700000000"),
        ]);

        let extracted = WebhookVerifier::extract_headers(&map).unwrap();
        assert_eq!(extracted.event, "");
        assert_eq!(extracted.delivery_id, "");
    }

    #[test]
    fn test_extract_headers_missing_signature() {
        let map = headers(&[
            ("X-Webhook-Timestamp", "1700000000"),
            ("X-Webhook-Event", "test"),
        ]);

        let result = WebhookVerifier::extract_headers(&map);
        match result {
            Err(EzunsubError::Webhook(WebhookError::MissingHeader { header })) => {
                assert_eq!(header, "X-Webhook-Signature");
            }
            other => panic!("expected missing header error, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_headers_missing_timestamp() {
        let map = headers(&[("X-Webhook-Signature", "abc")]);

        let result = WebhookVerifier::extract_headers(&map);
        match result {
            Err(EzunsubError::Webhook(WebhookError::MissingHeader { header })) => {
                assert_eq!(header, "X-Webhook-Timestamp");
            }
            other => panic!("expected missing header error, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_headers_empty_value_is_missing() {
        let map = headers(&[
            ("x-webhook-signature", ""),
            ("x-webhook-timestamp", "1700000000"),
        ]);

        assert!(WebhookVerifier::extract_headers(&map).is_err());
    }

    // ============ misc ============

    #[test]
    fn test_debug_does_not_expose_secret() {
        let verifier = WebhookVerifier::new("super-secret-value");
        let debug_output = format!("{:?}", verifier);

        assert!(!debug_output.contains("super-secret-value"));
        assert!(debug_output.contains("max_age_seconds"));
    }

    #[test]
    fn test_uses_constant_time_primitive() {
        // Functional stand-in for the timing property: equal-length digests
        // that differ only in the last byte still compare unequal through
        // the subtle-based path.
        let verifier = WebhookVerifier::new(SECRET);
        let now = unix_now();
        let body = "{}";
        let mut signature = sign(SECRET, now, body).into_bytes();
        let last = signature.len() - 1;
        signature[last] = if signature[last] == b'0' { b'1' } else { b'0' };
        let signature = String::from_utf8(signature).unwrap();

        assert!(!verifier.verify_signature(&signature, now, body.as_bytes()));
    }
}
