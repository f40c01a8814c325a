//! Telemetry signature verification
//!
//! The frontend signs each payload as SHA-256 over the session
//! challenge concatenated with the canonical JSON serialization of the
//! payload. Canonical form is serde_json's string rendering of the
//! value, which sorts object keys, so both sides agree on byte order
//! regardless of how the client assembled the object.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute the expected signature for a challenge/payload pair as a
/// lowercase hex digest
pub fn expected_signature(challenge: &str, payload: &Value) -> String {
    let canonical = payload.to_string();
    let mut hasher = Sha256::new();
    hasher.update(challenge.as_bytes());
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Exact string comparison against the supplied signature
pub fn verify(challenge: &str, payload: &Value, signature: &str) -> bool {
    expected_signature(challenge, payload) == signature
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signature_round_trip() {
        let payload = json!({"ip": "203.0.113.9", "userAgent": "Mozilla/5.0", "action": "CHECKOUT"});
        let sig = expected_signature("challenge-abc", &payload);
        assert_eq!(sig.len(), 64);
        assert!(verify("challenge-abc", &payload, &sig));
    }

    #[test]
    fn test_payload_mutation_breaks_verification() {
        let payload = json!({"ip": "203.0.113.9", "action": "CHECKOUT"});
        let sig = expected_signature("challenge-abc", &payload);

        let tampered = json!({"ip": "203.0.113.10", "action": "CHECKOUT"});
        assert!(!verify("challenge-abc", &tampered, &sig));
    }

    #[test]
    fn test_wrong_challenge_breaks_verification() {
        let payload = json!({"ip": "203.0.113.9"});
        let sig = expected_signature("challenge-abc", &payload);
        assert!(!verify("challenge-xyz", &payload, &sig));
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(
            expected_signature("c", &a),
            expected_signature("c", &b)
        );
    }
}
