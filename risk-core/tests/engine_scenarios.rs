//! End-to-end engine scenarios: signature guard, replay protection,
//! and full evaluation wired together the way the gateway drives them.

use risk_core::{
    signature, DecisionOutcome, RiskEngine, RuleId, SignatureStatus, Submission,
};
use serde_json::{json, Value};

const DESKTOP_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/115.0";

fn clean_payload(ip: &str) -> Value {
    json!({
        "ip": ip,
        "userAgent": DESKTOP_UA,
        "action": "CHECKOUT",
        "browser": {
            "screenWidth": 1920,
            "screenHeight": 1080,
            "viewportWidth": 1280,
            "viewportHeight": 720,
            "colorDepth": 24,
            "devicePixelRatio": 1.0,
            "timezoneOffset": -60,
            "platform": "Win32",
            "hardwareConcurrency": 8,
            "deviceMemory": 8.0,
            "maxTouchPoints": 0,
            "languages": ["en-US", "en"],
            "webglVendor": "Google Inc. (NVIDIA)",
            "webglRenderer": "ANGLE (NVIDIA GeForce RTX 3060)",
            "hasAudioContext": true,
            "canvasHash": "a1b2c3d4"
        }
    })
}

fn signed_submission(session_id: &str, challenge: &str, payload: Value) -> Submission {
    let sig = signature::expected_signature(challenge, &payload);
    Submission {
        session_id: Some(session_id.to_string()),
        challenge: Some(challenge.to_string()),
        signature: Some(sig),
        payload,
    }
}

#[test]
fn unsigned_submission_blocks_without_running_heuristics() {
    let engine = RiskEngine::default();
    let submission = Submission {
        session_id: None,
        challenge: None,
        signature: None,
        payload: clean_payload("203.0.113.9"),
    };

    let evaluation = engine.process(&submission, 1_000).unwrap();

    assert_eq!(evaluation.signature_status, SignatureStatus::Unsigned);
    assert_eq!(evaluation.risk.total, 80);
    assert_eq!(evaluation.risk.reasons.len(), 1);
    assert_eq!(evaluation.risk.reasons[0].rule, RuleId::SignatureInvalid);
    assert_eq!(evaluation.decision, DecisionOutcome::Block);
}

#[test]
fn clean_signed_submission_allows() {
    let engine = RiskEngine::default();
    let submission = signed_submission("sess-1", "chal-1", clean_payload("203.0.113.9"));

    let evaluation = engine.process(&submission, 1_000).unwrap();

    assert_eq!(evaluation.signature_status, SignatureStatus::SignedOk);
    assert_eq!(evaluation.risk.total, 0, "reasons: {:?}", evaluation.risk.reasons);
    assert_eq!(evaluation.decision, DecisionOutcome::Allow);
}

#[test]
fn resubmitted_signature_is_a_replay() {
    let engine = RiskEngine::default();
    let submission = signed_submission("sess-2", "chal-2", clean_payload("203.0.113.10"));

    let first = engine.process(&submission, 1_000).unwrap();
    assert_eq!(first.signature_status, SignatureStatus::SignedOk);

    let second = engine.process(&submission, 2_000).unwrap();
    assert_eq!(second.signature_status, SignatureStatus::Replay);
    assert_eq!(second.risk.total, 70);
    assert_eq!(second.risk.reasons.len(), 1);
    assert_eq!(second.risk.reasons[0].rule, RuleId::SignatureReplay);
    assert_eq!(second.decision, DecisionOutcome::Block);
}

#[test]
fn replay_window_expiry_makes_signature_fresh_again() {
    let engine = RiskEngine::default();
    let submission = signed_submission("sess-3", "chal-3", clean_payload("203.0.113.11"));

    let first = engine.process(&submission, 0).unwrap();
    assert_eq!(first.signature_status, SignatureStatus::SignedOk);

    // 5 minutes plus a tick later the same pair is first-seen again
    let later = engine.process(&submission, 5 * 60 * 1000 + 1).unwrap();
    assert_eq!(later.signature_status, SignatureStatus::SignedOk);
}

#[test]
fn scripted_client_without_signature_hits_only_the_signature_path() {
    let engine = RiskEngine::default();
    let submission = Submission {
        session_id: None,
        challenge: None,
        signature: None,
        payload: json!({
            "ip": "203.0.113.12",
            "userAgent": "python-requests/2.28",
            "action": "LOGIN"
        }),
    };

    let evaluation = engine.process(&submission, 1_000).unwrap();

    // The guard short-circuits: no UA reasons, only the signature rule
    let rules: Vec<RuleId> = evaluation.risk.reasons.iter().map(|r| r.rule).collect();
    assert_eq!(rules, vec![RuleId::SignatureInvalid]);
    assert!(!rules.contains(&RuleId::UaPythonRequests));
    assert_eq!(evaluation.decision, DecisionOutcome::Block);
}

#[test]
fn tampered_payload_after_signing_blocks() {
    let engine = RiskEngine::default();
    let payload = clean_payload("203.0.113.13");
    let sig = signature::expected_signature("chal-4", &payload);

    let mut tampered = payload;
    tampered["ip"] = json!("203.0.113.99");

    let submission = Submission {
        session_id: Some("sess-4".to_string()),
        challenge: Some("chal-4".to_string()),
        signature: Some(sig),
        payload: tampered,
    };

    let evaluation = engine.process(&submission, 1_000).unwrap();
    assert_eq!(evaluation.signature_status, SignatureStatus::Tampered);
    assert_eq!(evaluation.decision, DecisionOutcome::Block);
}

#[test]
fn mistyped_field_does_not_erase_the_rest_of_the_context() {
    let engine = RiskEngine::default();
    let payload = json!({
        "ip": "1.2.3.4.2",
        "userAgent": "python-requests/2.28",
        "deviceId": 123
    });
    let submission = signed_submission("sess-6", "chal-6", payload);

    let evaluation = engine.process(&submission, 1_000).unwrap();
    assert_eq!(evaluation.signature_status, SignatureStatus::SignedOk);

    // The numeric device id falls away alone; ip and user-agent stay
    // and their signals still fire
    assert_eq!(evaluation.context.ip, "1.2.3.4.2");
    assert_eq!(evaluation.context.user_agent, "python-requests/2.28");
    assert!(evaluation.context.device_id.is_none());

    let rules: Vec<RuleId> = evaluation.risk.reasons.iter().map(|r| r.rule).collect();
    assert!(rules.contains(&RuleId::TestIp));
    assert!(rules.contains(&RuleId::UaPythonRequests));
}

#[test]
fn signed_scripted_client_accumulates_ua_reasons() {
    let engine = RiskEngine::default();
    let payload = json!({
        "ip": "203.0.113.14",
        "userAgent": "python-requests/2.28",
        "action": "CHECKOUT"
    });
    let submission = signed_submission("sess-5", "chal-5", payload);

    let evaluation = engine.process(&submission, 1_000).unwrap();
    assert_eq!(evaluation.signature_status, SignatureStatus::SignedOk);

    let rules: Vec<RuleId> = evaluation.risk.reasons.iter().map(|r| r.rule).collect();
    assert!(rules.contains(&RuleId::UaPythonRequests));
    assert!(rules.contains(&RuleId::UaMissingMozilla));
    assert!(rules.contains(&RuleId::UaMissingEngine));
    // 40 + 20 + 20 lands exactly on the block band's upper bound
    assert_eq!(evaluation.risk.total, 80);
    assert_eq!(evaluation.decision, DecisionOutcome::Block);
}
