//! Core data model for risk evaluation

use crate::rules::RuleId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of action the user is taking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Checkout attempt
    Checkout,
    /// Login attempt
    Login,
}

impl Default for ActionType {
    fn default() -> Self {
        ActionType::Checkout
    }
}

/// Browser fingerprint payload reported by the frontend.
///
/// Every field is defaulted: a malformed or partial fingerprint is a
/// risk signal, never a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserInfo {
    pub screen_width: u32,
    pub screen_height: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub color_depth: u32,
    pub device_pixel_ratio: f64,
    pub timezone_offset: i32,
    pub platform: String,
    pub hardware_concurrency: Option<u32>,
    pub device_memory: Option<f64>,
    pub max_touch_points: Option<u32>,
    pub languages: Option<Vec<String>>,
    pub webgl_vendor: Option<String>,
    pub webgl_renderer: Option<String>,
    pub has_audio_context: Option<bool>,
    pub canvas_hash: Option<String>,
}

/// Context fed into the risk engine for a single request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskContext {
    /// Client IP as reported in the payload
    pub ip: String,
    /// Raw user-agent string
    pub user_agent: String,
    /// Action being attempted
    pub action: ActionType,
    /// Fingerprinted device id, when the frontend supplied one
    pub device_id: Option<String>,
    /// Browser integrity info, when the frontend supplied it
    pub browser: Option<BrowserInfo>,
}

impl RiskContext {
    /// Extract a context from a raw payload field by field. A
    /// mistyped field degrades only itself: the string fields keep
    /// whatever strings are present, and an unparseable `action` or
    /// `browser` falls back alone. The degraded fields then read as
    /// risk signals downstream.
    pub fn from_payload(payload: &Value) -> Self {
        let string_field =
            |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            ip: string_field("ip").unwrap_or_default(),
            user_agent: string_field("userAgent").unwrap_or_default(),
            action: payload
                .get("action")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_default(),
            device_id: string_field("deviceId"),
            browser: payload
                .get("browser")
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
        }
    }
}

/// A single weighted observation contributing to the risk score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    /// Rule that produced this reason
    pub rule: RuleId,
    /// Base rule label, optionally extended with dynamic context
    pub label: String,
    /// Points copied from the rule at evaluation time
    pub points: i32,
}

/// Result of evaluating risk for a single request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskResult {
    /// Total risk score
    pub total: i32,
    /// Reasons that added points, in evaluation order
    pub reasons: Vec<Reason>,
}

impl RiskResult {
    /// Build a result from a reason list. The total is always the sum
    /// of the reason points; there is no other way to set it.
    pub fn from_reasons(reasons: Vec<Reason>) -> Self {
        let total = reasons.iter().map(|r| r.points).sum();
        Self { total, reasons }
    }
}

/// Outcome of the telemetry signature check, attached to the output
/// event for audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureStatus {
    /// Signature present, valid, and not seen before
    SignedOk,
    /// Signature present but does not match the payload
    Tampered,
    /// Valid signature re-submitted within the replay window
    Replay,
    /// One or more signature fields missing
    Unsigned,
}

impl SignatureStatus {
    /// Wire-format name, also used as a metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureStatus::SignedOk => "SIGNED_OK",
            SignatureStatus::Tampered => "TAMPERED",
            SignatureStatus::Replay => "REPLAY",
            SignatureStatus::Unsigned => "UNSIGNED",
        }
    }
}
