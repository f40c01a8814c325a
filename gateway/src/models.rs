use serde::{Deserialize, Serialize};

// ===== Checkout Request =====
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub session_id: Option<String>,
    pub challenge: Option<String>,
    pub signature: Option<String>,
    pub payload: Option<serde_json::Value>,
}

// ===== Session Issuance =====
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub challenge: String,
}

// ===== Health Check =====
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
