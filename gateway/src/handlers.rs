use crate::errors::ApiError;
use crate::metrics;
use crate::models::{CheckoutRequest, HealthResponse};
use crate::session;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use risk_core::{EventLog, EventRecord, RiskEngine, Submission};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

// ===== Health Check =====
pub async fn health_check() -> HttpResponse {
    let uptime = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
    })
}

// ===== Session Issuance =====
pub async fn issue_session() -> HttpResponse {
    HttpResponse::Ok().json(session::issue_session())
}

// ===== Evaluate Checkout / Login =====
pub async fn checkout(
    req: web::Json<CheckoutRequest>,
    engine: web::Data<Arc<RiskEngine>>,
    events: web::Data<Arc<EventLog>>,
) -> Result<HttpResponse, ApiError> {
    let request = req.into_inner();
    let payload = request.payload.ok_or(ApiError::MissingPayload)?;

    let submission = Submission {
        session_id: request.session_id,
        challenge: request.challenge,
        signature: request.signature,
        payload,
    };

    let now_ms = Utc::now().timestamp_millis();
    let timer = metrics::EVALUATION_DURATION.start_timer();
    let evaluation = engine.process(&submission, now_ms)?;
    timer.observe_duration();

    metrics::EVALUATIONS_TOTAL
        .with_label_values(&[
            evaluation.decision.as_str(),
            evaluation.signature_status.as_str(),
        ])
        .inc();
    metrics::RISK_SCORE.observe(evaluation.risk.total as f64);

    let record = EventRecord::from_evaluation(evaluation);
    events.record(record.clone());
    metrics::EVENT_LOG_SIZE.set(events.len() as i64);

    Ok(HttpResponse::Ok().json(record))
}

// ===== Event Feed =====
pub async fn get_events(events: web::Data<Arc<EventLog>>) -> HttpResponse {
    HttpResponse::Ok().json(events.snapshot())
}

// ===== Prometheus Metrics =====
pub async fn metrics_endpoint() -> HttpResponse {
    match metrics::metrics_handler() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

// ===== Configure Routes =====
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/session", web::get().to(issue_session))
            .route("/checkout", web::post().to(checkout))
            .route("/events", web::get().to(get_events)),
    )
    .route("/health", web::get().to(health_check))
    .route("/metrics", web::get().to(metrics_endpoint));
}
