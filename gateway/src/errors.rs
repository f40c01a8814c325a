use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    MissingPayload,
    Engine(risk_core::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingPayload => write!(f, "Missing payload"),
            ApiError::Engine(e) => write!(f, "Engine error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::MissingPayload => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "MISSING_PAYLOAD",
                "message": self.to_string()
            })),
            ApiError::Engine(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "INTERNAL_ERROR",
                "message": self.to_string()
            })),
        }
    }
}

impl From<risk_core::Error> for ApiError {
    fn from(err: risk_core::Error) -> Self {
        ApiError::Engine(err)
    }
}
