use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::placement::PlacementError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Boundary error for the service binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("engine error: {0}")]
    Engine(#[from] PlacementError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Engine(PlacementError::Forbidden(_)) => StatusCode::FORBIDDEN,
            AppError::Engine(PlacementError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Engine(
                PlacementError::InvalidTransition { .. } | PlacementError::Conflict,
            ) => StatusCode::CONFLICT,
            AppError::Engine(PlacementError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Engine(PlacementError::Store(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
