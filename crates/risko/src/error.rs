use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::analyses::RepositoryError;
use crate::config::ConfigError;
use crate::scoring::{AnalysisError, GeocodeError, ZoneTableError};
use crate::telemetry::TelemetryError;

/// Process-level error; also renders as `{"error": ...}` over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("geocoder error: {0}")]
    Geocoder(#[from] GeocodeError),
    #[error("zone table error: {0}")]
    ZoneTable(#[from] ZoneTableError),
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("{0}")]
    Repository(#[from] RepositoryError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Repository(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Geocoder(_)
            | AppError::ZoneTable(_)
            | AppError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
