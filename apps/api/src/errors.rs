use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Inbound payload is malformed or incomplete. Raised before any model call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The model provider failed or answered with nothing usable.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream timed out after {elapsed_ms}ms")]
    UpstreamTimeout { elapsed_ms: u128 },

    /// The provider answered, but the reply does not fit the design schema.
    #[error("Schema validation error: {0}")]
    SchemaValidation(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::UpstreamTimeout { .. } => "UPSTREAM_TIMEOUT",
            AppError::SchemaValidation(_) => "SCHEMA_VALIDATION_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::SchemaValidation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                format!("Language model request failed: {msg}")
            }
            AppError::UpstreamTimeout { elapsed_ms } => {
                tracing::error!("Upstream timeout after {elapsed_ms}ms");
                "Language model request timed out".to_string()
            }
            AppError::SchemaValidation(msg) => {
                tracing::error!("Schema validation error: {msg}");
                format!("Model output did not match the loyalty program schema: {msg}")
            }
        };

        let body = Json(json!({
            "detail": message,
            "code": self.code(),
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_and_schema_errors_are_distinguishable() {
        let upstream = AppError::Upstream("connection reset".to_string());
        let schema = AppError::SchemaValidation("missing field `tiers`".to_string());
        assert_ne!(upstream.status(), schema.status());
        assert_ne!(upstream.code(), schema.code());
        assert!(upstream.status().is_server_error());
        assert!(schema.status().is_server_error());
    }

    #[test]
    fn test_validation_is_client_error() {
        let err = AppError::Validation("company_name cannot be empty".to_string());
        assert!(err.status().is_client_error());
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = AppError::UpstreamTimeout { elapsed_ms: 60_000 };
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.code(), "UPSTREAM_TIMEOUT");
    }
}
