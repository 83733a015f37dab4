use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use footsteps_types::api::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A submitted field failed validation. The message names the field.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid request body.")]
    InvalidBody(#[from] JsonRejection),

    #[error("Unauthorized")]
    Unauthorized,

    /// Store or other unexpected failure. Clients see the fixed `message`,
    /// plus the source text when `expose` is set.
    #[error("{message}")]
    Internal {
        message: &'static str,
        source: anyhow::Error,
        expose: bool,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: &'static str, source: anyhow::Error) -> Self {
        Self::Internal {
            message,
            source,
            expose: true,
        }
    }

    pub fn internal_opaque(message: &'static str, source: anyhow::Error) -> Self {
        Self::Internal {
            message,
            source,
            expose: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::InvalidBody(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                None
            }
            Self::Internal {
                message,
                source,
                expose,
            } => {
                error!("{} {:#}", message, source);
                expose.then(|| source.to_string())
            }
            _ => None,
        };

        (status, Json(ApiResponse::failure(self.to_string(), detail))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_is_bad_request() {
        let (status, body) = body_of(ApiError::validation("Email is required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "success": false, "message": "Email is required" }));
    }

    #[tokio::test]
    async fn internal_exposes_source_only_when_asked() {
        let (status, body) = body_of(ApiError::internal(
            "Failed to join waitlist. Please try again.",
            anyhow::anyhow!("Database error: relation does not exist"),
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database error: relation does not exist");

        let (_, body) = body_of(ApiError::internal_opaque(
            "Failed to submit support message.",
            anyhow::anyhow!("secret detail"),
        ))
        .await;
        assert_eq!(body["message"], "Failed to submit support message.");
        assert!(body.get("error").is_none());
    }
}
