use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cors;
use crate::llm_client::LlmError;

/// Request-level failure outcomes.
/// Implements `IntoResponse` so the chat handler can return `Result<Response, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Reference documents unavailable")]
    ReferenceDataUnavailable,

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Method),

    #[error("'query' missing from request body")]
    MissingQuery,

    #[error("Empty query received")]
    EmptyQuery,

    #[error("'query' is not a string")]
    QueryNotString,

    #[error("Request body is missing")]
    MissingBody,

    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Request body has no readable 'query' field")]
    UnreadableBody,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::ReferenceDataUnavailable => {
                tracing::error!("Failed to load S3 data");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to load reference data from S3",
                )
            }
            AppError::MethodNotAllowed(method) => {
                tracing::warn!("Rejecting method {method}");
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
            }
            AppError::MissingQuery => {
                tracing::warn!("'query' missing from request body");
                (StatusCode::BAD_REQUEST, "'query' field is required")
            }
            AppError::EmptyQuery => {
                tracing::warn!("Empty query received");
                (StatusCode::BAD_REQUEST, "Empty query received")
            }
            AppError::QueryNotString
            | AppError::MissingBody
            | AppError::InvalidJson(_)
            | AppError::UnreadableBody
            | AppError::Llm(_) => {
                tracing::error!("Request failed: {self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (status, cors::allow_origin(), Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::read_json;
    use serde_json::Value;

    async fn status_and_body(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        (status, read_json(response).await)
    }

    #[tokio::test]
    async fn test_external_messages_are_fixed() {
        assert_eq!(
            status_and_body(AppError::ReferenceDataUnavailable).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to load reference data from S3" })
            )
        );
        assert_eq!(
            status_and_body(AppError::MethodNotAllowed(Method::GET)).await,
            (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" })
            )
        );
        assert_eq!(
            status_and_body(AppError::MissingQuery).await,
            (
                StatusCode::BAD_REQUEST,
                json!({ "error": "'query' field is required" })
            )
        );
        assert_eq!(
            status_and_body(AppError::EmptyQuery).await,
            (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Empty query received" })
            )
        );
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_leaked() {
        let err = AppError::Llm(LlmError::Api {
            status: 401,
            message: "Incorrect API key provided: sk-***".into(),
        });
        assert_eq!(
            status_and_body(err).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal Server Error" })
            )
        );
    }
}
