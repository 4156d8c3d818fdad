//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use waypost_types::error::{TriggerValidationError, WebhookError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Waiting-webhook resolution or resumption errors.
    Webhook(WebhookError),
    /// Trigger exclusivity errors.
    Trigger(TriggerValidationError),
    /// Unknown resource.
    NotFound(String),
    /// HTTP method outside the supported set.
    MethodNotAllowed(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<WebhookError> for AppError {
    fn from(e: WebhookError) -> Self {
        AppError::Webhook(e)
    }
}

impl From<TriggerValidationError> for AppError {
    fn from(e: TriggerValidationError) -> Self {
        AppError::Trigger(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, Option<serde_json::Value>) {
        match self {
            AppError::Webhook(WebhookError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
            AppError::Webhook(WebhookError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT", None),
            AppError::Webhook(WebhookError::Unauthorized(_)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", None)
            }
            AppError::Webhook(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None),
            AppError::Trigger(TriggerValidationError::SingleTrigger { node_name, node_type }) => (
                StatusCode::CONFLICT,
                "SINGLE_TRIGGER",
                Some(json!({ "node_name": node_name, "node_type": node_type })),
            ),
            AppError::Trigger(TriggerValidationError::ParameterConflict(conflict)) => (
                StatusCode::CONFLICT,
                "TRIGGER_PARAMETER_CONFLICT",
                Some(json!({
                    "node_name": conflict.node_name,
                    "node_type": conflict.node_type,
                    "key": conflict.key,
                    "conflicting_workflow_id": conflict.conflicting_workflow_id,
                    "conflicting_workflow_name": conflict.conflicting_workflow_name,
                })),
            ),
            AppError::Trigger(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
            AppError::MethodNotAllowed(_) => {
                (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED", None)
            }
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", None),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Webhook(e) => e.to_string(),
            AppError::Trigger(e) => e.to_string(),
            AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::Validation(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, details) = self.parts();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        } else {
            tracing::debug!(code, %message, status = status.as_u16(), "request rejected");
        }

        (status, Json(ApiResponse::error(code, &message, details))).into_response()
    }
}
