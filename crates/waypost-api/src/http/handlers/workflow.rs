//! Workflow activation and manual test-run handlers.
//!
//! Both run trigger exclusivity validation before any state changes, so a
//! rejected request leaves the workflow and the active registry untouched.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use waypost_core::repository::workflow::WorkflowRepository;
use waypost_types::workflow::Workflow;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of `POST /workflows/{id}/test-run`.
#[derive(Debug, Default, Deserialize)]
pub struct TestRunRequest {
    /// Narrow validation to this trigger node.
    #[serde(default)]
    pub trigger_to_start_from: Option<String>,
}

async fn find_workflow(state: &AppState, id: &str) -> Result<Workflow, AppError> {
    state
        .workflows
        .find_by_id(id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Workflow '{id}' not found")))
}

/// POST /api/v1/workflows/{id}/activate
pub async fn activate_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let workflow = find_workflow(&state, &id).await?;

    state
        .trigger_validation
        .validate_workflow_activation(&workflow)
        .await?;

    let version_id = Uuid::now_v7().to_string();
    state
        .workflows
        .set_active_version(&id, Some(version_id.clone()))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    state.active_workflows.add(&id);

    tracing::info!(workflow_id = %id, %version_id, "workflow activated");

    let resp = ApiResponse::success(
        serde_json::json!({
            "workflow_id": id,
            "active": true,
            "active_version_id": version_id,
        }),
        Uuid::now_v7().to_string(),
        start.elapsed().as_millis() as u64,
    )
    .with_link("deactivate", &format!("/api/v1/workflows/{id}/deactivate"));

    Ok(Json(resp))
}

/// POST /api/v1/workflows/{id}/deactivate
pub async fn deactivate_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    find_workflow(&state, &id).await?;

    state
        .workflows
        .set_active_version(&id, None)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let was_active = state.active_workflows.remove(&id);

    tracing::info!(workflow_id = %id, was_active, "workflow deactivated");

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "workflow_id": id, "active": false }),
        Uuid::now_v7().to_string(),
        start.elapsed().as_millis() as u64,
    )))
}

/// POST /api/v1/workflows/{id}/test-run
///
/// Validates a manual run. The body is optional.
pub async fn test_run_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request: TestRunRequest = if body.is_empty() {
        TestRunRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("invalid request body: {e}")))?
    };

    let workflow = find_workflow(&state, &id).await?;
    let trigger = request.trigger_to_start_from.as_deref();

    if let Some(name) = trigger {
        if workflow.node(name).is_none() {
            return Err(AppError::Validation(format!(
                "Workflow '{id}' has no node named '{name}'"
            )));
        }
    }

    state
        .trigger_validation
        .validate_manual_execution(&workflow, workflow.is_active(), trigger)
        .await?;

    Ok(Json(ApiResponse::success(
        serde_json::json!({
            "workflow_id": id,
            "trigger_to_start_from": trigger,
            "status": "validated",
        }),
        Uuid::now_v7().to_string(),
        start.elapsed().as_millis() as u64,
    )))
}
