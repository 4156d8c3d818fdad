//! Bundled execution delegate for the in-memory stores.
//!
//! Records the resuming request as the waiting node's output, answers the
//! caller, and completes the execution. A real engine would continue
//! running the remaining nodes in place of the completion step.

use chrono::Utc;
use serde_json::json;
use waypost_core::webhook::delegate::{ExecutionDelegate, WebhookResponder, WebhookResumption};
use waypost_types::error::{RepositoryError, WebhookError};
use waypost_types::execution::{ExecutionStatus, RunDataEntry};
use waypost_types::webhook::WebhookResponse;

use crate::memory::InMemoryExecutionRepository;

#[derive(Debug, Clone)]
pub struct InMemoryExecutionResumer {
    executions: InMemoryExecutionRepository,
}

impl InMemoryExecutionResumer {
    pub fn new(executions: InMemoryExecutionRepository) -> Self {
        Self { executions }
    }
}

impl ExecutionDelegate for InMemoryExecutionResumer {
    async fn resume(
        &self,
        resumption: WebhookResumption,
        responder: WebhookResponder,
    ) -> Result<(), WebhookError> {
        let WebhookResumption {
            mut execution,
            node,
            request,
            ..
        } = resumption;
        let id = execution.id.clone();

        // Claim the execution; a concurrent resume of the same id loses here.
        self.executions
            .try_transition(&id, ExecutionStatus::Waiting, ExecutionStatus::Running)
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    WebhookError::Conflict(format!("The execution \"{id}\" is running already."))
                }
                RepositoryError::NotFound => {
                    WebhookError::NotFound(format!("The execution \"{id}\" does not exist."))
                }
                other => WebhookError::Repository(other),
            })?;

        let runs = execution
            .data
            .result_data
            .run_data
            .entry(node.name.clone())
            .or_default();
        let execution_index = runs.last().map(|r| r.execution_index + 1).unwrap_or(0);
        runs.push(RunDataEntry {
            start_time: Utc::now().timestamp_millis(),
            execution_time: 0,
            execution_index,
            source: vec![None],
            input_override: None,
            data: Some(json!({
                "main": [[{
                    "json": {
                        "headers": request.headers,
                        "query": request.query,
                        "body": request.body,
                    }
                }]]
            })),
        });
        execution.status = ExecutionStatus::Running;
        self.executions.insert(execution.clone());

        if !responder.respond(WebhookResponse::json(json!({"message": "Workflow was started"}))) {
            tracing::debug!(execution_id = %id, "caller went away before the response was sent");
        }

        execution.status = ExecutionStatus::Success;
        execution.finished = true;
        self.executions.insert(execution);
        tracing::info!(execution_id = %id, node = %node.name, "execution resumed and completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use waypost_types::execution::{Execution, ExecutionData};
    use waypost_types::webhook::{HttpMethod, WaitingWebhookRequest, WebhookDescriptor};
    use waypost_types::workflow::{Node, Workflow, WorkflowSnapshot};

    use super::*;

    fn resumption(status: ExecutionStatus) -> WebhookResumption {
        let node = Node::new("Wait", "waypost.wait");
        let snapshot = WorkflowSnapshot {
            id: "wf".to_string(),
            name: "wf".to_string(),
            nodes: vec![node.clone()],
            active: false,
            active_version_id: None,
            pin_data: HashMap::new(),
        };
        WebhookResumption {
            execution: Execution {
                id: "1".to_string(),
                status,
                finished: false,
                mode: Default::default(),
                workflow_data: snapshot.clone(),
                data: ExecutionData::default(),
            },
            workflow: Workflow::from(snapshot),
            node: node.clone(),
            webhook: WebhookDescriptor {
                http_method: HttpMethod::Post,
                path: String::new(),
                node: node.name.clone(),
                restart_webhook: true,
            },
            request: WaitingWebhookRequest::new(HttpMethod::Post, "/webhook-waiting/1", "1")
                .with_body(json!({"approved": true})),
        }
    }

    #[tokio::test]
    async fn resume_responds_and_completes() {
        let repo = InMemoryExecutionRepository::new();
        let r = resumption(ExecutionStatus::Waiting);
        repo.insert(r.execution.clone());
        let resumer = InMemoryExecutionResumer::new(repo.clone());

        let (responder, rx) = WebhookResponder::channel();
        resumer.resume(r, responder).await.unwrap();

        let response = rx.await.unwrap();
        assert_eq!(response.status, 200);
        let stored = repo.get("1").unwrap();
        assert_eq!(stored.status, ExecutionStatus::Success);
        assert!(stored.finished);
        let run = &stored.data.result_data.run_data["Wait"][0];
        assert_eq!(run.data.as_ref().unwrap()["main"][0][0]["json"]["body"]["approved"], true);
    }

    #[tokio::test]
    async fn second_resume_conflicts() {
        let repo = InMemoryExecutionRepository::new();
        let r = resumption(ExecutionStatus::Waiting);
        repo.insert(r.execution.clone());
        let resumer = InMemoryExecutionResumer::new(repo.clone());

        let (first, _rx1) = WebhookResponder::channel();
        resumer.resume(r.clone(), first).await.unwrap();

        let (second, rx2) = WebhookResponder::channel();
        let err = resumer.resume(r, second).await.unwrap_err();
        assert!(matches!(err, WebhookError::Conflict(_)));
        assert!(rx2.await.is_err());
    }

    #[tokio::test]
    async fn unknown_execution_is_not_found() {
        let resumer = InMemoryExecutionResumer::new(InMemoryExecutionRepository::new());
        let (responder, _rx) = WebhookResponder::channel();
        assert!(matches!(
            resumer.resume(resumption(ExecutionStatus::Waiting), responder).await,
            Err(WebhookError::NotFound(_))
        ));
    }
}
