//! JSON seed file for the in-memory stores.
//!
//! ```json
//! {
//!   "workflows": [{ "id": "wf-1", "nodes": [...], "activeVersionId": "v1" }],
//!   "executions": [{ "id": "42", "status": "waiting", "workflowData": {...} }],
//!   "active": ["wf-1"]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use waypost_types::execution::Execution;
use waypost_types::workflow::{Workflow, WorkflowId, WorkflowSnapshot};

use super::execution::InMemoryExecutionRepository;
use super::workflow::{InMemoryActiveWorkflows, InMemoryWorkflowRepository};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub workflows: Vec<WorkflowSnapshot>,
    #[serde(default)]
    pub executions: Vec<Execution>,
    /// Workflow ids to register as live.
    #[serde(default)]
    pub active: Vec<WorkflowId>,
}

impl SeedData {
    /// Load the stores. Returns `(workflows, executions, active)` counts.
    pub fn apply(
        self,
        workflows: &InMemoryWorkflowRepository,
        executions: &InMemoryExecutionRepository,
        active: &InMemoryActiveWorkflows,
    ) -> (usize, usize, usize) {
        let counts = (self.workflows.len(), self.executions.len(), self.active.len());
        for snapshot in self.workflows {
            workflows.insert(Workflow::from(snapshot));
        }
        for execution in self.executions {
            executions.insert(execution);
        }
        for id in &self.active {
            if workflows.get(id).is_none() {
                tracing::warn!(workflow_id = %id, "seeded active id has no workflow record");
            }
            active.add(id);
        }
        counts
    }
}

pub async fn load_seed(path: &Path) -> Result<SeedData, SeedError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
    serde_json::from_str(&content).map_err(|source| SeedError::Parse {
        path: path.display().to_string(),
        source,
    })
}
