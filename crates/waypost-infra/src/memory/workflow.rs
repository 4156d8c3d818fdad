//! DashMap-backed workflow store and active-workflow registry.

use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use waypost_core::repository::active::ActiveWorkflows;
use waypost_core::repository::workflow::WorkflowRepository;
use waypost_types::error::RepositoryError;
use waypost_types::workflow::{
    ActivationMarker, Workflow, WorkflowFilter, WorkflowId, WorkflowSummary, WorkflowVersion,
};

/// Thread-safe in-process workflow store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowRepository {
    workflows: Arc<DashMap<WorkflowId, Workflow>>,
}

impl InMemoryWorkflowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a workflow.
    pub fn insert(&self, workflow: Workflow) {
        self.workflows.insert(workflow.id.clone(), workflow);
    }

    pub fn get(&self, id: &str) -> Option<Workflow> {
        self.workflows.get(id).map(|w| w.value().clone())
    }

    /// Publish (`Some`) or withdraw (`None`) the active version.
    ///
    /// Always writes the versioned marker, upgrading legacy records.
    pub fn set_active_version(
        &self,
        id: &str,
        version_id: Option<String>,
    ) -> Result<Workflow, RepositoryError> {
        let mut entry = self.workflows.get_mut(id).ok_or(RepositoryError::NotFound)?;
        entry.activation = ActivationMarker::Versioned(version_id);
        Ok(entry.value().clone())
    }
}

/// The published version of an active workflow, `None` if inactive.
fn active_version(workflow: &Workflow) -> Option<WorkflowVersion> {
    workflow.is_active().then(|| WorkflowVersion {
        version_id: workflow.activation.version_id().unwrap_or_default().to_string(),
        nodes: workflow.nodes.clone(),
        pin_data: workflow.pin_data.clone(),
    })
}

impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn find(&self, filter: &WorkflowFilter) -> Result<Vec<WorkflowSummary>, RepositoryError> {
        let mut summaries: Vec<WorkflowSummary> = self
            .workflows
            .iter()
            .filter(|entry| filter.matches(entry.key(), entry.is_active()))
            .map(|entry| WorkflowSummary {
                id: entry.id.clone(),
                name: entry.name.clone(),
                active_version: active_version(entry.value()),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Workflow>, RepositoryError> {
        Ok(self.get(id))
    }
}

/// In-process set of workflows whose triggers are live.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActiveWorkflows {
    ids: Arc<DashSet<WorkflowId>>,
}

impl InMemoryActiveWorkflows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the workflow was already registered.
    pub fn add(&self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    /// Returns `false` if the workflow was not registered.
    pub fn remove(&self, id: &str) -> bool {
        self.ids.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

impl ActiveWorkflows for InMemoryActiveWorkflows {
    async fn list_active_workflow_ids(&self) -> Result<Vec<WorkflowId>, RepositoryError> {
        let mut ids: Vec<WorkflowId> = self.ids.iter().map(|id| id.key().clone()).collect();
        ids.sort();
        Ok(ids)
    }
}
