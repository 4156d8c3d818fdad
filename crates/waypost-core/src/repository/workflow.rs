//! Workflow repository trait definition.

use waypost_types::error::RepositoryError;
use waypost_types::workflow::{Workflow, WorkflowFilter, WorkflowSummary};

/// Read access to stored workflows.
pub trait WorkflowRepository: Send + Sync {
    /// List workflows matching the filter, each with its active version
    /// resolved (or `None` when the workflow is not truly active).
    fn find(
        &self,
        filter: &WorkflowFilter,
    ) -> impl std::future::Future<Output = Result<Vec<WorkflowSummary>, RepositoryError>> + Send;

    /// Load a workflow by id.
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Workflow>, RepositoryError>> + Send;
}
