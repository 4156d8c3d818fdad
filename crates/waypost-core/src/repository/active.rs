//! Active workflow registry trait definition.

use waypost_types::error::RepositoryError;
use waypost_types::workflow::WorkflowId;

/// The set of workflows whose triggers are currently live.
///
/// Injected rather than global so a distributed registry can replace the
/// in-process one.
pub trait ActiveWorkflows: Send + Sync {
    fn list_active_workflow_ids(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<WorkflowId>, RepositoryError>> + Send;
}
