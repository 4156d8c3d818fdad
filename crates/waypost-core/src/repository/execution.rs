//! Execution repository trait definition.

use waypost_types::error::RepositoryError;
use waypost_types::execution::Execution;

/// Read access to stored executions.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ExecutionRepository: Send + Sync {
    /// Load a single execution with its full run data.
    /// Returns `None` if no execution has this id.
    fn find_single_execution(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Execution>, RepositoryError>> + Send;
}
