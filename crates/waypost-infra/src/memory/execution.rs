//! DashMap-backed execution store.

use std::sync::Arc;

use dashmap::DashMap;
use waypost_core::repository::execution::ExecutionRepository;
use waypost_types::error::RepositoryError;
use waypost_types::execution::{Execution, ExecutionStatus};

/// Thread-safe in-process execution store.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutionRepository {
    executions: Arc<DashMap<String, Execution>>,
}

impl InMemoryExecutionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an execution.
    pub fn insert(&self, execution: Execution) {
        self.executions.insert(execution.id.clone(), execution);
    }

    pub fn get(&self, id: &str) -> Option<Execution> {
        self.executions.get(id).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.executions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executions.is_empty()
    }

    /// Atomically move an unfinished execution from `from` to `to`.
    ///
    /// The entry's shard lock is held for the check and the write, so of
    /// two concurrent callers exactly one succeeds.
    pub fn try_transition(
        &self,
        id: &str,
        from: ExecutionStatus,
        to: ExecutionStatus,
    ) -> Result<(), RepositoryError> {
        let mut entry = self.executions.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if entry.status != from || entry.finished {
            return Err(RepositoryError::Conflict(format!(
                "execution {id} is {}, expected {from}",
                entry.status
            )));
        }
        entry.status = to;
        Ok(())
    }
}

impl ExecutionRepository for InMemoryExecutionRepository {
    async fn find_single_execution(&self, id: &str) -> Result<Option<Execution>, RepositoryError> {
        Ok(self.get(id))
    }
}
