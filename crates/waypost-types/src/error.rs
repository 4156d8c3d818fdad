use thiserror::Error;

/// Errors from repository operations (used by trait definitions in waypost-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("store unavailable")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors raised while resolving or resuming a waiting execution.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Execution, node, or matching webhook does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Execution is in a state that cannot be resumed.
    #[error("{0}")]
    Conflict(String),

    /// Resumption token missing or invalid.
    #[error("{0}")]
    Unauthorized(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// A trigger node that would claim an exclusive resource already held elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerConflict {
    pub node_name: String,
    pub node_type: String,
    /// Rendered exclusive resource key (e.g. `groupId=billing, topic=orders`).
    pub key: String,
    pub conflicting_workflow_id: String,
    pub conflicting_workflow_name: String,
}

/// Errors from trigger exclusivity validation.
#[derive(Debug, Error)]
pub enum TriggerValidationError {
    /// A manual run would fire a trigger that is already live via the
    /// workflow's active subscription.
    #[error(
        "the trigger node '{node_name}' ({node_type}) is already listening because the workflow is active; \
         deactivate the workflow or pin data on the trigger to test it manually"
    )]
    SingleTrigger { node_name: String, node_type: String },

    /// Another active workflow already claims the same exclusive resource.
    #[error(
        "the trigger node '{}' uses {} which is already in use by active workflow '{}' ({})",
        .0.node_name, .0.key, .0.conflicting_workflow_name, .0.conflicting_workflow_id
    )]
    ParameterConflict(Box<TriggerConflict>),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
