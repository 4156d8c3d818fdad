//! In-process adapters for the core repository traits.

pub mod execution;
pub mod seed;
pub mod workflow;

pub use execution::InMemoryExecutionRepository;
pub use workflow::{InMemoryActiveWorkflows, InMemoryWorkflowRepository};
