//! Repository and registry trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (waypost-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod active;
pub mod execution;
pub mod workflow;
