//! Shared domain types for Waypost.
//!
//! This crate contains the types exchanged between the trigger validation
//! and webhook resumption services and their collaborators: workflows and
//! their nodes, stored executions, webhook descriptors, configuration, and
//! the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod execution;
pub mod webhook;
pub mod workflow;
