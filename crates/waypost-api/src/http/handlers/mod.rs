//! HTTP request handlers.

pub mod waiting;
pub mod workflow;
