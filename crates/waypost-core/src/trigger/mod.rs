//! Trigger exclusivity.
//!
//! - `exclusivity` -- trigger type to resource-key extractor registry
//! - `validation` -- singleton and conflict checks at activation and manual-run time

pub mod exclusivity;
pub mod validation;
