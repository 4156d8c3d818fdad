//! Business logic and collaborator trait definitions for Waypost.
//!
//! This crate defines the "ports" (repository, registry, and engine traits)
//! that the infrastructure layer implements, plus the services built on
//! them. It depends only on `waypost-types` -- never on `waypost-infra` or
//! any storage/HTTP crate.

pub mod cors;
pub mod repository;
pub mod trigger;
pub mod webhook;
