//! Infrastructure layer for Waypost.
//!
//! Contains implementations of the collaborator traits defined in
//! `waypost-core`: DashMap-backed stores, the HMAC-SHA256 resume-URL signer,
//! the built-in node webhook catalog, and the TOML configuration loader.

pub mod config;
pub mod memory;
pub mod webhook;
