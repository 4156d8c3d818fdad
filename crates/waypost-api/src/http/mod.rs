//! HTTP layer for Waypost.
//!
//! Waiting-webhook routes at `/<prefix>/...`, a JSON API at `/api/v1/` with
//! the envelope response format, and CORS handling for both.

pub mod cors;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
