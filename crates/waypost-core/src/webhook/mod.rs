//! Waiting-webhook resumption.
//!
//! - `delegate` -- handoff to the execution engine with a one-shot responder
//! - `node_webhooks` -- which webhooks a node exposes
//! - `signature` -- host-bound resume tokens
//! - `waiting` -- lookup, validation, and state fixups before resuming

pub mod delegate;
pub mod node_webhooks;
pub mod signature;
pub mod waiting;

pub use delegate::{ExecutionDelegate, WebhookResponder, WebhookResumption};
pub use node_webhooks::WebhookService;
pub use signature::{UrlSigner, WAITING_TOKEN_QUERY_PARAM};
pub use waiting::WaitingWebhooks;
