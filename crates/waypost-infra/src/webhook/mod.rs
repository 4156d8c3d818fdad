//! Webhook adapters: URL signer, node webhook catalog, bundled resumer.

pub mod catalog;
pub mod resumer;
pub mod signature;

pub use catalog::StaticWebhookCatalog;
pub use resumer::InMemoryExecutionResumer;
pub use signature::HmacUrlSigner;
