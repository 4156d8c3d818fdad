use waypost_types::webhook::WebhookDescriptor;
use waypost_types::workflow::{Node, Workflow};

/// Resolves the webhooks a node exposes within a workflow.
pub trait WebhookService: Send + Sync {
    fn get_node_webhooks(&self, workflow: &Workflow, node: &Node) -> Vec<WebhookDescriptor>;
}
