//! Execution engine handoff.

use tokio::sync::oneshot;
use waypost_types::error::WebhookError;
use waypost_types::execution::Execution;
use waypost_types::webhook::{WaitingWebhookRequest, WebhookDescriptor, WebhookResponse};
use waypost_types::workflow::{Node, Workflow};

/// Everything the engine needs to continue a paused execution.
#[derive(Debug, Clone)]
pub struct WebhookResumption {
    /// The execution with resume fixups already applied.
    pub execution: Execution,
    pub workflow: Workflow,
    /// The node the execution was waiting in.
    pub node: Node,
    /// The restart webhook that matched the request.
    pub webhook: WebhookDescriptor,
    pub request: WaitingWebhookRequest,
}

/// One-shot channel the engine answers the HTTP caller through.
///
/// Dropping it without responding surfaces as an internal error to the
/// caller.
#[derive(Debug)]
pub struct WebhookResponder {
    tx: oneshot::Sender<WebhookResponse>,
}

impl WebhookResponder {
    pub fn channel() -> (Self, oneshot::Receiver<WebhookResponse>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Send the response. Returns `false` if the caller has gone away.
    pub fn respond(self, response: WebhookResponse) -> bool {
        self.tx.send(response).is_ok()
    }
}

/// The external primitive that actually runs the remainder of a workflow.
pub trait ExecutionDelegate: Send + Sync {
    /// Resume the execution. The response may be sent before or after this
    /// future completes.
    fn resume(
        &self,
        resumption: WebhookResumption,
        responder: WebhookResponder,
    ) -> impl std::future::Future<Output = Result<(), WebhookError>> + Send;
}
