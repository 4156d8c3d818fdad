//! Resumption of paused executions through waiting webhooks.
//!
//! A call on `/<prefix>/<execution_id>[/<suffix>]` is resolved to the node
//! the execution is paused in, validated, patched so the replay continues
//! past the wait, and handed to the execution engine. There is no lock in
//! this service; at-most-once resumption is the delegate's responsibility.

use waypost_types::error::WebhookError;
use waypost_types::execution::{Execution, ExecutionStatus, RunDataEntry};
use waypost_types::webhook::{
    AccessControlOptions, HttpMethod, WaitingWebhookRequest, WebhookDescriptor, WebhookResponse,
};
use waypost_types::workflow::{ConnectionType, Node, Workflow};

use crate::cors::origin::ANY_ORIGIN;
use crate::repository::execution::ExecutionRepository;

use super::delegate::{ExecutionDelegate, WebhookResponder, WebhookResumption};
use super::node_webhooks::WebhookService;
use super::signature::{effective_host, split_base_url, url_for_signing, UrlSigner, WAITING_TOKEN_QUERY_PARAM};

/// Suffix shared by every human-in-the-loop tool node type.
const HITL_TOOL_SUFFIX: &str = "HitlTool";

/// Whether a node type belongs to the human-in-the-loop tool family.
pub fn is_hitl_tool_type(node_type: &str) -> bool {
    node_type.ends_with(HITL_TOOL_SUFFIX)
}

/// Waiting-webhook manager.
pub struct WaitingWebhooks<E, H, D, S>
where
    E: ExecutionRepository,
    H: WebhookService,
    D: ExecutionDelegate,
    S: UrlSigner,
{
    executions: E,
    webhooks: H,
    delegate: D,
    signer: S,
    prefix: String,
}

impl<E, H, D, S> WaitingWebhooks<E, H, D, S>
where
    E: ExecutionRepository,
    H: WebhookService,
    D: ExecutionDelegate,
    S: UrlSigner,
{
    pub fn new(executions: E, webhooks: H, delegate: D, signer: S, prefix: impl Into<String>) -> Self {
        Self {
            executions,
            webhooks,
            delegate,
            signer,
            prefix: prefix.into(),
        }
    }

    /// First path segment of the routes this manager serves.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve, validate, and resume the execution the request targets.
    ///
    /// Returns whatever the execution engine answers through the responder.
    #[tracing::instrument(skip(self, request), fields(execution_id = %request.execution_id, method = %request.method))]
    pub async fn execute_webhook(
        &self,
        request: WaitingWebhookRequest,
    ) -> Result<WebhookResponse, WebhookError> {
        let execution_id = request.execution_id.clone();

        let mut execution = self
            .executions
            .find_single_execution(&execution_id)
            .await?
            .ok_or_else(|| {
                WebhookError::NotFound(format!("The execution \"{execution_id}\" does not exist."))
            })?;

        if execution.data.validate_signature && !self.validate_signature_in_request(&request) {
            tracing::warn!("rejected resume request with missing or invalid token");
            return Err(WebhookError::Unauthorized(
                "Invalid or missing resume token".to_string(),
            ));
        }

        ensure_resumable(&execution)?;

        let last_node = execution
            .data
            .result_data
            .last_node_executed
            .clone()
            .ok_or_else(|| {
                WebhookError::NotFound(format!(
                    "The execution \"{execution_id}\" has no node to resume from."
                ))
            })?;

        let workflow = Workflow::from(execution.workflow_data.clone());
        let node = workflow.node(&last_node).cloned().ok_or_else(|| {
            WebhookError::NotFound(format!(
                "The node \"{last_node}\" of execution \"{execution_id}\" does not exist in its workflow."
            ))
        })?;

        let webhook = self
            .find_restart_webhook(&workflow, &node, request.method, request.suffix.as_deref())
            .ok_or_else(|| {
                WebhookError::NotFound(format!(
                    "The execution \"{execution_id}\" is not waiting for a {} request on this path.",
                    request.method
                ))
            })?;

        prepare_for_resume(&mut execution, &node);

        tracing::info!(node = %node.name, workflow_id = %workflow.id, "resuming waiting execution");

        let (responder, receiver) = WebhookResponder::channel();
        self.delegate
            .resume(
                WebhookResumption {
                    execution,
                    workflow,
                    node,
                    webhook,
                    request,
                },
                responder,
            )
            .await?;

        receiver.await.map_err(|_| {
            WebhookError::Internal("execution engine finished without responding".to_string())
        })
    }

    /// HTTP methods the waiting node accepts on `path` (`<execution_id>[/<suffix>]`).
    ///
    /// Only descriptors whose path equals the suffix (empty when absent) count,
    /// so the advertised methods are exactly the ones that resume.
    ///
    /// Fails closed: any unresolvable state yields an empty list.
    pub async fn get_webhook_methods(&self, path: &str) -> Vec<HttpMethod> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Vec::new();
        }
        let (execution_id, suffix) = match path.split_once('/') {
            Some((id, suffix)) => (id, Some(suffix)),
            None => (path, None),
        };

        let execution = match self.executions.find_single_execution(execution_id).await {
            Ok(Some(execution)) => execution,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(execution_id, error = %e, "failed to load execution for method lookup");
                return Vec::new();
            }
        };

        if execution.finished
            || execution.status.is_terminal()
            || execution.status == ExecutionStatus::Running
        {
            return Vec::new();
        }

        let Some(last_node) = execution.data.result_data.last_node_executed.as_deref() else {
            return Vec::new();
        };
        let workflow = Workflow::from(execution.workflow_data.clone());
        let Some(node) = workflow.node(last_node) else {
            return Vec::new();
        };

        let mut methods = Vec::new();
        for webhook in self.webhooks.get_node_webhooks(&workflow, node) {
            if !webhook.restart_webhook {
                continue;
            }
            // Same path rule as `find_restart_webhook`: no suffix means "".
            if webhook.path != suffix.unwrap_or("") {
                continue;
            }
            if !methods.contains(&webhook.http_method) {
                methods.push(webhook.http_method);
            }
        }
        methods
    }

    /// Origin policy for waiting-webhook routes: any origin.
    pub fn find_access_control_options(&self, _path: &str, _method: HttpMethod) -> AccessControlOptions {
        AccessControlOptions {
            allowed_origins: Some(ANY_ORIGIN.to_string()),
        }
    }

    /// Check the request's resume token against its effective host and path.
    pub fn validate_signature_in_request(&self, request: &WaitingWebhookRequest) -> bool {
        let Some(token) = request
            .query
            .get(WAITING_TOKEN_QUERY_PARAM)
            .filter(|token| !token.is_empty())
        else {
            return false;
        };
        let Some(host) = effective_host(request) else {
            return false;
        };
        self.signer.verify(&url_for_signing(host, &request.path), token)
    }

    /// Build a signed resume URL for an execution under `base_url`.
    pub fn resume_url(
        &self,
        base_url: &str,
        execution_id: &str,
        suffix: Option<&str>,
    ) -> Result<String, WebhookError> {
        let (scheme, host, base_path) = split_base_url(base_url)
            .ok_or_else(|| WebhookError::Internal(format!("invalid base URL: '{base_url}'")))?;

        let mut path = format!("{base_path}/{}/{execution_id}", self.prefix);
        if let Some(suffix) = suffix.map(|s| s.trim_matches('/')).filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(suffix);
        }
        let token = self.signer.sign(&url_for_signing(host, &path));
        Ok(format!("{scheme}://{host}{path}?{WAITING_TOKEN_QUERY_PARAM}={token}"))
    }

    fn find_restart_webhook(
        &self,
        workflow: &Workflow,
        node: &Node,
        method: HttpMethod,
        suffix: Option<&str>,
    ) -> Option<WebhookDescriptor> {
        let suffix = suffix.unwrap_or("");
        self.webhooks
            .get_node_webhooks(workflow, node)
            .into_iter()
            .find(|w| w.restart_webhook && w.http_method == method && w.path == suffix)
    }
}

fn ensure_resumable(execution: &Execution) -> Result<(), WebhookError> {
    let id = &execution.id;
    if execution.status == ExecutionStatus::Running {
        return Err(WebhookError::Conflict(format!(
            "The execution \"{id}\" is running already."
        )));
    }
    if execution.data.result_data.error.is_some() {
        return Err(WebhookError::Conflict(format!(
            "The execution \"{id}\" has finished with error."
        )));
    }
    if execution.finished || execution.status.is_terminal() {
        return Err(WebhookError::Conflict(format!(
            "The execution \"{id}\" has finished already."
        )));
    }
    if execution.status != ExecutionStatus::Waiting {
        return Err(WebhookError::Conflict(format!(
            "The execution \"{id}\" is not waiting."
        )));
    }
    Ok(())
}

/// Patch a paused execution so the engine's replay continues past the wait.
///
/// - clears `waitTill`
/// - disables the node at the head of the stack so it does not wait again,
///   and logs its output on `ai_tool` when it is a human-in-the-loop tool
/// - drops the resumed node's last run entry, keeping a zero-timed
///   placeholder only when that entry carried an input override
pub fn prepare_for_resume(execution: &mut Execution, node: &Node) {
    execution.data.wait_till = None;

    if let Some(head) = execution
        .data
        .execution_data
        .as_mut()
        .and_then(|stack| stack.node_execution_stack.first_mut())
    {
        if is_hitl_tool_type(&node.node_type) {
            head.node.rewire_output_log_to = Some(ConnectionType::AiTool);
        }
        head.node.disabled = true;
    }

    if let Some(runs) = execution.data.result_data.run_data.get_mut(&node.name) {
        if let Some(last) = runs.pop() {
            if let Some(input_override) = last.input_override {
                runs.push(RunDataEntry::placeholder(
                    last.source,
                    last.execution_index,
                    input_override,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use serde_json::json;
    use waypost_types::error::RepositoryError;
    use waypost_types::execution::{ExecuteData, ExecutionData, ExecutionMode, ExecutionStack, ResultData};
    use waypost_types::workflow::WorkflowSnapshot;

    use super::*;

    // --- Mock collaborators ---

    #[derive(Default)]
    struct MockExecutions {
        executions: HashMap<String, Execution>,
        fail: bool,
    }

    impl ExecutionRepository for MockExecutions {
        async fn find_single_execution(&self, id: &str) -> Result<Option<Execution>, RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Connection);
            }
            Ok(self.executions.get(id).cloned())
        }
    }

    /// Wait nodes restart on GET and POST; the approval node restarts on POST `approve`.
    struct MockWebhooks;

    impl WebhookService for MockWebhooks {
        fn get_node_webhooks(&self, _workflow: &Workflow, node: &Node) -> Vec<WebhookDescriptor> {
            let hook = |method, path: &str, restart| WebhookDescriptor {
                http_method: method,
                path: path.to_string(),
                node: node.name.clone(),
                restart_webhook: restart,
            };
            match node.node_type.as_str() {
                "waypost.wait" => vec![
                    hook(HttpMethod::Get, "", true),
                    hook(HttpMethod::Post, "", true),
                    hook(HttpMethod::Get, "", true),
                    hook(HttpMethod::Put, "", false),
                ],
                "waypost.slackHitlTool" => vec![hook(HttpMethod::Post, "approve", true)],
                _ => Vec::new(),
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingDelegate {
        resumed: Arc<Mutex<Option<WebhookResumption>>>,
        drop_responder: bool,
    }

    impl ExecutionDelegate for RecordingDelegate {
        async fn resume(
            &self,
            resumption: WebhookResumption,
            responder: WebhookResponder,
        ) -> Result<(), WebhookError> {
            *self.resumed.lock().unwrap() = Some(resumption);
            if !self.drop_responder {
                responder.respond(WebhookResponse::json(json!({"resumed": true})));
            }
            Ok(())
        }
    }

    /// Token is `sig(<data>)`, enough to see exactly what was signed.
    struct PlainSigner;

    impl UrlSigner for PlainSigner {
        fn sign(&self, data: &str) -> String {
            format!("sig({data})")
        }

        fn verify(&self, data: &str, token: &str) -> bool {
            self.sign(data) == token
        }
    }

    type Manager = WaitingWebhooks<MockExecutions, MockWebhooks, RecordingDelegate, PlainSigner>;

    // --- Helpers ---

    fn waiting_execution(id: &str, node: Node) -> Execution {
        let snapshot = WorkflowSnapshot {
            id: "wf-1".to_string(),
            name: "Approvals".to_string(),
            nodes: vec![Node::new("Start", "waypost.manualTrigger"), node.clone()],
            active: false,
            active_version_id: None,
            pin_data: HashMap::new(),
        };
        let mut run_data = HashMap::new();
        run_data.insert(
            node.name.clone(),
            vec![RunDataEntry {
                start_time: 1_700_000_000_000,
                execution_time: 12,
                execution_index: 1,
                source: vec![None],
                input_override: None,
                data: None,
            }],
        );
        Execution {
            id: id.to_string(),
            status: ExecutionStatus::Waiting,
            finished: false,
            mode: ExecutionMode::Webhook,
            workflow_data: snapshot,
            data: ExecutionData {
                result_data: ResultData {
                    run_data,
                    last_node_executed: Some(node.name.clone()),
                    error: None,
                },
                execution_data: Some(ExecutionStack {
                    node_execution_stack: vec![ExecuteData {
                        node,
                        data: json!({"main": [[{"json": {}}]]}),
                        source: None,
                    }],
                }),
                wait_till: Some(Utc::now()),
                validate_signature: false,
            },
        }
    }

    fn wait_node() -> Node {
        Node::new("Wait", "waypost.wait")
    }

    fn manager_with(executions: Vec<Execution>, delegate: RecordingDelegate) -> Manager {
        WaitingWebhooks::new(
            MockExecutions {
                executions: executions.into_iter().map(|e| (e.id.clone(), e)).collect(),
                fail: false,
            },
            MockWebhooks,
            delegate,
            PlainSigner,
            "webhook-waiting",
        )
    }

    fn manager(executions: Vec<Execution>) -> (Manager, RecordingDelegate) {
        let delegate = RecordingDelegate::default();
        (manager_with(executions, delegate.clone()), delegate)
    }

    fn get(id: &str) -> WaitingWebhookRequest {
        WaitingWebhookRequest::new(HttpMethod::Get, format!("/webhook-waiting/{id}"), id)
    }

    fn resumed(delegate: &RecordingDelegate) -> WebhookResumption {
        delegate.resumed.lock().unwrap().clone().expect("delegate was not called")
    }

    // --- execute_webhook ---

    #[tokio::test]
    async fn unknown_execution_is_not_found() {
        let (mgr, _) = manager(Vec::new());
        let err = mgr.execute_webhook(get("404")).await.unwrap_err();
        assert!(matches!(err, WebhookError::NotFound(_)));
    }

    #[tokio::test]
    async fn running_execution_conflicts() {
        let mut execution = waiting_execution("1", wait_node());
        execution.status = ExecutionStatus::Running;
        let (mgr, delegate) = manager(vec![execution]);

        let err = mgr.execute_webhook(get("1")).await.unwrap_err();
        assert!(matches!(err, WebhookError::Conflict(ref m) if m.contains("running already")));
        assert!(delegate.resumed.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn finished_execution_conflicts() {
        let mut execution = waiting_execution("1", wait_node());
        execution.finished = true;
        let (mgr, _) = manager(vec![execution]);

        let err = mgr.execute_webhook(get("1")).await.unwrap_err();
        assert!(matches!(err, WebhookError::Conflict(ref m) if m.contains("finished already")));
    }

    #[tokio::test]
    async fn terminal_status_conflicts() {
        let mut execution = waiting_execution("1", wait_node());
        execution.status = ExecutionStatus::Canceled;
        let (mgr, _) = manager(vec![execution]);

        assert!(matches!(
            mgr.execute_webhook(get("1")).await,
            Err(WebhookError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn recorded_error_conflicts() {
        let mut execution = waiting_execution("1", wait_node());
        execution.data.result_data.error = Some(json!({"message": "boom"}));
        let (mgr, _) = manager(vec![execution]);

        let err = mgr.execute_webhook(get("1")).await.unwrap_err();
        assert!(matches!(err, WebhookError::Conflict(ref m) if m.contains("finished with error")));
    }

    #[tokio::test]
    async fn wait_node_resumes_with_fixups() {
        let (mgr, delegate) = manager(vec![waiting_execution("1", wait_node())]);

        let response = mgr.execute_webhook(get("1")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, Some(json!({"resumed": true})));

        let resumption = resumed(&delegate);
        let head = &resumption.execution.data.execution_data.unwrap().node_execution_stack[0];
        assert!(head.node.disabled);
        assert_eq!(head.node.rewire_output_log_to, None);
        assert!(resumption.execution.data.wait_till.is_none());
        assert!(resumption.execution.data.result_data.run_data["Wait"].is_empty());
        assert_eq!(resumption.node.name, "Wait");
        assert_eq!(resumption.webhook.http_method, HttpMethod::Get);
        assert_eq!(resumption.workflow.id, "wf-1");
    }

    #[tokio::test]
    async fn hitl_node_output_is_rewired_to_ai_tool() {
        let node = Node::new("Ask human", "waypost.slackHitlTool");
        let (mgr, delegate) = manager(vec![waiting_execution("2", node)]);

        let request = WaitingWebhookRequest::new(HttpMethod::Post, "/webhook-waiting/2/approve", "2")
            .with_suffix("approve");
        mgr.execute_webhook(request).await.unwrap();

        let resumption = resumed(&delegate);
        let head = &resumption.execution.data.execution_data.unwrap().node_execution_stack[0];
        assert_eq!(head.node.rewire_output_log_to, Some(ConnectionType::AiTool));
    }

    #[tokio::test]
    async fn input_override_survives_as_single_placeholder() {
        let mut execution = waiting_execution("3", wait_node());
        let runs = execution.data.result_data.run_data.get_mut("Wait").unwrap();
        runs[0].input_override = Some(json!({"main": [[{"json": {"q": 1}}]]}));
        runs[0].source = vec![None];
        let (mgr, delegate) = manager(vec![execution]);

        mgr.execute_webhook(get("3")).await.unwrap();

        let runs = &resumed(&delegate).execution.data.result_data.run_data["Wait"];
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].start_time, 0);
        assert_eq!(runs[0].execution_time, 0);
        assert_eq!(runs[0].execution_index, 1);
        assert_eq!(runs[0].source, vec![None]);
        assert_eq!(runs[0].input_override, Some(json!({"main": [[{"json": {"q": 1}}]]})));
    }

    #[tokio::test]
    async fn method_without_restart_webhook_is_not_found() {
        let (mgr, delegate) = manager(vec![waiting_execution("1", wait_node())]);
        let request = WaitingWebhookRequest::new(HttpMethod::Put, "/webhook-waiting/1", "1");

        assert!(matches!(
            mgr.execute_webhook(request).await,
            Err(WebhookError::NotFound(_))
        ));
        assert!(delegate.resumed.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn wrong_suffix_is_not_found() {
        let node = Node::new("Ask human", "waypost.slackHitlTool");
        let (mgr, _) = manager(vec![waiting_execution("2", node)]);
        let request = WaitingWebhookRequest::new(HttpMethod::Post, "/webhook-waiting/2/reject", "2")
            .with_suffix("reject");

        assert!(matches!(
            mgr.execute_webhook(request).await,
            Err(WebhookError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn last_node_missing_from_workflow_is_not_found() {
        let mut execution = waiting_execution("1", wait_node());
        execution.data.result_data.last_node_executed = Some("Ghost".to_string());
        let (mgr, _) = manager(vec![execution]);

        assert!(matches!(
            mgr.execute_webhook(get("1")).await,
            Err(WebhookError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn dropped_responder_is_internal_error() {
        let delegate = RecordingDelegate {
            drop_responder: true,
            ..Default::default()
        };
        let mgr = manager_with(vec![waiting_execution("1", wait_node())], delegate);

        assert!(matches!(
            mgr.execute_webhook(get("1")).await,
            Err(WebhookError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn repository_failure_propagates() {
        let mgr: Manager = WaitingWebhooks::new(
            MockExecutions {
                fail: true,
                ..Default::default()
            },
            MockWebhooks,
            RecordingDelegate::default(),
            PlainSigner,
            "webhook-waiting",
        );
        assert!(matches!(
            mgr.execute_webhook(get("1")).await,
            Err(WebhookError::Repository(_))
        ));
    }

    // --- signatures ---

    #[tokio::test]
    async fn signed_execution_requires_token() {
        let mut execution = waiting_execution("5", wait_node());
        execution.data.validate_signature = true;
        let (mgr, delegate) = manager(vec![execution]);

        let unsigned = get("5").with_header("Host", "example.com");
        assert!(matches!(
            mgr.execute_webhook(unsigned).await,
            Err(WebhookError::Unauthorized(_))
        ));

        let signed = get("5")
            .with_header("Host", "example.com")
            .with_query("signature", "sig(example.com/webhook-waiting/5)");
        assert_eq!(mgr.execute_webhook(signed).await.unwrap().status, 200);
        assert!(delegate.resumed.lock().unwrap().is_some());
    }

    #[test]
    fn token_is_bound_to_host() {
        let (mgr, _) = manager(Vec::new());
        let token = "sig(example.com/webhook-waiting/9)";

        let other_host = get("9")
            .with_header("Host", "other.com")
            .with_query("signature", token);
        assert!(!mgr.validate_signature_in_request(&other_host));

        let forwarded = get("9")
            .with_header("Host", "other.com")
            .with_header("X-Forwarded-Host", "example.com")
            .with_query("signature", token);
        assert!(mgr.validate_signature_in_request(&forwarded));
    }

    #[test]
    fn empty_or_missing_token_is_rejected() {
        let (mgr, _) = manager(Vec::new());
        let req = get("9").with_header("Host", "example.com");
        assert!(!mgr.validate_signature_in_request(&req));
        assert!(!mgr.validate_signature_in_request(&req.clone().with_query("signature", "")));
    }

    #[test]
    fn resume_url_is_signed_for_base_host() {
        let (mgr, _) = manager(Vec::new());

        let url = mgr.resume_url("https://example.com/", "9", None).unwrap();
        assert_eq!(
            url,
            "https://example.com/webhook-waiting/9?signature=sig(example.com/webhook-waiting/9)"
        );

        let url = mgr
            .resume_url("http://localhost:5678", "9", Some("/approve/"))
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:5678/webhook-waiting/9/approve?signature=sig(localhost:5678/webhook-waiting/9/approve)"
        );

        assert!(mgr.resume_url("not a url", "9", None).is_err());
    }

    // --- get_webhook_methods ---

    #[tokio::test]
    async fn methods_are_deduplicated_restart_only() {
        let (mgr, _) = manager(vec![waiting_execution("1", wait_node())]);
        assert_eq!(
            mgr.get_webhook_methods("1").await,
            vec![HttpMethod::Get, HttpMethod::Post]
        );
    }

    #[tokio::test]
    async fn methods_filtered_by_suffix() {
        let node = Node::new("Ask human", "waypost.slackHitlTool");
        let (mgr, _) = manager(vec![waiting_execution("2", node)]);
        assert_eq!(mgr.get_webhook_methods("2/approve").await, vec![HttpMethod::Post]);
        assert!(mgr.get_webhook_methods("2/other").await.is_empty());
    }

    #[tokio::test]
    async fn suffixed_webhook_not_advertised_on_bare_path() {
        let node = Node::new("Ask human", "waypost.slackHitlTool");
        let (mgr, _) = manager(vec![waiting_execution("2", node)]);

        assert!(mgr.get_webhook_methods("2").await.is_empty());
        let err = mgr
            .execute_webhook(WaitingWebhookRequest::new(HttpMethod::Post, "/webhook-waiting/2", "2"))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::NotFound(_)));
    }

    #[tokio::test]
    async fn methods_fail_closed() {
        let mut running = waiting_execution("r", wait_node());
        running.status = ExecutionStatus::Running;
        let mut done = waiting_execution("d", wait_node());
        done.status = ExecutionStatus::Success;
        let mut no_last = waiting_execution("n", wait_node());
        no_last.data.result_data.last_node_executed = None;
        let (mgr, _) = manager(vec![running, done, no_last]);

        assert!(mgr.get_webhook_methods("").await.is_empty());
        assert!(mgr.get_webhook_methods("missing").await.is_empty());
        assert!(mgr.get_webhook_methods("r").await.is_empty());
        assert!(mgr.get_webhook_methods("d").await.is_empty());
        assert!(mgr.get_webhook_methods("n").await.is_empty());

        let failing: Manager = WaitingWebhooks::new(
            MockExecutions {
                fail: true,
                ..Default::default()
            },
            MockWebhooks,
            RecordingDelegate::default(),
            PlainSigner,
            "webhook-waiting",
        );
        assert!(failing.get_webhook_methods("1").await.is_empty());
    }

    #[test]
    fn access_control_allows_any_origin() {
        let (mgr, _) = manager(Vec::new());
        let options = mgr.find_access_control_options("1", HttpMethod::Post);
        assert_eq!(options.allowed_origins.as_deref(), Some("*"));
    }

    #[test]
    fn hitl_type_detection() {
        assert!(is_hitl_tool_type("waypost.slackHitlTool"));
        assert!(!is_hitl_tool_type("waypost.wait"));
        assert!(!is_hitl_tool_type("waypost.hitlToolbox"));
    }
}
