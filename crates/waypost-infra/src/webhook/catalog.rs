//! Built-in node webhook catalog.
//!
//! Knows which restart webhooks the bundled waiting node types expose:
//!
//! - `waypost.wait`: one webhook when `resume` is `webhook` (method from
//!   `httpMethod`, default `GET`), `GET` + `POST` when `resume` is `form`,
//!   none for time-based resumes. `options.webhookSuffix` sets the path.
//! - `*HitlTool`: `GET` (approval link) and `POST` (response form) on the
//!   bare path.

use serde_json::Value;
use waypost_core::webhook::node_webhooks::WebhookService;
use waypost_core::webhook::waiting::is_hitl_tool_type;
use waypost_types::webhook::{HttpMethod, WebhookDescriptor};
use waypost_types::workflow::{Node, Workflow};

pub const WAIT_NODE_TYPE: &str = "waypost.wait";

#[derive(Debug, Clone, Copy, Default)]
pub struct StaticWebhookCatalog;

impl StaticWebhookCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl WebhookService for StaticWebhookCatalog {
    fn get_node_webhooks(&self, _workflow: &Workflow, node: &Node) -> Vec<WebhookDescriptor> {
        let restart = |method: HttpMethod, path: &str| WebhookDescriptor {
            http_method: method,
            path: path.to_string(),
            node: node.name.clone(),
            restart_webhook: true,
        };

        if node.node_type == WAIT_NODE_TYPE {
            let suffix = string_parameter(node, "options.webhookSuffix")
                .map(|s| s.trim_matches('/'))
                .unwrap_or("");
            return match string_parameter(node, "resume").unwrap_or("webhook") {
                "webhook" => {
                    let method = match string_parameter(node, "httpMethod") {
                        Some(raw) => match raw.parse::<HttpMethod>() {
                            Ok(method) => method,
                            Err(err) => {
                                tracing::warn!(node = %node.name, %err, "ignoring wait node with bad httpMethod");
                                return Vec::new();
                            }
                        },
                        None => HttpMethod::Get,
                    };
                    vec![restart(method, suffix)]
                }
                "form" => vec![restart(HttpMethod::Get, suffix), restart(HttpMethod::Post, suffix)],
                _ => Vec::new(),
            };
        }

        if is_hitl_tool_type(&node.node_type) {
            return vec![restart(HttpMethod::Get, ""), restart(HttpMethod::Post, "")];
        }

        Vec::new()
    }
}

fn string_parameter<'n>(node: &'n Node, path: &str) -> Option<&'n str> {
    match node.parameter(path)? {
        Value::String(s) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use waypost_types::workflow::ActivationMarker;

    use super::*;

    fn workflow() -> Workflow {
        Workflow {
            id: "wf".to_string(),
            name: "wf".to_string(),
            nodes: Vec::new(),
            pin_data: HashMap::new(),
            activation: ActivationMarker::Legacy(false),
        }
    }

    fn methods_and_paths(node: &Node) -> Vec<(HttpMethod, String)> {
        StaticWebhookCatalog::new()
            .get_node_webhooks(&workflow(), node)
            .into_iter()
            .map(|w| (w.http_method, w.path))
            .collect()
    }

    #[test]
    fn wait_node_defaults_to_get_on_bare_path() {
        let node = Node::new("Wait", WAIT_NODE_TYPE);
        assert_eq!(methods_and_paths(&node), vec![(HttpMethod::Get, String::new())]);
    }

    #[test]
    fn wait_node_uses_method_and_suffix() {
        let node = Node::new("Wait", WAIT_NODE_TYPE)
            .with_parameter("httpMethod", "POST")
            .with_parameter("options", json!({"webhookSuffix": "/approve"}));
        assert_eq!(
            methods_and_paths(&node),
            vec![(HttpMethod::Post, "approve".to_string())]
        );
    }

    #[test]
    fn wait_form_accepts_get_and_post() {
        let node = Node::new("Wait", WAIT_NODE_TYPE).with_parameter("resume", "form");
        let methods: Vec<HttpMethod> = methods_and_paths(&node).into_iter().map(|(m, _)| m).collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);
    }

    #[test]
    fn time_based_wait_has_no_webhooks() {
        let node = Node::new("Wait", WAIT_NODE_TYPE).with_parameter("resume", "timeInterval");
        assert!(methods_and_paths(&node).is_empty());
    }

    #[test]
    fn bad_method_yields_no_webhooks() {
        let node = Node::new("Wait", WAIT_NODE_TYPE).with_parameter("httpMethod", "TRACE");
        assert!(methods_and_paths(&node).is_empty());
    }

    #[test]
    fn hitl_tool_restarts_on_get_and_post() {
        let node = Node::new("Ask", "waypost.slackHitlTool");
        let hooks = StaticWebhookCatalog::new().get_node_webhooks(&workflow(), &node);
        assert_eq!(hooks.len(), 2);
        assert!(hooks.iter().all(|w| w.restart_webhook && w.node == "Ask"));
    }

    #[test]
    fn other_nodes_have_no_webhooks() {
        let node = Node::new("Code", "waypost.code");
        assert!(methods_and_paths(&node).is_empty());
    }
}
