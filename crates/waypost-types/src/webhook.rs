//! Webhook request/response types shared by the HTTP layer and the
//! waiting-webhook service.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// HTTP method
// ---------------------------------------------------------------------------

/// HTTP methods a webhook route can be called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Delete,
    Get,
    Head,
    Patch,
    Post,
    Put,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DELETE" => Ok(HttpMethod::Delete),
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "PATCH" => Ok(HttpMethod::Patch),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(format!("unsupported HTTP method: '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// A webhook a node exposes, as reported by the webhook registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookDescriptor {
    pub http_method: HttpMethod,
    /// Path suffix after the execution id; empty for the bare route.
    pub path: String,
    /// Name of the node that owns the webhook.
    pub node: String,
    /// Whether calling this webhook resumes a waiting execution.
    pub restart_webhook: bool,
}

/// Origin policy for a webhook route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlOptions {
    /// `*` or a comma-separated allow-list. `None` means no policy.
    pub allowed_origins: Option<String>,
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// An incoming call on a waiting-webhook route.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitingWebhookRequest {
    pub method: HttpMethod,
    pub execution_id: String,
    pub suffix: Option<String>,
    /// Request path exactly as received (no query string).
    pub path: String,
    /// Header names are stored lowercased.
    pub headers: BTreeMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Value,
}

impl WaitingWebhookRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>, execution_id: impl Into<String>) -> Self {
        Self {
            method,
            execution_id: execution_id.into(),
            suffix: None,
            path: path.into(),
            headers: BTreeMap::new(),
            query: HashMap::new(),
            body: Value::Null,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.insert(name.to_string(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// What the execution engine answers a resumed webhook call with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl WebhookResponse {
    /// 200 with a JSON body.
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Status-only response.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }
}
