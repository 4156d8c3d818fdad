//! Configuration types for Waypost.
//!
//! `WaypostConfig` represents the `waypost.toml` file that controls the
//! listen address, waiting-webhook routing and signing, and logging.

use serde::{Deserialize, Serialize};

/// Top-level configuration. All fields have defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypostConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub webhooks: WebhookSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listen address for the HTTP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5678
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Waiting-webhook routing and signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookSettings {
    /// First path segment of waiting-webhook routes.
    #[serde(default = "default_waiting_prefix")]
    pub waiting_prefix: String,
    /// HMAC secret for resumption tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_secret: Option<String>,
    /// Public base URL used when issuing resume URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_waiting_prefix() -> String {
    "webhook-waiting".to_string()
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            waiting_prefix: default_waiting_prefix(),
            signature_secret: None,
            base_url: None,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
    /// Bridge spans to OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}
