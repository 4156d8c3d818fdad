//! Configuration loader for Waypost.
//!
//! Reads a TOML file and deserializes it into [`WaypostConfig`]. Falls back
//! to defaults when the file is missing or malformed, then applies
//! environment overrides.

use std::path::Path;

use waypost_types::config::WaypostConfig;

/// Environment variable that overrides `webhooks.signature_secret`.
pub const SIGNATURE_SECRET_ENV: &str = "WAYPOST_SIGNATURE_SECRET";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`WaypostConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Environment overrides are applied in every case.
pub async fn load_config(path: &Path) -> WaypostConfig {
    let config = read_config_file(path).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

async fn read_config_file(path: &Path) -> WaypostConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return WaypostConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return WaypostConfig::default();
        }
    };

    match toml::from_str::<WaypostConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            WaypostConfig::default()
        }
    }
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    mut config: WaypostConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> WaypostConfig {
    if let Some(secret) = lookup(SIGNATURE_SECRET_ENV).filter(|s| !s.is_empty()) {
        config.webhooks.signature_secret = Some(secret);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config_file(&tmp.path().join("waypost.toml")).await;
        assert_eq!(config, WaypostConfig::default());
        assert_eq!(config.webhooks.waiting_prefix, "webhook-waiting");
    }

    #[tokio::test]
    async fn valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("waypost.toml");
        tokio::fs::write(
            &path,
            r#"
[server]
port = 8080

[webhooks]
signature_secret = "s3cret"
base_url = "https://hooks.example.com"

[logging]
json = true
"#,
        )
        .await
        .unwrap();

        let config = read_config_file(&path).await;
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.webhooks.signature_secret.as_deref(), Some("s3cret"));
        assert_eq!(
            config.webhooks.base_url.as_deref(),
            Some("https://hooks.example.com")
        );
        assert!(config.logging.json);
        assert!(!config.logging.otel);
    }

    #[tokio::test]
    async fn invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("waypost.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        assert_eq!(read_config_file(&path).await, WaypostConfig::default());
    }

    #[test]
    fn env_secret_overrides_file() {
        let mut config = WaypostConfig::default();
        config.webhooks.signature_secret = Some("from-file".to_string());

        let config = apply_env_overrides(config, |key| {
            (key == SIGNATURE_SECRET_ENV).then(|| "from-env".to_string())
        });
        assert_eq!(config.webhooks.signature_secret.as_deref(), Some("from-env"));
    }

    #[test]
    fn empty_env_secret_is_ignored() {
        let mut config = WaypostConfig::default();
        config.webhooks.signature_secret = Some("from-file".to_string());

        let config = apply_env_overrides(config, |_| Some(String::new()));
        assert_eq!(config.webhooks.signature_secret.as_deref(), Some("from-file"));
    }
}
