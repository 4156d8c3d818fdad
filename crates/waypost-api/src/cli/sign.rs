//! `waypost sign-url`: print a signed resume URL.

use anyhow::{bail, Context};
use console::style;

use waypost_types::config::WaypostConfig;

use crate::state::AppState;

/// Base URL used when none is given on the command line.
fn default_base_url(config: &WaypostConfig) -> String {
    config
        .webhooks
        .base_url
        .clone()
        .unwrap_or_else(|| format!("http://{}:{}", config.server.host, config.server.port))
}

/// Build the signed URL a waiting node hands out for `execution_id`.
pub fn signed_resume_url(
    config: WaypostConfig,
    execution_id: &str,
    suffix: Option<&str>,
    base_url: Option<&str>,
) -> anyhow::Result<String> {
    if config.webhooks.signature_secret.is_none() {
        bail!(
            "no signature secret configured; set webhooks.signature_secret or {}",
            waypost_infra::config::SIGNATURE_SECRET_ENV
        );
    }

    let base_url = base_url
        .map(str::to_string)
        .unwrap_or_else(|| default_base_url(&config));
    let state = AppState::from_config(config)?;
    let url = state
        .waiting_webhooks
        .resume_url(&base_url, execution_id, suffix)
        .with_context(|| format!("cannot sign resume URL for execution '{execution_id}'"))?;
    Ok(url)
}

pub fn sign_url(
    config: WaypostConfig,
    execution_id: &str,
    suffix: Option<&str>,
    base_url: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let url = signed_resume_url(config, execution_id, suffix, base_url)?;

    if json {
        let out = serde_json::json!({ "execution_id": execution_id, "url": url });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "  {} Resume URL for execution {}",
            style("🔗").bold(),
            style(execution_id).cyan()
        );
        println!();
        println!("  {}", style(&url).yellow());
        println!();
    }
    Ok(())
}
