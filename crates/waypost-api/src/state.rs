//! Application state wiring all services together.
//!
//! Services are generic over collaborator traits; AppState pins them to the
//! concrete infra implementations.

use std::path::Path;
use std::sync::Arc;

use waypost_core::trigger::exclusivity::ExclusivityRegistry;
use waypost_core::trigger::validation::TriggerValidationService;
use waypost_core::webhook::waiting::WaitingWebhooks;
use waypost_infra::memory::seed::load_seed;
use waypost_infra::memory::{
    InMemoryActiveWorkflows, InMemoryExecutionRepository, InMemoryWorkflowRepository,
};
use waypost_infra::webhook::{HmacUrlSigner, InMemoryExecutionResumer, StaticWebhookCatalog};
use waypost_types::config::WaypostConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteWaitingWebhooks = WaitingWebhooks<
    InMemoryExecutionRepository,
    StaticWebhookCatalog,
    InMemoryExecutionResumer,
    HmacUrlSigner,
>;

pub type ConcreteTriggerValidation =
    TriggerValidationService<InMemoryWorkflowRepository, InMemoryActiveWorkflows>;

/// Shared application state used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub waiting_webhooks: Arc<ConcreteWaitingWebhooks>,
    pub trigger_validation: Arc<ConcreteTriggerValidation>,
    pub workflows: InMemoryWorkflowRepository,
    pub executions: InMemoryExecutionRepository,
    pub active_workflows: InMemoryActiveWorkflows,
    pub config: Arc<WaypostConfig>,
}

impl AppState {
    /// Wire services over empty stores.
    pub fn from_config(config: WaypostConfig) -> anyhow::Result<Self> {
        let signer = match config.webhooks.signature_secret.as_deref() {
            Some(secret) => HmacUrlSigner::new(secret.as_bytes())?,
            None => {
                tracing::warn!(
                    "no signature secret configured, resume tokens will not survive a restart"
                );
                HmacUrlSigner::ephemeral()?
            }
        };

        let workflows = InMemoryWorkflowRepository::new();
        let executions = InMemoryExecutionRepository::new();
        let active_workflows = InMemoryActiveWorkflows::new();

        let waiting_webhooks = WaitingWebhooks::new(
            executions.clone(),
            StaticWebhookCatalog::new(),
            InMemoryExecutionResumer::new(executions.clone()),
            signer,
            config.webhooks.waiting_prefix.trim_matches('/'),
        );
        let trigger_validation = TriggerValidationService::new(
            workflows.clone(),
            active_workflows.clone(),
            ExclusivityRegistry::with_defaults(),
        );

        Ok(Self {
            waiting_webhooks: Arc::new(waiting_webhooks),
            trigger_validation: Arc::new(trigger_validation),
            workflows,
            executions,
            active_workflows,
            config: Arc::new(config),
        })
    }

    /// Wire services and preload the stores from an optional seed file.
    pub async fn init(config: WaypostConfig, seed: Option<&Path>) -> anyhow::Result<Self> {
        let state = Self::from_config(config)?;

        if let Some(path) = seed {
            let (workflows, executions, active) = load_seed(path).await?.apply(
                &state.workflows,
                &state.executions,
                &state.active_workflows,
            );
            tracing::info!(
                path = %path.display(),
                workflows,
                executions,
                active,
                "loaded seed data"
            );
        }

        Ok(state)
    }
}
