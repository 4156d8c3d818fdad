//! Trigger exclusivity validation.
//!
//! Runs before a workflow is activated and before a manual test run starts,
//! so a rejected request never leaves a partially activated workflow or a
//! partially started execution behind.
//!
//! The check is read-then-decide: it reads the active registry and the
//! workflow store without taking a lock, so two activations racing for the
//! same resource key can both pass. Activation is human-triggered and rare;
//! closing that gap needs a compare-and-swap on the key in the store.

use waypost_types::error::{TriggerConflict, TriggerValidationError};
use waypost_types::workflow::{Node, Workflow, WorkflowFilter, WorkflowSummary};

use crate::repository::active::ActiveWorkflows;
use crate::repository::workflow::WorkflowRepository;

use super::exclusivity::{ExclusiveResourceKey, ExclusivityRegistry};

/// Validates singleton and exclusive-resource constraints on triggers.
///
/// Generic over the workflow store and the active registry so either can be
/// swapped (e.g. for a distributed registry) without touching the rules.
pub struct TriggerValidationService<W: WorkflowRepository, A: ActiveWorkflows> {
    workflow_repo: W,
    active_workflows: A,
    registry: ExclusivityRegistry,
}

impl<W: WorkflowRepository, A: ActiveWorkflows> TriggerValidationService<W, A> {
    pub fn new(workflow_repo: W, active_workflows: A, registry: ExclusivityRegistry) -> Self {
        Self {
            workflow_repo,
            active_workflows,
            registry,
        }
    }

    pub fn registry(&self) -> &ExclusivityRegistry {
        &self.registry
    }

    /// Check a manual test run before any node executes.
    ///
    /// 1. Singleton: an active workflow must not manually fire a trigger that
    ///    is already consuming through its live subscription.
    /// 2. Conflict: no other active workflow may hold the same resource key.
    ///
    /// With `trigger_to_start_from` only that node is considered.
    pub async fn validate_manual_execution(
        &self,
        workflow: &Workflow,
        workflow_is_active: bool,
        trigger_to_start_from: Option<&str>,
    ) -> Result<(), TriggerValidationError> {
        let claimants = self.claimant_nodes(workflow, trigger_to_start_from);

        if workflow_is_active {
            if let Some(node) = claimants.first() {
                tracing::debug!(
                    workflow_id = %workflow.id,
                    node = %node.name,
                    "manual run rejected: trigger is live via active workflow"
                );
                return Err(TriggerValidationError::SingleTrigger {
                    node_name: node.name.clone(),
                    node_type: node.node_type.clone(),
                });
            }
        }

        if claimants.is_empty() {
            return Ok(());
        }

        let others = self
            .workflow_repo
            .find(&WorkflowFilter::active_excluding(&workflow.id))
            .await?;

        self.ensure_no_conflict(&claimants, &others)
    }

    /// Check a workflow about to be activated against the live registry.
    pub async fn validate_workflow_activation(
        &self,
        workflow: &Workflow,
    ) -> Result<(), TriggerValidationError> {
        let claimants = self.claimant_nodes(workflow, None);
        if claimants.is_empty() {
            tracing::debug!(
                workflow_id = %workflow.id,
                "no enabled exclusivity-checked triggers, skipping conflict check"
            );
            return Ok(());
        }

        let active_ids: Vec<String> = self
            .active_workflows
            .list_active_workflow_ids()
            .await?
            .into_iter()
            .filter(|id| *id != workflow.id)
            .collect();
        if active_ids.is_empty() {
            return Ok(());
        }

        let others = self
            .workflow_repo
            .find(&WorkflowFilter::by_ids(active_ids))
            .await?;

        self.ensure_no_conflict(&claimants, &others)
    }

    /// Enabled, unpinned nodes of exclusivity-checked types.
    fn claimant_nodes<'w>(&self, workflow: &'w Workflow, only: Option<&str>) -> Vec<&'w Node> {
        workflow
            .nodes
            .iter()
            .filter(|node| self.registry.is_checked(&node.node_type))
            .filter(|node| !node.disabled && !workflow.has_pinned_data(&node.name))
            .filter(|node| only.is_none_or(|name| node.name == name))
            .collect()
    }

    fn ensure_no_conflict(
        &self,
        claimants: &[&Node],
        others: &[WorkflowSummary],
    ) -> Result<(), TriggerValidationError> {
        for node in claimants {
            let Some(key) = self.registry.extract_key(node) else {
                tracing::debug!(
                    node = %node.name,
                    node_type = %node.node_type,
                    "trigger parameters incomplete, no resource key to check"
                );
                continue;
            };

            if let Some(holder) = self.find_holder(node, &key, others) {
                tracing::info!(
                    node = %node.name,
                    key = %key,
                    conflicting_workflow_id = %holder.id,
                    "trigger parameter conflict"
                );
                return Err(TriggerValidationError::ParameterConflict(Box::new(
                    TriggerConflict {
                        node_name: node.name.clone(),
                        node_type: node.node_type.clone(),
                        key: key.to_string(),
                        conflicting_workflow_id: holder.id.clone(),
                        conflicting_workflow_name: holder.name.clone(),
                    },
                )));
            }
        }
        Ok(())
    }

    /// The first other workflow whose active version claims `key` with a node
    /// of the same type.
    fn find_holder<'s>(
        &self,
        node: &Node,
        key: &ExclusiveResourceKey,
        others: &'s [WorkflowSummary],
    ) -> Option<&'s WorkflowSummary> {
        others.iter().find(|summary| {
            // Not yet truly active: no published version to compare against.
            let Some(version) = &summary.active_version else {
                return false;
            };
            version.nodes.iter().any(|other| {
                other.node_type == node.node_type
                    && !other.disabled
                    && !version.has_pinned_data(&other.name)
                    && self.registry.extract_key(other).as_ref() == Some(key)
            })
        })
    }
}
