//! Workflow and node types.
//!
//! Two shapes exist for a workflow:
//! - [`WorkflowSnapshot`] is the serialized form stored alongside executions
//!   and in workflow records. Older snapshots predate `activeVersionId` and
//!   only carry the boolean `active` flag.
//! - [`Workflow`] is the in-memory form the services work with. The two
//!   schema eras are kept visible through [`ActivationMarker`].

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier of a stored workflow.
pub type WorkflowId = String;

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Connection type a node's output is logged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Main,
    AiTool,
}

/// A single node in a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique within the workflow.
    pub name: String,
    /// Fully qualified node type (e.g. `waypost.kafkaTrigger`).
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_type_version")]
    pub type_version: f64,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub disabled: bool,
    /// When set, the node's output is logged as a response on this connection
    /// type instead of `main`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewire_output_log_to: Option<ConnectionType>,
}

fn default_type_version() -> f64 {
    1.0
}

impl Node {
    /// Create an enabled node with no parameters.
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            type_version: default_type_version(),
            parameters: Map::new(),
            disabled: false,
            rewire_output_log_to: None,
        }
    }

    /// Builder-style parameter setter.
    pub fn with_parameter(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    /// Builder-style disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Look up a parameter by dotted path (e.g. `options.webhookSuffix`).
    pub fn parameter(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.parameters.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

// ---------------------------------------------------------------------------
// Activation marker
// ---------------------------------------------------------------------------

/// How a workflow records whether it is truly active.
///
/// Current records carry `activeVersionId` (possibly null). Legacy snapshots
/// are missing that field entirely and only have the `active` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationMarker {
    /// `activeVersionId` is present; active iff it is non-null.
    Versioned(Option<String>),
    /// `activeVersionId` is absent; the legacy `active` flag decides.
    Legacy(bool),
}

impl ActivationMarker {
    pub fn is_active(&self) -> bool {
        match self {
            ActivationMarker::Versioned(version) => version.is_some(),
            ActivationMarker::Legacy(active) => *active,
        }
    }

    /// The active version id, if the record has one.
    pub fn version_id(&self) -> Option<&str> {
        match self {
            ActivationMarker::Versioned(version) => version.as_deref(),
            ActivationMarker::Legacy(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot (serialized form)
// ---------------------------------------------------------------------------

/// Serialized workflow as stored with executions and workflow records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub id: WorkflowId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub active: bool,
    /// `None` = field absent (legacy), `Some(None)` = present but null.
    #[serde(
        default,
        deserialize_with = "deserialize_present_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_version_id: Option<Option<String>>,
    /// Pinned output data keyed by node name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub pin_data: HashMap<String, Value>,
}

/// Distinguish a missing field from an explicit `null`.
fn deserialize_present_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Workflow (domain form)
// ---------------------------------------------------------------------------

/// A workflow reconstructed from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    pub nodes: Vec<Node>,
    pub pin_data: HashMap<String, Value>,
    pub activation: ActivationMarker,
}

impl Workflow {
    /// Whether the workflow is truly active under either schema era.
    pub fn is_active(&self) -> bool {
        self.activation.is_active()
    }

    /// Find a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Whether the node has pinned output data.
    pub fn has_pinned_data(&self, node_name: &str) -> bool {
        has_pinned_data(&self.pin_data, node_name)
    }

    /// Convert back into the serialized form.
    pub fn to_snapshot(&self) -> WorkflowSnapshot {
        let (active, active_version_id) = match &self.activation {
            ActivationMarker::Versioned(version) => (version.is_some(), Some(version.clone())),
            ActivationMarker::Legacy(active) => (*active, None),
        };
        WorkflowSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            nodes: self.nodes.clone(),
            active,
            active_version_id,
            pin_data: self.pin_data.clone(),
        }
    }
}

impl From<WorkflowSnapshot> for Workflow {
    fn from(snapshot: WorkflowSnapshot) -> Self {
        let activation = match snapshot.active_version_id {
            Some(version) => ActivationMarker::Versioned(version),
            None => ActivationMarker::Legacy(snapshot.active),
        };
        Self {
            id: snapshot.id,
            name: snapshot.name,
            nodes: snapshot.nodes,
            pin_data: snapshot.pin_data,
            activation,
        }
    }
}

fn has_pinned_data(pin_data: &HashMap<String, Value>, node_name: &str) -> bool {
    pin_data.get(node_name).is_some_and(|data| !data.is_null())
}

// ---------------------------------------------------------------------------
// Repository query types
// ---------------------------------------------------------------------------

/// The currently published version of an active workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowVersion {
    pub version_id: String,
    pub nodes: Vec<Node>,
    pub pin_data: HashMap<String, Value>,
}

impl WorkflowVersion {
    pub fn has_pinned_data(&self, node_name: &str) -> bool {
        has_pinned_data(&self.pin_data, node_name)
    }
}

/// Workflow row returned by `WorkflowRepository::find`.
///
/// `active_version` is `None` when the workflow is not (yet) truly active.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSummary {
    pub id: WorkflowId,
    pub name: String,
    pub active_version: Option<WorkflowVersion>,
}

/// Filter for `WorkflowRepository::find`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowFilter {
    /// Restrict to these ids.
    pub ids: Option<Vec<WorkflowId>>,
    /// Only truly active workflows.
    pub active_only: bool,
    /// Exclude this id from the result.
    pub exclude_id: Option<WorkflowId>,
}

impl WorkflowFilter {
    /// All truly active workflows other than `id`.
    pub fn active_excluding(id: &str) -> Self {
        Self {
            ids: None,
            active_only: true,
            exclude_id: Some(id.to_string()),
        }
    }

    /// Exactly the given workflows.
    pub fn by_ids(ids: Vec<WorkflowId>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }

    /// Whether a workflow with this id and activity passes the filter.
    pub fn matches(&self, id: &str, is_active: bool) -> bool {
        if self.active_only && !is_active {
            return false;
        }
        if self.exclude_id.as_deref() == Some(id) {
            return false;
        }
        match &self.ids {
            Some(ids) => ids.iter().any(|candidate| candidate == id),
            None => true,
        }
    }
}
