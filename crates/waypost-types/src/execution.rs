//! Stored execution types.
//!
//! An execution is created by the engine when a trigger fires. It pauses in
//! the `waiting` status when it reaches a wait or human-in-the-loop node and
//! is resumed by an incoming waiting-webhook call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflow::{Node, WorkflowSnapshot};

/// Identifier of a stored execution.
pub type ExecutionId = String;

// ---------------------------------------------------------------------------
// Status / mode
// ---------------------------------------------------------------------------

/// Lifecycle status of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    New,
    Running,
    Waiting,
    Success,
    Error,
    Crashed,
    Canceled,
}

impl ExecutionStatus {
    /// Whether the execution has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Success
                | ExecutionStatus::Error
                | ExecutionStatus::Crashed
                | ExecutionStatus::Canceled
        )
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExecutionStatus::New => "new",
            ExecutionStatus::Running => "running",
            ExecutionStatus::Waiting => "waiting",
            ExecutionStatus::Success => "success",
            ExecutionStatus::Error => "error",
            ExecutionStatus::Crashed => "crashed",
            ExecutionStatus::Canceled => "canceled",
        };
        write!(f, "{s}")
    }
}

/// How the execution was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Manual,
    #[default]
    Trigger,
    Webhook,
    Retry,
    Internal,
}

// ---------------------------------------------------------------------------
// Run data
// ---------------------------------------------------------------------------

/// Where a node's input came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceData {
    pub previous_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_node_output: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_node_run: Option<u32>,
}

/// Record of a single run attempt of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDataEntry {
    pub start_time: i64,
    pub execution_time: i64,
    #[serde(default)]
    pub execution_index: u32,
    #[serde(default)]
    pub source: Vec<Option<SourceData>>,
    /// Input frozen for this attempt; replayed verbatim on resumption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_override: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RunDataEntry {
    /// Zero-timed entry that carries a frozen input into a resumed run.
    pub fn placeholder(source: Vec<Option<SourceData>>, execution_index: u32, input_override: Value) -> Self {
        Self {
            start_time: 0,
            execution_time: 0,
            execution_index,
            source,
            input_override: Some(input_override),
            data: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Execution data
// ---------------------------------------------------------------------------

/// A node queued for execution, with the input it will receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteData {
    pub node: Node,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

/// Engine-side stack state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStack {
    #[serde(default)]
    pub node_execution_stack: Vec<ExecuteData>,
}

/// Results recorded so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultData {
    #[serde(default)]
    pub run_data: HashMap<String, Vec<RunDataEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_node_executed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// Full run state of an execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionData {
    #[serde(default)]
    pub result_data: ResultData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_data: Option<ExecutionStack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_till: Option<DateTime<Utc>>,
    /// Set by nodes that issued a signed resume URL; the token must then be
    /// presented on resumption.
    #[serde(default)]
    pub validate_signature: bool,
}

/// A stored execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub id: ExecutionId,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub mode: ExecutionMode,
    pub workflow_data: WorkflowSnapshot,
    #[serde(default)]
    pub data: ExecutionData,
}

impl Execution {
    /// Whether the execution is paused and may be resumed.
    pub fn is_waiting(&self) -> bool {
        self.status == ExecutionStatus::Waiting && !self.finished
    }
}
