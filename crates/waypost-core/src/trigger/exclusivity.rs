//! Exclusive resource keys for trigger nodes.
//!
//! Some trigger types subscribe to an external resource that only one
//! consumer may own (a consumer group on a topic, for example). The
//! [`ExclusivityRegistry`] maps each such node type to a function that pulls
//! the identifying parameters out of a node. Types without an extractor are
//! not exclusivity-checked.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use waypost_types::workflow::Node;

/// Node type of the consumer-group/topic trigger.
pub const KAFKA_TRIGGER_NODE_TYPE: &str = "waypost.kafkaTrigger";

/// Ordered `(parameter, value)` tuple identifying an exclusive resource.
///
/// Two keys are equal only when every field is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExclusiveResourceKey {
    fields: Vec<(String, String)>,
}

impl ExclusiveResourceKey {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

impl fmt::Display for ExclusiveResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        f.write_str(&rendered.join(", "))
    }
}

/// Pulls the exclusive resource key out of a node, or `None` when the node
/// is not fully configured.
pub type KeyExtractor = Arc<dyn Fn(&Node) -> Option<ExclusiveResourceKey> + Send + Sync>;

/// Build an extractor that reads the given parameter paths in order.
///
/// Strings are taken verbatim; numbers and booleans are rendered. A missing,
/// empty, or structured value makes the whole key unavailable.
pub fn parameter_key(paths: &[&str]) -> KeyExtractor {
    let paths: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
    Arc::new(move |node: &Node| {
        let mut fields = Vec::with_capacity(paths.len());
        for path in &paths {
            let value = match node.parameter(path)? {
                Value::String(s) if !s.is_empty() => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            fields.push((path.clone(), value));
        }
        Some(ExclusiveResourceKey::new(fields))
    })
}

/// Registry of exclusivity-checked trigger types.
#[derive(Clone, Default)]
pub struct ExclusivityRegistry {
    extractors: HashMap<String, KeyExtractor>,
}

impl ExclusivityRegistry {
    /// An empty registry: no node type is exclusivity-checked.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in registrations.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(KAFKA_TRIGGER_NODE_TYPE, parameter_key(&["groupId", "topic"]));
        registry
    }

    /// Register (or replace) the extractor for a node type.
    pub fn register(&mut self, node_type: &str, extractor: KeyExtractor) {
        self.extractors.insert(node_type.to_string(), extractor);
    }

    pub fn is_checked(&self, node_type: &str) -> bool {
        self.extractors.contains_key(node_type)
    }

    /// Extract the key for a node, `None` for unchecked types or incomplete
    /// parameters.
    pub fn extract_key(&self, node: &Node) -> Option<ExclusiveResourceKey> {
        self.extractors.get(&node.node_type).and_then(|extract| extract(node))
    }

    pub fn checked_types(&self) -> impl Iterator<Item = &str> {
        self.extractors.keys().map(String::as_str)
    }
}

impl fmt::Debug for ExclusivityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.checked_types().collect();
        types.sort_unstable();
        f.debug_struct("ExclusivityRegistry")
            .field("checked_types", &types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kafka(group: &str, topic: &str) -> Node {
        Node::new("Kafka Trigger", KAFKA_TRIGGER_NODE_TYPE)
            .with_parameter("groupId", group)
            .with_parameter("topic", topic)
    }

    #[test]
    fn defaults_register_kafka_trigger() {
        let registry = ExclusivityRegistry::with_defaults();
        assert!(registry.is_checked(KAFKA_TRIGGER_NODE_TYPE));
        assert!(!registry.is_checked("waypost.webhook"));
    }

    #[test]
    fn identical_parameters_give_equal_keys() {
        let registry = ExclusivityRegistry::with_defaults();
        let a = registry.extract_key(&kafka("billing", "orders")).unwrap();
        let b = registry.extract_key(&kafka("billing", "orders")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "groupId=billing, topic=orders");
    }

    #[test]
    fn one_differing_field_gives_different_keys() {
        let registry = ExclusivityRegistry::with_defaults();
        let a = registry.extract_key(&kafka("billing", "orders")).unwrap();
        let b = registry.extract_key(&kafka("billing", "refunds")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn missing_or_empty_parameter_yields_no_key() {
        let registry = ExclusivityRegistry::with_defaults();
        let node = Node::new("Kafka", KAFKA_TRIGGER_NODE_TYPE).with_parameter("topic", "orders");
        assert!(registry.extract_key(&node).is_none());
        assert!(registry.extract_key(&kafka("", "orders")).is_none());
    }

    #[test]
    fn unchecked_type_yields_no_key() {
        let registry = ExclusivityRegistry::with_defaults();
        let node = Node::new("Hook", "waypost.webhook").with_parameter("groupId", "g");
        assert!(registry.extract_key(&node).is_none());
    }

    #[test]
    fn custom_extractor_reads_nested_and_numeric_parameters() {
        let mut registry = ExclusivityRegistry::new();
        registry.register("acme.queueTrigger", parameter_key(&["queue", "options.partition"]));
        let node = Node::new("Queue", "acme.queueTrigger")
            .with_parameter("queue", "jobs")
            .with_parameter("options", serde_json::json!({"partition": 3}));
        let key = registry.extract_key(&node).unwrap();
        assert_eq!(key.to_string(), "queue=jobs, options.partition=3");
    }
}
