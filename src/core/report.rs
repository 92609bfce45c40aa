//! Serializable description of a state tree.

use super::node::StateNode;
use serde::Serialize;

/// Snapshot of a node's wiring and active stack, for logging and debugging.
///
/// Reports describe a tree; they hold no callbacks and cannot rebuild one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeReport {
    pub label: String,
    /// Active stack labels, bottom first
    pub active_stack: Vec<String>,
    pub events: Vec<String>,
    pub conditions: usize,
    pub transitions_recorded: usize,
    pub children: Vec<(String, NodeReport)>,
}

impl NodeReport {
    /// Build a report for `node` and all of its descendants.
    pub fn of(node: &StateNode) -> Self {
        let children = node
            .child_names()
            .into_iter()
            .filter_map(|name| node.child(&name).map(|child| (name, NodeReport::of(&child))))
            .collect();

        Self {
            label: node.label().to_string(),
            active_stack: node.stack_labels(),
            events: node.event_ids(),
            conditions: node.condition_count(),
            transitions_recorded: node.history().len(),
            children,
        }
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Number of nodes in the reported tree.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|(_, child)| child.node_count())
            .sum::<usize>()
    }
}

impl StateNode {
    /// Describe this node and its subtree.
    pub fn report(&self) -> NodeReport {
        NodeReport::of(self)
    }
}
