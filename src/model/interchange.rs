// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! JSON import and export of a map's node array.
//!
//! The interchange format is the bare node array, the same shape a map is
//! archived in. Import is strict about things that cannot be repaired
//! without guessing (duplicate ids, parent cycles) and lenient about the
//! rest: missing optional fields take their defaults and a parent that is
//! not in the file turns its child into a root.

use super::node::Node;
use super::node_id::NodeId;
use std::collections::{HashMap, HashSet};

/// Why an imported document was refused
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of nodes")]
    NotNodeArray,

    #[error("the node array is empty")]
    Empty,

    #[error("node id {0} appears more than once")]
    DuplicateId(NodeId),

    #[error("node {0} is its own ancestor")]
    Cycle(NodeId),
}

/// Parse an exported node array
pub fn import_nodes(json: &str) -> Result<Vec<Node>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let items = value.as_array().ok_or(ImportError::NotNodeArray)?;
    if items.is_empty() {
        return Err(ImportError::Empty);
    }
    let mut nodes: Vec<Node> = serde_json::from_value(value)?;

    let mut seen = HashSet::with_capacity(nodes.len());
    for node in &nodes {
        if !seen.insert(node.id.clone()) {
            return Err(ImportError::DuplicateId(node.id.clone()));
        }
    }

    for node in &mut nodes {
        if node.parent_id.as_ref().is_some_and(|p| !seen.contains(p)) {
            tracing::warn!("Imported node {} has a missing parent, making it a root", node.id);
            node.parent_id = None;
        }
    }

    if let Some(id) = find_cycle(&nodes) {
        return Err(ImportError::Cycle(id));
    }

    tracing::debug!("Imported {} nodes", nodes.len());
    Ok(nodes)
}

/// First node whose parent chain loops back on itself
fn find_cycle(nodes: &[Node]) -> Option<NodeId> {
    let parents: HashMap<&NodeId, &NodeId> = nodes
        .iter()
        .filter_map(|n| n.parent_id.as_ref().map(|p| (&n.id, p)))
        .collect();

    for node in nodes {
        let mut current = &node.id;
        // A chain longer than the node count must repeat
        for _ in 0..nodes.len() {
            match parents.get(current) {
                Some(parent) if **parent == node.id => return Some(node.id.clone()),
                Some(parent) => current = parent,
                None => break,
            }
        }
    }
    None
}

/// Serialize a node array for export
pub fn export_nodes(nodes: &[Node]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(nodes)
}

/// Suggested file name for an export: the first root's text with anything
/// outside letters, digits and CJK replaced by `_`
pub fn export_file_name(nodes: &[Node]) -> String {
    let stem: String = match nodes.iter().find(|n| n.is_root()) {
        Some(root) if !root.text.is_empty() => root
            .text
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || ('\u{3040}'..='\u{9FFF}').contains(&c) {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
        _ => "mindmap".to_string(),
    };
    format!("{stem}.json")
}
