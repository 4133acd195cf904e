//! Read-only node repository for one survey.

use std::collections::HashMap;

use super::SurveyNode;
use crate::domain::foundation::NodeId;

/// Immutable, ordered collection of a survey's nodes.
///
/// Nodes are kept in canonical `sort_order` order (stable, so declaration
/// order breaks ties). Duplicate ids keep the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: Vec<SurveyNode>,
    index: HashMap<NodeId, usize>,
}

impl NodeSet {
    pub fn new(nodes: Vec<SurveyNode>) -> Self {
        let mut nodes = nodes;
        nodes.sort_by_key(|n| n.sort_order);

        let mut kept = Vec::with_capacity(nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if index.contains_key(&node.id) {
                tracing::warn!(node_id = %node.id, "Ignoring duplicate survey node");
                continue;
            }
            index.insert(node.id.clone(), kept.len());
            kept.push(node);
        }

        Self { nodes: kept, index }
    }

    /// Returns the node the survey starts at.
    ///
    /// The parentless node wins (lowest `sort_order` if there are several);
    /// without one, the node with the lowest `sort_order` overall.
    pub fn root(&self) -> Option<&SurveyNode> {
        self.nodes
            .iter()
            .find(|n| n.parent_id.is_none())
            .or_else(|| self.nodes.first())
    }

    pub fn get(&self, id: &NodeId) -> Option<&SurveyNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates nodes in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &SurveyNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<SurveyNode> for NodeSet {
    fn from_iter<T: IntoIterator<Item = SurveyNode>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
