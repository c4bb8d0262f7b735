//! The canonical, deduplicated Sankey graph.

use serde::{Deserialize, Serialize};

use super::edge::Link;
use crate::canonical::graph_fingerprint_hex;

/// Deduplicated, index-referenced Sankey graph.
///
/// ## Invariants (when produced by the normalizer)
///
/// - `nodes` holds labels in first-seen order; that order defines the indices
/// - every link's `source` and `target` is `< nodes.len()`
/// - at most one link per ordered `(source, target)` pair
/// - links appear in the order their pair first received a contribution
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalGraph {
    /// Node labels.
    pub nodes: Vec<String>,
    /// Aggregated links.
    pub links: Vec<Link>,
}

impl CanonicalGraph {
    /// Create a graph from parts without validating them.
    pub fn new(nodes: Vec<String>, links: Vec<Link>) -> Self {
        Self { nodes, links }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Check if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Label of a node by index.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(String::as_str)
    }

    /// Find the link for an ordered pair.
    pub fn link(&self, source: usize, target: usize) -> Option<&Link> {
        self.links.iter().find(|l| l.pair() == (source, target))
    }

    /// Sum of all finite link values.
    pub fn total_value(&self) -> f64 {
        self.links.iter().map(Link::finite_value).sum()
    }

    /// Check that every link references an existing node.
    ///
    /// Always true for normalizer output; useful for graphs deserialized from
    /// elsewhere.
    pub fn has_valid_indices(&self) -> bool {
        let len = self.nodes.len();
        self.links.iter().all(|l| l.source < len && l.target < len)
    }

    /// The `n` heaviest links, value descending. Ties keep link order.
    pub fn top_links(&self, n: usize) -> Vec<&Link> {
        let mut sorted: Vec<&Link> = self.links.iter().collect();
        sorted.sort_by(|a, b| b.finite_value().total_cmp(&a.finite_value()));
        sorted.truncate(n);
        sorted
    }

    /// Stable content fingerprint (xxh64, hex).
    ///
    /// Independent of link order, sensitive to node order.
    pub fn fingerprint(&self) -> String {
        graph_fingerprint_hex(self)
    }
}
