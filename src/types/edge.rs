//! Aggregated links of a canonical Sankey graph.

use serde::{Deserialize, Serialize};

/// A directed, aggregated flow between two nodes.
///
/// `source` and `target` index into [`CanonicalGraph::nodes`](super::CanonicalGraph).
/// A canonical graph holds at most one `Link` per ordered `(source, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Index of the source node.
    pub source: usize,
    /// Index of the target node.
    pub target: usize,
    /// Sum of every contribution to this pair.
    pub value: f64,
}

impl Link {
    /// Create a new link.
    pub fn new(source: usize, target: usize, value: f64) -> Self {
        Self { source, target, value }
    }

    /// The ordered endpoint pair that identifies this link.
    pub fn pair(&self) -> (usize, usize) {
        (self.source, self.target)
    }

    /// The value with non-finite numbers replaced by zero.
    pub fn finite_value(&self) -> f64 {
        if self.value.is_finite() {
            self.value
        } else {
            0.0
        }
    }
}
