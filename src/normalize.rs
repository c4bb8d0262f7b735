//! Sankey normalizer.
//!
//! Turns a [`RawGraph`] of either shape into a [`CanonicalGraph`]: labels are
//! interned once, duplicate `(source, target)` pairs are summed, and links whose
//! endpoints cannot be resolved are dropped rather than reported as errors.
//!
//! ## Algorithm (node-link)
//!
//! 1. Seed the node list with the payload's labels (duplicates stay distinct)
//! 2. For each link, probe the value fields, then resolve endpoints:
//!    - two label strings: look up or append each label
//!    - anything else: coerce to integers, drop if out of range
//! 3. Sum values per ordered pair
//!
//! ## Algorithm (rows)
//!
//! 1. Walk each path's consecutive label pairs, interning labels on first sight
//! 2. Add the row's value once per hop
//!
//! Working maps live for one call only.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::coerce::{to_number, to_number_or};
use crate::types::{CanonicalGraph, Link, RawGraph, RawLink};

/// Error type for payload discrimination.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// Neither `nodes` + `links` nor `rows` is present.
    #[error("Unrecognized Sankey format: expected `nodes` + `links` or `rows`")]
    UnrecognizedFormat,
    /// The payload is not a JSON object.
    #[error("Sankey payload must be a JSON object")]
    NotAnObject,
    /// A discriminating key holds the wrong kind of value.
    #[error("Invalid Sankey field `{field}`: expected {expected}")]
    InvalidField {
        /// Offending key.
        field: &'static str,
        /// What the key should hold.
        expected: &'static str,
    },
    /// The payload is not valid JSON.
    #[error("Invalid Sankey JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Diagnostic counts from one normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Node-link links dropped for unresolvable endpoints.
    pub dropped_links: usize,
    /// Labels appended while resolving links or walking rows.
    pub interned_nodes: usize,
    /// Rows shorter than two labels.
    pub skipped_rows: usize,
}

/// A canonical graph together with its [`NormalizeReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// The canonical graph.
    pub graph: CanonicalGraph,
    /// Diagnostic counts.
    pub report: NormalizeReport,
}

/// Normalize a raw payload into a canonical graph.
pub fn normalize(raw: &RawGraph) -> CanonicalGraph {
    normalize_with_report(raw).graph
}

/// Normalize a raw payload, keeping diagnostic counts.
pub fn normalize_with_report(raw: &RawGraph) -> Normalized {
    let normalized = match raw {
        RawGraph::NodeLink { nodes, links } => normalize_node_link(nodes, links),
        RawGraph::Rows { rows, values } => normalize_rows(rows, values),
    };

    debug!(
        shape = raw.shape(),
        nodes = normalized.graph.node_count(),
        links = normalized.graph.link_count(),
        dropped_links = normalized.report.dropped_links,
        interned_nodes = normalized.report.interned_nodes,
        skipped_rows = normalized.report.skipped_rows,
        "normalized sankey payload"
    );

    normalized
}

/// Discriminate and normalize a decoded JSON payload.
pub fn normalize_value(value: Value) -> Result<CanonicalGraph, NormalizeError> {
    Ok(normalize(&RawGraph::from_value(value)?))
}

/// Parse, discriminate and normalize a JSON document.
pub fn normalize_json_str(json: &str) -> Result<CanonicalGraph, NormalizeError> {
    Ok(normalize(&RawGraph::from_json_str(json)?))
}

fn normalize_node_link(nodes: &[String], links: &[RawLink]) -> Normalized {
    let mut interner = NodeInterner::seeded(nodes);
    let mut totals = PairTotals::default();
    let mut report = NormalizeReport::default();

    for link in links {
        let value = to_number_or(link.raw_value(), 0.0);

        let pair = match (&link.source, &link.target) {
            (Some(Value::String(source)), Some(Value::String(target))) => {
                let source = interner.intern(source);
                let target = interner.intern(target);
                Some((source, target))
            }
            (source, target) => {
                let len = interner.len();
                endpoint_index(source.as_ref(), len).zip(endpoint_index(target.as_ref(), len))
            }
        };

        match pair {
            Some((source, target)) => totals.add(source, target, value),
            None => report.dropped_links += 1,
        }
    }

    report.interned_nodes = interner.len() - nodes.len();

    Normalized {
        graph: CanonicalGraph::new(interner.into_nodes(), totals.into_links()),
        report,
    }
}

fn normalize_rows(rows: &[Vec<String>], values: &[Value]) -> Normalized {
    let mut interner = NodeInterner::default();
    let mut totals = PairTotals::default();
    let mut report = NormalizeReport::default();

    for (i, path) in rows.iter().enumerate() {
        if path.len() < 2 {
            report.skipped_rows += 1;
            continue;
        }

        let value = to_number_or(values.get(i), 0.0);
        for hop in path.windows(2) {
            let source = interner.intern(&hop[0]);
            let target = interner.intern(&hop[1]);
            totals.add(source, target, value);
        }
    }

    report.interned_nodes = interner.len();

    Normalized {
        graph: CanonicalGraph::new(interner.into_nodes(), totals.into_links()),
        report,
    }
}

/// Resolve a numeric endpoint against the current node count.
fn endpoint_index(raw: Option<&Value>, node_count: usize) -> Option<usize> {
    let index = raw.map_or(-1.0, |v| to_number(v, -1.0));
    if index.fract() != 0.0 || index < 0.0 || index >= node_count as f64 {
        return None;
    }
    Some(index as usize)
}

/// Growing label → index map, local to one normalization.
#[derive(Debug, Default)]
struct NodeInterner {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
}

impl NodeInterner {
    /// Seed with existing labels. A duplicated label resolves to its first index.
    fn seeded(nodes: &[String]) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, label) in nodes.iter().enumerate() {
            index.entry(label.clone()).or_insert(i);
        }
        Self {
            nodes: nodes.to_vec(),
            index,
        }
    }

    fn intern(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(label.to_string());
        self.index.insert(label.to_string(), i);
        i
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn into_nodes(self) -> Vec<String> {
        self.nodes
    }
}

/// Running totals per ordered pair, in first-contribution order.
#[derive(Debug, Default)]
struct PairTotals {
    position: HashMap<(usize, usize), usize>,
    links: Vec<Link>,
}

impl PairTotals {
    fn add(&mut self, source: usize, target: usize, value: f64) {
        match self.position.get(&(source, target)) {
            Some(&at) => self.links[at].value += value,
            None => {
                self.position.insert((source, target), self.links.len());
                self.links.push(Link::new(source, target, value));
            }
        }
    }

    fn into_links(self) -> Vec<Link> {
        self.links
    }
}
