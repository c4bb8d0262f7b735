//! Canonical byte form of a Sankey graph for fingerprinting.
//!
//! ## Determinism Guarantees
//!
//! - Node order is kept: link indices are only meaningful against it
//! - Links are sorted by `(source, target)`, so emission order does not matter
//! - Values are encoded by bit pattern, with `-0.0` folded into `0.0`
//! - Every variable-length field is length-prefixed (little-endian `u64`)

use xxhash_rust::xxh64::xxh64;

use crate::types::CanonicalGraph;

/// Encode a graph into its canonical byte form.
pub fn graph_canonical_bytes(graph: &CanonicalGraph) -> Vec<u8> {
    let label_bytes: usize = graph.nodes.iter().map(|n| n.len() + 8).sum();
    let mut bytes = Vec::with_capacity(16 + label_bytes + graph.links.len() * 24);

    bytes.extend_from_slice(&(graph.nodes.len() as u64).to_le_bytes());
    for label in &graph.nodes {
        bytes.extend_from_slice(&(label.len() as u64).to_le_bytes());
        bytes.extend_from_slice(label.as_bytes());
    }

    let mut links: Vec<_> = graph.links.iter().collect();
    links.sort_by_key(|l| l.pair());

    bytes.extend_from_slice(&(links.len() as u64).to_le_bytes());
    for link in links {
        let value = if link.value == 0.0 { 0.0 } else { link.value };
        bytes.extend_from_slice(&(link.source as u64).to_le_bytes());
        bytes.extend_from_slice(&(link.target as u64).to_le_bytes());
        bytes.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    bytes
}

/// xxh64 of the canonical byte form.
pub fn graph_fingerprint(graph: &CanonicalGraph) -> u64 {
    xxh64(&graph_canonical_bytes(graph), 0)
}

/// xxh64 of the canonical byte form, as 16 lowercase hex digits.
pub fn graph_fingerprint_hex(graph: &CanonicalGraph) -> String {
    format!("{:016x}", graph_fingerprint(graph))
}
