//! # flow-sankey
//!
//! Sankey normalization and level-aware Graphviz emission for network-flow
//! telemetry.
//!
//! Flow backends answer Sankey queries with loosely typed payloads in two
//! incompatible shapes. This crate turns either shape into one canonical graph
//! and renders it as styled DOT.
//!
//! ## Architecture
//!
//! ```text
//! JSON payload → RawGraph → normalize → CanonicalGraph → emit_dot → DOT text
//!                                             ↓
//!                                        infer_levels (label prefixes → colors)
//! ```
//!
//! ## Guarantees
//!
//! - Every link of a [`CanonicalGraph`] references an existing node
//! - At most one link per ordered `(source, target)` pair; duplicates are summed
//! - Malformed numbers become zero; unresolvable links are dropped, never errors
//! - Same graph + same options → byte-identical DOT
//!
//! ## Example
//!
//! ```rust
//! use flow_sankey::{emit_dot, normalize_json_str, DotOptions};
//!
//! let graph = normalize_json_str(r#"{"rows": [["SrcAS: 15169", "DstAS: 13335"]], "values": [2500]}"#)?;
//! let dot = emit_dot(&graph, &DotOptions::default().with_units("bps"));
//!
//! assert!(dot.contains(r#"n0 -> n1 [label="2.50 Kbps""#));
//! # Ok::<(), flow_sankey::NormalizeError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod coerce;
pub mod normalize;
pub mod levels;
pub mod format;
pub mod emit;
pub mod canonical;
pub mod query;

// Re-exports
pub use types::{CanonicalGraph, Link, RawGraph, RawLink, LINK_VALUE_FIELDS, ROW_VALUE_FIELDS};
pub use normalize::{
    normalize, normalize_with_report, normalize_value, normalize_json_str,
    NormalizeError, NormalizeReport, Normalized,
};
pub use levels::{infer_levels, label_prefix};
pub use format::{fmt_bps, fmt_bytes, fmt_packets, fmt_pps, plain_number, to_fixed, UnitLadder, MISSING};
pub use emit::{
    emit_dot, emit_dot_with, escape_label, penwidth,
    DefaultValueFormatter, DotOptions, RankDir, ValueFormatter,
};
pub use canonical::{graph_canonical_bytes, graph_fingerprint, graph_fingerprint_hex};
pub use query::{Dimension, FlowQuery, LimitType, QueryBuilder, Units};

/// Graph name used in emitted DOT.
pub const DOT_GRAPH_NAME: &str = "Sankey";
