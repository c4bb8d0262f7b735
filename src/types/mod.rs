//! Core types for Sankey normalization.

pub mod raw;
pub mod edge;
pub mod graph;

pub use raw::{RawGraph, RawLink, LINK_VALUE_FIELDS, ROW_VALUE_FIELDS};
pub use edge::Link;
pub use graph::CanonicalGraph;
