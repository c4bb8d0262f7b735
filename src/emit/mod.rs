//! Graphviz DOT emission for canonical Sankey graphs.
//!
//! ## Output
//!
//! ```text
//! digraph Sankey {
//!   rankdir=LR;
//!   node [shape=box, style="rounded,filled", fillcolor="#eef5ff", fontname="Inter,Arial"];
//!   n0 [label="SrcAS: 15169: Google", fillcolor="#C7D2FE"];
//!   n1 [label="ExporterAddress: 10.0.0.1", fillcolor="#A7F3D0"];
//!   n0 -> n1 [label="1.50 Mbps", penwidth=6.18, color="#7c8ea3"];
//! }
//! ```
//!
//! Node identifiers are `n` followed by the node index, so they never depend on
//! label content. Labels only get their double quotes escaped.

pub mod options;
pub mod formatter;

pub use options::{DotOptions, RankDir, DEFAULT_LEVEL_COLORS, NEUTRAL_EDGE_COLOR};
pub use formatter::{DefaultValueFormatter, ValueFormatter};

use tracing::debug;

use crate::format::to_fixed;
use crate::levels::infer_levels;
use crate::types::CanonicalGraph;
use crate::DOT_GRAPH_NAME;

/// Render a graph as DOT using the default value formatter.
pub fn emit_dot(graph: &CanonicalGraph, options: &DotOptions) -> String {
    emit_dot_with(graph, options, &DefaultValueFormatter)
}

/// Render a graph as DOT with a custom value formatter.
///
/// Never fails: non-finite link values are treated as zero.
pub fn emit_dot_with(
    graph: &CanonicalGraph,
    options: &DotOptions,
    formatter: &dyn ValueFormatter,
) -> String {
    let levels = infer_levels(graph.nodes.as_slice(), options.level_order.as_deref());
    let level_of = |index: usize| levels.get(index).copied().flatten();

    let mut dot = format!("digraph {} {{\n", DOT_GRAPH_NAME);
    dot.push_str(&format!("  rankdir={};\n", options.rankdir));
    dot.push_str(&format!(
        "  node [shape=box, style=\"rounded,filled\", fillcolor=\"{}\", fontname=\"{}\"];\n",
        options.node_fill_default,
        escape_label(&options.fontname)
    ));

    for (index, label) in graph.nodes.iter().enumerate() {
        let fill = if options.color_nodes_by_level {
            options.color_for_level(level_of(index))
        } else {
            options.node_fill_default.as_str()
        };
        dot.push_str(&format!(
            "  {} [label=\"{}\", fillcolor=\"{}\"];\n",
            node_id(index),
            escape_label(label),
            fill
        ));
    }

    for link in &graph.links {
        let value = link.finite_value();
        let label = formatter.format_value(value, options.units.as_deref());
        let color = if options.color_edges_by_source_level {
            options.color_for_level(level_of(link.source))
        } else {
            NEUTRAL_EDGE_COLOR
        };
        dot.push_str(&format!(
            "  {} -> {} [label=\"{}\", penwidth={}, color=\"{}\"];\n",
            node_id(link.source),
            node_id(link.target),
            escape_label(&label),
            to_fixed(penwidth(value, options.penwidth_min, options.penwidth_scale), 2),
            color
        ));
    }

    dot.push_str("}\n");

    debug!(
        nodes = graph.node_count(),
        links = graph.link_count(),
        bytes = dot.len(),
        "emitted sankey dot"
    );

    dot
}

/// Graphviz identifier for a node index.
pub fn node_id(index: usize) -> String {
    format!("n{}", index)
}

/// Escape double quotes for a quoted DOT string. Nothing else is touched.
pub fn escape_label(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Edge stroke width: `max(min, log10(value + 1) * scale)`.
pub fn penwidth(value: f64, min: f64, scale: f64) -> f64 {
    min.max((value + 1.0).log10() * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Link;

    fn two_level_graph() -> CanonicalGraph {
        CanonicalGraph::new(
            vec!["SrcAS: 15169: Google".into(), "ExporterAddress: 10.0.0.1".into()],
            vec![Link::new(0, 1, 1_500_000.0)],
        )
    }

    #[test]
    fn test_preamble_and_closing() {
        let dot = emit_dot(&CanonicalGraph::default(), &DotOptions::default());
        assert_eq!(
            dot,
            "digraph Sankey {\n  rankdir=LR;\n  node [shape=box, style=\"rounded,filled\", \
             fillcolor=\"#eef5ff\", fontname=\"Inter,Arial\"];\n}\n"
        );
    }

    #[test]
    fn test_nodes_colored_by_inferred_level() {
        let dot = emit_dot(&two_level_graph(), &DotOptions::default());
        assert!(dot.contains("  n0 [label=\"SrcAS: 15169: Google\", fillcolor=\"#C7D2FE\"];\n"));
        assert!(dot.contains("  n1 [label=\"ExporterAddress: 10.0.0.1\", fillcolor=\"#A7F3D0\"];\n"));
    }

    #[test]
    fn test_node_coloring_can_be_disabled() {
        let mut options = DotOptions::default();
        options.color_nodes_by_level = false;

        let dot = emit_dot(&two_level_graph(), &options);
        assert!(dot.contains("n0 [label=\"SrcAS: 15169: Google\", fillcolor=\"#eef5ff\"]"));
    }

    #[test]
    fn test_edge_statement() {
        let options = DotOptions::default().with_units("l3bps");
        let dot = emit_dot(&two_level_graph(), &options);
        assert!(dot.contains("  n0 -> n1 [label=\"1.50 Mbps\", penwidth=6.18, color=\"#7c8ea3\"];\n"));
    }

    #[test]
    fn test_edges_colored_by_source_level() {
        let options = DotOptions::default()
            .with_level_order(["ExporterAddress", "SrcAS"])
            .with_edges_colored_by_source(true);

        let dot = emit_dot(&two_level_graph(), &options);
        assert!(dot.contains("n0 [label=\"SrcAS: 15169: Google\", fillcolor=\"#A7F3D0\"]"));
        assert!(dot.contains("n0 -> n1 [label=\"1500000\", penwidth=6.18, color=\"#A7F3D0\"]"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let graph = CanonicalGraph::new(
            vec!["Iface: \"uplink\"".into(), "B".into()],
            vec![Link::new(0, 1, 1.0)],
        );
        let formatter = |_: f64, _: Option<&str>| "say \"hi\"".to_string();

        let dot = emit_dot_with(&graph, &DotOptions::default(), &formatter);
        assert!(dot.contains("label=\"Iface: \\\"uplink\\\"\""));
        assert!(dot.contains("label=\"say \\\"hi\\\"\""));
        assert!(!dot.contains("label=\"Iface: \"uplink"));
    }

    #[test]
    fn test_non_finite_values_render_as_zero() {
        let graph = CanonicalGraph::new(
            vec!["A".into(), "B".into()],
            vec![Link::new(0, 1, f64::NAN)],
        );
        let dot = emit_dot(&graph, &DotOptions::default().with_units("bps"));
        assert!(dot.contains("n0 -> n1 [label=\"0 bps\", penwidth=1.00, color=\"#7c8ea3\"]"));
    }

    #[test]
    fn test_tied_label_and_penwidth_round_up() {
        let graph = CanonicalGraph::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![Link::new(0, 1, 1152.0), Link::new(1, 2, -0.0)],
        );
        let bytes = emit_dot(&graph, &DotOptions::default().with_units("bytes"));
        assert!(bytes.contains("n0 -> n1 [label=\"1.13 KB\", penwidth=3.06,"));

        let plain = emit_dot(&graph, &DotOptions::default().with_penwidth(1.125, 1.0));
        assert!(plain.contains("n1 -> n2 [label=\"0\", penwidth=1.13,"));
    }

    #[test]
    fn test_penwidth() {
        assert_eq!(penwidth(0.0, 1.0, 1.0), 1.0);
        assert_eq!(penwidth(99.0, 1.0, 1.0), 2.0);
        assert_eq!(penwidth(99.0, 1.0, 2.0), 4.0);
        assert_eq!(penwidth(9.0, 3.0, 1.0), 3.0);
    }

    #[test]
    fn test_rankdir_and_fontname() {
        let mut options = DotOptions::default().with_rankdir(RankDir::TB);
        options.fontname = "My \"Font\"".into();

        let dot = emit_dot(&CanonicalGraph::default(), &options);
        assert!(dot.contains("  rankdir=TB;\n"));
        assert!(dot.contains("fontname=\"My \\\"Font\\\"\""));
    }

    #[test]
    fn test_determinism() {
        let options = DotOptions::default().with_units("bytes").with_penwidth(1.0, 1.2);
        let graph = two_level_graph();
        assert_eq!(emit_dot(&graph, &options), emit_dot(&graph, &options));
    }
}
