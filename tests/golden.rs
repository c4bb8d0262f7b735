//! Golden tests for Sankey normalization and DOT emission.
//!
//! These tests pin the exact DOT text and the canonical graphs produced from
//! realistic backend payloads.

use flow_sankey::{
    emit_dot, emit_dot_with, fmt_bps, infer_levels, label_prefix, normalize, normalize_json_str,
    normalize_with_report, CanonicalGraph, DotOptions, Link, NormalizeError, RawGraph, RawLink,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

const ROWS_PAYLOAD: &str = r#"{
    "rows": [
        ["SrcAS: 15169: Google", "ExporterAddress: 10.0.0.1"],
        ["SrcAS: 13335: Cloudflare", "ExporterAddress: 10.0.0.1"]
    ],
    "values": [1500000, 250],
    "meta": {"units": "l3bps"}
}"#;

fn console_theme() -> DotOptions {
    DotOptions::default()
        .with_units("l3bps")
        .with_level_order(["SrcAS", "ExporterAddress"])
        .with_edges_colored_by_source(true)
        .with_penwidth(1.0, 1.2)
}

fn sorted_links(graph: &CanonicalGraph) -> Vec<(String, String, f64)> {
    let mut links: Vec<_> = graph
        .links
        .iter()
        .map(|l| {
            (
                graph.nodes[l.source].clone(),
                graph.nodes[l.target].clone(),
                l.value,
            )
        })
        .collect();
    links.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
    links
}

// ─────────────────────────────────────────────────────────────────────────────
// GOLDEN OUTPUT
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_golden_console_theme() {
    let graph = normalize_json_str(ROWS_PAYLOAD).unwrap();
    let dot = emit_dot(&graph, &console_theme());

    let expected = "\
digraph Sankey {
  rankdir=LR;
  node [shape=box, style=\"rounded,filled\", fillcolor=\"#eef5ff\", fontname=\"Inter,Arial\"];
  n0 [label=\"SrcAS: 15169: Google\", fillcolor=\"#C7D2FE\"];
  n1 [label=\"ExporterAddress: 10.0.0.1\", fillcolor=\"#A7F3D0\"];
  n2 [label=\"SrcAS: 13335: Cloudflare\", fillcolor=\"#C7D2FE\"];
  n0 -> n1 [label=\"1.50 Mbps\", penwidth=7.41, color=\"#C7D2FE\"];
  n2 -> n1 [label=\"250 bps\", penwidth=2.88, color=\"#C7D2FE\"];
}
";
    assert_eq!(dot, expected);
}

#[test]
fn test_golden_defaults_with_unleveled_node() {
    let graph = CanonicalGraph::new(
        vec!["Proto: TCP".into(), "other".into()],
        vec![Link::new(0, 1, 9.0)],
    );
    let dot = emit_dot(&graph, &DotOptions::default());

    let expected = "\
digraph Sankey {
  rankdir=LR;
  node [shape=box, style=\"rounded,filled\", fillcolor=\"#eef5ff\", fontname=\"Inter,Arial\"];
  n0 [label=\"Proto: TCP\", fillcolor=\"#C7D2FE\"];
  n1 [label=\"other\", fillcolor=\"#eef5ff\"];
  n0 -> n1 [label=\"9\", penwidth=1.00, color=\"#7c8ea3\"];
}
";
    assert_eq!(dot, expected);
}

#[test]
fn test_custom_formatter_is_used_for_labels() {
    let graph = normalize_json_str(ROWS_PAYLOAD).unwrap();
    let formatter = |value: f64, units: Option<&str>| format!("{:.0} {}", value / 1000.0, units.unwrap_or(""));

    let dot = emit_dot_with(&graph, &console_theme(), &formatter);
    assert!(dot.contains("n0 -> n1 [label=\"1500 l3bps\""));
    assert!(dot.contains("n2 -> n1 [label=\"0 l3bps\""));
}

// ─────────────────────────────────────────────────────────────────────────────
// DETERMINISM TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_emission_is_byte_identical_100_runs() {
    let graph = normalize_json_str(ROWS_PAYLOAD).unwrap();
    let options = console_theme();

    let first = emit_dot(&graph, &options);
    for run in 1..100 {
        assert_eq!(
            first,
            emit_dot(&graph, &options),
            "DOT must be deterministic (run {} differs from run 0)",
            run
        );
    }
}

#[test]
fn test_normalization_fingerprint_is_stable() {
    let a = normalize_json_str(ROWS_PAYLOAD).unwrap();
    let b = normalize_json_str(ROWS_PAYLOAD).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

// ─────────────────────────────────────────────────────────────────────────────
// CORRECTNESS TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_aggregation_sums_duplicate_pairs() {
    let graph = normalize_json_str(
        r#"{"nodes": ["A", "B"], "links": [
            {"source": 0, "target": 1, "value": 3},
            {"source": 0, "target": 1, "value": 4}
        ]}"#,
    )
    .unwrap();

    assert_eq!(graph.links, vec![Link::new(0, 1, 7.0)]);
}

#[test]
fn test_rows_and_node_link_are_equivalent() {
    let rows = normalize(&RawGraph::rows(vec![vec!["A", "B", "C"]], vec![10.0]));
    let node_link = normalize(&RawGraph::node_link(
        ["A", "B", "C"],
        vec![
            RawLink::new(0, 1).with_value(10),
            RawLink::new(1, 2).with_value(10),
        ],
    ));

    let mut rows_nodes = rows.nodes.clone();
    let mut node_link_nodes = node_link.nodes.clone();
    rows_nodes.sort();
    node_link_nodes.sort();

    assert_eq!(rows_nodes, node_link_nodes);
    assert_eq!(sorted_links(&rows), sorted_links(&node_link));
}

#[test]
fn test_out_of_range_source_is_dropped_silently() {
    let normalized = normalize_with_report(&RawGraph::node_link(
        ["A", "B", "C"],
        vec![RawLink::new(5, 1).with_value(100)],
    ));

    assert!(normalized.graph.links.is_empty());
    assert_eq!(normalized.report.dropped_links, 1);
}

#[test]
fn test_unrecognized_payload_is_an_error() {
    let err = normalize_json_str(r#"{"series": []}"#).unwrap_err();
    assert!(matches!(err, NormalizeError::UnrecognizedFormat));
}

#[test]
fn test_level_prefixes_and_explicit_order() {
    assert_eq!(label_prefix("SrcAS: 15169: Google"), "SrcAS");
    assert_eq!(label_prefix("NoColonLabel"), "");

    let nodes = ["SrcAS: 15169", "ExporterAddress: 10.0.0.1", "Unknown: ?"];
    let order = vec!["SrcAS".to_string(), "ExporterAddress".to_string()];
    assert_eq!(
        infer_levels(&nodes, Some(order.as_slice())),
        vec![Some(0), Some(1), Some(2)]
    );
}

#[test]
fn test_formatter_boundaries() {
    assert_eq!(fmt_bps(Some(999.0)), "999 bps");
    assert_eq!(fmt_bps(Some(1000.0)), "1.00 Kbps");
    assert_eq!(fmt_bps(None), "-");
    assert_eq!(fmt_bps(Some(2.5)), "3 bps");
}

#[test]
fn test_quote_in_label_is_escaped() {
    let graph = normalize(&RawGraph::rows(
        vec![vec!["InIfDescription: \"core\" uplink", "OutIfName: et-0/0/1"]],
        vec![1.0],
    ));
    let dot = emit_dot(&graph, &DotOptions::default());

    assert!(dot.contains(r#"n0 [label="InIfDescription: \"core\" uplink""#));
    assert!(!dot.contains(r#"label="InIfDescription: "core"#));
}
