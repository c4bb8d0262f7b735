//! Raw Sankey payloads as returned by the flow backend.
//!
//! The backend answers a Sankey query in one of two shapes:
//!
//! ```text
//! node-link:  { "nodes": ["A", "B"], "links": [{ "source": 0, "target": 1, "value": 10 }] }
//! rows:       { "rows": [["A", "B", "C"]], "values": [10] }
//! ```
//!
//! JSON keys are probed exactly once, in [`RawGraph::from_value`]; everything
//! downstream dispatches on the enum.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::coerce::probe;
use crate::format::plain_number;
use crate::normalize::NormalizeError;

/// Link fields that may carry the flow value, highest priority first.
pub const LINK_VALUE_FIELDS: [&str; 6] = ["value", "weight", "bytes", "count", "v", "xps"];

/// Top-level keys that may carry the per-row value array, highest priority first.
pub const ROW_VALUE_FIELDS: [&str; 4] = ["values", "weights", "v", "xps"];

/// One link of a node-link payload, before validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawLink {
    /// Source endpoint: an index into the node list or a node label.
    pub source: Option<Value>,
    /// Target endpoint: an index into the node list or a node label.
    pub target: Option<Value>,
    /// Every other field of the link object.
    pub fields: Map<String, Value>,
}

impl RawLink {
    /// Create a link between two endpoints with no value fields.
    pub fn new(source: impl Into<Value>, target: impl Into<Value>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            fields: Map::new(),
        }
    }

    /// Attach a field (typically one of [`LINK_VALUE_FIELDS`]).
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Shorthand for `with_field("value", value)`.
    pub fn with_value(self, value: impl Into<Value>) -> Self {
        self.with_field("value", value)
    }

    /// The raw value selected by [`LINK_VALUE_FIELDS`] priority, if any.
    pub fn raw_value(&self) -> Option<&Value> {
        probe(&self.fields, &LINK_VALUE_FIELDS)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => {
                let source = fields.remove("source");
                let target = fields.remove("target");
                Self { source, target, fields }
            }
            // Not an object: no endpoints, so the normalizer drops it.
            _ => Self::default(),
        }
    }
}

/// A raw Sankey payload in one of the two accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGraph {
    /// Variant A: explicit node labels plus links referencing them.
    NodeLink {
        /// Node labels in backend order.
        nodes: Vec<String>,
        /// Links, possibly duplicated, possibly out of range.
        links: Vec<RawLink>,
    },
    /// Variant B: one label path per row, with a parallel value array.
    Rows {
        /// Label paths through the queried dimensions.
        rows: Vec<Vec<String>>,
        /// One raw value per row; missing entries count as zero.
        values: Vec<Value>,
    },
}

impl RawGraph {
    /// Build a node-link payload.
    pub fn node_link(
        nodes: impl IntoIterator<Item = impl Into<String>>,
        links: Vec<RawLink>,
    ) -> Self {
        Self::NodeLink {
            nodes: nodes.into_iter().map(Into::into).collect(),
            links,
        }
    }

    /// Build a rows payload from label paths and numeric values.
    pub fn rows<R, L>(rows: impl IntoIterator<Item = R>, values: impl IntoIterator<Item = f64>) -> Self
    where
        R: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::Rows {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            values: values.into_iter().map(Value::from).collect(),
        }
    }

    /// Discriminate a decoded JSON payload.
    ///
    /// `nodes` + `links` selects the node-link shape, otherwise `rows` selects
    /// the rows shape. Neither yields [`NormalizeError::UnrecognizedFormat`].
    pub fn from_value(value: Value) -> Result<Self, NormalizeError> {
        let Value::Object(mut object) = value else {
            return Err(NormalizeError::NotAnObject);
        };

        if object.contains_key("nodes") && object.contains_key("links") {
            let nodes = take_array(&mut object, "nodes")?
                .iter()
                .map(label_of)
                .collect();
            let links = take_array(&mut object, "links")?
                .into_iter()
                .map(RawLink::from_value)
                .collect();
            return Ok(Self::NodeLink { nodes, links });
        }

        if object.contains_key("rows") {
            let rows = match object.remove("rows") {
                Some(Value::Array(rows)) => rows.into_iter().map(path_of).collect(),
                Some(Value::Null) | None => Vec::new(),
                Some(_) => {
                    return Err(NormalizeError::InvalidField {
                        field: "rows",
                        expected: "an array of label paths",
                    })
                }
            };
            let values = match probe(&object, &ROW_VALUE_FIELDS) {
                Some(Value::Array(values)) => values.clone(),
                _ => Vec::new(),
            };
            return Ok(Self::Rows { rows, values });
        }

        Err(NormalizeError::UnrecognizedFormat)
    }

    /// Parse and discriminate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, NormalizeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Short name of the payload shape, for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::NodeLink { .. } => "node_link",
            Self::Rows { .. } => "rows",
        }
    }
}

impl<'de> Deserialize<'de> for RawGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn take_array(object: &mut Map<String, Value>, field: &'static str) -> Result<Vec<Value>, NormalizeError> {
    match object.remove(field) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(NormalizeError::InvalidField {
            field,
            expected: "an array",
        }),
    }
}

/// Render a JSON scalar as a node label.
fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => n.as_f64().map_or_else(|| n.to_string(), plain_number),
        other => other.to_string(),
    }
}

/// A row that is not an array is kept as an empty path so row indices still
/// line up with the value array.
fn path_of(row: Value) -> Vec<String> {
    match row {
        Value::Array(labels) => labels.iter().map(label_of).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_link_discrimination() {
        let raw = RawGraph::from_value(json!({
            "nodes": ["A", "B"],
            "links": [{"source": 0, "target": 1, "weight": 5}],
            "meta": {"ignored": true}
        }))
        .unwrap();

        match raw {
            RawGraph::NodeLink { nodes, links } => {
                assert_eq!(nodes, vec!["A", "B"]);
                assert_eq!(links.len(), 1);
                assert_eq!(links[0].source, Some(json!(0)));
                assert_eq!(links[0].raw_value(), Some(&json!(5)));
            }
            other => panic!("expected node-link, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_discrimination_and_value_aliases() {
        let raw = RawGraph::from_value(json!({
            "rows": [["A", "B"], "not-a-row"],
            "values": null,
            "weights": [3, 4]
        }))
        .unwrap();

        assert_eq!(
            raw,
            RawGraph::Rows {
                rows: vec![vec!["A".to_string(), "B".to_string()], vec![]],
                values: vec![json!(3), json!(4)],
            }
        );
    }

    #[test]
    fn test_nodes_without_links_falls_through_to_rows() {
        let raw = RawGraph::from_value(json!({"nodes": ["A"], "rows": [["A", "B"]]})).unwrap();
        assert_eq!(raw.shape(), "rows");
    }

    #[test]
    fn test_unrecognized_format() {
        let err = RawGraph::from_value(json!({"edges": []})).unwrap_err();
        assert!(matches!(err, NormalizeError::UnrecognizedFormat));

        let err = RawGraph::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, NormalizeError::NotAnObject));
    }

    #[test]
    fn test_invalid_field_shapes() {
        let err = RawGraph::from_value(json!({"nodes": "A", "links": []})).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidField { field: "nodes", .. }));

        let err = RawGraph::from_value(json!({"rows": {"a": 1}})).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidField { field: "rows", .. }));
    }

    #[test]
    fn test_non_string_labels_are_stringified() {
        let raw = RawGraph::from_value(json!({"rows": [[65000, "B"], [1.0, 2.5, -0.0, true]]})).unwrap();
        match raw {
            RawGraph::Rows { rows, .. } => {
                assert_eq!(rows[0], vec!["65000", "B"]);
                assert_eq!(rows[1], vec!["1", "2.5", "0", "true"]);
            }
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_via_serde() {
        let raw: RawGraph = serde_json::from_str(r#"{"rows": [], "v": [1]}"#).unwrap();
        assert_eq!(raw, RawGraph::Rows { rows: vec![], values: vec![json!(1)] });

        let err = serde_json::from_str::<RawGraph>(r#"{"foo": 1}"#).unwrap_err();
        assert!(err.to_string().contains("Unrecognized"));
    }
}
