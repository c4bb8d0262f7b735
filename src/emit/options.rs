//! Styling options for DOT emission.
//!
//! Options deserialize from the same camelCase keys the web console uses, so a
//! theme file like the following can be loaded directly:
//!
//! ```json
//! { "units": "l3bps", "levelOrder": ["SrcAS", "ExporterAddress"], "penwidthScale": 1.2 }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default per-level fill palette. Cycled when there are more levels.
pub const DEFAULT_LEVEL_COLORS: [&str; 6] = [
    "#C7D2FE", "#A7F3D0", "#FDE68A", "#FCA5A5", "#D8B4FE", "#93C5FD",
];

/// Default node fill.
pub const DEFAULT_NODE_FILL: &str = "#eef5ff";

/// Default node font.
pub const DEFAULT_FONTNAME: &str = "Inter,Arial";

/// Edge color when edges are not colored by level.
pub const NEUTRAL_EDGE_COLOR: &str = "#7c8ea3";

/// Graphviz layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RankDir {
    /// Left to right.
    #[default]
    LR,
    /// Right to left.
    RL,
    /// Top to bottom.
    TB,
    /// Bottom to top.
    BT,
}

impl RankDir {
    /// The Graphviz attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LR => "LR",
            Self::RL => "RL",
            Self::TB => "TB",
            Self::BT => "BT",
        }
    }
}

impl fmt::Display for RankDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown layout direction.
#[derive(Debug, thiserror::Error)]
#[error("Unknown rankdir `{0}`: expected LR, RL, TB or BT")]
pub struct ParseRankDirError(String);

impl FromStr for RankDir {
    type Err = ParseRankDirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LR),
            "RL" => Ok(Self::RL),
            "TB" => Ok(Self::TB),
            "BT" => Ok(Self::BT),
            _ => Err(ParseRankDirError(s.to_string())),
        }
    }
}

/// Styling for [`emit_dot`](super::emit_dot).
///
/// ## Parameters
///
/// - `units`: value-label units (`l3bps`, `bps`, `pps`, `bytes`, ...); labels only
/// - `penwidth_min`, `penwidth_scale`: `penwidth = max(min, log10(value + 1) * scale)`
/// - `level_order`: prefix order used for level inference
/// - `level_colors`: fill per level, cycled
/// - `node_fill_default`: fill for nodes without a level
/// - `color_nodes_by_level`, `color_edges_by_source_level`: coloring switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DotOptions {
    /// Units for value labels.
    pub units: Option<String>,
    /// Minimum edge stroke width.
    pub penwidth_min: f64,
    /// Edge stroke width scale factor.
    pub penwidth_scale: f64,
    /// Explicit level order by label prefix.
    pub level_order: Option<Vec<String>>,
    /// Per-level fill palette.
    pub level_colors: Vec<String>,
    /// Fill for unleveled nodes and the node default.
    pub node_fill_default: String,
    /// Layout direction.
    pub rankdir: RankDir,
    /// Node font.
    pub fontname: String,
    /// Fill nodes by level.
    pub color_nodes_by_level: bool,
    /// Color edges with their source node's level color.
    pub color_edges_by_source_level: bool,
}

impl DotOptions {
    /// Set the value-label units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Set the explicit level order.
    pub fn with_level_order(mut self, order: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.level_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    /// Set the penwidth minimum and scale.
    pub fn with_penwidth(mut self, min: f64, scale: f64) -> Self {
        self.penwidth_min = min;
        self.penwidth_scale = scale;
        self
    }

    /// Set the layout direction.
    pub fn with_rankdir(mut self, rankdir: RankDir) -> Self {
        self.rankdir = rankdir;
        self
    }

    /// Toggle edge coloring by source level.
    pub fn with_edges_colored_by_source(mut self, enabled: bool) -> Self {
        self.color_edges_by_source_level = enabled;
        self
    }

    /// Fill color for a level.
    ///
    /// `None`, an empty palette, or an empty palette entry resolve to
    /// `node_fill_default`.
    pub fn color_for_level(&self, level: Option<usize>) -> &str {
        level
            .filter(|_| !self.level_colors.is_empty())
            .map(|l| self.level_colors[l % self.level_colors.len()].as_str())
            .filter(|color| !color.is_empty())
            .unwrap_or(self.node_fill_default.as_str())
    }
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            units: None,
            penwidth_min: 1.0,
            penwidth_scale: 1.0,
            level_order: None,
            level_colors: DEFAULT_LEVEL_COLORS.iter().map(|c| c.to_string()).collect(),
            node_fill_default: DEFAULT_NODE_FILL.to_string(),
            rankdir: RankDir::LR,
            fontname: DEFAULT_FONTNAME.to_string(),
            color_nodes_by_level: true,
            color_edges_by_source_level: false,
        }
    }
}
