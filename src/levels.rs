//! Level inference from node labels.
//!
//! Sankey labels from the flow backend carry the dimension they belong to as a
//! colon-delimited prefix (`"SrcAS: 15169: Google"`, `"ExporterAddress: 10.0.0.1"`).
//! The prefix decides the node's level, which drives coloring.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex_lite::Regex;

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*([^:]+)\s*:").expect("label prefix pattern is valid"))
}

/// The trimmed text before the first colon, or `""` if there is none.
///
/// ```rust
/// use flow_sankey::label_prefix;
///
/// assert_eq!(label_prefix("SrcAS: 15169: Google"), "SrcAS");
/// assert_eq!(label_prefix("NoColonLabel"), "");
/// ```
pub fn label_prefix(label: &str) -> &str {
    prefix_pattern()
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str().trim())
}

/// Assign a level to every node label.
///
/// Returns one entry per node: `Some(level)`, or `None` when the label has no
/// prefix. Nodes sharing a prefix share a level.
///
/// - With `level_order`, a prefix's level is its position in the list; prefixes
///   missing from the list get `level_order.len()`, `len() + 1`, ... in the order
///   they are first met.
/// - Without it, levels follow the order in which prefixes are first met.
pub fn infer_levels<S: AsRef<str>>(nodes: &[S], level_order: Option<&[String]>) -> Vec<Option<usize>> {
    let mut levels = LevelMemo::new(level_order);
    nodes
        .iter()
        .map(|label| levels.level_of(label_prefix(label.as_ref())))
        .collect()
}

/// Prefix → level cache, local to one `infer_levels` call.
struct LevelMemo<'a> {
    level_order: Option<&'a [String]>,
    by_prefix: HashMap<String, usize>,
    overflow: usize,
}

impl<'a> LevelMemo<'a> {
    fn new(level_order: Option<&'a [String]>) -> Self {
        Self {
            level_order,
            by_prefix: HashMap::new(),
            overflow: 0,
        }
    }

    fn level_of(&mut self, prefix: &str) -> Option<usize> {
        if prefix.is_empty() {
            return None;
        }
        if let Some(&level) = self.by_prefix.get(prefix) {
            return Some(level);
        }

        let level = match self.level_order {
            Some(order) => match order.iter().position(|p| p == prefix) {
                Some(position) => position,
                None => {
                    self.overflow += 1;
                    order.len() + self.overflow - 1
                }
            },
            // Only non-empty prefixes are memoized, so the memo size is the next level.
            None => self.by_prefix.len(),
        };

        self.by_prefix.insert(prefix.to_string(), level);
        Some(level)
    }
}
