//! Sankey DOT Binary
//!
//! Reads a raw Sankey payload (as returned by the flow backend's Sankey
//! endpoint), normalizes it, prints the heaviest links and/or Graphviz DOT.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `SANKEY_DOT_CONFIG`: path to a JSON theme file (`DotOptions`, camelCase keys)
//! - `SANKEY_UNITS`: value units, e.g. `l3bps`, `pps`, `bytes` (overrides the theme)
//! - `SANKEY_LEVEL_ORDER`: comma-separated prefixes, e.g. `SrcAS,ExporterAddress`
//! - `SANKEY_PENWIDTH_SCALE`: edge width scale factor
//! - `SANKEY_TOP`: number of links in the summary (default: 20)
//! - `SANKEY_MODE`: `summary`, `dot` or `both` (default: both)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! Logs go to stderr; summary and DOT go to stdout.
//!
//! ## Usage
//!
//! ```bash
//! SANKEY_UNITS=l3bps SANKEY_LEVEL_ORDER=SrcAS,ExporterAddress sankey_dot payload.json > flows.dot
//! curl ... | SANKEY_MODE=dot sankey_dot - | dot -Tsvg > flows.svg
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flow_sankey::{
    emit_dot, normalize_with_report, CanonicalGraph, DefaultValueFormatter, DotOptions, RawGraph,
    ValueFormatter,
};

/// Initialize the tracing subscriber with JSON or pretty format, on stderr.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sankey_dot=info,flow_sankey=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .init();
    }
}

/// What to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Summary,
    Dot,
    Both,
}

impl Mode {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Some(Self::Summary),
            "dot" => Some(Self::Dot),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    fn summary(self) -> bool {
        matches!(self, Self::Summary | Self::Both)
    }

    fn dot(self) -> bool {
        matches!(self, Self::Dot | Self::Both)
    }
}

/// Runtime configuration, from a theme file plus environment overrides.
struct CliConfig {
    input: Option<PathBuf>,
    options: DotOptions,
    top: usize,
    mode: Mode,
}

impl CliConfig {
    fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let input = std::env::args()
            .nth(1)
            .filter(|arg| arg != "-")
            .map(PathBuf::from);

        let mut options = match std::env::var("SANKEY_DOT_CONFIG") {
            Ok(path) if !path.is_empty() => {
                let text = std::fs::read_to_string(&path)?;
                let options: DotOptions = serde_json::from_str(&text)?;
                info!(path = %path, "theme loaded");
                options
            }
            _ => DotOptions::default(),
        };

        if let Ok(units) = std::env::var("SANKEY_UNITS") {
            options.units = Some(units);
        }

        if let Ok(order) = std::env::var("SANKEY_LEVEL_ORDER") {
            let order: Vec<String> = order
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            options.level_order = Some(order);
            // A level order also tints edges by their source level.
            options.color_edges_by_source_level = true;
        }

        if let Ok(scale) = std::env::var("SANKEY_PENWIDTH_SCALE") {
            match scale.parse::<f64>() {
                Ok(scale) if scale.is_finite() => options.penwidth_scale = scale,
                _ => warn!(value = %scale, "ignoring invalid SANKEY_PENWIDTH_SCALE"),
            }
        }

        let top = std::env::var("SANKEY_TOP")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20);

        let mode = match std::env::var("SANKEY_MODE") {
            Ok(raw) => Mode::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown SANKEY_MODE, using both");
                Mode::Both
            }),
            Err(_) => Mode::Both,
        };

        Ok(Self { input, options, top, mode })
    }

    fn read_payload(&self) -> io::Result<String> {
        match &self.input {
            Some(path) => std::fs::read_to_string(path),
            None => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}

/// `<src>  →  <dst>  |  <value>` lines for the heaviest links.
fn summary_lines(graph: &CanonicalGraph, top: usize, units: Option<&str>) -> Vec<String> {
    let formatter = DefaultValueFormatter;
    graph
        .top_links(top)
        .into_iter()
        .map(|link| {
            let src = graph
                .label(link.source)
                .map_or_else(|| format!("#{}", link.source), str::to_string);
            let dst = graph
                .label(link.target)
                .map_or_else(|| format!("#{}", link.target), str::to_string);
            format!(
                "{}  →  {}  |  {}",
                src,
                dst,
                formatter.format_value(link.finite_value(), units)
            )
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = CliConfig::from_env()?;
    let started = Instant::now();

    let payload = config.read_payload()?;
    let raw = match RawGraph::from_json_str(&payload) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(error = %e, "failed to read sankey payload");
            return Err(e.into());
        }
    };

    let normalized = normalize_with_report(&raw);
    let graph = &normalized.graph;

    info!(
        shape = raw.shape(),
        nodes = graph.node_count(),
        links = graph.link_count(),
        dropped_links = normalized.report.dropped_links,
        fingerprint = %graph.fingerprint(),
        latency_ms = started.elapsed().as_millis() as u64,
        "sankey normalized"
    );

    if normalized.report.dropped_links > 0 {
        warn!(
            dropped_links = normalized.report.dropped_links,
            "links with unresolvable endpoints were dropped"
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if config.mode.summary() {
        writeln!(
            out,
            "Sankey | nodes={} | links={} | top={} | units={}",
            graph.node_count(),
            graph.link_count(),
            config.top,
            config.options.units.as_deref().unwrap_or("-")
        )?;
        for line in summary_lines(graph, config.top, config.options.units.as_deref()) {
            writeln!(out, "{}", line)?;
        }
    }

    if config.mode.dot() {
        let dot = emit_dot(graph, &config.options);
        debug!(bytes = dot.len(), "writing dot");
        out.write_all(dot.as_bytes())?;
    }

    out.flush()?;
    Ok(())
}
