//! Fluent builder for graph query bodies.
//!
//! The builder only accumulates settings; it does not validate them against the
//! backend and never sends anything.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::vocab::{Dimension, LimitType, Units};

/// A graph query body.
///
/// Serializes to the JSON object the console endpoints accept. Unset optional
/// fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowQuery {
    /// Range start.
    #[serde(serialize_with = "serialize_instant")]
    pub start: DateTime<Utc>,
    /// Range end.
    #[serde(serialize_with = "serialize_instant")]
    pub end: DateTime<Utc>,
    /// Grouping dimensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<Dimension>>,
    /// Filter expression, e.g. `InIfBoundary = external`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Metric units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    /// Number of time points (time series only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    /// Include the previous period (time series only).
    #[serde(rename = "previous-period", skip_serializing_if = "Option::is_none")]
    pub previous_period: Option<bool>,
    /// Maximum number of series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Ranking used with `limit`.
    #[serde(rename = "limitType", skip_serializing_if = "Option::is_none")]
    pub limit_type: Option<LimitType>,
    /// IPv4 prefix truncation length.
    #[serde(rename = "truncate-v4", skip_serializing_if = "Option::is_none")]
    pub truncate_v4: Option<u8>,
    /// IPv6 prefix truncation length.
    #[serde(rename = "truncate-v6", skip_serializing_if = "Option::is_none")]
    pub truncate_v6: Option<u8>,
    /// Count both directions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidirectional: Option<bool>,
}

impl FlowQuery {
    /// The query as a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Timestamps go out as RFC 3339 UTC with milliseconds (`2024-05-01T12:00:00.000Z`).
fn serialize_instant<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Fluent accumulator for a [`FlowQuery`].
///
/// # Example
///
/// ```rust
/// use flow_sankey::query::{Dimension, LimitType, QueryBuilder, Units};
///
/// let body = QueryBuilder::last_minutes(60)
///     .dimensions([Dimension::SrcAS, Dimension::ExporterAddress])
///     .filter("InIfBoundary = external")
///     .units(Units::L3Bps)
///     .limit(12, LimitType::Avg)
///     .build_sankey()
///     .to_value();
///
/// assert_eq!(body["dimensions"][0], "SrcAS");
/// assert!(body.get("points").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    query: FlowQuery,
}

impl QueryBuilder {
    /// Start a query over an explicit range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            query: FlowQuery {
                start,
                end,
                dimensions: None,
                filter: None,
                units: None,
                points: None,
                previous_period: None,
                limit: None,
                limit_type: None,
                truncate_v4: None,
                truncate_v6: None,
                bidirectional: None,
            },
        }
    }

    /// The range ending now and spanning `span`.
    pub fn last(span: Duration) -> Self {
        let end = Utc::now();
        Self::new(end - span, end)
    }

    /// The last `n` minutes.
    pub fn last_minutes(n: i64) -> Self {
        Self::last(Duration::minutes(n))
    }

    /// The last `n` hours.
    pub fn last_hours(n: i64) -> Self {
        Self::last(Duration::hours(n))
    }

    /// A range from anything convertible to a UTC instant (e.g. `SystemTime`).
    pub fn range(start: impl Into<DateTime<Utc>>, end: impl Into<DateTime<Utc>>) -> Self {
        Self::new(start.into(), end.into())
    }

    /// Set the grouping dimensions.
    pub fn dimensions(mut self, dimensions: impl IntoIterator<Item = Dimension>) -> Self {
        self.query.dimensions = Some(dimensions.into_iter().collect());
        self
    }

    /// Set the filter expression.
    pub fn filter(mut self, expr: impl Into<String>) -> Self {
        self.query.filter = Some(expr.into());
        self
    }

    /// Set the units.
    pub fn units(mut self, units: Units) -> Self {
        self.query.units = Some(units);
        self
    }

    /// Set the number of time points.
    pub fn points(mut self, n: u32) -> Self {
        self.query.points = Some(n);
        self
    }

    /// Include or exclude the previous period.
    pub fn previous_period(mut self, flag: bool) -> Self {
        self.query.previous_period = Some(flag);
        self
    }

    /// Limit the number of series, ranked by `limit_type`.
    pub fn limit(mut self, n: u32, limit_type: LimitType) -> Self {
        self.query.limit = Some(n);
        self.query.limit_type = Some(limit_type);
        self
    }

    /// Truncate addresses to prefixes. `None` or `0` leaves a family untouched.
    pub fn truncate(mut self, v4: Option<u8>, v6: Option<u8>) -> Self {
        if let Some(v4) = v4.filter(|&p| p > 0) {
            self.query.truncate_v4 = Some(v4);
        }
        if let Some(v6) = v6.filter(|&p| p > 0) {
            self.query.truncate_v6 = Some(v6);
        }
        self
    }

    /// Count traffic in both directions.
    pub fn bidirectional(mut self, flag: bool) -> Self {
        self.query.bidirectional = Some(flag);
        self
    }

    /// The accumulated query.
    pub fn build(&self) -> FlowQuery {
        self.query.clone()
    }

    /// The accumulated query without time-series-only fields.
    ///
    /// The Sankey endpoint ignores `points` and `previous-period`.
    pub fn build_sankey(&self) -> FlowQuery {
        FlowQuery {
            points: None,
            previous_period: None,
            ..self.query.clone()
        }
    }
}

impl Default for QueryBuilder {
    /// The last hour.
    fn default() -> Self {
        Self::last_hours(1)
    }
}
