//! Wire vocabulary of the flow backend's graph queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Console path of the time-series graph endpoint.
pub const GRAPH_LINE_PATH: &str = "/api/v0/console/graph/line";

/// Console path of the Sankey graph endpoint.
pub const GRAPH_SANKEY_PATH: &str = "/api/v0/console/graph/sankey";

/// Error for a string that is not part of the query vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Unknown dimension name.
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),
    /// Unknown units name.
    #[error("Unknown units: {0}")]
    UnknownUnits(String),
    /// Unknown limit type.
    #[error("Unknown limit type: {0}")]
    UnknownLimitType(String),
}

macro_rules! dimensions {
    ($($name:ident),+ $(,)?) => {
        /// A flow dimension the backend can group by.
        ///
        /// Serialized as its variant name, which is also the backend's name.
        #[allow(missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Dimension {
            $($name,)+
        }

        impl Dimension {
            /// Every dimension, in declaration order.
            pub const ALL: &'static [Dimension] = &[$(Dimension::$name,)+];

            /// The backend name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Dimension::$name => stringify!($name),)+
                }
            }
        }
    };
}

dimensions! {
    ExporterAddress, ExporterName, ExporterGroup, ExporterRole, ExporterSite,
    ExporterRegion, ExporterTenant,
    SrcAddr, DstAddr, SrcNetPrefix, DstNetPrefix, SrcAS, DstAS,
    SrcNetName, DstNetName, SrcNetRole, DstNetRole, SrcNetSite, DstNetSite,
    SrcNetRegion, DstNetRegion, SrcNetTenant, DstNetTenant,
    SrcCountry, DstCountry, SrcGeoCity, DstGeoCity, SrcGeoState, DstGeoState,
    DstASPath, Dst1stAS, Dst2ndAS, Dst3rdAS, DstCommunities,
    InIfName, OutIfName, InIfDescription, OutIfDescription, InIfSpeed, OutIfSpeed,
    InIfConnectivity, OutIfConnectivity, InIfProvider, OutIfProvider,
    InIfBoundary, OutIfBoundary,
    EType, Proto, SrcPort, DstPort, PacketSizeBucket, ForwardingStatus, TCPFlags,
}

impl FromStr for Dimension {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| QueryError::UnknownDimension(s.to_string()))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric units of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Layer 2 bits per second.
    L2Bps,
    /// Layer 3 bits per second.
    L3Bps,
    /// Packets per second.
    Pps,
}

impl Units {
    /// The backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L2Bps => "l2bps",
            Self::L3Bps => "l3bps",
            Self::Pps => "pps",
        }
    }
}

impl FromStr for Units {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "l2bps" => Ok(Self::L2Bps),
            "l3bps" => Ok(Self::L3Bps),
            "pps" => Ok(Self::Pps),
            _ => Err(QueryError::UnknownUnits(s.to_string())),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the backend ranks series when applying `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitType {
    /// Rank by average.
    #[default]
    Avg,
    /// Rank by peak.
    Max,
    /// Rank by total.
    Sum,
    /// Rank by 95th percentile.
    P95,
}

impl LimitType {
    /// The backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Max => "max",
            Self::Sum => "sum",
            Self::P95 => "p95",
        }
    }
}

impl FromStr for LimitType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(Self::Avg),
            "max" => Ok(Self::Max),
            "sum" => Ok(Self::Sum),
            "p95" => Ok(Self::P95),
            _ => Err(QueryError::UnknownLimitType(s.to_string())),
        }
    }
}

impl fmt::Display for LimitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
